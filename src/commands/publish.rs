//! `publish`: push non-private packages to the GitHub npm registry
//!
//! Only release-producing keywords publish; promotion keywords (premajor,
//! preminor) open a new cycle without a publishable artifact.

use crate::core::channel::BumpKeyword;
use crate::core::error::BumpResult;
use crate::core::options::Options;
use crate::core::package_manager::PackageManager;
use crate::core::vcs::SystemGit;

use super::resolve_checked;

pub fn run_publish(opts: &Options) -> BumpResult<()> {
  let keyword = resolve_checked(opts, None, false)?;
  let git = SystemGit::new(&opts.cwd, opts.dry);
  let manager = PackageManager::new(&opts.cwd, opts.dry, &git);
  publish_if_releasing(opts, &manager, keyword)
}

pub(crate) fn publish_if_releasing(
  opts: &Options,
  manager: &PackageManager,
  keyword: BumpKeyword,
) -> BumpResult<()> {
  if !opts.publish {
    println!("> publishing disabled");
    return Ok(());
  }
  if !matches!(keyword, BumpKeyword::Patch | BumpKeyword::Prerelease) {
    println!("> nothing to publish for {}", keyword);
    return Ok(());
  }
  manager.write_npmrc(opts.owner()?)?;
  manager.publish_packages(opts.token()?)
}
