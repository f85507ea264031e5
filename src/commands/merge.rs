//! `merge`: resolve leniently and propagate the bump across channels
//!
//! Runs after the bump commit has landed on the base branch, so the resolver
//! tolerates a head ref one minor behind the manifest.

use crate::core::error::BumpResult;
use crate::core::manifest;
use crate::core::options::Options;
use crate::core::package_manager::PackageManager;
use crate::core::propagate::Propagator;
use crate::core::vcs::SystemGit;
use crate::github::GitHubClient;

use super::{resolve_checked, write_action_outputs};

pub fn run_merge(opts: &Options, keyword_arg: Option<&str>) -> BumpResult<()> {
  let keyword = resolve_checked(opts, keyword_arg, true)?;
  println!("> merge keyword: {}", keyword);

  let git = SystemGit::new(&opts.cwd, opts.dry);
  let manager = PackageManager::new(&opts.cwd, opts.dry, &git);
  manager.ensure_installed()?;
  let host = GitHubClient::new(opts.token()?, opts.owner()?, opts.repo()?, opts.dry)?;

  Propagator::new(opts, &git, &manager, &host).run(keyword)?;
  super::publish::publish_if_releasing(opts, &manager, keyword)?;

  let version = manifest::read_version(&opts.cwd)?;
  write_action_outputs(keyword, &version)
}
