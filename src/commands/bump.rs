//! `bump`: resolve the keyword strictly and apply the manifest bump

use crate::core::error::BumpResult;
use crate::core::manifest;
use crate::core::options::Options;
use crate::core::package_manager::PackageManager;
use crate::core::ports::VersionManager;
use crate::core::vcs::SystemGit;

use super::{resolve_checked, write_action_outputs};

pub fn run_bump(opts: &Options, keyword_arg: Option<&str>) -> BumpResult<()> {
  let keyword = resolve_checked(opts, keyword_arg, false)?;
  println!("> bump keyword: {}", keyword);

  let git = SystemGit::new(&opts.cwd, opts.dry);
  let manager = PackageManager::new(&opts.cwd, opts.dry, &git);
  manager.ensure_installed()?;
  manager.bump(keyword.into(), None, true)?;

  let version = manifest::read_version(&opts.cwd)?;
  println!("> version: {}", version);
  write_action_outputs(keyword, &version)
}
