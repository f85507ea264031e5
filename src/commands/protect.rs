//! `ensure-protect` / `suspend-protect`: manage channel branch protection
//! outside a propagation run

use crate::core::error::BumpResult;
use crate::core::options::Options;
use crate::github::{protection, GitHubClient};

pub fn run_ensure_protect(opts: &Options) -> BumpResult<()> {
  let host = GitHubClient::new(opts.token()?, opts.owner()?, opts.repo()?, opts.dry)?;
  protection::ensure_protection(opts, &host)
}

pub fn run_suspend_protect(opts: &Options) -> BumpResult<()> {
  let host = GitHubClient::new(opts.token()?, opts.owner()?, opts.repo()?, opts.dry)?;
  protection::suspend_all(opts, &host)
}
