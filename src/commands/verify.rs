//! `verify`: resolve strictly and report, without touching anything
//!
//! Runs on pull request open in CI. When the resolution fails and a pull
//! request number is known, the error is posted as a comment and the pull
//! request is closed so the invalid transition cannot be merged.

use crate::core::error::BumpResult;
use crate::core::manifest;
use crate::core::options::Options;
use crate::core::ports::RepositoryHost;
use crate::github::GitHubClient;

use super::{resolve_checked, write_action_outputs};

pub fn run_verify(opts: &Options, pull_request: Option<u64>) -> BumpResult<()> {
  match resolve_checked(opts, None, false) {
    Ok(keyword) => {
      let (head_ref, base_ref) = opts.refs()?;
      println!("> {} -> {} resolves to {}", head_ref, base_ref, keyword);
      let version = manifest::read_version(&opts.cwd)?;
      write_action_outputs(keyword, &version)
    }
    Err(err) => {
      if let Some(number) = pull_request {
        match GitHubClient::new(opts.token()?, opts.owner()?, opts.repo()?, opts.dry) {
          Ok(host) => {
            if let Err(report_err) = host.comment_and_close_pr(number, &err.to_string()) {
              eprintln!("> failed to report on pull request #{}: {}", number, report_err);
            }
          }
          Err(client_err) => {
            eprintln!("> failed to reach the repository host: {}", client_err);
          }
        }
      }
      Err(err)
    }
  }
}
