//! Run options threaded through every operation
//!
//! One explicit value built from the CLI (and GitHub Actions env fallbacks)
//! in `main`, passed by reference everywhere. There is no module-level
//! mutable state; `dry` in particular lives here so repeated invocations in
//! tests cannot interfere with one another.

use std::path::PathBuf;

use crate::core::error::{BumpError, BumpResult};

/// Options for a single channel-bump invocation
#[derive(Debug, Clone)]
pub struct Options {
  /// Working tree holding the version manifest
  pub cwd: PathBuf,
  /// GitHub API token
  pub token: Option<String>,
  /// Repository owner
  pub owner: Option<String>,
  /// Repository name
  pub repo: Option<String>,
  /// Head (source) channel branch ref
  pub head_ref: Option<String>,
  /// Base (dest) channel branch ref
  pub base_ref: Option<String>,
  /// Log every mutating call instead of executing it
  pub dry: bool,
  /// Manage branch protection rules around forced pushes
  pub protection: bool,
  /// Allow package publishing
  pub publish: bool,
}

impl Options {
  pub fn token(&self) -> BumpResult<&str> {
    self
      .token
      .as_deref()
      .ok_or_else(|| BumpError::with_help("Missing GitHub token", "Pass --token or set GITHUB_TOKEN."))
  }

  pub fn owner(&self) -> BumpResult<&str> {
    self
      .owner
      .as_deref()
      .ok_or_else(|| BumpError::with_help("Missing repository owner", "Pass --owner or set GITHUB_REPOSITORY_OWNER."))
  }

  pub fn repo(&self) -> BumpResult<&str> {
    self
      .repo
      .as_deref()
      .ok_or_else(|| BumpError::with_help("Missing repository name", "Pass --repo or set GITHUB_REPO."))
  }

  /// Head and base refs, required by every resolving command
  pub fn refs(&self) -> BumpResult<(&str, &str)> {
    match (self.head_ref.as_deref(), self.base_ref.as_deref()) {
      (Some(head), Some(base)) => Ok((head, base)),
      _ => Err(BumpError::with_help(
        "Missing head/base refs",
        "Pass --head-ref and --base-ref (or set GITHUB_HEAD_REF / GITHUB_BASE_REF).",
      )),
    }
  }

  pub fn base_ref(&self) -> BumpResult<&str> {
    self.refs().map(|(_, base)| base)
  }
}
