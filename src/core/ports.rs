//! Capability seams between decision logic and the outside world
//!
//! The propagator never talks to a subprocess or the network directly; it
//! drives these traits. Production implementations are `SystemGit`,
//! `PackageManager`, and `GitHubClient`; tests substitute recording fakes.

use std::collections::BTreeMap;

use crate::core::error::BumpResult;
use crate::core::version::Increment;

/// Local git operations, realized by spawning system git
pub trait GitClient {
  /// Push a refspec to origin
  fn push(&self, refspec: &str, force: bool) -> BumpResult<()>;

  /// Fetch from origin
  fn fetch(&self) -> BumpResult<()>;

  /// Switch to an existing branch
  fn switch(&self, branch: &str) -> BumpResult<()>;

  /// Create (or reset) a branch at a start point and switch to it
  fn switch_create(&self, branch: &str, start_point: &str) -> BumpResult<()>;

  /// Delete a local tag
  fn delete_tag(&self, tag: &str) -> BumpResult<()>;

  /// Commit all tracked changes
  fn commit_all(&self, message: &str) -> BumpResult<()>;
}

/// External version manager (yarn or lerna)
pub trait VersionManager {
  /// Increment the manifest version, committing and optionally tagging.
  /// `message` overrides the manager's commit message; `tag` maps to the
  /// manager's no-git-tag-version mode when false.
  fn bump(&self, increment: Increment, message: Option<&str>, tag: bool) -> BumpResult<()>;
}

/// Branch protection rule settings, mirroring the GraphQL
/// updateBranchProtectionRule input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectionSettings {
  pub requires_approving_reviews: bool,
  pub required_approving_review_count: u32,
  pub dismisses_stale_reviews: bool,
  pub restricts_review_dismissals: bool,
  pub requires_status_checks: bool,
  pub required_status_check_contexts: Vec<String>,
  pub requires_strict_status_checks: bool,
  pub requires_conversation_resolution: bool,
  pub is_admin_enforced: bool,
  pub restricts_pushes: bool,
  pub allows_force_pushes: bool,
  pub allows_deletions: bool,
}

/// Repository host (GitHub REST + GraphQL)
pub trait RepositoryHost {
  /// SHA a ref points at; `ref_name` is API-style, e.g. "tags/v1.2" or
  /// "heads/dev/v1/v1.2". Absent refs are an error the caller may treat as
  /// "missing".
  fn get_ref_sha(&self, ref_name: &str) -> BumpResult<String>;

  /// Create a fully qualified ref ("refs/heads/...") at a commit
  fn create_ref(&self, ref_name: &str, sha: &str) -> BumpResult<()>;

  /// Server-side merge of a commit into a branch
  fn merge_branch(&self, base: &str, head_sha: &str, message: &str) -> BumpResult<()>;

  /// Set the repository default branch
  fn set_default_branch(&self, branch: &str) -> BumpResult<()>;

  /// Name of the newest dev channel branch, if any
  fn latest_dev_branch(&self) -> BumpResult<Option<String>>;

  /// Map of branch pattern to protection rule id, creating missing rules
  fn protection_rule_ids(&self) -> BumpResult<BTreeMap<String, String>>;

  /// Update one protection rule
  fn update_protection_rule(&self, rule_id: &str, settings: &ProtectionSettings) -> BumpResult<()>;

  /// Comment on a pull request and close it (verify failure reporting)
  fn comment_and_close_pr(&self, number: u64, body: &str) -> BumpResult<()>;
}
