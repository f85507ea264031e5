//! Branch protection rule management
//!
//! Channel branches stay protected between runs; propagation relaxes the
//! rules just long enough for its forced pushes and restores them at the
//! end. Both directions honor `--no-protection`.

use crate::core::channel::PROTECTED_BRANCH_PATTERNS;
use crate::core::error::BumpResult;
use crate::core::options::Options;
use crate::core::ports::{ProtectionSettings, RepositoryHost};

/// Strict settings for a channel pattern. Dev branches are working branches
/// and skip the review and push restrictions.
pub fn strict_settings(pattern: &str) -> ProtectionSettings {
  let restricts_pushes = pattern.split('/').next() != Some("dev");
  ProtectionSettings {
    requires_approving_reviews: restricts_pushes,
    required_approving_review_count: if restricts_pushes { 1 } else { 0 },
    dismisses_stale_reviews: true,
    restricts_review_dismissals: true,
    requires_status_checks: true,
    required_status_check_contexts: if restricts_pushes {
      vec!["verify".to_string()]
    } else {
      Vec::new()
    },
    requires_strict_status_checks: true,
    requires_conversation_resolution: true,
    is_admin_enforced: true,
    restricts_pushes,
    allows_force_pushes: false,
    allows_deletions: false,
  }
}

/// Relaxed settings used while propagation rewrites channel heads.
/// Deletions stay denied.
pub fn suspended_settings() -> ProtectionSettings {
  ProtectionSettings {
    requires_approving_reviews: false,
    required_approving_review_count: 0,
    dismisses_stale_reviews: false,
    restricts_review_dismissals: false,
    requires_status_checks: false,
    required_status_check_contexts: Vec::new(),
    requires_strict_status_checks: false,
    requires_conversation_resolution: false,
    is_admin_enforced: true,
    restricts_pushes: false,
    allows_force_pushes: true,
    allows_deletions: false,
  }
}

/// Apply strict protection to every rule the repository has, creating the
/// channel pattern rules that are missing
pub fn ensure_protection(opts: &Options, host: &dyn RepositoryHost) -> BumpResult<()> {
  if !opts.protection {
    return Ok(());
  }
  let rule_ids = host.protection_rule_ids()?;
  for (pattern, rule_id) in &rule_ids {
    println!("> ensure protection for branch name pattern {}", pattern);
    host.update_protection_rule(rule_id, &strict_settings(pattern))?;
  }
  Ok(())
}

/// Relax protection on the given channel patterns
pub fn suspend_protection(
  opts: &Options,
  host: &dyn RepositoryHost,
  patterns: &[&str],
) -> BumpResult<()> {
  if !opts.protection {
    return Ok(());
  }
  let rule_ids = host.protection_rule_ids()?;
  let settings = suspended_settings();
  for pattern in patterns {
    if let Some(rule_id) = rule_ids.get(*pattern) {
      println!("> suspend protection for branch name pattern {}", pattern);
      host.update_protection_rule(rule_id, &settings)?;
    }
  }
  Ok(())
}

/// Relax protection on every channel pattern (the `suspend-protect` command)
pub fn suspend_all(opts: &Options, host: &dyn RepositoryHost) -> BumpResult<()> {
  suspend_protection(opts, host, &PROTECTED_BRANCH_PATTERNS)
}
