//! Channel resolver: map a head/base ref pair to a bump keyword
//!
//! Pure decision logic, no I/O. The bump path resolves strictly; the
//! merge/propagation path resolves leniently, which allows the head branch
//! to be exactly one minor behind the manifest — propagation runs after the
//! bump has already moved the manifest to the next cycle.

use regex::Regex;
use semver::Version;

use crate::core::channel::{version_path, BumpKeyword, Channel};
use crate::core::error::{BumpError, BumpResult, ValidationError};

/// Resolve the bump keyword for a channel transition.
///
/// `lenient` widens the version check by one minor; nothing else differs
/// between the two call sites.
pub fn resolve_bump_keyword(
  current: &Version,
  head_ref: &str,
  base_ref: &str,
  lenient: bool,
) -> BumpResult<BumpKeyword> {
  let no_rule = || {
    BumpError::Validation(ValidationError::NoRule {
      head_ref: head_ref.to_string(),
      base_ref: base_ref.to_string(),
    })
  };

  let head_channel = Channel::of_ref(head_ref).ok_or_else(no_rule)?;
  let base_channel = Channel::of_ref(base_ref).ok_or_else(no_rule)?;

  let keyword = match (head_channel, base_channel) {
    (Channel::Dev, Channel::Alpha) => BumpKeyword::Prerelease,
    (Channel::Alpha, Channel::Release) => BumpKeyword::Patch,
    (Channel::Release, Channel::Main) => BumpKeyword::Preminor,
    (Channel::Release, Channel::Release) => BumpKeyword::Preminor,
    (Channel::Main, Channel::Main) => BumpKeyword::Premajor,
    _ => return Err(no_rule()),
  };

  // A promotion out of the release channel may cross version-path
  // boundaries: release -> main, and release -> release onto an lts line.
  let lts = base_channel == Channel::Release && base_ref.split('/').next_back() == Some("lts");
  let crosses_versions =
    head_channel == Channel::Release && (base_channel == Channel::Main || lts);

  if version_path(head_ref) != version_path(base_ref) && !crosses_versions {
    return Err(BumpError::Validation(ValidationError::VersionsNotMatch {
      head_ref: head_ref.to_string(),
      base_ref: base_ref.to_string(),
    }));
  }

  // main -> main is self-consistent by definition.
  if head_channel == Channel::Main {
    return Ok(keyword);
  }

  check_head_tracks_current(current, head_ref, lenient)?;
  Ok(keyword)
}

/// Validate that `head_ref` names the minor line the manifest is on (or,
/// leniently, the one just before it).
fn check_head_tracks_current(current: &Version, head_ref: &str, lenient: bool) -> BumpResult<()> {
  let mismatch = || {
    BumpError::Validation(ValidationError::HeadRefMismatch {
      head_ref: head_ref.to_string(),
      version: current.to_string(),
    })
  };

  let pattern = Regex::new(r"(\w+)/v(\d+)/v(\d+)\.(\d+)").expect("static regex");
  let captures = pattern.captures(head_ref).ok_or_else(mismatch)?;

  let head_major: u64 = captures[2].parse().map_err(|_| mismatch())?;
  let head_loose_major: u64 = captures[3].parse().map_err(|_| mismatch())?;
  let head_minor: u64 = captures[4].parse().map_err(|_| mismatch())?;

  if head_major != current.major || head_loose_major != current.major {
    return Err(mismatch());
  }
  // Ahead of the manifest is never valid.
  if head_minor > current.minor {
    return Err(mismatch());
  }
  // More than one minor behind is too stale in any mode.
  if head_minor + 1 < current.minor {
    return Err(mismatch());
  }
  // Exactly one minor behind only passes in lenient (merge) mode.
  if head_minor + 1 == current.minor && !lenient {
    return Err(mismatch());
  }

  Ok(())
}
