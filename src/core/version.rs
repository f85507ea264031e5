//! Version utilities: loose versions and semver increments
//!
//! The loose version is the `major.minor` pair, ignoring patch and
//! prerelease; it names per-minor channel branches and tags. Increment
//! semantics mirror the node-semver `inc` rules with prerelease identifier
//! "alpha", since the external version managers follow those rules and the
//! propagator must predict their output for commit messages and tag names.

use semver::{BuildMetadata, Prerelease, Version};

use crate::core::channel::BumpKeyword;

/// Prerelease identifier used across all channels
pub const PRERELEASE_ID: &str = "alpha";

/// `major.minor` string of a version, e.g. "1.2"
pub fn loose_version(version: &Version) -> String {
  format!("{}.{}", version.major, version.minor)
}

/// A manifest increment the version manager can apply
///
/// Wider than [`BumpKeyword`]: the dev-channel follow-up after a patch
/// release performs a prepatch bump that no channel transition maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Increment {
  Premajor,
  Preminor,
  Prepatch,
  Patch,
  Prerelease,
}

impl Increment {
  pub fn as_str(self) -> &'static str {
    match self {
      Increment::Premajor => "premajor",
      Increment::Preminor => "preminor",
      Increment::Prepatch => "prepatch",
      Increment::Patch => "patch",
      Increment::Prerelease => "prerelease",
    }
  }

  /// The next version this increment produces from `version`
  pub fn apply(self, version: &Version) -> Version {
    let alpha_zero = Prerelease::new(&format!("{}.0", PRERELEASE_ID)).expect("static prerelease");
    match self {
      Increment::Premajor => pre_version(version.major + 1, 0, 0, alpha_zero),
      Increment::Preminor => pre_version(version.major, version.minor + 1, 0, alpha_zero),
      Increment::Prepatch => pre_version(version.major, version.minor, version.patch + 1, alpha_zero),
      Increment::Patch => {
        // A prerelease is released as-is; a release gets the next patch.
        if version.pre.is_empty() {
          Version::new(version.major, version.minor, version.patch + 1)
        } else {
          Version::new(version.major, version.minor, version.patch)
        }
      }
      Increment::Prerelease => match next_prerelease(&version.pre) {
        Some(pre) => pre_version(version.major, version.minor, version.patch, pre),
        None => Increment::Prepatch.apply(version),
      },
    }
  }
}

impl From<BumpKeyword> for Increment {
  fn from(keyword: BumpKeyword) -> Increment {
    match keyword {
      BumpKeyword::Premajor => Increment::Premajor,
      BumpKeyword::Preminor => Increment::Preminor,
      BumpKeyword::Patch => Increment::Patch,
      BumpKeyword::Prerelease => Increment::Prerelease,
    }
  }
}

fn pre_version(major: u64, minor: u64, patch: u64, pre: Prerelease) -> Version {
  Version {
    major,
    minor,
    patch,
    pre,
    build: BuildMetadata::EMPTY,
  }
}

/// Increment an existing alpha prerelease counter, e.g. alpha.3 -> alpha.4.
/// Returns None when there is no prerelease to continue (caller starts a
/// fresh prepatch cycle) and restarts at alpha.0 for foreign identifiers.
fn next_prerelease(pre: &Prerelease) -> Option<Prerelease> {
  if pre.is_empty() {
    return None;
  }
  let mut parts: Vec<&str> = pre.as_str().split('.').collect();
  let bumped;
  if parts[0] == PRERELEASE_ID {
    match parts.last().and_then(|n| n.parse::<u64>().ok()) {
      Some(n) => {
        bumped = (n + 1).to_string();
        *parts.last_mut().expect("non-empty parts") = &bumped;
      }
      None => parts.push("0"),
    }
    Prerelease::new(&parts.join(".")).ok()
  } else {
    Prerelease::new(&format!("{}.0", PRERELEASE_ID)).ok()
  }
}
