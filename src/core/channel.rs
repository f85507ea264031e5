//! Release channels and bump keywords
//!
//! Channels form a linear promotion pipeline dev -> alpha -> release -> main.
//! A channel is always the first path segment of a branch ref; `main` is the
//! only channel-only ref. The bump keyword is derived from a channel pair,
//! never stored.

use std::fmt;

/// Branch name patterns carrying protection rules, one per channel
pub const PROTECTED_BRANCH_PATTERNS: [&str; 4] = ["main", "release/*/*", "alpha/*/*", "dev/*/*"];

/// A promotion stage of increasing release stability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
  Dev,
  Alpha,
  Release,
  Main,
}

impl Channel {
  pub fn as_str(self) -> &'static str {
    match self {
      Channel::Dev => "dev",
      Channel::Alpha => "alpha",
      Channel::Release => "release",
      Channel::Main => "main",
    }
  }

  pub fn parse(name: &str) -> Option<Channel> {
    match name {
      "dev" => Some(Channel::Dev),
      "alpha" => Some(Channel::Alpha),
      "release" => Some(Channel::Release),
      "main" => Some(Channel::Main),
      _ => None,
    }
  }

  /// Channel of a branch ref: the first path segment, ignoring any
  /// `refs/heads/` prefix the CI event may carry.
  pub fn of_ref(branch_ref: &str) -> Option<Channel> {
    Channel::parse(first_segment(branch_ref))
  }

}

impl fmt::Display for Channel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Strip an optional `refs/heads/` prefix from a branch ref
pub fn strip_heads(branch_ref: &str) -> &str {
  branch_ref.strip_prefix("refs/heads/").unwrap_or(branch_ref)
}

fn first_segment(branch_ref: &str) -> &str {
  strip_heads(branch_ref).split('/').next().unwrap_or("")
}

/// Everything after the channel segment, used for version-path comparison
pub fn version_path(branch_ref: &str) -> &str {
  let stripped = strip_heads(branch_ref);
  match stripped.split_once('/') {
    Some((_, rest)) => rest,
    None => "",
  }
}

/// Semver increment selected by a channel transition
///
/// Determines both the manifest increment and the propagation fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKeyword {
  Premajor,
  Preminor,
  Patch,
  Prerelease,
}

impl BumpKeyword {
  pub fn as_str(self) -> &'static str {
    match self {
      BumpKeyword::Premajor => "premajor",
      BumpKeyword::Preminor => "preminor",
      BumpKeyword::Patch => "patch",
      BumpKeyword::Prerelease => "prerelease",
    }
  }

  pub fn parse(name: &str) -> Option<BumpKeyword> {
    match name {
      "premajor" => Some(BumpKeyword::Premajor),
      "preminor" => Some(BumpKeyword::Preminor),
      "patch" => Some(BumpKeyword::Patch),
      "prerelease" => Some(BumpKeyword::Prerelease),
      _ => None,
    }
  }

  /// Downstream channels receiving a server-side merge, upstream first.
  /// Earlier channels must be updated before later ones are read so merges
  /// flow toward dev without stale refs.
  pub fn merge_targets(self) -> &'static [Channel] {
    match self {
      BumpKeyword::Premajor => &[Channel::Release, Channel::Alpha, Channel::Dev],
      BumpKeyword::Preminor => &[Channel::Release, Channel::Alpha, Channel::Dev],
      BumpKeyword::Patch => &[Channel::Alpha],
      BumpKeyword::Prerelease => &[Channel::Dev],
    }
  }

  /// Branch patterns whose protection is suspended before the forced pushes
  /// this keyword performs
  pub fn suspend_patterns(self) -> &'static [&'static str] {
    match self {
      BumpKeyword::Premajor | BumpKeyword::Preminor | BumpKeyword::Patch => {
        &["release/*/*", "alpha/*/*", "dev/*/*"]
      }
      BumpKeyword::Prerelease => &["dev/*/*"],
    }
  }
}

impl fmt::Display for BumpKeyword {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
