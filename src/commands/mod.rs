//! Command entry points, one `run_*` function per subcommand

pub mod bump;
pub mod merge;
pub mod protect;
pub mod publish;
pub mod verify;

pub use bump::run_bump;
pub use merge::run_merge;
pub use protect::{run_ensure_protect, run_suspend_protect};
pub use publish::run_publish;
pub use verify::run_verify;

use std::io::Write;

use semver::Version;

use crate::core::channel::BumpKeyword;
use crate::core::error::{BumpResult, ValidationError};
use crate::core::manifest;
use crate::core::options::Options;
use crate::core::resolver::resolve_bump_keyword;

/// Resolve the keyword for the configured refs, checking any explicit
/// keyword argument against the resolution
pub(crate) fn resolve_checked(
  opts: &Options,
  keyword_arg: Option<&str>,
  lenient: bool,
) -> BumpResult<BumpKeyword> {
  let current = manifest::read_version(&opts.cwd)?;
  let (head_ref, base_ref) = opts.refs()?;
  let resolved = resolve_bump_keyword(&current, head_ref, base_ref, lenient)?;
  if let Some(given) = keyword_arg.filter(|k| *k != "auto") {
    if BumpKeyword::parse(given) != Some(resolved) {
      return Err(
        ValidationError::KeywordMismatch {
          given: given.to_string(),
          resolved: resolved.as_str().to_string(),
        }
        .into(),
      );
    }
  }
  Ok(resolved)
}

/// Append the action outputs to `$GITHUB_OUTPUT` when running in CI
pub(crate) fn write_action_outputs(keyword: BumpKeyword, version: &Version) -> BumpResult<()> {
  let Ok(path) = std::env::var("GITHUB_OUTPUT") else {
    return Ok(());
  };
  if path.is_empty() {
    return Ok(());
  }
  let mut file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
  writeln!(file, "keyword={}", keyword)?;
  writeln!(file, "version={}", version)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::Path;

  use crate::core::error::BumpError;

  fn options(cwd: &Path, head: &str, base: &str) -> Options {
    Options {
      cwd: cwd.to_path_buf(),
      token: None,
      owner: None,
      repo: None,
      head_ref: Some(head.to_string()),
      base_ref: Some(base.to_string()),
      dry: true,
      protection: true,
      publish: true,
    }
  }

  fn workspace(version: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("package.json"), format!(r#"{{"version": "{}"}}"#, version)).unwrap();
    dir
  }

  #[test]
  fn auto_keyword_resolves_from_refs() {
    let dir = workspace("1.2.0-alpha.3");
    let opts = options(dir.path(), "dev/v1/v1.2", "alpha/v1/v1.2");
    assert_eq!(resolve_checked(&opts, None, false).unwrap(), BumpKeyword::Prerelease);
    assert_eq!(
      resolve_checked(&opts, Some("auto"), false).unwrap(),
      BumpKeyword::Prerelease
    );
  }

  #[test]
  fn explicit_keyword_must_match_the_resolution() {
    let dir = workspace("1.2.0-alpha.3");
    let opts = options(dir.path(), "dev/v1/v1.2", "alpha/v1/v1.2");
    assert_eq!(
      resolve_checked(&opts, Some("prerelease"), false).unwrap(),
      BumpKeyword::Prerelease
    );
    let err = resolve_checked(&opts, Some("patch"), false).unwrap_err();
    assert!(matches!(
      err,
      BumpError::Validation(ValidationError::KeywordMismatch { .. })
    ));
  }

  #[test]
  fn unknown_keyword_is_a_mismatch() {
    let dir = workspace("1.2.0-alpha.3");
    let opts = options(dir.path(), "dev/v1/v1.2", "alpha/v1/v1.2");
    assert!(resolve_checked(&opts, Some("prepatch"), false).is_err());
  }
}
