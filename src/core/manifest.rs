//! Version manifest access
//!
//! The source of truth for the current version is `package.json`, or
//! `lerna.json` when that monorepo marker exists. The manifest is read at
//! the start of every operation and re-read after any bump; it is mutated
//! only by the external version manager.

use std::path::{Path, PathBuf};

use semver::Version;
use serde::Deserialize;

use crate::core::error::{BumpError, BumpResult, ManifestError};

#[derive(Deserialize)]
struct VersionManifest {
  version: Option<String>,
}

/// True when `cwd` is a lerna-managed monorepo
pub fn has_lerna(cwd: &Path) -> bool {
  cwd.join("lerna.json").exists()
}

/// Path of the manifest holding the authoritative version
pub fn manifest_path(cwd: &Path) -> PathBuf {
  if has_lerna(cwd) {
    cwd.join("lerna.json")
  } else {
    cwd.join("package.json")
  }
}

/// Read the current version from the manifest in `cwd`
pub fn read_version(cwd: &Path) -> BumpResult<Version> {
  let path = manifest_path(cwd);
  let raw = std::fs::read_to_string(&path)
    .map_err(|_| BumpError::Manifest(ManifestError::NotFound { path: path.clone() }))?;
  let manifest: VersionManifest = serde_json::from_str(&raw).map_err(|e| {
    BumpError::Manifest(ManifestError::Invalid {
      path: path.clone(),
      reason: e.to_string(),
    })
  })?;
  let version = manifest.version.ok_or_else(|| {
    BumpError::Manifest(ManifestError::Invalid {
      path: path.clone(),
      reason: "missing version field".to_string(),
    })
  })?;
  Version::parse(&version).map_err(|e| {
    BumpError::Manifest(ManifestError::Invalid {
      path,
      reason: e.to_string(),
    })
  })
}
