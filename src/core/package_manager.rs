//! External version manager and publisher
//!
//! Bumps go through lerna for monorepos and yarn otherwise; publishing goes
//! through npm. All subprocesses are echoed before execution and skipped in
//! dry mode, the same contract as the git backend.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use crate::core::error::{BumpError, BumpResult, CommandError};
use crate::core::manifest;
use crate::core::ports::{GitClient, VersionManager};
use crate::core::version::{Increment, PRERELEASE_ID};

/// Version manager backed by yarn/lerna/npm subprocesses
pub struct PackageManager<'a> {
  cwd: PathBuf,
  dry: bool,
  git: &'a dyn GitClient,
}

#[derive(Deserialize)]
struct PackageConfig {
  name: Option<String>,
  #[serde(default)]
  private: bool,
}

#[derive(Deserialize)]
struct WorkspaceInfo {
  location: String,
}

impl<'a> PackageManager<'a> {
  pub fn new(cwd: &Path, dry: bool, git: &'a dyn GitClient) -> Self {
    Self {
      cwd: cwd.to_path_buf(),
      dry,
      git,
    }
  }

  /// Install lerna globally when the workspace needs it but the binary is
  /// missing
  pub fn ensure_installed(&self) -> BumpResult<()> {
    if !manifest::has_lerna(&self.cwd) {
      return Ok(());
    }
    let probe = Command::new("lerna").arg("--version").current_dir(&self.cwd).output();
    let missing = match probe {
      Ok(output) => !output.status.success(),
      Err(_) => true,
    };
    if missing {
      self.exec("npm", &["install", "-g", "lerna@^5.0.0"])?;
    }
    Ok(())
  }

  /// Write an .npmrc routing the owner scope to the GitHub npm registry.
  /// Lerna only respects the project-root .npmrc, so it always lands in cwd.
  pub fn write_npmrc(&self, owner: &str) -> BumpResult<()> {
    let content = format!(
      "@{}:registry=https://npm.pkg.github.com/\n//npm.pkg.github.com/:_authToken=${{NODE_AUTH_TOKEN}}\nalways-auth=false\n",
      owner
    );
    println!("> write .npmrc");
    if self.dry {
      println!("{}", content);
      return Ok(());
    }
    std::fs::write(self.cwd.join(".npmrc"), content)?;
    Ok(())
  }

  /// Publish every non-private package reachable from cwd
  pub fn publish_packages(&self, token: &str) -> BumpResult<()> {
    if manifest::has_lerna(&self.cwd) {
      println!("> detected lerna, use yarn workspaces publish");
      let Some(output) = self.capture("yarn", &["-s", "workspaces", "info"])? else {
        return Ok(());
      };
      let workspaces: std::collections::BTreeMap<String, WorkspaceInfo> =
        serde_json::from_str(&output).map_err(|e| {
          BumpError::message(format!(
            "Found lerna.json in a non-workspace project ({}); remove lerna.json or configure yarn workspaces",
            e
          ))
        })?;
      for workspace in workspaces.values() {
        self.try_publish(&self.cwd.join(&workspace.location), token)?;
      }
    } else {
      println!("> use npm publish");
      self.try_publish(&self.cwd, token)?;
    }
    Ok(())
  }

  fn try_publish(&self, dir: &Path, token: &str) -> BumpResult<()> {
    let raw = std::fs::read_to_string(dir.join("package.json"))?;
    let config: PackageConfig = serde_json::from_str(&raw)?;
    if config.private {
      println!("> bypass private package {}", config.name.as_deref().unwrap_or("<unnamed>"));
      return Ok(());
    }
    self.exec_in(dir, "npm", &["publish"], &[("NODE_AUTH_TOKEN", token)])
  }

  fn exec(&self, program: &str, args: &[&str]) -> BumpResult<()> {
    self.exec_in(&self.cwd, program, args, &[])
  }

  /// Run a subprocess, echoing it first and skipping execution in dry mode
  fn exec_in(&self, dir: &Path, program: &str, args: &[&str], envs: &[(&str, &str)]) -> BumpResult<()> {
    println!("$ {} {}", program, args.join(" "));
    if self.dry {
      return Ok(());
    }

    let mut cmd = Command::new(program);
    cmd.args(args).current_dir(dir);
    for (key, value) in envs {
      cmd.env(key, value);
    }
    let output = cmd.output()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
      println!("{}", stdout.trim_end());
    }

    if !output.status.success() {
      return Err(BumpError::Command(CommandError {
        command: format!("{} {}", program, args.join(" ")),
        status: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(())
  }

  /// Capture a subprocess's stdout; in dry mode only the echo happens
  fn capture(&self, program: &str, args: &[&str]) -> BumpResult<Option<String>> {
    println!("$ {} {}", program, args.join(" "));
    if self.dry {
      return Ok(None);
    }

    let output = Command::new(program).args(args).current_dir(&self.cwd).output()?;
    if !output.status.success() {
      return Err(BumpError::Command(CommandError {
        command: format!("{} {}", program, args.join(" ")),
        status: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }
    Ok(Some(String::from_utf8_lossy(&output.stdout).to_string()))
  }
}

impl VersionManager for PackageManager<'_> {
  fn bump(&self, increment: Increment, message: Option<&str>, tag: bool) -> BumpResult<()> {
    let version = manifest::read_version(&self.cwd)?;
    let next = increment.apply(&version);
    let default_message = format!("Move on to v{}", next);
    // Patch bumps keep the manager's default commit message.
    let commit_message = match increment {
      Increment::Patch => None,
      _ => Some(message.unwrap_or(&default_message)),
    };

    if manifest::has_lerna(&self.cwd) {
      // Lerna requires a valid branch to bump from.
      if matches!(increment, Increment::Patch | Increment::Prepatch) {
        let scratch = format!("release/v{}/lerna-bump-patch", version.major);
        self.git.switch_create(&scratch, "HEAD")?;
      }
      let mut args = vec!["version", increment.as_str(), "--yes", "--no-push"];
      if let Some(msg) = commit_message {
        args.push("--message");
        args.push(msg);
      }
      if !tag {
        args.push("--no-git-tag-version");
      }
      if increment == Increment::Prerelease && message.is_none() {
        args.push("--force-publish");
      }
      self.exec("lerna", &args)
    } else {
      let keyword_flag = format!("--{}", increment.as_str());
      let mut args = vec!["version", keyword_flag.as_str(), "--preid", PRERELEASE_ID];
      if let Some(msg) = commit_message {
        args.push("--message");
        args.push(msg);
      }
      if !tag {
        args.push("--no-git-tag-version");
      }
      self.exec("yarn", &args)
    }
  }
}
