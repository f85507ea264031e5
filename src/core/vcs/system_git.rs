//! System git backend
//!
//! Spawns git plumbing commands with an isolated environment. Every
//! invocation is echoed (`$ git ...`) before execution so a CI log shows
//! the full sequence; in dry mode the echo is all that happens.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::error::{BumpError, BumpResult, CommandError};
use crate::core::ports::GitClient;

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  repo_path: PathBuf,
  dry: bool,
}

impl SystemGit {
  pub fn new(repo_path: &Path, dry: bool) -> Self {
    Self {
      repo_path: repo_path.to_path_buf(),
      dry,
    }
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to the repo path
  /// - Clears environment variables, whitelisting PATH and HOME
  /// - Adds safe configuration overrides
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("advice.detachedHead=false");

    cmd
  }

  /// Run a git subcommand, echoing it first; in dry mode the echo is all
  pub fn call(&self, args: &[&str]) -> BumpResult<()> {
    println!("$ git {}", args.join(" "));
    if self.dry {
      return Ok(());
    }

    let output = self.git_cmd().args(args).output()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
      println!("{}", stdout.trim_end());
    }

    if !output.status.success() {
      return Err(BumpError::Command(CommandError {
        command: format!("git {}", args.join(" ")),
        status: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(())
  }
}

impl GitClient for SystemGit {
  fn push(&self, refspec: &str, force: bool) -> BumpResult<()> {
    if force {
      self.call(&["push", "-f", "origin", refspec])
    } else {
      self.call(&["push", "origin", refspec])
    }
  }

  fn fetch(&self) -> BumpResult<()> {
    self.call(&["fetch"])
  }

  fn switch(&self, branch: &str) -> BumpResult<()> {
    self.call(&["switch", branch])
  }

  fn switch_create(&self, branch: &str, start_point: &str) -> BumpResult<()> {
    self.call(&["switch", "-C", branch, start_point])
  }

  fn delete_tag(&self, tag: &str) -> BumpResult<()> {
    self.call(&["tag", "-d", tag])
  }

  fn commit_all(&self, message: &str) -> BumpResult<()> {
    self.call(&["commit", "-a", "-m", message])
  }
}
