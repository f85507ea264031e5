//! Test helpers: a temporary workspace and binary invocation
//!
//! Every invocation scrubs the GitHub Actions environment so tests behave
//! the same locally and in CI.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_channel-bump");

const SCRUBBED_ENV: [&str; 6] = [
  "GITHUB_TOKEN",
  "GITHUB_REPOSITORY_OWNER",
  "GITHUB_REPO",
  "GITHUB_HEAD_REF",
  "GITHUB_BASE_REF",
  "GITHUB_OUTPUT",
];

pub struct TestWorkspace {
  dir: TempDir,
}

impl TestWorkspace {
  /// Workspace with a package.json at the given version
  pub fn new(version: &str) -> Self {
    let dir = TempDir::new().expect("create temp dir");
    std::fs::write(
      dir.path().join("package.json"),
      format!(r#"{{"name": "fixture", "version": "{}"}}"#, version),
    )
    .expect("write package.json");
    Self { dir }
  }

  pub fn path(&self) -> &Path {
    self.dir.path()
  }

  /// Run the binary against this workspace
  pub fn run(&self, args: &[&str]) -> Output {
    self.run_with_env(args, &[])
  }

  pub fn run_with_env(&self, args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(BIN);
    cmd.arg("--cwd").arg(self.dir.path()).args(args);
    for var in SCRUBBED_ENV {
      cmd.env_remove(var);
    }
    for (key, value) in envs {
      cmd.env(key, value);
    }
    cmd.output().expect("run channel-bump")
  }
}

pub fn stdout_of(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr_of(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}
