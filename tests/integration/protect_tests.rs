//! Branch protection commands in dry mode

use crate::helpers::{stderr_of, stdout_of, TestWorkspace};

const PATTERNS: [&str; 4] = ["main", "release/*/*", "alpha/*/*", "dev/*/*"];

#[test]
fn ensure_protect_covers_every_channel_pattern() {
  let ws = TestWorkspace::new("1.2.0");
  let output = ws.run(&[
    "--dry",
    "--token",
    "test-token",
    "--owner",
    "acme",
    "--repo",
    "widget",
    "ensure-protect",
  ]);
  assert!(output.status.success(), "{}", stderr_of(&output));
  let stdout = stdout_of(&output);
  for pattern in PATTERNS {
    assert!(
      stdout.contains(&format!("> ensure protection for branch name pattern {}", pattern)),
      "missing pattern {}",
      pattern
    );
  }
  assert!(stdout.contains("allowsForcePushes: false"));
}

#[test]
fn suspend_protect_relaxes_but_keeps_deletion_denied() {
  let ws = TestWorkspace::new("1.2.0");
  let output = ws.run(&[
    "--dry",
    "--token",
    "test-token",
    "--owner",
    "acme",
    "--repo",
    "widget",
    "suspend-protect",
  ]);
  assert!(output.status.success(), "{}", stderr_of(&output));
  let stdout = stdout_of(&output);
  for pattern in PATTERNS {
    assert!(stdout.contains(&format!("> suspend protection for branch name pattern {}", pattern)));
  }
  assert!(stdout.contains("allowsForcePushes: true"));
  assert!(stdout.contains("allowsDeletions: false"));
}

#[test]
fn no_protection_disables_the_commands() {
  let ws = TestWorkspace::new("1.2.0");
  let output = ws.run(&[
    "--dry",
    "--no-protection",
    "--token",
    "test-token",
    "--owner",
    "acme",
    "--repo",
    "widget",
    "ensure-protect",
  ]);
  assert!(output.status.success(), "{}", stderr_of(&output));
  assert!(!stdout_of(&output).contains("> ensure protection"));
}
