//! Keyword resolution through the verify and bump commands

use crate::helpers::{stderr_of, stdout_of, TestWorkspace};

#[test]
fn verify_reports_the_resolved_keyword() {
  let ws = TestWorkspace::new("1.2.0-alpha.3");
  let output = ws.run(&[
    "--dry",
    "--head-ref",
    "dev/v1/v1.2",
    "--base-ref",
    "alpha/v1/v1.2",
    "verify",
  ]);
  assert!(output.status.success(), "{}", stderr_of(&output));
  assert!(stdout_of(&output).contains("resolves to prerelease"));
}

#[test]
fn verify_rejects_a_reversed_transition() {
  let ws = TestWorkspace::new("1.2.0-alpha.3");
  let output = ws.run(&[
    "--dry",
    "--head-ref",
    "alpha/v1/v1.2",
    "--base-ref",
    "dev/v1/v1.2",
    "verify",
  ]);
  assert_eq!(output.status.code(), Some(3));
  assert!(stderr_of(&output).contains("No rule to bump for head/base refs"));
}

#[test]
fn verify_rejects_mismatched_version_paths() {
  let ws = TestWorkspace::new("1.2.0-alpha.3");
  let output = ws.run(&[
    "--dry",
    "--head-ref",
    "dev/v1/v1.2",
    "--base-ref",
    "alpha/v1/v1.1",
    "verify",
  ]);
  assert_eq!(output.status.code(), Some(3));
  assert!(stderr_of(&output).contains("Versions not match"));
}

#[test]
fn verify_appends_action_outputs() {
  let ws = TestWorkspace::new("1.2.0-alpha.3");
  let out_file = ws.path().join("outputs.txt");
  let output = ws.run_with_env(
    &[
      "--dry",
      "--head-ref",
      "alpha/v1/v1.2",
      "--base-ref",
      "release/v1/v1.2",
      "verify",
    ],
    &[("GITHUB_OUTPUT", out_file.to_str().unwrap())],
  );
  assert!(output.status.success(), "{}", stderr_of(&output));
  let outputs = std::fs::read_to_string(out_file).unwrap();
  assert!(outputs.contains("keyword=patch"));
  assert!(outputs.contains("version=1.2.0-alpha.3"));
}

#[test]
fn missing_refs_is_a_user_error() {
  let ws = TestWorkspace::new("1.2.0-alpha.3");
  let output = ws.run(&["--dry", "verify"]);
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("Missing head/base refs"));
}

#[test]
fn bump_dry_logs_the_version_manager_call() {
  let ws = TestWorkspace::new("1.2.0-alpha.3");
  let output = ws.run(&[
    "--dry",
    "--head-ref",
    "dev/v1/v1.2",
    "--base-ref",
    "alpha/v1/v1.2",
    "bump",
  ]);
  assert!(output.status.success(), "{}", stderr_of(&output));
  let stdout = stdout_of(&output);
  assert!(stdout.contains("> bump keyword: prerelease"));
  assert!(stdout.contains("$ yarn version --prerelease --preid alpha"));
  assert!(stdout.contains("Move on to v1.2.0-alpha.4"));
}

#[test]
fn bump_leaves_the_manifest_untouched_in_dry_mode() {
  let ws = TestWorkspace::new("1.2.0-alpha.3");
  ws.run(&[
    "--dry",
    "--head-ref",
    "dev/v1/v1.2",
    "--base-ref",
    "alpha/v1/v1.2",
    "bump",
  ]);
  let manifest = std::fs::read_to_string(ws.path().join("package.json")).unwrap();
  assert!(manifest.contains("1.2.0-alpha.3"));
}

#[test]
fn explicit_keyword_mismatch_fails_before_any_call() {
  let ws = TestWorkspace::new("1.2.0-alpha.3");
  let output = ws.run(&[
    "--dry",
    "--head-ref",
    "dev/v1/v1.2",
    "--base-ref",
    "alpha/v1/v1.2",
    "bump",
    "patch",
  ]);
  assert_eq!(output.status.code(), Some(3));
  assert!(stderr_of(&output).contains("does not match resolved keyword 'prerelease'"));
  assert!(!stdout_of(&output).contains("$ yarn"));
}

#[test]
fn stale_head_ref_fails_strict_resolution() {
  let ws = TestWorkspace::new("1.2.0");
  let output = ws.run(&[
    "--dry",
    "--head-ref",
    "dev/v1/v1.1",
    "--base-ref",
    "alpha/v1/v1.1",
    "bump",
  ]);
  assert_eq!(output.status.code(), Some(3));
  assert!(stderr_of(&output).contains("does not match current 1.2.0"));
}
