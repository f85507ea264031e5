//! Dry-run propagation sequences through the merge command

use crate::helpers::{stderr_of, stdout_of, TestWorkspace};

fn merge_args<'a>(head: &'a str, base: &'a str) -> Vec<&'a str> {
  vec![
    "--dry",
    "--token",
    "test-token",
    "--owner",
    "acme",
    "--repo",
    "widget",
    "--head-ref",
    head,
    "--base-ref",
    base,
    "merge",
  ]
}

#[test]
fn patch_merge_logs_the_release_sequence() {
  let ws = TestWorkspace::new("1.2.1");
  let output = ws.run(&merge_args("alpha/v1/v1.2", "release/v1/v1.2"));
  assert!(output.status.success(), "{}", stderr_of(&output));
  let stdout = stdout_of(&output);

  assert!(stdout.contains("> merge keyword: patch"));
  assert!(stdout.contains("> suspend protection for branch name pattern release/*/*"));
  assert!(stdout.contains("$ git push -f origin HEAD:refs/tags/v1.2-alpha"));
  assert!(stdout.contains("$ git push -f origin HEAD:refs/tags/v1.2"));
  assert!(stdout.contains("$ git push -f origin HEAD:refs/tags/v1.2.1"));
  assert!(stdout.contains("$ git push -f origin HEAD:refs/heads/release/v1/v1.2"));
  // The next prerelease cycle is opened by the version manager.
  assert!(stdout.contains("$ yarn version --prerelease --preid alpha"));
  assert!(stdout.contains("> merge widget/v1.2 into widget/alpha/v1/v1.2"));
  // Dev channel follow-up runs on a local clone of the dev branch.
  assert!(stdout.contains("$ git fetch"));
  assert!(stdout.contains("$ git switch -C dev/v1/v1.2 origin/dev/v1/v1.2"));
  assert!(stdout.contains("$ git commit -a -m Update dev/v1/v1.2 to work on 1.2.2-alpha.0"));
  assert!(stdout.contains("$ git push origin HEAD:dev/v1/v1.2"));
  assert!(stdout.contains("$ git switch release/v1/v1.2"));
  assert!(stdout.contains("> ensure protection for branch name pattern main"));
  // Patch releases publish.
  assert!(stdout.contains("> write .npmrc"));
  assert!(stdout.contains("$ npm publish"));
}

#[test]
fn prerelease_merge_tags_the_previous_commit() {
  let ws = TestWorkspace::new("1.2.0-alpha.5");
  let output = ws.run(&merge_args("dev/v1/v1.2", "alpha/v1/v1.2"));
  assert!(output.status.success(), "{}", stderr_of(&output));
  let stdout = stdout_of(&output);

  assert!(stdout.contains("> merge keyword: prerelease"));
  assert!(stdout.contains("$ git push -f origin HEAD~1:refs/tags/v1.2.0-alpha.5"));
  assert!(stdout.contains("> merge widget/v1.2 into widget/dev/v1/v1.2"));
  // Only the dev pattern is suspended for a prerelease.
  assert!(stdout.contains("> suspend protection for branch name pattern dev/*/*"));
  assert!(!stdout.contains("> suspend protection for branch name pattern release/*/*"));
}

#[test]
fn premajor_merge_starts_the_lts_line() {
  let ws = TestWorkspace::new("2.0.0-alpha.0");
  let output = ws.run(&merge_args("main", "main"));
  assert!(output.status.success(), "{}", stderr_of(&output));
  let stdout = stdout_of(&output);

  assert!(stdout.contains("> merge keyword: premajor"));
  assert!(stdout.contains("$ git push -f origin HEAD~1:refs/heads/release/v2/lts"));
  assert!(stdout.contains("> merge widget/v2.0 into widget/release/v2/v2.0"));
  assert!(stdout.contains("> merge widget/v2.0 into widget/alpha/v2/v2.0"));
  assert!(stdout.contains("> merge widget/v2.0 into widget/dev/v2/v2.0"));
  // Promotions have no publishable artifact.
  assert!(stdout.contains("> nothing to publish for premajor"));
}

#[test]
fn merge_tolerates_a_head_one_minor_behind() {
  // The bump moved the manifest to 1.3; propagation still runs from the
  // 1.2 branches.
  let ws = TestWorkspace::new("1.3.0-alpha.0");
  let output = ws.run(&merge_args("release/v1/v1.2", "main"));
  assert!(output.status.success(), "{}", stderr_of(&output));
  assert!(stdout_of(&output).contains("> merge keyword: preminor"));
}

#[test]
fn no_publish_skips_the_registry_push() {
  let ws = TestWorkspace::new("1.2.1");
  let mut args = merge_args("alpha/v1/v1.2", "release/v1/v1.2");
  args.insert(0, "--no-publish");
  let output = ws.run(&args);
  assert!(output.status.success(), "{}", stderr_of(&output));
  let stdout = stdout_of(&output);
  assert!(stdout.contains("> publishing disabled"));
  assert!(!stdout.contains("$ npm publish"));
}

#[test]
fn merge_requires_a_token() {
  let ws = TestWorkspace::new("1.2.1");
  let output = ws.run(&[
    "--dry",
    "--head-ref",
    "alpha/v1/v1.2",
    "--base-ref",
    "release/v1/v1.2",
    "merge",
  ]);
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("Missing GitHub token"));
}
