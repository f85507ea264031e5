//! Channel propagation state machine
//!
//! After a keyword is resolved, propagation distributes the bump across the
//! channel pipeline: tag the release points, force-push the channel heads
//! that moved, then merge the alpha tag commit into every downstream channel
//! so the next cycle starts from a consistent base. Tags already pushed stay
//! in place when a later step fails; recovery is manual.

use semver::Version;

use crate::core::channel::{strip_heads, BumpKeyword};
use crate::core::error::BumpResult;
use crate::core::manifest;
use crate::core::options::Options;
use crate::core::ports::{GitClient, RepositoryHost, VersionManager};
use crate::core::version::{loose_version, Increment};
use crate::github::protection;

/// Drives one propagation run over the capability seams
pub struct Propagator<'a> {
  opts: &'a Options,
  git: &'a dyn GitClient,
  manager: &'a dyn VersionManager,
  host: &'a dyn RepositoryHost,
}

impl<'a> Propagator<'a> {
  pub fn new(
    opts: &'a Options,
    git: &'a dyn GitClient,
    manager: &'a dyn VersionManager,
    host: &'a dyn RepositoryHost,
  ) -> Self {
    Self {
      opts,
      git,
      manager,
      host,
    }
  }

  pub fn run(&self, keyword: BumpKeyword) -> BumpResult<()> {
    // Forced pushes below would bounce off the protection rules.
    if let Err(err) = protection::suspend_protection(self.opts, self.host, keyword.suspend_patterns()) {
      eprintln!("> failed to suspend branch protection: {}", err);
    }

    let head_version = manifest::read_version(&self.opts.cwd)?;
    self.push_tag(&format!("v{}-alpha", loose_version(&head_version)))?;
    self.pushback(keyword, &head_version)?;

    // The patch pushback moves the manifest to the next prerelease cycle.
    let current = manifest::read_version(&self.opts.cwd)?;
    let loose = loose_version(&current);
    let next = if current.pre.is_empty() {
      Increment::Prepatch.apply(&current)
    } else {
      current.clone()
    };

    let alpha_sha = self.host.get_ref_sha(&format!("tags/v{}-alpha", loose))?;
    let version_ref = format!("v{}/v{}.{}", current.major, current.major, current.minor);

    println!();
    println!("# https://docs.github.com/en/rest/reference/repos#merge-a-branch");
    println!();
    for channel in keyword.merge_targets() {
      let channel_ref = format!("{}/{}", channel, version_ref);
      self.merge_remote_channel(&channel_ref, &loose, &alpha_sha, &next)?;
    }

    if keyword == BumpKeyword::Patch {
      self.prepare_dev_channel(&version_ref, &current, &next)?;
    }

    if let Err(err) = protection::ensure_protection(self.opts, self.host) {
      eprintln!("> failed to restore branch protection: {}", err);
    }
    if let Err(err) = self.reset_default_branch() {
      eprintln!("> failed to reset default branch: {}", err);
    }
    Ok(())
  }

  /// Keyword-specific ref pushes between the alpha tag and the merges
  fn pushback(&self, keyword: BumpKeyword, head_version: &Version) -> BumpResult<()> {
    match keyword {
      BumpKeyword::Premajor => {
        // The pre-bump commit starts the LTS line of the closed major.
        self
          .git
          .push(&format!("HEAD~1:refs/heads/release/v{}/lts", head_version.major), true)
      }
      BumpKeyword::Preminor => Ok(()),
      BumpKeyword::Patch => {
        self.push_tag(&format!("v{}", loose_version(head_version)))?;
        // The major tag tracks the newest minor line only.
        let next_minor_tag = format!("tags/v{}.{}", head_version.major, head_version.minor + 1);
        if self.host.get_ref_sha(&next_minor_tag).is_err() {
          self.push_tag(&format!("v{}", head_version.major))?;
        }
        self.push_tag(&format!("v{}", head_version))?;
        self
          .git
          .push(&format!("HEAD:refs/heads/{}", strip_heads(self.opts.base_ref()?)), true)?;
        self.prepare_next_prerelease()
      }
      BumpKeyword::Prerelease => {
        // The version tag belongs to the commit before the bump commit.
        self
          .git
          .push(&format!("HEAD~1:refs/tags/v{}", head_version), true)
      }
    }
  }

  /// Open the next prerelease cycle on the alpha channel: bump the manifest
  /// and move the alpha loose tag onto the new cycle
  pub fn prepare_next_prerelease(&self) -> BumpResult<()> {
    self.manager.bump(Increment::Prerelease, None, true)?;
    let bumped = manifest::read_version(&self.opts.cwd)?;
    self.push_tag(&format!("v{}-alpha", loose_version(&bumped)))
  }

  fn push_tag(&self, tag: &str) -> BumpResult<()> {
    self.git.push(&format!("HEAD:refs/tags/{}", tag), true)
  }

  fn merge_remote_channel(
    &self,
    channel_ref: &str,
    loose: &str,
    alpha_sha: &str,
    next: &Version,
  ) -> BumpResult<()> {
    let repo = self.opts.repo()?;
    println!("> merge {}/v{} into {}/{}", repo, loose, repo, channel_ref);

    if self.host.get_ref_sha(&format!("heads/{}", channel_ref)).is_err() {
      self.host.create_ref(&format!("refs/heads/{}", channel_ref), alpha_sha)?;
    }
    let message = format!("Update {} to work on {}", channel_ref, next);
    self.host.merge_branch(channel_ref, alpha_sha, &message)
  }

  /// After a patch release, move the dev channel onto the next patch cycle
  /// with a plain commit (the release tags already exist)
  fn prepare_dev_channel(&self, version_ref: &str, current: &Version, next: &Version) -> BumpResult<()> {
    let dev_channel = format!("dev/{}", version_ref);
    self.git.fetch()?;
    self.git.switch_create(&dev_channel, &format!("origin/{}", dev_channel))?;
    // The prerelease bump may have left its tag in the local clone.
    if let Err(err) = self.git.delete_tag(&format!("v{}", current)) {
      eprintln!("> stale tag cleanup failed: {}", err);
    }
    self.manager.bump(Increment::Prepatch, Some("auto"), false)?;
    self.git.commit_all(&format!("Update {} to work on {}", dev_channel, next))?;
    self.git.push(&format!("HEAD:{}", dev_channel), false)?;
    self.git.switch(strip_heads(self.opts.base_ref()?))
  }

  fn reset_default_branch(&self) -> BumpResult<()> {
    if let Some(branch) = self.host.latest_dev_branch()? {
      self.host.set_default_branch(&branch)?;
    }
    Ok(())
  }
}
