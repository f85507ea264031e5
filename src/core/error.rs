//! Error types for channel-bump with contextual messages and exit codes
//!
//! Validation failures (bad channel pairs, version mismatches) abort before
//! any mutation and name the offending refs so the operator can diagnose the
//! CI run from the log alone.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for channel-bump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (missing flags, bad manifest)
  User = 1,
  /// System error (subprocess, network, I/O)
  System = 2,
  /// Validation failure (no bump rule, version mismatch)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for channel-bump
#[derive(Debug)]
pub enum BumpError {
  /// Resolver and CLI validation errors
  Validation(ValidationError),

  /// External command failures (git, yarn, lerna, npm)
  Command(CommandError),

  /// GitHub API errors
  Host(HostError),

  /// Version manifest errors
  Manifest(ManifestError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional help
  Message {
    message: String,
    help: Option<String>,
  },
}

impl BumpError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    BumpError::Message {
      message: msg.into(),
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    BumpError::Message {
      message: msg.into(),
      help: Some(help.into()),
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      BumpError::Validation(_) => ExitCode::Validation,
      BumpError::Command(_) => ExitCode::System,
      BumpError::Host(_) => ExitCode::System,
      BumpError::Manifest(_) => ExitCode::User,
      BumpError::Io(_) => ExitCode::System,
      BumpError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      BumpError::Validation(e) => e.help_message(),
      BumpError::Host(e) => e.help_message(),
      BumpError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for BumpError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BumpError::Validation(e) => write!(f, "{}", e),
      BumpError::Command(e) => write!(f, "{}", e),
      BumpError::Host(e) => write!(f, "{}", e),
      BumpError::Manifest(e) => write!(f, "{}", e),
      BumpError::Io(e) => write!(f, "I/O error: {}", e),
      BumpError::Message { message, .. } => write!(f, "{}", message),
    }
  }
}

impl std::error::Error for BumpError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      BumpError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for BumpError {
  fn from(err: io::Error) -> Self {
    BumpError::Io(err)
  }
}

impl From<serde_json::Error> for BumpError {
  fn from(err: serde_json::Error) -> Self {
    BumpError::message(format!("JSON error: {}", err))
  }
}

impl From<reqwest::Error> for BumpError {
  fn from(err: reqwest::Error) -> Self {
    BumpError::Host(HostError::Request {
      reason: err.to_string(),
    })
  }
}

impl From<HostError> for BumpError {
  fn from(err: HostError) -> Self {
    BumpError::Host(err)
  }
}

impl From<ValidationError> for BumpError {
  fn from(err: ValidationError) -> Self {
    BumpError::Validation(err)
  }
}

impl From<semver::Error> for BumpError {
  fn from(err: semver::Error) -> Self {
    BumpError::message(format!("Semver parse error: {}", err))
  }
}

/// Resolver and argument validation errors
#[derive(Debug)]
pub enum ValidationError {
  /// No bump rule exists for the head/base channel pair
  NoRule { head_ref: String, base_ref: String },

  /// Version paths of head and base refs differ outside a preminor transition
  VersionsNotMatch { head_ref: String, base_ref: String },

  /// Head ref does not parse as, or does not track, the current version
  HeadRefMismatch { head_ref: String, version: String },

  /// An explicit keyword argument disagrees with the resolved keyword
  KeywordMismatch { given: String, resolved: String },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::NoRule { .. } => Some(
        "Valid transitions: dev->alpha, alpha->release, release->main, release->release (lts), main->main.".to_string(),
      ),
      ValidationError::HeadRefMismatch { .. } => Some(
        "Channel branches are named <channel>/v<major>/v<major>.<minor> and must track the manifest version.".to_string(),
      ),
      _ => None,
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::NoRule { head_ref, base_ref } => {
        write!(f, "No rule to bump for head/base refs: {} -> {}", head_ref, base_ref)
      }
      ValidationError::VersionsNotMatch { head_ref, base_ref } => {
        write!(f, "Versions not match for head/base refs: {} -> {}", head_ref, base_ref)
      }
      ValidationError::HeadRefMismatch { head_ref, version } => {
        write!(f, "The version of head ref {} does not match current {}", head_ref, version)
      }
      ValidationError::KeywordMismatch { given, resolved } => {
        write!(f, "Keyword '{}' does not match resolved keyword '{}'", given, resolved)
      }
    }
  }
}

/// External command errors
#[derive(Debug)]
pub struct CommandError {
  pub command: String,
  pub status: Option<i32>,
  pub stderr: String,
}

impl fmt::Display for CommandError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.status {
      Some(code) => write!(f, "Command failed with status {}: {}\n{}", code, self.command, self.stderr),
      None => write!(f, "Command terminated by signal: {}\n{}", self.command, self.stderr),
    }
  }
}

/// GitHub API errors
#[derive(Debug)]
pub enum HostError {
  /// Transport-level failure
  Request { reason: String },

  /// A ref lookup returned 404
  RefNotFound { ref_name: String },

  /// A server-side merge could not be performed
  MergeFailed { base: String, status: u16 },

  /// Any other unexpected HTTP status
  UnexpectedStatus { operation: String, status: u16 },

  /// GraphQL response did not contain the expected data
  Graphql { reason: String },
}

impl HostError {
  fn help_message(&self) -> Option<String> {
    match self {
      HostError::MergeFailed { base, .. } => Some(format!(
        "Resolve the conflict on {} manually; channel-bump never force-overwrites a failed merge.",
        base
      )),
      HostError::UnexpectedStatus { status, .. } if *status == 401 || *status == 403 => {
        Some("Check that the token has repo and branch-protection permissions.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for HostError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      HostError::Request { reason } => write!(f, "GitHub request failed: {}", reason),
      HostError::RefNotFound { ref_name } => write!(f, "Ref not found: {}", ref_name),
      HostError::MergeFailed { base, status } => {
        write!(f, "Merge into {} failed with status {}", base, status)
      }
      HostError::UnexpectedStatus { operation, status } => {
        write!(f, "{} failed with status {}", operation, status)
      }
      HostError::Graphql { reason } => write!(f, "GraphQL error: {}", reason),
    }
  }
}

/// Version manifest errors
#[derive(Debug)]
pub enum ManifestError {
  /// Neither package.json nor lerna.json readable
  NotFound { path: PathBuf },

  /// Manifest exists but the version field is missing or invalid
  Invalid { path: PathBuf, reason: String },
}

impl fmt::Display for ManifestError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ManifestError::NotFound { path } => {
        write!(f, "Version manifest not found: {}", path.display())
      }
      ManifestError::Invalid { path, reason } => {
        write!(f, "Invalid version manifest {}: {}", path.display(), reason)
      }
    }
  }
}

/// Result type alias for channel-bump
pub type BumpResult<T> = Result<T, BumpError>;

/// Pretty-print an error to stderr with colors and help text
pub fn print_error(error: &BumpError) {
  let red = anstyle::Style::new()
    .bold()
    .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red)));
  let yellow = anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow)));

  eprintln!("{}error:{} {}", red.render(), red.render_reset(), error);

  if let Some(help) = error.help_message() {
    eprintln!("{}help:{} {}", yellow.render(), yellow.render_reset(), help);
  }
}
