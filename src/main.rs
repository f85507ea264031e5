mod commands;
mod core;
mod github;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use core::error::print_error;
use core::options::Options;

/// Resolve semver bump keywords from channel branches and propagate releases
/// across dev -> alpha -> release -> main
#[derive(Parser)]
#[command(name = "channel-bump")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Working tree holding the version manifest
  #[arg(long, global = true, default_value = ".")]
  cwd: PathBuf,

  /// GitHub API token
  #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
  token: Option<String>,

  /// Repository owner
  #[arg(long, global = true, env = "GITHUB_REPOSITORY_OWNER")]
  owner: Option<String>,

  /// Repository name
  #[arg(long, global = true, env = "GITHUB_REPO")]
  repo: Option<String>,

  /// Head (source) channel branch ref
  #[arg(long, global = true, env = "GITHUB_HEAD_REF")]
  head_ref: Option<String>,

  /// Base (dest) channel branch ref
  #[arg(long, global = true, env = "GITHUB_BASE_REF")]
  base_ref: Option<String>,

  /// Log every mutating call instead of executing it
  #[arg(long, global = true)]
  dry: bool,

  /// Skip branch protection management
  #[arg(long, global = true)]
  no_protection: bool,

  /// Skip package publishing
  #[arg(long, global = true)]
  no_publish: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve the bump keyword strictly and apply the manifest bump
  Bump {
    /// Expected keyword; "auto" accepts whatever the refs resolve to
    keyword: Option<String>,
  },

  /// Resolve leniently and propagate the bump across downstream channels
  Merge {
    /// Expected keyword; "auto" accepts whatever the refs resolve to
    keyword: Option<String>,
  },

  /// Resolve strictly and report; close the pull request on failure
  Verify {
    /// Pull request number to comment on and close when verification fails
    #[arg(long)]
    pull_request: Option<u64>,
  },

  /// Publish non-private packages to the GitHub npm registry
  Publish,

  /// Apply strict protection to every channel branch pattern
  EnsureProtect,

  /// Relax protection on every channel branch pattern
  SuspendProtect,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  let opts = Options {
    cwd: cli.cwd,
    token: cli.token,
    owner: cli.owner,
    repo: cli.repo,
    head_ref: cli.head_ref,
    base_ref: cli.base_ref,
    dry: cli.dry,
    protection: !cli.no_protection,
    publish: !cli.no_publish,
  };

  let result = match cli.command {
    Commands::Bump { keyword } => commands::run_bump(&opts, keyword.as_deref()),
    Commands::Merge { keyword } => commands::run_merge(&opts, keyword.as_deref()),
    Commands::Verify { pull_request } => commands::run_verify(&opts, pull_request),
    Commands::Publish => commands::run_publish(&opts),
    Commands::EnsureProtect => commands::run_ensure_protect(&opts),
    Commands::SuspendProtect => commands::run_suspend_protect(&opts),
  };

  if let Err(err) = result {
    print_error(&err);
    std::process::exit(err.exit_code().as_i32());
  }
}
