//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Errors only
//! - `--config <path>`: Read settings from this file

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::auth::DEFAULT_KEY_FILE;

/// gdk-release - merge a release candidate and draft its GitHub release
#[derive(Parser, Debug)]
#[command(name = "gdk-release")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Errors only
    #[arg(short, long, global = true, conflicts_with = "debug")]
    pub quiet: bool,

    /// Configuration file (defaults to $GDK_RELEASE_CONFIG or the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse arguments, leaving exit handling to the caller.
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge a pull request and draft a release from the changelog
    #[command(
        name = "release",
        long_about = "Merge a pull request and draft a release from the changelog.\n\n\
            The pull request is squash-merged through the GitHub API. The repository \
            is then cloned into a fresh temporary directory, the development branch \
            is checked out, and the second section of CHANGELOG.md becomes the body of \
            a draft release tagged with VERSION at the HEAD commit. The draft is never \
            published.\n\n\
            Nothing is rolled back on failure. The temporary clone is left on disk for \
            inspection.",
        after_help = "\
EXAMPLES:
    # Release gdk-for-unity 0.3.0 from an approved release pull request
    gdk-release release 0.3.0 \\
        -u https://github.com/spatialos/gdk-for-unity/pull/1234 \\
        --github-user gdk-bot --git-repository-name gdk-for-unity

    # In CI: never prompt, record the release hash for later steps
    gdk-release release 0.3.0 -u ... --github-user gdk-bot \\
        --git-repository-name gdk-for-unity \\
        --unattended --metadata-file-path out/metadata.json"
    )]
    Release(ReleaseArgs),
}

/// Arguments of `release`.
#[derive(Args, Debug, Clone)]
pub struct ReleaseArgs {
    /// Release version label, used verbatim as the tag
    pub version: String,

    /// URL of the pull request to merge
    #[arg(short = 'u', long, value_name = "URL")]
    pub pull_request_url: String,

    /// GitHub token (overrides --github-key-file)
    #[arg(long, value_name = "TOKEN")]
    pub github_key: Option<String>,

    /// File holding the GitHub token
    #[arg(long, value_name = "PATH", default_value = DEFAULT_KEY_FILE)]
    pub github_key_file: PathBuf,

    /// Remote name in the working copy [default: origin]
    #[arg(long, value_name = "NAME")]
    pub git_remote: Option<String>,

    /// Development branch to release from [default: develop]
    #[arg(long, value_name = "BRANCH")]
    pub dev_branch: Option<String>,

    /// Master branch name [default: master]
    #[arg(long, value_name = "BRANCH")]
    pub master_branch: Option<String>,

    /// GitHub account owning the fork
    #[arg(long, value_name = "USER")]
    pub github_user: String,

    /// Repository name of the fork
    #[arg(long, value_name = "NAME")]
    pub git_repository_name: String,

    /// Fail on the first failed git command instead of asking to retry
    #[arg(long)]
    pub unattended: bool,

    /// Write the release hash of the primary project to this JSON file
    #[arg(long, value_name = "PATH")]
    pub metadata_file_path: Option<PathBuf>,

    /// Upload a file to the draft release (repeatable)
    #[arg(long = "attach", value_name = "FILE")]
    pub attachments: Vec<PathBuf>,
}
