//! cli
//!
//! Command-line interface layer for gdk-release.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Map the outcome to a process exit code
//!
//! # Exit Codes
//!
//! - `0`: success, or `--help`/`--version`
//! - `1`: any failure, including invalid arguments

pub mod args;
pub mod commands;

pub use args::Cli;

use std::path::PathBuf;

use anyhow::Result;

use crate::ui::output::{Logger, Verbosity};

/// Global flags shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub debug: bool,
    pub quiet: bool,
    pub config: Option<PathBuf>,
}

impl Context {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// Logger forwarding to the installed `tracing` subscriber.
    pub fn logger(&self) -> Logger {
        Logger::tracing(self.verbosity())
    }
}

impl From<&Cli> for Context {
    fn from(cli: &Cli) -> Self {
        Self {
            debug: cli.debug,
            quiet: cli.quiet,
            config: cli.config.clone(),
        }
    }
}

/// Run a parsed command line.
///
/// This is the main entry point called from `main.rs`.
pub fn run(cli: Cli) -> Result<()> {
    let ctx = Context::from(&cli);
    commands::dispatch(cli.command, &ctx)
}
