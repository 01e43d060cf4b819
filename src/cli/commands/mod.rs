//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Resolves configuration and credentials
//! 2. Builds the engine with its collaborators
//! 3. Reports the outcome
//!
//! Handlers do NOT touch repositories or the hosting service directly.

mod release;

pub use release::release;

use crate::cli::args::Command;
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Release(args) => release::release(ctx, args),
    }
}
