//! gdk-release
//!
//! Merge a release pull request on GitHub and draft the matching release
//! from the repository's changelog.
//!
//! # Modules
//!
//! - [`cli`]: argument parsing and command dispatch
//! - [`core`]: value types, URL grammars, changelog, templates, configuration
//! - [`exec`]: external command execution with retry policies
//! - [`git`]: the release working copy
//! - [`forge`]: the hosting service
//! - [`auth`]: GitHub credentials
//! - [`metadata`]: build metadata for downstream steps
//! - [`engine`]: the release run
//! - [`ui`]: logging and prompts

pub mod auth;
pub mod cli;
pub mod core;
pub mod engine;
pub mod exec;
pub mod forge;
pub mod git;
pub mod metadata;
pub mod ui;
