//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Logger capability
//! - [`prompts`] - Interactive prompts and confirmations
//!
//! # Design
//!
//! All output and prompts go through this module so that components can be
//! driven without a terminal: the logger can capture, and the prompter can
//! replay scripted answers.

pub mod output;
pub mod prompts;
