//! core
//!
//! Domain types and pure release logic.
//!
//! # Modules
//!
//! - [`types`] - Strong types: RemoteRepositoryRef, ChangeRequestRef, CommitRef, VersionLabel
//! - [`refs`] - Remote and pull request URL parsing
//! - [`changelog`] - Release notes extraction
//! - [`templates`] - Per-repository release name and body templates
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Home expansion and config locations
//!
//! Nothing here touches the network or spawns processes.

pub mod changelog;
pub mod config;
pub mod paths;
pub mod refs;
pub mod templates;
pub mod types;
