//! forge
//!
//! Abstraction for the remote hosting service.
//!
//! # Architecture
//!
//! The async `Forge` trait defines the four release endpoints. The release
//! engine never awaits; it talks to a [`RemoteHostClient`], which owns a
//! tokio runtime and blocks on each forge call.
//!
//! Remote host calls are never retried. Only local `git` commands are
//! (see [`exec`](crate::exec)).
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait and request/response types
//! - [`github`]: GitHub implementation using the REST API
//! - [`mock`]: Mock implementation for deterministic testing
//! - `client`: Blocking [`RemoteHostClient`]
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use gdk_release::forge::{github::GitHubForge, RemoteHostClient};
//!
//! let host = RemoteHostClient::new(Arc::new(GitHubForge::new(token)), logger)?;
//! let resolved = host.resolve_repository("https://github.com/spatialos/gdk-for-unity.git")?;
//! let merge = host.merge_change_request(&resolved.reference, 42)?;
//! ```

mod client;
pub mod github;
pub mod mock;
mod traits;

pub use client::{content_type_for, RemoteHostClient, RemoteHostError, ResolvedRepository};
pub use traits::*;
