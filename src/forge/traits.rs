//! forge::traits
//!
//! Forge trait definition for the release endpoints of a hosting service.
//!
//! # Design
//!
//! The `Forge` trait is async because forge operations involve network I/O.
//! Callers that need blocking calls go through
//! [`RemoteHostClient`](super::RemoteHostClient).
//!
//! None of these calls are retried here; a failed mutation is reported
//! once and the caller decides whether to continue.
//!
//! # Example
//!
//! ```ignore
//! use gdk_release::forge::{CreateReleaseRequest, Forge, ForgeError, MergeMethod};
//! use gdk_release::core::types::RemoteRepositoryRef;
//!
//! async fn release(forge: &dyn Forge, repo: &RemoteRepositoryRef) -> Result<(), ForgeError> {
//!     let merge = forge.merge_pull_request(repo, 42, MergeMethod::Squash).await?;
//!     if merge.merged {
//!         let release = forge
//!             .create_release(repo, CreateReleaseRequest::draft("0.3.0", "abc123", "Alpha 0.3.0", "notes"))
//!             .await?;
//!         println!("Draft at {}", release.html_url);
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::RemoteRepositoryRef;

/// Errors from forge operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForgeError {
    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// A repository as known to the forge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub owner: String,
    pub name: String,
    /// "owner/name"
    pub full_name: String,
    /// Web URL
    pub html_url: String,
    pub default_branch: String,
}

/// Merge method for merging a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMethod {
    /// Create a merge commit
    Merge,
    /// Squash all commits and merge
    #[default]
    Squash,
    /// Rebase commits onto base branch
    Rebase,
}

impl MergeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeMethod::Merge => "merge",
            MergeMethod::Squash => "squash",
            MergeMethod::Rebase => "rebase",
        }
    }
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a merge request that the forge answered.
///
/// `merged == false` is a refusal, not a transport error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    pub merged: bool,
    pub message: String,
    /// Merge commit, when merged
    pub sha: Option<String>,
}

/// Request to create a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReleaseRequest {
    pub tag: String,
    /// Commit sha or branch the tag is created from
    pub target_commitish: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
}

impl CreateReleaseRequest {
    /// An unpublished release.
    pub fn draft(
        tag: impl Into<String>,
        target_commitish: impl Into<String>,
        name: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            target_commitish: target_commitish.into(),
            name: name.into(),
            body: body.into(),
            draft: true,
        }
    }
}

/// A release returned from the forge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub id: u64,
    pub tag: String,
    pub name: String,
    pub draft: bool,
    /// Web URL
    pub html_url: String,
    /// Asset upload endpoint, possibly with a `{?name,label}` template suffix
    pub upload_url: String,
}

/// An uploaded release asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub id: u64,
    pub name: String,
    pub content_type: String,
    pub size: u64,
    pub download_url: String,
}

/// The Forge trait for the release workflow.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so one instance can be shared
/// with the runtime that drives it.
///
/// # Error Handling
///
/// All methods return `Result<T, ForgeError>`. A merge the host refuses
/// is `Ok` with `merged == false`.
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge name (e.g., "github").
    fn name(&self) -> &'static str;

    /// Look a repository up.
    ///
    /// # Errors
    ///
    /// `ForgeError::NotFound` if the host has no such repository.
    async fn get_repository(&self, repo: &RemoteRepositoryRef) -> Result<Repository, ForgeError>;

    /// Merge a pull request server-side.
    async fn merge_pull_request(
        &self,
        repo: &RemoteRepositoryRef,
        number: u64,
        method: MergeMethod,
    ) -> Result<MergeResult, ForgeError>;

    /// Create a release record.
    async fn create_release(
        &self,
        repo: &RemoteRepositoryRef,
        request: CreateReleaseRequest,
    ) -> Result<Release, ForgeError>;

    /// Attach a binary asset to an existing release.
    async fn upload_asset(
        &self,
        release: &Release,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<Asset, ForgeError>;
}
