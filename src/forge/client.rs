//! forge::client
//!
//! Blocking façade over an async [`Forge`].
//!
//! The release engine is strictly sequential, so the client owns a tokio
//! runtime and blocks on each call. It must therefore not be used from
//! inside another runtime.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use super::traits::{
    Asset, CreateReleaseRequest, Forge, ForgeError, MergeMethod, MergeResult, Release,
    Repository,
};
use crate::core::refs::parse_remote_url;
use crate::core::types::{CommitRef, ParseError, RemoteRepositoryRef};
use crate::ui::output::Logger;

/// Errors from the remote host client.
#[derive(Debug, Error)]
pub enum RemoteHostError {
    /// The URL does not name a repository on the host.
    #[error(transparent)]
    UnrecognizedRemote(#[from] ParseError),

    /// The host has no such repository.
    #[error("repository {repository} was not found on {forge}")]
    NotFound { repository: String, forge: String },

    /// Transport, authorization or API failure.
    #[error("failed to {operation}: {source}")]
    Failure {
        operation: String,
        source: ForgeError,
    },
}

/// Content type for a release asset, from its file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("zip") => "application/zip",
        _ => "application/octet-stream",
    }
}

/// A repository resolved on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRepository {
    pub reference: RemoteRepositoryRef,
    pub repository: Repository,
}

/// Synchronous client for the hosting service.
pub struct RemoteHostClient {
    forge: Arc<dyn Forge>,
    runtime: tokio::runtime::Runtime,
    logger: Logger,
}

impl std::fmt::Debug for RemoteHostClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteHostClient")
            .field("forge", &self.forge.name())
            .finish()
    }
}

impl RemoteHostClient {
    /// Wrap `forge` with a dedicated runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be started.
    pub fn new(forge: Arc<dyn Forge>, logger: Logger) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            forge,
            runtime,
            logger,
        })
    }

    fn failure(operation: &str, source: ForgeError) -> RemoteHostError {
        RemoteHostError::Failure {
            operation: operation.to_string(),
            source,
        }
    }

    /// Parse `remote_url` and look the repository up.
    ///
    /// # Errors
    ///
    /// - [`RemoteHostError::UnrecognizedRemote`] if the URL does not match
    /// - [`RemoteHostError::NotFound`] if the host does not know it
    pub fn resolve_repository(
        &self,
        remote_url: &str,
    ) -> Result<ResolvedRepository, RemoteHostError> {
        let reference = parse_remote_url(remote_url)?;
        self.logger
            .debug(format!("Resolving repository {}", reference));

        match self
            .runtime
            .block_on(self.forge.get_repository(&reference))
        {
            Ok(repository) => Ok(ResolvedRepository {
                reference,
                repository,
            }),
            Err(ForgeError::NotFound(_)) => Err(RemoteHostError::NotFound {
                repository: reference.to_string(),
                forge: self.forge.name().to_string(),
            }),
            Err(e) => Err(Self::failure("resolve repository", e)),
        }
    }

    /// Ask the host to squash-merge pull request `number`.
    pub fn merge_change_request(
        &self,
        repo: &RemoteRepositoryRef,
        number: u64,
    ) -> Result<MergeResult, RemoteHostError> {
        self.logger
            .info(format!("Merging pull request {}#{}...", repo, number));
        self.runtime
            .block_on(
                self.forge
                    .merge_pull_request(repo, number, MergeMethod::Squash),
            )
            .map_err(|e| Self::failure("merge pull request", e))
    }

    /// Create an unpublished release.
    pub fn create_draft_release(
        &self,
        repo: &RemoteRepositoryRef,
        tag: &str,
        body: &str,
        name: &str,
        target: &CommitRef,
    ) -> Result<Release, RemoteHostError> {
        self.logger.info(format!("Drafting release {}...", name));
        let request = CreateReleaseRequest::draft(tag, target.sha(), name, body);
        self.runtime
            .block_on(self.forge.create_release(repo, request))
            .map_err(|e| Self::failure("create draft release", e))
    }

    /// Attach `data` to `release` as `file_name`.
    pub fn upload_asset(
        &self,
        release: &Release,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<Asset, RemoteHostError> {
        self.logger
            .info(format!("Uploading {} ({})...", file_name, content_type));
        self.runtime
            .block_on(
                self.forge
                    .upload_asset(release, file_name, content_type, data),
            )
            .map_err(|e| Self::failure("upload release asset", e))
    }
}
