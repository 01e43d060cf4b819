//! engine::error
//!
//! Failure taxonomy of a release run.
//!
//! Every variant aborts the run. Side effects already committed (a merge
//! on the host, a pushed branch) stay in place; the message carries enough
//! context for the operator to finish by hand.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::changelog::ChangelogError;
use crate::core::templates::TemplateError;
use crate::core::types::ParseError;
use crate::exec::CommandError;
use crate::forge::{ForgeError, RemoteHostError};
use crate::git::GitError;
use crate::metadata::MetadataError;

/// Errors from [`ReleaseOrchestrator::run_release`](super::ReleaseOrchestrator::run_release).
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// Malformed URL or version.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A `git` command failed and was not retried.
    #[error(transparent)]
    Command(CommandError),

    /// The working copy could not be cloned.
    #[error("failed to clone {url}: {source}")]
    Clone { url: String, source: GitError },

    /// The branch to release from could not be checked out.
    #[error("failed to check out {refname}: {source}")]
    Checkout { refname: String, source: GitError },

    /// Any other working copy failure.
    #[error(transparent)]
    Git(GitError),

    /// The hosting service failed or refused access.
    #[error("remote host failure during {operation}: {source}")]
    RemoteHost {
        operation: String,
        source: ForgeError,
    },

    /// The host answered the merge request but did not merge.
    #[error("was unable to merge pull request at {pull_request}: {message}")]
    MergeRejected {
        pull_request: String,
        message: String,
    },

    /// The changelog is absent or unreadable.
    #[error(transparent)]
    MissingChangelog(ChangelogError),

    /// No release template for the repository.
    #[error(transparent)]
    UnsupportedRepository(#[from] TemplateError),

    /// The metadata sink could not be written.
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// A release asset could not be read.
    #[error("failed to read release asset '{path}': {source}")]
    Asset {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<GitError> for ReleaseError {
    fn from(err: GitError) -> Self {
        match err {
            GitError::Command(command) => ReleaseError::Command(command),
            other => ReleaseError::Git(other),
        }
    }
}

impl From<RemoteHostError> for ReleaseError {
    fn from(err: RemoteHostError) -> Self {
        match err {
            RemoteHostError::UnrecognizedRemote(parse) => ReleaseError::Parse(parse),
            RemoteHostError::NotFound { repository, forge } => ReleaseError::RemoteHost {
                operation: "resolve repository".to_string(),
                source: ForgeError::NotFound(format!("{} on {}", repository, forge)),
            },
            RemoteHostError::Failure { operation, source } => {
                ReleaseError::RemoteHost { operation, source }
            }
        }
    }
}

impl From<ChangelogError> for ReleaseError {
    fn from(err: ChangelogError) -> Self {
        ReleaseError::MissingChangelog(err)
    }
}
