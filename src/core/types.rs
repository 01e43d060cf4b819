//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`RemoteRepositoryRef`] - `owner/name` of a hosted repository
//! - [`ChangeRequestRef`] - repository name and pull request number
//! - [`CommitRef`] - full commit sha
//!
//! # Validation
//!
//! These types enforce validity at construction time. A malformed URL never
//! produces a half-filled value; it produces a [`ParseError`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parsing user supplied references.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed pull request url: {0}")]
    MalformedPullRequestUrl(String),

    #[error("expected a positive number for the pull request id, received: '{0}'")]
    InvalidPullRequestId(String),

    #[error("failed to parse remote {0}: not a valid github repository")]
    UnrecognizedRemote(String),

    #[error("invalid commit sha: {0}")]
    InvalidSha(String),

    #[error("invalid version label: {0}")]
    InvalidVersion(String),
}

/// Owner and name of a repository on the hosting service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteRepositoryRef {
    owner: String,
    name: String,
}

impl RemoteRepositoryRef {
    /// Both parts must be non-empty.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, ParseError> {
        let owner = owner.into();
        let name = name.into();
        if owner.is_empty() || name.is_empty() {
            return Err(ParseError::UnrecognizedRemote(format!("{}/{}", owner, name)));
        }
        Ok(Self { owner, name })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical HTTPS clone URL on github.com.
    pub fn https_url(&self) -> String {
        format!("https://github.com/{}/{}.git", self.owner, self.name)
    }
}

impl fmt::Display for RemoteRepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A pull request, identified by repository name and number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeRequestRef {
    repository_name: String,
    id: u64,
}

impl ChangeRequestRef {
    /// The id must be at least 1.
    pub fn new(repository_name: impl Into<String>, id: u64) -> Result<Self, ParseError> {
        let repository_name = repository_name.into();
        if repository_name.is_empty() {
            return Err(ParseError::MalformedPullRequestUrl(format!(
                "<empty>/pull/{}",
                id
            )));
        }
        if id == 0 {
            return Err(ParseError::InvalidPullRequestId(id.to_string()));
        }
        Ok(Self {
            repository_name,
            id,
        })
    }

    pub fn repository_name(&self) -> &str {
        &self.repository_name
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl fmt::Display for ChangeRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.repository_name, self.id)
    }
}

/// A commit, identified by its full hex sha.
///
/// # Example
///
/// ```
/// use gdk_release::core::types::CommitRef;
///
/// let commit = CommitRef::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(commit.sha(), "abc123def4567890abc123def4567890abc12345");
/// assert_eq!(commit.short(7), "abc123d");
/// assert!(CommitRef::new("not-a-sha").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommitRef(String);

impl CommitRef {
    /// Accepts 40 (SHA-1) or 64 (SHA-256) hex characters, normalized to lowercase.
    pub fn new(sha: impl Into<String>) -> Result<Self, ParseError> {
        let sha = sha.into();
        let valid_len = sha.len() == 40 || sha.len() == 64;
        if !valid_len || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseError::InvalidSha(sha));
        }
        Ok(Self(sha.to_lowercase()))
    }

    pub fn sha(&self) -> &str {
        &self.0
    }

    /// Abbreviated sha for display.
    pub fn short(&self, len: usize) -> &str {
        &self.0[..len.min(self.0.len())]
    }
}

impl fmt::Display for CommitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CommitRef {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CommitRef> for String {
    fn from(commit: CommitRef) -> Self {
        commit.0
    }
}

/// Release version label, used verbatim as the tag name.
///
/// Only rejects labels git would refuse as a tag: empty, whitespace, or
/// starting with `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionLabel(String);

impl VersionLabel {
    pub fn new(label: impl Into<String>) -> Result<Self, ParseError> {
        let label = label.into();
        if label.is_empty()
            || label.starts_with('-')
            || label.chars().any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(ParseError::InvalidVersion(label));
        }
        Ok(Self(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
