//! auth::token
//!
//! GitHub token resolution.

use std::fmt;
use std::path::{Path, PathBuf};

use super::AuthError;
use crate::core::paths::expand_home;

/// Default location of the operator's GitHub token.
pub const DEFAULT_KEY_FILE: &str = "~/.ssh/github.token";

/// A GitHub personal access token.
///
/// `Debug` and `Display` are redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct GitHubToken(String);

impl GitHubToken {
    /// Wrap a raw token, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// [`AuthError::EmptyToken`] if nothing is left after trimming.
    pub fn new(raw: &str, origin: &str) -> Result<Self, AuthError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AuthError::EmptyToken {
                origin: origin.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The secret value, for the Authorization header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for GitHubToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GitHubToken(<redacted>)")
    }
}

impl fmt::Display for GitHubToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Where the token comes from. An explicit key wins over the key file.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialSource {
    pub key: Option<String>,
    pub key_file: PathBuf,
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSource")
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("key_file", &self.key_file)
            .finish()
    }
}

impl Default for CredentialSource {
    fn default() -> Self {
        Self {
            key: None,
            key_file: PathBuf::from(DEFAULT_KEY_FILE),
        }
    }
}

impl CredentialSource {
    /// Resolve the token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::KeyFileMissing`] if no key was given and the file is absent
    /// - [`AuthError::KeyFileUnreadable`] if the file cannot be read
    /// - [`AuthError::EmptyToken`] if the key or file content is blank
    pub fn resolve(&self) -> Result<GitHubToken, AuthError> {
        if let Some(key) = &self.key {
            return GitHubToken::new(key, "--github-key");
        }
        read_key_file(&self.key_file)
    }
}

fn read_key_file(path: &Path) -> Result<GitHubToken, AuthError> {
    let path = expand_home(path);
    if !path.is_file() {
        return Err(AuthError::KeyFileMissing { path });
    }

    let contents = std::fs::read_to_string(&path).map_err(|source| {
        AuthError::KeyFileUnreadable {
            path: path.clone(),
            source,
        }
    })?;

    GitHubToken::new(&contents, &format!("'{}'", path.display()))
}
