//! auth::errors
//!
//! Credential error types.
//!
//! Error messages name the credential source, never its contents.
//!
//! # Example
//!
//! ```
//! use gdk_release::auth::AuthError;
//! use std::path::PathBuf;
//!
//! let err = AuthError::KeyFileMissing { path: PathBuf::from("/home/dev/.ssh/github.token") };
//! assert!(err.to_string().contains("github.token"));
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors from credential resolution.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The key file does not exist.
    #[error("GitHub key file '{path}' does not exist. Pass --github-key or --github-key-file.")]
    KeyFileMissing { path: PathBuf },

    /// The key file exists but cannot be read.
    #[error("failed to read GitHub key file '{path}': {source}")]
    KeyFileUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The credential is empty after trimming whitespace.
    #[error("GitHub token from {origin} is empty")]
    EmptyToken { origin: String },
}
