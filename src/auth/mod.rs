//! auth - GitHub credential resolution
//!
//! The tool authenticates with a personal access token, given either on
//! the command line (`--github-key`) or in a key file
//! (`--github-key-file`, default `~/.ssh/github.token`). The explicit key
//! wins.
//!
//! # Security
//!
//! Tokens never appear in logs, error messages or `Debug` output.
//!
//! # Example
//!
//! ```ignore
//! use gdk_release::auth::CredentialSource;
//!
//! let token = CredentialSource::default().resolve()?;
//! let forge = GitHubForge::new(token.expose());
//! ```

mod errors;
mod token;

pub use errors::AuthError;
pub use token::{CredentialSource, GitHubToken, DEFAULT_KEY_FILE};
