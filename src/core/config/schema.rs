//! core::config::schema
//!
//! Configuration file schema.
//!
//! # Example
//!
//! ```toml
//! organization = "spatialos"
//! primary_project = "gdk-for-unity"
//! metadata_key = "gdk-for-unity-hash"
//! api_base = "https://api.github.com"
//! changelog = "CHANGELOG.md"
//!
//! [git]
//! remote = "origin"
//! dev_branch = "develop"
//! master_branch = "master"
//! ```
//!
//! # Validation
//!
//! Values are validated after parsing; unknown keys are rejected at parse
//! time.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Organization owning the released repositories
    pub organization: Option<String>,

    /// Repository whose release hash is written to the metadata sink
    pub primary_project: Option<String>,

    /// Metadata key for the primary project's release hash
    pub metadata_key: Option<String>,

    /// GitHub REST API base URL
    pub api_base: Option<String>,

    /// Changelog path relative to the repository root
    pub changelog: Option<String>,

    /// Git naming defaults
    pub git: Option<GitDefaults>,
}

/// Git naming defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GitDefaults {
    pub remote: Option<String>,
    pub dev_branch: Option<String>,
    pub master_branch: Option<String>,
}

fn require_non_empty(key: &str, value: &Option<String>) -> Result<(), ConfigError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(ConfigError::InvalidValue(format!(
            "'{}' cannot be empty",
            key
        ))),
        _ => Ok(()),
    }
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty("organization", &self.organization)?;
        require_non_empty("primary_project", &self.primary_project)?;
        require_non_empty("metadata_key", &self.metadata_key)?;
        require_non_empty("changelog", &self.changelog)?;

        if let Some(api_base) = &self.api_base {
            if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
                return Err(ConfigError::InvalidValue(format!(
                    "api_base '{}' must be an http(s) URL",
                    api_base
                )));
            }
        }

        if let Some(git) = &self.git {
            require_non_empty("git.remote", &git.remote)?;
            require_non_empty("git.dev_branch", &git.dev_branch)?;
            require_non_empty("git.master_branch", &git.master_branch)?;
        }

        Ok(())
    }
}
