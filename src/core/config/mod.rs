//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config File Locations
//!
//! When no explicit path is given:
//! 1. `$GDK_RELEASE_CONFIG` if set, which must exist
//! 2. otherwise the first existing file of
//!    `$XDG_CONFIG_HOME/gdk-release/config.toml` and
//!    `~/.gdk-release/config.toml`
//!
//! When neither location holds a file, defaults are used.

pub mod schema;

pub use schema::{FileConfig, GitDefaults};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::changelog::CHANGELOG_FILE_NAME;

pub const DEFAULT_ORGANIZATION: &str = "spatialos";
pub const DEFAULT_PRIMARY_PROJECT: &str = "gdk-for-unity";
pub const DEFAULT_METADATA_KEY: &str = "gdk-for-unity-hash";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_DEV_BRANCH: &str = "develop";
pub const DEFAULT_MASTER_BRANCH: &str = "master";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("config file '{0}' does not exist")]
    NotFound(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration with defaults applied by the accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub file: FileConfig,
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path, or one named by `$GDK_RELEASE_CONFIG`, must
    /// exist; otherwise the per-user locations are searched.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed or
    /// fails validation.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Some(path.to_path_buf())
            }
            None => Self::discover()?,
        };

        let file = match &path {
            Some(path) => Self::read(path)?,
            None => FileConfig::default(),
        };
        file.validate()?;

        Ok(Self { file, path })
    }

    fn discover() -> Result<Option<PathBuf>, ConfigError> {
        let from_env = std::env::var_os("GDK_RELEASE_CONFIG")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        discover_in(from_env, &crate::core::paths::config_dirs())
    }

    fn read(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Path of the file that was loaded, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn organization(&self) -> &str {
        self.file
            .organization
            .as_deref()
            .unwrap_or(DEFAULT_ORGANIZATION)
    }

    pub fn primary_project(&self) -> &str {
        self.file
            .primary_project
            .as_deref()
            .unwrap_or(DEFAULT_PRIMARY_PROJECT)
    }

    pub fn metadata_key(&self) -> &str {
        self.file
            .metadata_key
            .as_deref()
            .unwrap_or(DEFAULT_METADATA_KEY)
    }

    pub fn api_base(&self) -> &str {
        self.file.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    pub fn changelog(&self) -> &str {
        self.file.changelog.as_deref().unwrap_or(CHANGELOG_FILE_NAME)
    }

    pub fn remote(&self) -> &str {
        self.git_value(|g| g.remote.as_deref())
            .unwrap_or(DEFAULT_REMOTE)
    }

    pub fn dev_branch(&self) -> &str {
        self.git_value(|g| g.dev_branch.as_deref())
            .unwrap_or(DEFAULT_DEV_BRANCH)
    }

    pub fn master_branch(&self) -> &str {
        self.git_value(|g| g.master_branch.as_deref())
            .unwrap_or(DEFAULT_MASTER_BRANCH)
    }

    fn git_value<'a>(&'a self, get: impl Fn(&'a GitDefaults) -> Option<&'a str>) -> Option<&'a str> {
        self.file.git.as_ref().and_then(get)
    }
}

/// Pick the config file from an environment override or the first
/// directory holding `config.toml`.
fn discover_in(
    from_env: Option<PathBuf>,
    dirs: &[PathBuf],
) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = from_env {
        return if path.exists() {
            Ok(Some(path))
        } else {
            Err(ConfigError::NotFound(path))
        };
    }

    Ok(dirs
        .iter()
        .map(|dir| dir.join("config.toml"))
        .find(|path| path.exists()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let config = Config::default();
        assert_eq!(config.organization(), "spatialos");
        assert_eq!(config.primary_project(), "gdk-for-unity");
        assert_eq!(config.metadata_key(), "gdk-for-unity-hash");
        assert_eq!(config.api_base(), "https://api.github.com");
        assert_eq!(config.changelog(), "CHANGELOG.md");
        assert_eq!(config.remote(), "origin");
        assert_eq!(config.dev_branch(), "develop");
        assert_eq!(config.master_branch(), "master");
        assert!(config.path().is_none());
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "organization = \"acme\"\n[git]\ndev_branch = \"main\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.organization(), "acme");
        assert_eq!(config.dev_branch(), "main");
        assert_eq!(config.remote(), "origin");
        assert_eq!(config.path(), Some(path.as_path()));
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn home_file_used_when_xdg_dir_has_none() {
        let root = tempfile::tempdir().unwrap();
        let xdg = root.path().join("xdg/gdk-release");
        let home = root.path().join("home/.gdk-release");
        fs::create_dir_all(&xdg).unwrap();
        fs::create_dir_all(&home).unwrap();
        fs::write(home.join("config.toml"), "").unwrap();

        let found = discover_in(None, &[xdg.clone(), home.clone()]).unwrap();
        assert_eq!(found, Some(home.join("config.toml")));

        fs::write(xdg.join("config.toml"), "").unwrap();
        let found = discover_in(None, &[xdg.clone(), home]).unwrap();
        assert_eq!(found, Some(xdg.join("config.toml")));
    }

    #[test]
    fn no_file_anywhere_uses_defaults() {
        let root = tempfile::tempdir().unwrap();
        assert_eq!(discover_in(None, &[root.path().to_path_buf()]).unwrap(), None);
    }

    #[test]
    fn env_path_to_missing_file_is_error() {
        let root = tempfile::tempdir().unwrap();
        let home = root.path().join(".gdk-release");
        fs::create_dir_all(&home).unwrap();
        fs::write(home.join("config.toml"), "").unwrap();

        let missing = root.path().join("missing.toml");
        let err = discover_in(Some(missing.clone()), &[home]).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(path) if path == missing));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "organization = [").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn invalid_value_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_base = \"not-a-url\"\n").unwrap();

        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
