//! metadata
//!
//! Build metadata emitted after a release, for downstream pipeline steps.
//!
//! # File Format
//!
//! [`FileMetadataSink`] keeps a flat JSON object of string keys to string
//! values. Writing a key reads the existing object (if any), sets the key,
//! and writes the whole object back:
//!
//! ```json
//! {
//!   "gdk-for-unity-hash": "3f7c…"
//! }
//! ```

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from metadata sinks.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to access metadata file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("metadata file '{path}' is not a JSON object of strings: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Write-only key/value record of build facts.
pub trait MetadataSink {
    fn write(&self, key: &str, value: &str) -> Result<(), MetadataError>;
}

/// [`MetadataSink`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileMetadataSink {
    path: PathBuf,
}

impl FileMetadataSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current contents, empty if the file does not exist yet.
    pub fn read(&self) -> Result<BTreeMap<String, String>, MetadataError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| self.io(source))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|source| MetadataError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn io(&self, source: std::io::Error) -> MetadataError {
        MetadataError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl MetadataSink for FileMetadataSink {
    fn write(&self, key: &str, value: &str) -> Result<(), MetadataError> {
        let mut entries = self.read()?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io(source))?;
        }

        let content = serde_json::to_string_pretty(&entries).map_err(|source| {
            MetadataError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|source| self.io(source))?;
        file.write_all(content.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|source| self.io(source))?;

        Ok(())
    }
}
