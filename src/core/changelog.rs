//! core::changelog
//!
//! Release notes extraction from a Markdown changelog.
//!
//! # Format
//!
//! Top-level sections start with a line beginning with exactly `"## "`.
//! The first section is always "Unreleased" and is skipped. The second
//! section holds the notes of the release being cut; its body lines are
//! returned verbatim (blank lines included) joined with `\n`.
//!
//! Reading stops as soon as the third heading is seen. A document with
//! fewer than two headings yields whatever the second section accumulated,
//! which is the empty string.
//!
//! # Example
//!
//! ```
//! use gdk_release::core::changelog::extract_release_notes;
//!
//! let doc = "# Changelog\n## Unreleased\n- wip\n## 0.2.0\n- added\n\n- fixed\n## 0.1.0\n- old\n";
//! assert_eq!(extract_release_notes(doc), "- added\n\n- fixed");
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default changelog file name at the repository root.
pub const CHANGELOG_FILE_NAME: &str = "CHANGELOG.md";

const HEADING_PREFIX: &str = "## ";

/// Errors from changelog extraction.
#[derive(Debug, Error)]
pub enum ChangelogError {
    #[error("could not get draft release notes, as the change log file {path} does not exist")]
    Missing { path: PathBuf },

    #[error("failed to read change log {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Extraction state, advanced once per heading line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    BeforeFirstSection,
    InSection(u8),
    Done,
}

impl State {
    fn on_heading(self) -> Self {
        match self {
            State::BeforeFirstSection => State::InSection(1),
            State::InSection(1) => State::InSection(2),
            State::InSection(_) | State::Done => State::Done,
        }
    }
}

fn is_heading(line: &str) -> bool {
    line.starts_with(HEADING_PREFIX)
}

/// Extract the body of the second top-level section of `document`.
pub fn extract_release_notes(document: &str) -> String {
    let mut state = State::BeforeFirstSection;
    let mut body: Vec<&str> = Vec::new();

    for line in document.lines() {
        if is_heading(line) {
            state = state.on_heading();
            if state == State::Done {
                break;
            }
            continue;
        }

        if state == State::InSection(2) {
            body.push(line);
        }
    }

    body.join("\n")
}

/// Read `path` and extract its release notes.
///
/// # Errors
///
/// - [`ChangelogError::Missing`] if the file does not exist
/// - [`ChangelogError::Read`] if it exists but cannot be read as UTF-8
pub fn extract_from_file(path: &Path) -> Result<String, ChangelogError> {
    if !path.is_file() {
        return Err(ChangelogError::Missing {
            path: path.to_path_buf(),
        });
    }

    let document = std::fs::read_to_string(path).map_err(|source| ChangelogError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(extract_release_notes(&document))
}
