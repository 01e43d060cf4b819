//! core::templates
//!
//! Release name and body templates, keyed by repository name.
//!
//! The table is fixed at compile time. Looking up a repository that has no
//! template fails with the list of supported names, so an unsupported
//! release is rejected before anything is merged or drafted.

use thiserror::Error;

use super::types::VersionLabel;

const VERSION_PLACEHOLDER: &str = "{version}";

const FEEDBACK_FOOTER: &str = "Keep giving us your feedback and/or suggestions! Check out [our Discord](https://discord.gg/SCZTCYm), [our forums](https://forums.improbable.io/), or here in the [Github issues](https://github.com/spatialos/gdk-for-unity/issues?q=is%3Aissue+is%3Aopen+sort%3Aupdated-desc)!";

/// Errors from template lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unsupported repository '{name}'; supported repositories: {}", .supported.join(", "))]
    UnsupportedRepository {
        name: String,
        supported: Vec<String>,
    },
}

/// Name and preamble for one repository's draft releases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTemplate {
    pub repository: String,
    /// Release name, `{version}` is substituted.
    pub name_format: String,
    /// Text placed above the changelog, `{version}` is substituted.
    pub body_preamble: String,
}

impl ReleaseTemplate {
    pub fn render_name(&self, version: &VersionLabel) -> String {
        self.name_format
            .replace(VERSION_PLACEHOLDER, version.as_str())
    }

    /// Preamble, a horizontal rule, then the release notes.
    pub fn render_body(&self, version: &VersionLabel, release_notes: &str) -> String {
        let preamble = self
            .body_preamble
            .replace(VERSION_PLACEHOLDER, version.as_str());
        format!("{}\n\n---\n\n{}", preamble, release_notes)
    }
}

/// Repository name to template mapping.
#[derive(Debug, Clone)]
pub struct TemplateTable {
    templates: Vec<ReleaseTemplate>,
}

impl TemplateTable {
    /// The GDK for Unity repositories.
    pub fn standard() -> Self {
        let gdk = ReleaseTemplate {
            repository: "gdk-for-unity".to_string(),
            name_format: "GDK for Unity Alpha Release {version}".to_string(),
            body_preamble: format!(
                "In this release, we've ...\n\nWe've also fixed ... \n\n{}\n\nSee the full release notes below! 👇",
                FEEDBACK_FOOTER
            ),
        };
        let fps = ReleaseTemplate {
            repository: "gdk-for-unity-fps-starter-project".to_string(),
            name_format: "GDK for Unity FPS Starter Project Alpha Release {version}".to_string(),
            body_preamble: format!(
                "This release of the FPS Starter Project is intended for use with the GDK for Unity Alpha Release {{version}}.\n\n{}",
                FEEDBACK_FOOTER
            ),
        };
        let blank = ReleaseTemplate {
            repository: "gdk-for-unity-blank-project".to_string(),
            name_format: "GDK for Unity Blank Project Alpha Release {version}".to_string(),
            body_preamble: format!(
                "This release of the Blank Project is intended for use with the GDK for Unity Alpha Release {{version}}.\n\n{}",
                FEEDBACK_FOOTER
            ),
        };

        Self {
            templates: vec![gdk, fps, blank],
        }
    }

    /// Build a table from explicit templates.
    pub fn new(templates: Vec<ReleaseTemplate>) -> Self {
        Self { templates }
    }

    /// Names with a template, in table order.
    pub fn supported(&self) -> Vec<String> {
        self.templates.iter().map(|t| t.repository.clone()).collect()
    }

    pub fn lookup(&self, repository: &str) -> Result<&ReleaseTemplate, TemplateError> {
        self.templates
            .iter()
            .find(|t| t.repository == repository)
            .ok_or_else(|| TemplateError::UnsupportedRepository {
                name: repository.to_string(),
                supported: self.supported(),
            })
    }
}

impl Default for TemplateTable {
    fn default() -> Self {
        Self::standard()
    }
}
