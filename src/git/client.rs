//! git::client
//!
//! The working copy used by a release run.
//!
//! A [`RepositoryClient`] owns exactly one clone in a fresh directory
//! named `gdk-release-<uuid>`. Dropping the client closes the repository
//! but leaves the directory on disk so a failed run can be inspected.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::interface::{Git, GitError, LocalRepositoryOps};
use super::remote::{GitCli, RemoteRepositoryOps};
use crate::core::config::{DEFAULT_DEV_BRANCH, DEFAULT_MASTER_BRANCH, DEFAULT_REMOTE};
use crate::core::types::CommitRef;
use crate::exec::CommandRunner;
use crate::ui::output::Logger;

/// Remote and branch names used by the working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSettings {
    pub remote: String,
    pub dev_branch: String,
    /// Accepted from `--master-branch` and the config file for command-line
    /// compatibility; a release run never reads it.
    pub master_branch: String,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            remote: DEFAULT_REMOTE.to_string(),
            dev_branch: DEFAULT_DEV_BRANCH.to_string(),
            master_branch: DEFAULT_MASTER_BRANCH.to_string(),
        }
    }
}

/// Local and remote operations on one working copy.
pub struct RepositoryClient {
    local: Box<dyn LocalRepositoryOps>,
    remote: Box<dyn RemoteRepositoryOps>,
    path: PathBuf,
    settings: GitSettings,
    checked_out: Option<String>,
    logger: Logger,
}

impl std::fmt::Debug for RepositoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryClient")
            .field("path", &self.path)
            .field("checked_out", &self.checked_out)
            .finish()
    }
}

impl RepositoryClient {
    /// Clone `remote_url` into a new directory under `parent` and open it.
    ///
    /// # Errors
    ///
    /// - [`GitError::Io`] if the directory cannot be created
    /// - [`GitError::Command`] if `git clone` fails
    pub fn construct(
        remote_url: &str,
        parent: &Path,
        settings: GitSettings,
        runner: CommandRunner,
        logger: Logger,
    ) -> Result<Self, GitError> {
        let path = parent.join(format!("gdk-release-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&path).map_err(|source| GitError::Io {
            path: path.clone(),
            source,
        })?;

        let remote = GitCli::new(runner, &path);
        logger.info(format!(
            "Cloning {} into {}...",
            remote_url,
            path.display()
        ));
        remote.clone_repository(remote_url, &path, &settings.remote)?;

        let local = Git::open(&path)?;
        let checked_out = local.current_branch()?;

        Ok(Self {
            local: Box::new(local),
            remote: Box::new(remote),
            path,
            settings,
            checked_out,
            logger,
        })
    }

    /// Assemble a client from explicit capabilities over an existing
    /// working copy.
    pub fn with_ops(
        path: impl Into<PathBuf>,
        local: Box<dyn LocalRepositoryOps>,
        remote: Box<dyn RemoteRepositoryOps>,
        settings: GitSettings,
        logger: Logger,
    ) -> Self {
        Self {
            local,
            remote,
            path: path.into(),
            settings,
            checked_out: None,
            logger,
        }
    }

    /// Working copy root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &GitSettings {
        &self.settings
    }

    /// Last ref checked out through this client.
    pub fn checked_out(&self) -> Option<&str> {
        self.checked_out.as_deref()
    }

    pub fn checkout(&mut self, branch: &str) -> Result<(), GitError> {
        self.logger.info(format!("Checking out branch... {}", branch));
        self.local.checkout(branch)?;
        self.checked_out = Some(branch.to_string());
        Ok(())
    }

    /// Check out `<remote>/<branch>`, using the configured remote when
    /// none is given.
    pub fn checkout_remote_branch(
        &mut self,
        branch: &str,
        remote: Option<&str>,
    ) -> Result<(), GitError> {
        let remote = remote.unwrap_or(&self.settings.remote);
        let refname = format!("{}/{}", remote, branch);
        self.checkout(&refname)
    }

    pub fn has_pending_changes(&self) -> Result<bool, GitError> {
        self.local.has_pending_changes()
    }

    pub fn stage(&self, path: &Path) -> Result<(), GitError> {
        self.logger.info(format!("Staging... {}", path.display()));
        self.local.stage(path)
    }

    pub fn commit(&self, message: &str) -> Result<CommitRef, GitError> {
        self.logger.info("Committing...");
        self.local.commit(message)
    }

    pub fn fetch(&self, remote: Option<&str>) -> Result<(), GitError> {
        self.logger.info("Fetching from remote...");
        let remote = remote.unwrap_or(&self.settings.remote);
        Ok(self.remote.fetch(remote)?)
    }

    pub fn push(&self, remote_branch: &str) -> Result<(), GitError> {
        self.logger.info("Pushing to remote...");
        Ok(self
            .remote
            .push(&self.settings.remote, remote_branch, false)?)
    }

    pub fn force_push(&self, remote_branch: &str) -> Result<(), GitError> {
        self.logger.info("Force pushing to remote...");
        Ok(self
            .remote
            .push(&self.settings.remote, remote_branch, true)?)
    }

    pub fn squash_merge(&self, commit: &CommitRef, message: &str) -> Result<(), GitError> {
        self.logger.info("Performing squash merge...");
        Ok(self.remote.squash_merge(commit, message)?)
    }

    pub fn add_remote(&self, name: &str, url: &str) -> Result<(), GitError> {
        self.logger
            .info(format!("Adding remote {} as {}...", url, name));
        self.local.add_remote(name, url)
    }

    /// URL of `remote`, or of the configured remote.
    pub fn remote_url(&self, remote: Option<&str>) -> Result<String, GitError> {
        self.local
            .remote_url(remote.unwrap_or(&self.settings.remote))
    }

    pub fn head_commit(&self) -> Result<CommitRef, GitError> {
        self.local.head_commit()
    }
}

impl Drop for RepositoryClient {
    fn drop(&mut self) {
        self.logger.debug(format!(
            "Working copy left at {}",
            self.path.display()
        ));
    }
}

/// Creates the working copy for a release run.
pub trait WorkingCopyFactory {
    fn create(&self, remote_url: &str) -> Result<RepositoryClient, GitError>;
}

/// Clones into a fresh directory under a parent (the system temp
/// directory by default).
#[derive(Debug, Clone)]
pub struct TempCloneFactory {
    parent: PathBuf,
    settings: GitSettings,
    runner: CommandRunner,
    logger: Logger,
}

impl TempCloneFactory {
    pub fn new(settings: GitSettings, runner: CommandRunner, logger: Logger) -> Self {
        Self {
            parent: std::env::temp_dir(),
            settings,
            runner,
            logger,
        }
    }

    /// Put working copies under `parent` instead of the temp directory.
    pub fn in_dir(mut self, parent: impl Into<PathBuf>) -> Self {
        self.parent = parent.into();
        self
    }
}

impl WorkingCopyFactory for TempCloneFactory {
    fn create(&self, remote_url: &str) -> Result<RepositoryClient, GitError> {
        RepositoryClient::construct(
            remote_url,
            &self.parent,
            self.settings.clone(),
            self.runner.clone(),
            self.logger.clone(),
        )
    }
}
