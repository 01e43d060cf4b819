//! git::interface
//!
//! In-process repository operations using git2.
//!
//! Everything here works on the local object database and index only; no
//! call touches the network, so nothing here is retried.
//!
//! # Error Handling
//!
//! git2 errors are normalized into [`GitError`] with the ref or path that
//! was being operated on:
//! - [`GitError::NotARepo`]: the directory holds no repository
//! - [`GitError::RefNotFound`]: a branch or remote-tracking ref is missing
//! - [`GitError::RemoteNotFound`]: no remote with that name
//! - [`GitError::Signature`]: `user.name`/`user.email` not configured
//!
//! # Example
//!
//! ```ignore
//! use gdk_release::git::{Git, LocalRepositoryOps};
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("/tmp/gdk-release-1234"))?;
//! git.checkout("origin/develop")?;
//! println!("HEAD is {}", git.head_commit()?.short(7));
//! ```

use std::path::{Component, Path, PathBuf};

use chrono::{Local, Offset};
use thiserror::Error;

use crate::core::types::{CommitRef, ParseError};
use crate::exec::CommandError;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo { path: PathBuf },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// Requested branch or ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound { refname: String },

    /// Requested remote does not exist.
    #[error("remote not found: {name}")]
    RemoteNotFound { name: String },

    /// Object id could not be used as a commit reference.
    #[error("invalid object id: {oid}")]
    InvalidOid { oid: String },

    /// Committer identity could not be built from configuration.
    #[error("cannot build commit signature: {message}")]
    Signature { message: String },

    /// Path to stage is not inside the working copy.
    #[error("path is outside the working copy: {path}")]
    PathOutsideWorkingCopy { path: PathBuf },

    /// An external git command failed.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Filesystem error around the working copy.
    #[error("working copy error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal { message: String },
}

impl GitError {
    /// Create a GitError from a git2::Error with the ref being operated on.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound
            | git2::ErrorCode::UnbornBranch
            | git2::ErrorCode::InvalidSpec => GitError::RefNotFound {
                refname: context.to_string(),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

impl From<ParseError> for GitError {
    fn from(err: ParseError) -> Self {
        GitError::InvalidOid {
            oid: err.to_string(),
        }
    }
}

/// In-process operations on one working copy.
pub trait LocalRepositoryOps {
    /// Check out a local branch, or detach HEAD at any other revision
    /// (for example `origin/develop`).
    fn checkout(&self, refname: &str) -> Result<(), GitError>;

    /// True if anything is staged, modified, deleted or untracked.
    fn has_pending_changes(&self) -> Result<bool, GitError>;

    /// Add `path` to the index. Relative paths are taken from the
    /// working copy root.
    fn stage(&self, path: &Path) -> Result<(), GitError>;

    /// Commit the index on HEAD, allowing an empty commit.
    fn commit(&self, message: &str) -> Result<CommitRef, GitError>;

    /// Push URL of `remote`, falling back to its fetch URL.
    fn remote_url(&self, remote: &str) -> Result<String, GitError>;

    fn head_commit(&self) -> Result<CommitRef, GitError>;

    fn add_remote(&self, name: &str, url: &str) -> Result<(), GitError>;
}

/// git2-backed [`LocalRepositoryOps`].
pub struct Git {
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    /// Open the repository whose working directory is `path`.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if `path` holds no repository
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::open(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        Ok(Self { repo })
    }

    /// Working directory root.
    pub fn work_dir(&self) -> Result<&Path, GitError> {
        self.repo.workdir().ok_or(GitError::BareRepo)
    }

    /// Current branch name, `None` when HEAD is detached or unborn.
    pub fn current_branch(&self) -> Result<Option<String>, GitError> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if head.is_branch() {
            return Ok(head.shorthand().map(String::from));
        }
        Ok(None)
    }

    fn relative_to_workdir(&self, path: &Path) -> Result<PathBuf, GitError> {
        let work_dir = self.work_dir()?;
        let relative = if path.is_absolute() {
            path.strip_prefix(work_dir)
                .map(Path::to_path_buf)
                .map_err(|_| GitError::PathOutsideWorkingCopy {
                    path: path.to_path_buf(),
                })?
        } else {
            path.to_path_buf()
        };

        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(GitError::PathOutsideWorkingCopy {
                path: path.to_path_buf(),
            });
        }
        Ok(relative)
    }

    fn signature(&self) -> Result<git2::Signature<'static>, GitError> {
        let config = self.repo.config()?;
        let lookup = |key: &str| {
            config.get_string(key).map_err(|_| GitError::Signature {
                message: format!("'{}' is not set", key),
            })
        };
        let name = lookup("user.name")?;
        let email = lookup("user.email")?;

        let now = Local::now();
        let offset_minutes = now.offset().fix().local_minus_utc() / 60;
        let time = git2::Time::new(now.timestamp(), offset_minutes);

        git2::Signature::new(&name, &email, &time).map_err(|e| GitError::Signature {
            message: e.message().to_string(),
        })
    }
}

impl LocalRepositoryOps for Git {
    fn checkout(&self, refname: &str) -> Result<(), GitError> {
        let mut opts = git2::build::CheckoutBuilder::new();
        opts.safe();

        let branch_ref = format!("refs/heads/{}", refname);
        if let Ok(reference) = self.repo.find_reference(&branch_ref) {
            let commit = reference
                .peel_to_commit()
                .map_err(|e| GitError::from_git2(e, refname))?;
            self.repo
                .checkout_tree(commit.as_object(), Some(&mut opts))?;
            self.repo.set_head(&branch_ref)?;
            return Ok(());
        }

        let commit = self
            .repo
            .revparse_single(refname)
            .and_then(|object| object.peel_to_commit())
            .map_err(|e| GitError::from_git2(e, refname))?;
        self.repo
            .checkout_tree(commit.as_object(), Some(&mut opts))?;
        self.repo.set_head_detached(commit.id())?;
        Ok(())
    }

    fn has_pending_changes(&self) -> Result<bool, GitError> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        Ok(statuses
            .iter()
            .any(|entry| entry.status() != git2::Status::CURRENT))
    }

    fn stage(&self, path: &Path) -> Result<(), GitError> {
        let relative = self.relative_to_workdir(path)?;
        let absolute = self.work_dir()?.join(&relative);

        let mut index = self.repo.index()?;
        if absolute.exists() {
            index.add_path(&relative)?;
        } else {
            index.remove_path(&relative)?;
        }
        index.write()?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<CommitRef, GitError> {
        let signature = self.signature()?;

        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        Ok(CommitRef::new(oid.to_string())?)
    }

    fn remote_url(&self, remote: &str) -> Result<String, GitError> {
        let found = match self.repo.find_remote(remote) {
            Ok(found) => found,
            Err(e) if e.code() == git2::ErrorCode::NotFound => {
                return Err(GitError::RemoteNotFound {
                    name: remote.to_string(),
                })
            }
            Err(e) => return Err(GitError::from_git2(e, remote)),
        };

        found
            .pushurl()
            .or_else(|| found.url())
            .map(String::from)
            .ok_or_else(|| GitError::RemoteNotFound {
                name: remote.to_string(),
            })
    }

    fn head_commit(&self) -> Result<CommitRef, GitError> {
        let commit = self
            .repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;

        Ok(CommitRef::new(commit.id().to_string())?)
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<(), GitError> {
        self.repo.remote(name, url).map_err(|e| GitError::Internal {
            message: format!("cannot add remote '{}': {}", name, e.message()),
        })?;
        Ok(())
    }
}
