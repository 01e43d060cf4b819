//! git
//!
//! Repository access for the release working copy.
//!
//! # Architecture
//!
//! Two capabilities are composed by [`RepositoryClient`]:
//!
//! - [`LocalRepositoryOps`] runs in-process through `git2` (checkout,
//!   status, stage, commit, remotes, HEAD). No retries.
//! - [`RemoteRepositoryOps`] shells out to `git` through a
//!   [`CommandRunner`](crate::exec::CommandRunner) (clone, fetch, push,
//!   squash merge) so SSH authentication works and failures can be
//!   retried by the operator.
//!
//! [`WorkingCopyFactory`] is how the release engine obtains a client; the
//! default [`TempCloneFactory`] clones into the system temp directory.
//!
//! # Example
//!
//! ```ignore
//! use gdk_release::git::{GitSettings, TempCloneFactory, WorkingCopyFactory};
//!
//! let factory = TempCloneFactory::new(GitSettings::default(), runner, logger);
//! let mut client = factory.create("https://github.com/spatialos/gdk-for-unity.git")?;
//! client.fetch(None)?;
//! client.checkout_remote_branch("develop", None)?;
//! println!("HEAD is {}", client.head_commit()?);
//! ```

mod client;
mod interface;
mod remote;

pub use client::{GitSettings, RepositoryClient, TempCloneFactory, WorkingCopyFactory};
pub use interface::{Git, GitError, LocalRepositoryOps};
pub use remote::{GitCli, RemoteRepositoryOps};
