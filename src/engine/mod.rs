//! engine
//!
//! Sequences a release run.
//!
//! # Architecture
//!
//! The engine is the only component that knows the order of steps. It is
//! handed its collaborators at construction:
//!
//! - a [`RemoteHostClient`](crate::forge::RemoteHostClient) for the hosting
//!   service
//! - a [`WorkingCopyFactory`](crate::git::WorkingCopyFactory) for the clone
//! - an optional [`MetadataSink`](crate::metadata::MetadataSink)
//! - a [`Logger`](crate::ui::output::Logger)
//!
//! # Invariants
//!
//! - No remote call is made before the pull request URL, the template and
//!   every attachment have been validated
//! - A rejected merge never produces a working copy
//! - Nothing is rolled back; the first failure ends the run
//!
//! # Example
//!
//! ```ignore
//! use gdk_release::engine::{ReleaseOrchestrator, ReleaseRequest};
//!
//! let orchestrator = ReleaseOrchestrator::new(host, Box::new(factory), settings, logger);
//! let result = orchestrator.run_release(&ReleaseRequest {
//!     version: VersionLabel::new("0.3.0")?,
//!     pull_request_url: "https://github.com/spatialos/gdk-for-unity/pull/1234".into(),
//!     attachments: vec![],
//! })?;
//! println!("{}", result.release_url);
//! ```

mod error;
mod release;

pub use error::ReleaseError;
pub use release::{ForkRemote, ReleaseOrchestrator, ReleaseRequest, ReleaseSettings, RunResult};
