//! exec
//!
//! External process invocation with a caller-selected retry policy.
//!
//! # Architecture
//!
//! - [`ProcessExecutor`] spawns one process and waits for it. The system
//!   implementation inherits the console so `git` can prompt for
//!   credentials; [`RecordingExecutor`] replays scripted exit codes.
//! - [`CommandRunner`] wraps an executor with a [`RetryPolicy`]. Only
//!   non-zero exits are retried; a process that cannot be spawned fails
//!   immediately.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use gdk_release::exec::{CommandRunner, RecordingExecutor, RetryPolicy};
//! use gdk_release::ui::output::{Logger, Verbosity};
//!
//! let executor = Arc::new(RecordingExecutor::new([0]));
//! let runner = CommandRunner::new(executor.clone(), RetryPolicy::FailFast, Logger::capture(Verbosity::Debug));
//! runner.run("fetch", "git", &["fetch".to_string()], std::path::Path::new(".")).unwrap();
//! assert_eq!(executor.invocations().len(), 1);
//! ```

mod runner;

pub use runner::{
    CommandError, CommandRunner, ExitStatus, Invocation, ProcessExecutor, RecordingExecutor,
    RetryPolicy, SystemExecutor,
};
