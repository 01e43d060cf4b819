//! ui::output
//!
//! Logging capability shared by every component.
//!
//! # Design
//!
//! There is no global logger. A [`Logger`] is built once by the CLI and
//! handed (cloned) to each component at construction. Two sinks exist:
//!
//! - [`Logger::tracing`] forwards to the `tracing` macros; the binary
//!   installs the subscriber.
//! - [`Logger::capture`] records messages in memory so tests can assert on
//!   exactly what the operator would have seen.
//!
//! # Example
//!
//! ```
//! use gdk_release::ui::output::{Level, Logger, Verbosity};
//!
//! let logger = Logger::capture(Verbosity::Debug);
//! logger.info("Cloning repository...");
//! logger.debug("running git clone");
//!
//! assert_eq!(logger.records().len(), 2);
//! assert!(logger.contains(Level::Info, "Cloning"));
//! ```

use std::fmt::Display;
use std::sync::{Arc, Mutex};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - errors only
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }

    fn allows(self, level: Level) -> bool {
        match level {
            Level::Error => true,
            Level::Warn | Level::Info => self != Verbosity::Quiet,
            Level::Debug => self == Verbosity::Debug,
        }
    }
}

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

/// A captured log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
}

#[derive(Debug, Clone)]
enum Sink {
    Tracing,
    Capture(Arc<Mutex<Vec<LogRecord>>>),
}

/// Logger capability passed explicitly into each component.
///
/// Cloning is cheap; clones of a capturing logger share one buffer.
#[derive(Debug, Clone)]
pub struct Logger {
    verbosity: Verbosity,
    sink: Sink,
}

impl Logger {
    /// Logger that forwards to the installed `tracing` subscriber.
    pub fn tracing(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            sink: Sink::Tracing,
        }
    }

    /// Logger that keeps every record in memory.
    pub fn capture(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            sink: Sink::Capture(Arc::new(Mutex::new(Vec::new()))),
        }
    }

    /// Current verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn debug(&self, message: impl Display) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: impl Display) {
        self.log(Level::Info, message);
    }

    pub fn warn(&self, message: impl Display) {
        self.log(Level::Warn, message);
    }

    pub fn error(&self, message: impl Display) {
        self.log(Level::Error, message);
    }

    /// Emit a record at the given level, subject to verbosity.
    pub fn log(&self, level: Level, message: impl Display) {
        if !self.verbosity.allows(level) {
            return;
        }

        match &self.sink {
            Sink::Tracing => match level {
                Level::Debug => tracing::debug!("{}", message),
                Level::Info => tracing::info!("{}", message),
                Level::Warn => tracing::warn!("{}", message),
                Level::Error => tracing::error!("{}", message),
            },
            Sink::Capture(records) => {
                // A poisoned buffer only happens after a panicking test thread.
                if let Ok(mut records) = records.lock() {
                    records.push(LogRecord {
                        level,
                        message: message.to_string(),
                    });
                }
            }
        }
    }

    /// Captured records (empty for the tracing sink).
    pub fn records(&self) -> Vec<LogRecord> {
        match &self.sink {
            Sink::Tracing => Vec::new(),
            Sink::Capture(records) => records
                .lock()
                .map(|records| records.clone())
                .unwrap_or_default(),
        }
    }

    /// Whether a captured record at `level` contains `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.records()
            .iter()
            .any(|r| r.level == level && r.message.contains(needle))
    }
}
