//! exec::runner
//!
//! Process executors and the retrying command runner.

use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::ui::output::Logger;
use crate::ui::prompts::{confirm, PromptError, Prompter};

/// Errors from running an external command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command exited non-zero and was not (or no longer) retried.
    #[error("failed to {description} ({})", describe_exit(.exit_code))]
    Failed {
        description: String,
        exit_code: Option<i32>,
    },

    /// The process could not be started at all.
    #[error("failed to {description}: could not start '{program}': {source}")]
    Spawn {
        description: String,
        program: String,
        source: std::io::Error,
    },

    /// The retry prompt could not be answered.
    #[error("failed to {description}: {source}")]
    Prompt {
        description: String,
        source: PromptError,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Exit status of a finished process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    code: Option<i32>,
}

impl ExitStatus {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Status of a process killed before it could exit.
    pub fn signalled() -> Self {
        Self { code: None }
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Spawns a process and blocks until it exits.
pub trait ProcessExecutor: Send + Sync {
    fn execute(&self, program: &str, args: &[String], cwd: &Path)
        -> std::io::Result<ExitStatus>;
}

/// Executor backed by [`std::process::Command`].
///
/// Standard streams are inherited, so the operator sees `git` output
/// and credential prompts directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl ProcessExecutor for SystemExecutor {
    fn execute(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> std::io::Result<ExitStatus> {
        std::process::Command::new(program)
            .args(args)
            .current_dir(cwd)
            .status()
            .map(ExitStatus::from)
    }
}

/// One recorded call to a [`RecordingExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.program, self.args.join(" "))
    }
}

/// Executor that records invocations and returns scripted exit codes.
///
/// Once the script runs out every further call exits 0.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    exit_codes: Mutex<VecDeque<i32>>,
    invocations: Mutex<Vec<Invocation>>,
}

impl RecordingExecutor {
    pub fn new(exit_codes: impl IntoIterator<Item = i32>) -> Self {
        Self {
            exit_codes: Mutex::new(exit_codes.into_iter().collect()),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Invocations so far, in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .map(|i| i.clone())
            .unwrap_or_default()
    }
}

impl ProcessExecutor for RecordingExecutor {
    fn execute(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> std::io::Result<ExitStatus> {
        self.invocations
            .lock()
            .map_err(|e| std::io::Error::other(e.to_string()))?
            .push(Invocation {
                program: program.to_string(),
                args: args.to_vec(),
                cwd: cwd.to_path_buf(),
            });

        let code = self
            .exit_codes
            .lock()
            .map_err(|e| std::io::Error::other(e.to_string()))?
            .pop_front()
            .unwrap_or(0);

        Ok(ExitStatus::from_code(code))
    }
}

/// What to do when a command exits non-zero.
#[derive(Clone)]
pub enum RetryPolicy {
    /// Fail on the first non-zero exit.
    FailFast,
    /// Ask the operator whether to run the command again.
    PromptingRetry(Arc<dyn Prompter>),
}

impl RetryPolicy {
    /// Policy for the attended/unattended CLI switch.
    pub fn for_mode(unattended: bool, prompter: Arc<dyn Prompter>) -> Self {
        if unattended {
            RetryPolicy::FailFast
        } else {
            RetryPolicy::PromptingRetry(prompter)
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryPolicy::FailFast => write!(f, "FailFast"),
            RetryPolicy::PromptingRetry(_) => write!(f, "PromptingRetry"),
        }
    }
}

/// Runs external commands under a [`RetryPolicy`].
#[derive(Clone)]
pub struct CommandRunner {
    executor: Arc<dyn ProcessExecutor>,
    policy: RetryPolicy,
    logger: Logger,
}

impl fmt::Debug for CommandRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRunner")
            .field("policy", &self.policy)
            .finish()
    }
}

impl CommandRunner {
    pub fn new(executor: Arc<dyn ProcessExecutor>, policy: RetryPolicy, logger: Logger) -> Self {
        Self {
            executor,
            policy,
            logger,
        }
    }

    /// Runner over real processes.
    pub fn system(policy: RetryPolicy, logger: Logger) -> Self {
        Self::new(Arc::new(SystemExecutor), policy, logger)
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `program` until it exits zero or the policy gives up.
    ///
    /// `description` completes the sentence "failed to ..." in errors and
    /// prompts.
    ///
    /// # Errors
    ///
    /// - [`CommandError::Spawn`] if the process cannot be started
    /// - [`CommandError::Failed`] on a non-zero exit that is not retried
    /// - [`CommandError::Prompt`] if the operator cannot be asked
    pub fn run(
        &self,
        description: &str,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> Result<ExitStatus, CommandError> {
        loop {
            self.logger.debug(format!(
                "Attempting to {}. Running command [{} {}]",
                description,
                program,
                args.join(" ")
            ));

            let status = self
                .executor
                .execute(program, args, cwd)
                .map_err(|source| CommandError::Spawn {
                    description: description.to_string(),
                    program: program.to_string(),
                    source,
                })?;

            if status.success() {
                return Ok(status);
            }

            let failed = CommandError::Failed {
                description: description.to_string(),
                exit_code: status.code(),
            };

            let prompter = match &self.policy {
                RetryPolicy::FailFast => return Err(failed),
                RetryPolicy::PromptingRetry(prompter) => prompter,
            };

            let retry = confirm(
                prompter.as_ref(),
                &format!("Failed to {}. Retry (y/n)?", description),
            )
            .map_err(|source| CommandError::Prompt {
                description: description.to_string(),
                source,
            })?;

            if !retry {
                return Err(failed);
            }
            self.logger.info(format!("Retrying: {}", description));
        }
    }
}
