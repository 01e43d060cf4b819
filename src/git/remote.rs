//! git::remote
//!
//! Network-facing repository operations, run through the `git` executable
//! so that the operator's SSH agent and credential helpers apply.

use std::path::{Path, PathBuf};

use crate::core::types::CommitRef;
use crate::exec::{CommandError, CommandRunner};

const GIT_PROGRAM: &str = "git";

/// Out-of-process operations on one working copy, retried per the
/// runner's policy.
pub trait RemoteRepositoryOps {
    /// Clone `url` into `target`, which must be empty. The cloned-from
    /// remote is registered under the name `origin`.
    fn clone_repository(
        &self,
        url: &str,
        target: &Path,
        origin: &str,
    ) -> Result<(), CommandError>;

    fn fetch(&self, remote: &str) -> Result<(), CommandError>;

    /// Push HEAD to `refs/heads/<branch>` on `remote`.
    fn push(&self, remote: &str, branch: &str, force: bool) -> Result<(), CommandError>;

    /// Squash `commit` into the current branch. `message` is passed
    /// verbatim.
    fn squash_merge(&self, commit: &CommitRef, message: &str) -> Result<(), CommandError>;
}

/// [`RemoteRepositoryOps`] over the `git` command line.
#[derive(Debug, Clone)]
pub struct GitCli {
    runner: CommandRunner,
    work_dir: PathBuf,
}

impl GitCli {
    pub fn new(runner: CommandRunner, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            work_dir: work_dir.into(),
        }
    }

    fn run(&self, description: &str, args: Vec<String>) -> Result<(), CommandError> {
        self.runner
            .run(description, GIT_PROGRAM, &args, &self.work_dir)
            .map(|_| ())
    }
}

/// Arguments for `git push`.
pub(crate) fn push_args(remote: &str, branch: &str, force: bool) -> Vec<String> {
    let mut args = vec![
        "push".to_string(),
        remote.to_string(),
        format!("HEAD:refs/heads/{}", branch),
    ];
    if force {
        args.push("-f".to_string());
    }
    args
}

/// Arguments for `git clone`.
pub(crate) fn clone_args(url: &str, target: &Path, origin: &str) -> Vec<String> {
    vec![
        "clone".to_string(),
        "--origin".to_string(),
        origin.to_string(),
        url.to_string(),
        target.display().to_string(),
    ]
}

impl RemoteRepositoryOps for GitCli {
    fn clone_repository(
        &self,
        url: &str,
        target: &Path,
        origin: &str,
    ) -> Result<(), CommandError> {
        self.run("clone repository", clone_args(url, target, origin))
    }

    fn fetch(&self, remote: &str) -> Result<(), CommandError> {
        self.run("fetch", vec!["fetch".to_string(), remote.to_string()])
    }

    fn push(&self, remote: &str, branch: &str, force: bool) -> Result<(), CommandError> {
        let description = if force {
            "force push branch"
        } else {
            "push branch"
        };
        self.run(description, push_args(remote, branch, force))
    }

    fn squash_merge(&self, commit: &CommitRef, message: &str) -> Result<(), CommandError> {
        self.run(
            "squash merge",
            vec![
                "merge".to_string(),
                "--squash".to_string(),
                commit.sha().to_string(),
                "-m".to_string(),
                message.to_string(),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::exec::{RecordingExecutor, RetryPolicy};
    use crate::ui::output::{Logger, Verbosity};

    fn cli(codes: &[i32]) -> (GitCli, Arc<RecordingExecutor>) {
        let executor = Arc::new(RecordingExecutor::new(codes.iter().copied()));
        let runner = CommandRunner::new(
            executor.clone(),
            RetryPolicy::FailFast,
            Logger::capture(Verbosity::Normal),
        );
        (GitCli::new(runner, "/work"), executor)
    }

    #[test]
    fn push_targets_remote_branch_ref() {
        assert_eq!(
            push_args("origin", "release-0.3.0", false),
            vec!["push", "origin", "HEAD:refs/heads/release-0.3.0"]
        );
    }

    #[test]
    fn force_push_appends_flag() {
        assert_eq!(
            push_args("origin", "master", true),
            vec!["push", "origin", "HEAD:refs/heads/master", "-f"]
        );
    }

    #[test]
    fn clone_names_the_configured_remote() {
        assert_eq!(
            clone_args(
                "https://github.com/spatialos/gdk-for-unity.git",
                Path::new("/tmp/w"),
                "upstream"
            ),
            vec![
                "clone",
                "--origin",
                "upstream",
                "https://github.com/spatialos/gdk-for-unity.git",
                "/tmp/w",
            ]
        );
    }

    #[test]
    fn commands_run_in_work_dir() {
        let (cli, executor) = cli(&[]);
        cli.fetch("upstream").unwrap();

        let calls = executor.invocations();
        assert_eq!(calls[0].to_string(), "git fetch upstream");
        assert_eq!(calls[0].cwd, PathBuf::from("/work"));
    }

    #[test]
    fn squash_merge_passes_message_as_one_argument() {
        let (cli, executor) = cli(&[]);
        let commit = CommitRef::new("a".repeat(40)).unwrap();
        cli.squash_merge(&commit, "Release 0.3.0 \"final\"").unwrap();

        let calls = executor.invocations();
        assert_eq!(
            calls[0].args,
            vec![
                "merge".to_string(),
                "--squash".to_string(),
                "a".repeat(40),
                "-m".to_string(),
                "Release 0.3.0 \"final\"".to_string(),
            ]
        );
    }

    #[test]
    fn failed_push_names_operation() {
        let (cli, _) = cli(&[1]);
        let err = cli.push("origin", "master", true).unwrap_err();
        assert!(err.to_string().starts_with("failed to force push branch"));
    }
}
