//! cli::commands::release
//!
//! Wire the collaborators together and run one release.
//!
//! # Example
//!
//! ```bash
//! gdk-release release 0.3.0 \
//!     -u https://github.com/spatialos/gdk-for-unity/pull/1234 \
//!     --github-user gdk-bot --git-repository-name gdk-for-unity
//! ```

use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::auth::CredentialSource;
use crate::cli::args::ReleaseArgs;
use crate::cli::Context;
use crate::core::config::Config;
use crate::core::types::VersionLabel;
use crate::engine::{ForkRemote, ReleaseOrchestrator, ReleaseRequest, ReleaseSettings};
use crate::exec::{CommandRunner, RetryPolicy};
use crate::forge::github::GitHubForge;
use crate::forge::RemoteHostClient;
use crate::git::{GitSettings, TempCloneFactory};
use crate::metadata::FileMetadataSink;
use crate::ui::prompts::TerminalPrompter;

/// Run the release command.
pub fn release(ctx: &Context, args: ReleaseArgs) -> Result<()> {
    let logger = ctx.logger();
    let config = Config::load(ctx.config.as_deref())?;
    if let Some(path) = config.path() {
        logger.debug(format!("Using configuration from {}", path.display()));
    }

    let settings = settings(&config, &args);
    let request = ReleaseRequest {
        version: VersionLabel::new(&args.version)?,
        pull_request_url: args.pull_request_url.clone(),
        attachments: args.attachments.clone(),
    };

    let token = CredentialSource {
        key: args.github_key.clone(),
        key_file: args.github_key_file.clone(),
    }
    .resolve()?;

    let forge = GitHubForge::with_api_base(token.expose(), config.api_base());
    let host = RemoteHostClient::new(Arc::new(forge), logger.clone())
        .context("failed to start the async runtime")?;

    let policy = RetryPolicy::for_mode(args.unattended, Arc::new(TerminalPrompter));
    let runner = CommandRunner::system(policy, logger.clone());
    let working_copies = TempCloneFactory::new(settings.git.clone(), runner, logger.clone());

    let mut orchestrator =
        ReleaseOrchestrator::new(host, Box::new(working_copies), settings, logger.clone());
    if let Some(path) = &args.metadata_file_path {
        orchestrator = orchestrator.with_metadata(Box::new(FileMetadataSink::new(path)));
    }

    let result = orchestrator.run_release(&request)?;

    logger.debug(format!(
        "Working copy for {} at {}",
        result.repository,
        result.working_copy.display()
    ));
    println!("{}", result.release_url);
    Ok(())
}

/// Command-line values override the configuration file.
fn settings(config: &Config, args: &ReleaseArgs) -> ReleaseSettings {
    let pick = |flag: &Option<String>, fallback: &str| {
        flag.clone().unwrap_or_else(|| fallback.to_string())
    };

    ReleaseSettings {
        organization: config.organization().to_string(),
        primary_project: config.primary_project().to_string(),
        metadata_key: config.metadata_key().to_string(),
        changelog: config.changelog().to_string(),
        git: GitSettings {
            remote: pick(&args.git_remote, config.remote()),
            dev_branch: pick(&args.dev_branch, config.dev_branch()),
            master_branch: pick(&args.master_branch, config.master_branch()),
        },
        fork: Some(ForkRemote {
            user: args.github_user.clone(),
            repository: args.git_repository_name.clone(),
        }),
    }
}
