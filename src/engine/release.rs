//! engine::release
//!
//! The end-to-end release run.
//!
//! # Steps
//!
//! ```text
//! parse PR URL -> template lookup -> resolve repo -> merge PR
//!   -> clone, fetch, checkout <remote>/<dev branch> -> read changelog
//!   -> draft release at HEAD -> upload assets -> write metadata
//! ```
//!
//! Each step needs the previous one to succeed. Everything before the
//! merge is validation with no side effects on the host; from the merge
//! onwards, a failure leaves completed steps in place.

use std::path::{Path, PathBuf};

use super::error::ReleaseError;
use crate::core::changelog::extract_from_file;
use crate::core::refs::{organization_remote_url, parse_pull_request_url};
use crate::core::templates::TemplateTable;
use crate::core::types::{CommitRef, VersionLabel};
use crate::forge::{content_type_for, RemoteHostClient};
use crate::git::{GitSettings, RepositoryClient, WorkingCopyFactory};
use crate::metadata::MetadataSink;
use crate::ui::output::Logger;

/// The operator's fork of the released repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkRemote {
    /// GitHub account; also used as the remote name
    pub user: String,
    pub repository: String,
}

impl ForkRemote {
    pub fn url(&self) -> String {
        organization_remote_url(&self.user, &self.repository)
    }
}

/// Resolved settings for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSettings {
    pub organization: String,
    /// Repository whose release hash goes to the metadata sink
    pub primary_project: String,
    pub metadata_key: String,
    /// Changelog path relative to the working copy root
    pub changelog: String,
    pub git: GitSettings,
    pub fork: Option<ForkRemote>,
}

/// What to release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRequest {
    pub version: VersionLabel,
    pub pull_request_url: String,
    /// Files uploaded to the draft
    pub attachments: Vec<PathBuf>,
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// "owner/name"
    pub repository: String,
    pub tag: String,
    pub commit: CommitRef,
    pub release_url: String,
    /// Directory of the clone, left on disk
    pub working_copy: PathBuf,
    /// Uploaded asset names
    pub assets: Vec<String>,
    pub metadata_written: bool,
}

/// Sequences one release run.
pub struct ReleaseOrchestrator {
    host: RemoteHostClient,
    working_copies: Box<dyn WorkingCopyFactory>,
    templates: TemplateTable,
    metadata: Option<Box<dyn MetadataSink>>,
    settings: ReleaseSettings,
    logger: Logger,
}

impl ReleaseOrchestrator {
    pub fn new(
        host: RemoteHostClient,
        working_copies: Box<dyn WorkingCopyFactory>,
        settings: ReleaseSettings,
        logger: Logger,
    ) -> Self {
        Self {
            host,
            working_copies,
            templates: TemplateTable::standard(),
            metadata: None,
            settings,
            logger,
        }
    }

    /// Emit the primary project's release hash to `sink`.
    pub fn with_metadata(mut self, sink: Box<dyn MetadataSink>) -> Self {
        self.metadata = Some(sink);
        self
    }

    pub fn with_templates(mut self, templates: TemplateTable) -> Self {
        self.templates = templates;
        self
    }

    pub fn settings(&self) -> &ReleaseSettings {
        &self.settings
    }

    /// Merge the pull request and draft the release.
    ///
    /// # Errors
    ///
    /// Any [`ReleaseError`]; see the module docs for which steps may
    /// already have taken effect.
    pub fn run_release(&self, request: &ReleaseRequest) -> Result<RunResult, ReleaseError> {
        let change = parse_pull_request_url(&request.pull_request_url, &self.settings.organization)?;
        let template = self.templates.lookup(change.repository_name())?;
        validate_attachments(&request.attachments)?;

        let remote_url =
            organization_remote_url(&self.settings.organization, change.repository_name());
        let resolved = self.host.resolve_repository(&remote_url)?;
        let repo = &resolved.reference;

        let merge = self.host.merge_change_request(repo, change.id())?;
        if !merge.merged {
            return Err(ReleaseError::MergeRejected {
                pull_request: request.pull_request_url.clone(),
                message: merge.message,
            });
        }
        self.logger.info(format!("Merged {}", change));

        let mut client = self
            .working_copies
            .create(&remote_url)
            .map_err(|source| ReleaseError::Clone {
                url: remote_url.clone(),
                source,
            })?;
        self.prepare_working_copy(&mut client)?;

        self.logger
            .info(format!("Reading {}...", self.settings.changelog));
        let notes = extract_from_file(&client.path().join(&self.settings.changelog))?;

        let commit = client.head_commit()?;
        let name = template.render_name(&request.version);
        let body = template.render_body(&request.version, &notes);
        let release = self.host.create_draft_release(
            repo,
            request.version.as_str(),
            &body,
            &name,
            &commit,
        )?;

        let mut assets = Vec::with_capacity(request.attachments.len());
        for path in &request.attachments {
            assets.push(self.upload(&release, path)?);
        }

        self.logger.info("Release Successful!");
        self.logger.info(format!("Release hash: {}", commit));
        self.logger
            .info(format!("Draft release: {}", release.html_url));

        let metadata_written = self.write_metadata(repo.name(), &commit)?;

        Ok(RunResult {
            repository: repo.to_string(),
            tag: release.tag,
            commit,
            release_url: release.html_url,
            working_copy: client.path().to_path_buf(),
            assets,
            metadata_written,
        })
    }

    fn prepare_working_copy(&self, client: &mut RepositoryClient) -> Result<(), ReleaseError> {
        if let Some(fork) = &self.settings.fork {
            client.add_remote(&fork.user, &fork.url())?;
        }

        client.fetch(None)?;

        let dev_branch = &self.settings.git.dev_branch;
        client
            .checkout_remote_branch(dev_branch, None)
            .map_err(|source| ReleaseError::Checkout {
                refname: format!("{}/{}", self.settings.git.remote, dev_branch),
                source,
            })
    }

    fn upload(
        &self,
        release: &crate::forge::Release,
        path: &Path,
    ) -> Result<String, ReleaseError> {
        let data = std::fs::read(path).map_err(|source| ReleaseError::Asset {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = asset_name(path);
        let asset = self.host.upload_asset(
            release,
            &file_name,
            content_type_for(path),
            data,
        )?;
        Ok(asset.name)
    }

    fn write_metadata(&self, repository: &str, commit: &CommitRef) -> Result<bool, ReleaseError> {
        if repository != self.settings.primary_project {
            return Ok(false);
        }
        let Some(sink) = &self.metadata else {
            return Ok(false);
        };

        sink.write(&self.settings.metadata_key, commit.sha())?;
        self.logger.debug(format!(
            "Wrote {}={}",
            self.settings.metadata_key,
            commit.sha()
        ));
        Ok(true)
    }
}

fn asset_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn validate_attachments(paths: &[PathBuf]) -> Result<(), ReleaseError> {
    match paths.iter().find(|p| !p.is_file()) {
        Some(missing) => Err(ReleaseError::Asset {
            path: missing.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::core::types::RemoteRepositoryRef;
    use crate::exec::CommandError;
    use crate::forge::mock::{FailOn, MockForge, MockOperation};
    use crate::forge::ForgeError;
    use crate::git::{GitError, LocalRepositoryOps, RemoteRepositoryOps};
    use crate::metadata::FileMetadataSink;
    use crate::ui::output::{Level, Verbosity};

    const HEAD: &str = "0123456789abcdef0123456789abcdef01234567";
    const CHANGELOG: &str =
        "# Changelog\n\n## Unreleased\n\n- wip\n\n## `0.3.0` - 2019-10-01\n\n### Added\n\n- Things\n\n## `0.2.0`\n\n- old\n";

    #[derive(Default, Clone)]
    struct Calls(Arc<Mutex<Vec<String>>>);

    impl Calls {
        fn push(&self, call: impl Into<String>) {
            self.0.lock().unwrap().push(call.into());
        }
        fn all(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    struct FakeLocal {
        calls: Calls,
        known_refs: Vec<String>,
    }

    impl LocalRepositoryOps for FakeLocal {
        fn checkout(&self, refname: &str) -> Result<(), GitError> {
            self.calls.push(format!("checkout {}", refname));
            if self.known_refs.iter().any(|r| r == refname) {
                Ok(())
            } else {
                Err(GitError::RefNotFound {
                    refname: refname.to_string(),
                })
            }
        }
        fn has_pending_changes(&self) -> Result<bool, GitError> {
            Ok(false)
        }
        fn stage(&self, _path: &Path) -> Result<(), GitError> {
            Ok(())
        }
        fn commit(&self, _message: &str) -> Result<CommitRef, GitError> {
            Ok(CommitRef::new(HEAD)?)
        }
        fn remote_url(&self, _remote: &str) -> Result<String, GitError> {
            Ok(String::new())
        }
        fn head_commit(&self) -> Result<CommitRef, GitError> {
            Ok(CommitRef::new(HEAD)?)
        }
        fn add_remote(&self, name: &str, url: &str) -> Result<(), GitError> {
            self.calls.push(format!("remote add {} {}", name, url));
            Ok(())
        }
    }

    struct FakeRemote {
        calls: Calls,
        fail_fetch: bool,
    }

    impl RemoteRepositoryOps for FakeRemote {
        fn clone_repository(
            &self,
            _url: &str,
            _target: &Path,
            _origin: &str,
        ) -> Result<(), CommandError> {
            Ok(())
        }
        fn fetch(&self, remote: &str) -> Result<(), CommandError> {
            self.calls.push(format!("fetch {}", remote));
            if self.fail_fetch {
                return Err(CommandError::Failed {
                    description: "fetch".into(),
                    exit_code: Some(128),
                });
            }
            Ok(())
        }
        fn push(&self, _remote: &str, _branch: &str, _force: bool) -> Result<(), CommandError> {
            Ok(())
        }
        fn squash_merge(&self, _commit: &CommitRef, _message: &str) -> Result<(), CommandError> {
            Ok(())
        }
    }

    /// Hands out clients over a temp directory holding a changelog.
    struct FakeFactory {
        root: PathBuf,
        calls: Calls,
        changelog: Option<&'static str>,
        known_refs: Vec<String>,
        fail_clone: bool,
        fail_fetch: bool,
        logger: Logger,
    }

    impl WorkingCopyFactory for FakeFactory {
        fn create(&self, remote_url: &str) -> Result<RepositoryClient, GitError> {
            self.calls.push(format!("clone {}", remote_url));
            if self.fail_clone {
                return Err(GitError::Command(CommandError::Failed {
                    description: "clone repository".into(),
                    exit_code: Some(128),
                }));
            }
            if let Some(changelog) = self.changelog {
                std::fs::write(self.root.join("CHANGELOG.md"), changelog).unwrap();
            }
            Ok(RepositoryClient::with_ops(
                &self.root,
                Box::new(FakeLocal {
                    calls: self.calls.clone(),
                    known_refs: self.known_refs.clone(),
                }),
                Box::new(FakeRemote {
                    calls: self.calls.clone(),
                    fail_fetch: self.fail_fetch,
                }),
                GitSettings::default(),
                self.logger.clone(),
            ))
        }
    }

    struct Harness {
        forge: MockForge,
        calls: Calls,
        logger: Logger,
        dir: tempfile::TempDir,
        changelog: Option<&'static str>,
        known_refs: Vec<String>,
        fail_clone: bool,
        fail_fetch: bool,
        fork: Option<ForkRemote>,
    }

    impl Harness {
        fn new(forge: MockForge) -> Self {
            Self {
                forge,
                calls: Calls::default(),
                logger: Logger::capture(Verbosity::Debug),
                dir: tempfile::tempdir().unwrap(),
                changelog: Some(CHANGELOG),
                known_refs: vec!["origin/develop".into()],
                fail_clone: false,
                fail_fetch: false,
                fork: None,
            }
        }

        fn settings(&self) -> ReleaseSettings {
            ReleaseSettings {
                organization: "spatialos".into(),
                primary_project: "gdk-for-unity".into(),
                metadata_key: "gdk-for-unity-hash".into(),
                changelog: "CHANGELOG.md".into(),
                git: GitSettings::default(),
                fork: self.fork.clone(),
            }
        }

        fn orchestrator(&self) -> ReleaseOrchestrator {
            let factory = FakeFactory {
                root: self.dir.path().to_path_buf(),
                calls: self.calls.clone(),
                changelog: self.changelog,
                known_refs: self.known_refs.clone(),
                fail_clone: self.fail_clone,
                fail_fetch: self.fail_fetch,
                logger: self.logger.clone(),
            };
            let host =
                RemoteHostClient::new(Arc::new(self.forge.clone()), self.logger.clone()).unwrap();
            ReleaseOrchestrator::new(host, Box::new(factory), self.settings(), self.logger.clone())
        }
    }

    fn forge_with(name: &str) -> MockForge {
        MockForge::new().with_repository(&RemoteRepositoryRef::new("spatialos", name).unwrap())
    }

    fn request(repo: &str) -> ReleaseRequest {
        ReleaseRequest {
            version: VersionLabel::new("0.3.0").unwrap(),
            pull_request_url: format!("https://github.com/spatialos/{}/pull/1234", repo),
            attachments: Vec::new(),
        }
    }

    mod happy_path {
        use super::*;

        #[test]
        fn drafts_release_from_second_changelog_section() {
            let harness = Harness::new(forge_with("gdk-for-unity"));
            let result = harness
                .orchestrator()
                .run_release(&request("gdk-for-unity"))
                .unwrap();

            assert_eq!(result.repository, "spatialos/gdk-for-unity");
            assert_eq!(result.tag, "0.3.0");
            assert_eq!(result.commit.sha(), HEAD);
            assert!(!result.metadata_written);

            let ops = harness.forge.operations();
            assert_eq!(ops.len(), 3);
            assert!(matches!(&ops[0], MockOperation::GetRepository { repository } if repository == "spatialos/gdk-for-unity"));
            assert!(matches!(&ops[1], MockOperation::MergePullRequest { number: 1234, .. }));
            match &ops[2] {
                MockOperation::CreateRelease {
                    tag,
                    target_commitish,
                    name,
                    body,
                    draft,
                    ..
                } => {
                    assert_eq!(tag, "0.3.0");
                    assert_eq!(target_commitish, HEAD);
                    assert_eq!(name, "GDK for Unity Alpha Release 0.3.0");
                    assert!(*draft);
                    assert!(body.ends_with("\n\n---\n\n\n### Added\n\n- Things\n"));
                    assert!(!body.contains("- wip"));
                    assert!(!body.contains("- old"));
                }
                other => panic!("unexpected operation {other:?}"),
            }
        }

        #[test]
        fn working_copy_steps_in_order() {
            let mut harness = Harness::new(forge_with("gdk-for-unity-blank-project"));
            harness.fork = Some(ForkRemote {
                user: "gdk-bot".into(),
                repository: "gdk-for-unity-blank-project".into(),
            });
            harness
                .orchestrator()
                .run_release(&request("gdk-for-unity-blank-project"))
                .unwrap();

            assert_eq!(
                harness.calls.all(),
                vec![
                    "clone https://github.com/spatialos/gdk-for-unity-blank-project.git",
                    "remote add gdk-bot https://github.com/gdk-bot/gdk-for-unity-blank-project.git",
                    "fetch origin",
                    "checkout origin/develop",
                ]
            );
        }

        #[test]
        fn logs_summary() {
            let harness = Harness::new(forge_with("gdk-for-unity"));
            let result = harness
                .orchestrator()
                .run_release(&request("gdk-for-unity"))
                .unwrap();

            assert!(harness.logger.contains(Level::Info, "Release Successful!"));
            assert!(harness
                .logger
                .contains(Level::Info, &format!("Release hash: {}", HEAD)));
            assert!(harness
                .logger
                .contains(Level::Info, &format!("Draft release: {}", result.release_url)));
        }

        #[test]
        fn uploads_attachments() {
            let harness = Harness::new(forge_with("gdk-for-unity"));
            let files = tempfile::tempdir().unwrap();
            let zip = files.path().join("package.zip");
            let txt = files.path().join("checksums.txt");
            std::fs::write(&zip, [1u8, 2, 3]).unwrap();
            std::fs::write(&txt, "abc").unwrap();

            let mut req = request("gdk-for-unity");
            req.attachments = vec![zip, txt];
            let result = harness.orchestrator().run_release(&req).unwrap();

            assert_eq!(result.assets, vec!["package.zip", "checksums.txt"]);
            assert_eq!(harness.forge.assets()[0].size, 3);
            let uploads: Vec<(String, String)> = harness
                .forge
                .operations()
                .into_iter()
                .filter_map(|op| match op {
                    MockOperation::UploadAsset {
                        file_name,
                        content_type,
                        ..
                    } => Some((file_name, content_type)),
                    _ => None,
                })
                .collect();
            assert_eq!(
                uploads,
                vec![
                    ("package.zip".to_string(), "application/zip".to_string()),
                    ("checksums.txt".to_string(), "application/octet-stream".to_string()),
                ]
            );
        }
    }

    mod metadata {
        use super::*;

        #[test]
        fn primary_project_writes_hash() {
            let harness = Harness::new(forge_with("gdk-for-unity"));
            let out = tempfile::tempdir().unwrap();
            let path = out.path().join("metadata.json");

            let result = harness
                .orchestrator()
                .with_metadata(Box::new(FileMetadataSink::new(&path)))
                .run_release(&request("gdk-for-unity"))
                .unwrap();

            assert!(result.metadata_written);
            let entries = FileMetadataSink::new(&path).read().unwrap();
            assert_eq!(entries["gdk-for-unity-hash"], HEAD);
        }

        #[test]
        fn other_projects_write_nothing() {
            let harness = Harness::new(forge_with("gdk-for-unity-fps-starter-project"));
            let out = tempfile::tempdir().unwrap();
            let path = out.path().join("metadata.json");

            let result = harness
                .orchestrator()
                .with_metadata(Box::new(FileMetadataSink::new(&path)))
                .run_release(&request("gdk-for-unity-fps-starter-project"))
                .unwrap();

            assert!(!result.metadata_written);
            assert!(!path.exists());
        }

        #[test]
        fn sink_failure_fails_run_after_release() {
            let harness = Harness::new(forge_with("gdk-for-unity"));
            let out = tempfile::tempdir().unwrap();

            let err = harness
                .orchestrator()
                .with_metadata(Box::new(FileMetadataSink::new(out.path())))
                .run_release(&request("gdk-for-unity"))
                .unwrap_err();

            assert!(matches!(err, ReleaseError::Metadata(_)));
            assert_eq!(harness.forge.releases().len(), 1);
        }
    }

    mod failures {
        use super::*;

        #[test]
        fn malformed_url_makes_no_calls() {
            let harness = Harness::new(forge_with("gdk-for-unity"));
            let mut req = request("gdk-for-unity");
            req.pull_request_url = "https://github.com/spatialos/gdk-for-unity/pull/abc".into();

            let err = harness.orchestrator().run_release(&req).unwrap_err();
            assert!(matches!(err, ReleaseError::Parse(_)));
            assert!(harness.forge.operations().is_empty());
            assert!(harness.calls.all().is_empty());
        }

        #[test]
        fn unsupported_repository_fails_before_network() {
            let harness = Harness::new(forge_with("some-other-repo"));
            let err = harness
                .orchestrator()
                .run_release(&request("some-other-repo"))
                .unwrap_err();

            assert!(matches!(err, ReleaseError::UnsupportedRepository(_)));
            assert!(err.to_string().contains("gdk-for-unity-blank-project"));
            assert!(harness.forge.operations().is_empty());
        }

        #[test]
        fn missing_attachment_fails_before_network() {
            let harness = Harness::new(forge_with("gdk-for-unity"));
            let mut req = request("gdk-for-unity");
            req.attachments = vec![PathBuf::from("/no/such/file.zip")];

            let err = harness.orchestrator().run_release(&req).unwrap_err();
            assert!(matches!(err, ReleaseError::Asset { .. }));
            assert!(harness.forge.operations().is_empty());
        }

        #[test]
        fn rejected_merge_never_clones() {
            let harness =
                Harness::new(forge_with("gdk-for-unity").reject_merges("Pull Request is not mergeable"));
            let err = harness
                .orchestrator()
                .run_release(&request("gdk-for-unity"))
                .unwrap_err();

            match err {
                ReleaseError::MergeRejected { message, .. } => {
                    assert_eq!(message, "Pull Request is not mergeable")
                }
                other => panic!("unexpected: {other}"),
            }
            assert!(harness.calls.all().is_empty());
            assert!(harness.forge.releases().is_empty());
        }

        #[test]
        fn unknown_repository_stops_before_merge() {
            let harness = Harness::new(MockForge::new());
            let err = harness
                .orchestrator()
                .run_release(&request("gdk-for-unity"))
                .unwrap_err();

            assert!(matches!(err, ReleaseError::RemoteHost { .. }));
            assert_eq!(harness.forge.operations().len(), 1);
        }

        #[test]
        fn clone_failure_names_url_and_drafts_nothing() {
            let mut harness = Harness::new(forge_with("gdk-for-unity"));
            harness.fail_clone = true;
            let err = harness
                .orchestrator()
                .run_release(&request("gdk-for-unity"))
                .unwrap_err();

            match err {
                ReleaseError::Clone { url, source } => {
                    assert_eq!(url, "https://github.com/spatialos/gdk-for-unity.git");
                    assert!(matches!(source, GitError::Command(_)));
                }
                other => panic!("unexpected: {other}"),
            }
            assert_eq!(
                harness.calls.all(),
                vec!["clone https://github.com/spatialos/gdk-for-unity.git"]
            );
            assert!(harness.forge.releases().is_empty());
        }

        #[test]
        fn missing_dev_branch_is_checkout_error() {
            let mut harness = Harness::new(forge_with("gdk-for-unity"));
            harness.known_refs = vec!["origin/master".into()];
            let err = harness
                .orchestrator()
                .run_release(&request("gdk-for-unity"))
                .unwrap_err();

            match err {
                ReleaseError::Checkout { refname, source } => {
                    assert_eq!(refname, "origin/develop");
                    assert!(matches!(source, GitError::RefNotFound { .. }));
                }
                other => panic!("unexpected: {other}"),
            }
            assert!(harness.forge.releases().is_empty());
        }

        #[test]
        fn fetch_failure_is_command_error() {
            let mut harness = Harness::new(forge_with("gdk-for-unity"));
            harness.fail_fetch = true;
            let err = harness
                .orchestrator()
                .run_release(&request("gdk-for-unity"))
                .unwrap_err();

            assert!(matches!(err, ReleaseError::Command(_)));
            assert!(harness.forge.releases().is_empty());
        }

        #[test]
        fn missing_changelog_fails_without_release() {
            let mut harness = Harness::new(forge_with("gdk-for-unity"));
            harness.changelog = None;
            let err = harness
                .orchestrator()
                .run_release(&request("gdk-for-unity"))
                .unwrap_err();

            assert!(matches!(err, ReleaseError::MissingChangelog(_)));
            assert!(err.to_string().contains("does not exist"));
            assert!(harness.forge.releases().is_empty());
        }

        #[test]
        fn release_creation_failure_is_remote_host_error() {
            let harness = Harness::new(
                forge_with("gdk-for-unity").fail_on(FailOn::CreateRelease(ForgeError::RateLimited)),
            );
            let err = harness
                .orchestrator()
                .run_release(&request("gdk-for-unity"))
                .unwrap_err();

            match err {
                ReleaseError::RemoteHost { operation, source } => {
                    assert_eq!(operation, "create draft release");
                    assert_eq!(source, ForgeError::RateLimited);
                }
                other => panic!("unexpected: {other}"),
            }
        }
    }
}
