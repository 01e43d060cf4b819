//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! The mock forge keeps repositories and releases in memory, records every
//! call, and can be told to fail a chosen operation or to refuse merges.
//!
//! # Example
//!
//! ```
//! use gdk_release::core::types::RemoteRepositoryRef;
//! use gdk_release::forge::mock::{MockForge, MockOperation};
//! use gdk_release::forge::{Forge, MergeMethod};
//!
//! let repo = RemoteRepositoryRef::new("spatialos", "gdk-for-unity").unwrap();
//! let forge = MockForge::new().with_repository(&repo);
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let result = rt
//!     .block_on(forge.merge_pull_request(&repo, 7, MergeMethod::Squash))
//!     .unwrap();
//!
//! assert!(result.merged);
//! assert!(matches!(forge.operations()[0], MockOperation::MergePullRequest { number: 7, .. }));
//! ```

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{
    Asset, CreateReleaseRequest, Forge, ForgeError, MergeMethod, MergeResult, Release,
    Repository,
};
use crate::core::types::RemoteRepositoryRef;

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockForge {
    inner: Arc<Mutex<MockForgeInner>>,
}

#[derive(Debug, Default)]
struct MockForgeInner {
    repositories: Vec<Repository>,
    releases: Vec<(String, CreateReleaseRequest, Release)>,
    assets: Vec<Asset>,
    next_id: u64,
    reject_merges: Option<String>,
    fail_on: Option<FailOn>,
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    GetRepository(ForgeError),
    MergePullRequest(ForgeError),
    CreateRelease(ForgeError),
    UploadAsset(ForgeError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    GetRepository {
        repository: String,
    },
    MergePullRequest {
        repository: String,
        number: u64,
        method: MergeMethod,
    },
    CreateRelease {
        repository: String,
        tag: String,
        target_commitish: String,
        name: String,
        body: String,
        draft: bool,
    },
    UploadAsset {
        release_id: u64,
        file_name: String,
        content_type: String,
        size: usize,
    },
}

impl MockForge {
    /// Create a new empty mock forge.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockForgeInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make `repo` resolvable.
    pub fn with_repository(self, repo: &RemoteRepositoryRef) -> Self {
        self.lock().repositories.push(Repository {
            owner: repo.owner().to_string(),
            name: repo.name().to_string(),
            full_name: repo.to_string(),
            html_url: format!("https://github.com/{}", repo),
            default_branch: "master".to_string(),
        });
        self
    }

    /// Answer every merge with `merged: false` and `message`.
    pub fn reject_merges(self, message: impl Into<String>) -> Self {
        self.lock().reject_merges = Some(message.into());
        self
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use gdk_release::forge::mock::{FailOn, MockForge};
    /// use gdk_release::forge::ForgeError;
    ///
    /// let forge = MockForge::new()
    ///     .fail_on(FailOn::CreateRelease(ForgeError::RateLimited));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.lock().fail_on = Some(fail_on);
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        self.lock().fail_on = None;
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.lock().operations.clone()
    }

    /// Clear recorded operations.
    pub fn clear_operations(&self) {
        self.lock().operations.clear();
    }

    /// Releases created so far.
    pub fn releases(&self) -> Vec<Release> {
        self.lock()
            .releases
            .iter()
            .map(|(_, _, release)| release.clone())
            .collect()
    }

    /// Assets uploaded so far.
    pub fn assets(&self) -> Vec<Asset> {
        self.lock().assets.clone()
    }

    fn check_fail(&self, inner: &MockForgeInner, op: &str) -> Result<(), ForgeError> {
        let failure = match (&inner.fail_on, op) {
            (Some(FailOn::GetRepository(e)), "get_repository") => Some(e),
            (Some(FailOn::MergePullRequest(e)), "merge_pull_request") => Some(e),
            (Some(FailOn::CreateRelease(e)), "create_release") => Some(e),
            (Some(FailOn::UploadAsset(e)), "upload_asset") => Some(e),
            _ => None,
        };
        match failure {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn next_id(inner: &mut MockForgeInner) -> u64 {
        inner.next_id += 1;
        inner.next_id
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn get_repository(&self, repo: &RemoteRepositoryRef) -> Result<Repository, ForgeError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::GetRepository {
            repository: repo.to_string(),
        });
        self.check_fail(&inner, "get_repository")?;

        inner
            .repositories
            .iter()
            .find(|r| r.owner == repo.owner() && r.name == repo.name())
            .cloned()
            .ok_or_else(|| ForgeError::NotFound(format!("repository {}", repo)))
    }

    async fn merge_pull_request(
        &self,
        repo: &RemoteRepositoryRef,
        number: u64,
        method: MergeMethod,
    ) -> Result<MergeResult, ForgeError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::MergePullRequest {
            repository: repo.to_string(),
            number,
            method,
        });
        self.check_fail(&inner, "merge_pull_request")?;

        if let Some(message) = &inner.reject_merges {
            return Ok(MergeResult {
                merged: false,
                message: message.clone(),
                sha: None,
            });
        }

        Ok(MergeResult {
            merged: true,
            message: "Pull Request successfully merged".to_string(),
            sha: Some(format!("{:040x}", number)),
        })
    }

    async fn create_release(
        &self,
        repo: &RemoteRepositoryRef,
        request: CreateReleaseRequest,
    ) -> Result<Release, ForgeError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::CreateRelease {
            repository: repo.to_string(),
            tag: request.tag.clone(),
            target_commitish: request.target_commitish.clone(),
            name: request.name.clone(),
            body: request.body.clone(),
            draft: request.draft,
        });
        self.check_fail(&inner, "create_release")?;

        let id = Self::next_id(&mut inner);
        let release = Release {
            id,
            tag: request.tag.clone(),
            name: request.name.clone(),
            draft: request.draft,
            html_url: format!("https://github.com/{}/releases/tag/{}", repo, request.tag),
            upload_url: format!(
                "https://uploads.github.com/repos/{}/releases/{}/assets{{?name,label}}",
                repo, id
            ),
        };
        inner
            .releases
            .push((repo.to_string(), request, release.clone()));
        Ok(release)
    }

    async fn upload_asset(
        &self,
        release: &Release,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<Asset, ForgeError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::UploadAsset {
            release_id: release.id,
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            size: data.len(),
        });
        self.check_fail(&inner, "upload_asset")?;

        if !inner.releases.iter().any(|(_, _, r)| r.id == release.id) {
            return Err(ForgeError::NotFound(format!("release {}", release.id)));
        }

        let id = Self::next_id(&mut inner);
        let asset = Asset {
            id,
            name: file_name.to_string(),
            content_type: content_type.to_string(),
            size: data.len() as u64,
            download_url: format!(
                "https://github.com/releases/download/{}/{}",
                release.tag, file_name
            ),
        };
        inner.assets.push(asset.clone());
        Ok(asset)
    }
}
