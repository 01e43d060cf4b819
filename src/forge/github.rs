//! forge::github
//!
//! GitHub forge implementation using the REST API.
//!
//! # Endpoints
//!
//! - `GET  /repos/{owner}/{repo}`
//! - `PUT  /repos/{owner}/{repo}/pulls/{number}/merge`
//! - `POST /repos/{owner}/{repo}/releases`
//! - `POST {upload_url}?name={file}` for release assets
//!
//! # Merge Refusals
//!
//! GitHub answers a merge it will not perform with `405 Method Not
//! Allowed` (not mergeable) or `409 Conflict` (head moved). Both become
//! `MergeResult { merged: false, .. }` carrying GitHub's message. Every
//! other non-2xx status is a `ForgeError`.
//!
//! # Rate Limiting
//!
//! Returns `ForgeError::RateLimited` when limits are hit; there is no
//! automatic retry.
//!
//! # Example
//!
//! ```ignore
//! use gdk_release::forge::github::GitHubForge;
//! use gdk_release::forge::{Forge, MergeMethod};
//!
//! let forge = GitHubForge::new(token);
//! let result = forge.merge_pull_request(&repo, 42, MergeMethod::Squash).await?;
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::{
    Asset, CreateReleaseRequest, Forge, ForgeError, MergeMethod, MergeResult, Release,
    Repository,
};
use crate::core::config::DEFAULT_API_BASE;
use crate::core::types::RemoteRepositoryRef;

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "gdk-release";

/// GitHub forge authenticated with a personal access token.
pub struct GitHubForge {
    /// HTTP client for making requests
    client: Client,
    token: String,
    /// API base URL (configurable for GitHub Enterprise and tests)
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubForge")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl GitHubForge {
    /// Create a forge against api.github.com.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base(token, DEFAULT_API_BASE)
    }

    /// Create a forge against a custom API base URL.
    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, ForgeError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| ForgeError::AuthFailed("token contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Build URL for a repository endpoint.
    fn repo_url(&self, repo: &RemoteRepositoryRef, path: &str) -> String {
        if path.is_empty() {
            format!("{}/repos/{}/{}", self.api_base, repo.owner(), repo.name())
        } else {
            format!(
                "{}/repos/{}/{}/{}",
                self.api_base,
                repo.owner(),
                repo.name(),
                path
            )
        }
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
    ) -> Result<T, ForgeError> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            })
        } else {
            Err(self.handle_error_response(response, status).await)
        }
    }

    /// Map an error response from the API.
    async fn handle_error_response(&self, response: Response, status: StatusCode) -> ForgeError {
        let required_permissions = response
            .headers()
            .get("X-Accepted-GitHub-Permissions")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let message = error_message(response).await;

        match status {
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN => {
                let mut err_msg = format!("Permission denied: {}", message);
                if let Some(perms) = required_permissions.filter(|p| !p.is_empty()) {
                    err_msg.push_str(&format!(" [required: {}]", perms));
                }
                ForgeError::AuthFailed(err_msg)
            }
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ if status.is_server_error() => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

async fn error_message(response: Response) -> String {
    match response.json::<GitHubErrorResponse>().await {
        Ok(err) => err.message,
        Err(_) => "Unknown error".to_string(),
    }
}

/// Strip the RFC 6570 `{?name,label}` suffix GitHub appends to upload URLs.
fn upload_endpoint(upload_url: &str) -> &str {
    match upload_url.find('{') {
        Some(index) => &upload_url[..index],
        None => upload_url,
    }
}

#[async_trait]
impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn get_repository(&self, repo: &RemoteRepositoryRef) -> Result<Repository, ForgeError> {
        let response = self
            .client
            .get(self.repo_url(repo, ""))
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let gh: GitHubRepository = self.handle_response(response).await?;
        Ok(gh.into())
    }

    async fn merge_pull_request(
        &self,
        repo: &RemoteRepositoryRef,
        number: u64,
        method: MergeMethod,
    ) -> Result<MergeResult, ForgeError> {
        let body = MergePullBody {
            merge_method: method.as_str(),
        };

        let response = self
            .client
            .put(self.repo_url(repo, &format!("pulls/{}/merge", number)))
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::METHOD_NOT_ALLOWED || status == StatusCode::CONFLICT {
            return Ok(MergeResult {
                merged: false,
                message: error_message(response).await,
                sha: None,
            });
        }

        let gh: GitHubMergeResponse = self.handle_response(response).await?;
        Ok(MergeResult {
            merged: gh.merged,
            message: gh.message,
            sha: gh.sha,
        })
    }

    async fn create_release(
        &self,
        repo: &RemoteRepositoryRef,
        request: CreateReleaseRequest,
    ) -> Result<Release, ForgeError> {
        let body = CreateReleaseBody {
            tag_name: &request.tag,
            target_commitish: &request.target_commitish,
            name: &request.name,
            body: &request.body,
            draft: request.draft,
            prerelease: false,
        };

        let response = self
            .client
            .post(self.repo_url(repo, "releases"))
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let gh: GitHubRelease = self.handle_response(response).await?;
        Ok(gh.into())
    }

    async fn upload_asset(
        &self,
        release: &Release,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<Asset, ForgeError> {
        let content_type = HeaderValue::from_str(content_type).map_err(|_| {
            ForgeError::ApiError {
                status: 0,
                message: format!("invalid content type '{}'", content_type),
            }
        })?;

        let response = self
            .client
            .post(upload_endpoint(&release.upload_url))
            .headers(self.headers()?)
            .header(CONTENT_TYPE, content_type)
            .query(&[("name", file_name)])
            .body(data)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let gh: GitHubAsset = self.handle_response(response).await?;
        Ok(gh.into())
    }
}

// =============================================================================
// GitHub API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct MergePullBody<'a> {
    merge_method: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateReleaseBody<'a> {
    tag_name: &'a str,
    target_commitish: &'a str,
    name: &'a str,
    body: &'a str,
    draft: bool,
    prerelease: bool,
}

#[derive(Debug, Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GitHubOwner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GitHubRepository {
    name: String,
    full_name: String,
    html_url: String,
    default_branch: String,
    owner: GitHubOwner,
}

impl From<GitHubRepository> for Repository {
    fn from(gh: GitHubRepository) -> Self {
        Repository {
            owner: gh.owner.login,
            name: gh.name,
            full_name: gh.full_name,
            html_url: gh.html_url,
            default_branch: gh.default_branch,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitHubMergeResponse {
    sha: Option<String>,
    merged: bool,
    message: String,
}

#[derive(Debug, Deserialize)]
struct GitHubRelease {
    id: u64,
    tag_name: String,
    name: Option<String>,
    draft: bool,
    html_url: String,
    upload_url: String,
}

impl From<GitHubRelease> for Release {
    fn from(gh: GitHubRelease) -> Self {
        Release {
            id: gh.id,
            tag: gh.tag_name,
            name: gh.name.unwrap_or_default(),
            draft: gh.draft,
            html_url: gh.html_url,
            upload_url: gh.upload_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitHubAsset {
    id: u64,
    name: String,
    content_type: String,
    size: u64,
    browser_download_url: String,
}

impl From<GitHubAsset> for Asset {
    fn from(gh: GitHubAsset) -> Self {
        Asset {
            id: gh.id,
            name: gh.name,
            content_type: gh.content_type,
            size: gh.size,
            download_url: gh.browser_download_url,
        }
    }
}
