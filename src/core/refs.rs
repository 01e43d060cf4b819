//! core::refs
//!
//! The two URL grammars the release workflow understands.
//!
//! - Pull request URLs: `https://github.com/<org>/<repo>/pull/<id>`
//! - Remote URLs: `https://github.com/<owner>/<name>.git` or
//!   `git@github.com:<owner>/<name>.git`
//!
//! Both are pure functions returning a fully populated value or a
//! [`ParseError`]; there is no partial success.

use std::sync::OnceLock;

use regex::Regex;

use super::types::{ChangeRequestRef, ParseError, RemoteRepositoryRef};

/// Owner and name may not contain `/` or `.`; the `.git` suffix is required.
const REMOTE_URL_PATTERN: &str =
    r"(?:https://github\.com/|git@github\.com:)([^/.]+)/([^/.]+)\.git";

fn remote_url_regex() -> Result<&'static Regex, ParseError> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX
        .get_or_init(|| Regex::new(REMOTE_URL_PATTERN).ok())
        .as_ref()
        .ok_or_else(|| ParseError::UnrecognizedRemote(REMOTE_URL_PATTERN.to_string()))
}

/// Parse a GitHub remote URL into owner and repository name.
///
/// # Example
///
/// ```
/// use gdk_release::core::refs::parse_remote_url;
///
/// let r = parse_remote_url("git@github.com:spatialos/gdk-for-unity.git").unwrap();
/// assert_eq!(r.owner(), "spatialos");
/// assert_eq!(r.name(), "gdk-for-unity");
///
/// assert!(parse_remote_url("https://github.com/spatialos/gdk-for-unity").is_err());
/// ```
pub fn parse_remote_url(url: &str) -> Result<RemoteRepositoryRef, ParseError> {
    let captures = remote_url_regex()?
        .captures(url)
        .ok_or_else(|| ParseError::UnrecognizedRemote(url.to_string()))?;

    match (captures.get(1), captures.get(2)) {
        (Some(owner), Some(name)) => RemoteRepositoryRef::new(owner.as_str(), name.as_str())
            .map_err(|_| ParseError::UnrecognizedRemote(url.to_string())),
        _ => Err(ParseError::UnrecognizedRemote(url.to_string())),
    }
}

/// Parse a pull request URL belonging to `organization`.
///
/// The id must be a positive decimal integer; anything else is
/// [`ParseError::InvalidPullRequestId`].
///
/// # Example
///
/// ```
/// use gdk_release::core::refs::parse_pull_request_url;
///
/// let pr = parse_pull_request_url(
///     "https://github.com/spatialos/gdk-for-unity/pull/1234",
///     "spatialos",
/// ).unwrap();
/// assert_eq!(pr.repository_name(), "gdk-for-unity");
/// assert_eq!(pr.id(), 1234);
/// ```
pub fn parse_pull_request_url(
    url: &str,
    organization: &str,
) -> Result<ChangeRequestRef, ParseError> {
    let pattern = format!(
        r"github\.com/{}/([^/]+)/pull/([^/?#]*)",
        regex::escape(organization)
    );
    let regex =
        Regex::new(&pattern).map_err(|_| ParseError::MalformedPullRequestUrl(url.to_string()))?;

    let captures = regex
        .captures(url)
        .ok_or_else(|| ParseError::MalformedPullRequestUrl(url.to_string()))?;

    let (repository, id) = match (captures.get(1), captures.get(2)) {
        (Some(repository), Some(id)) => (repository.as_str(), id.as_str()),
        _ => return Err(ParseError::MalformedPullRequestUrl(url.to_string())),
    };

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseError::InvalidPullRequestId(id.to_string()));
    }
    let id: u64 = id
        .parse()
        .map_err(|_| ParseError::InvalidPullRequestId(id.to_string()))?;

    ChangeRequestRef::new(repository, id)
}

/// Canonical remote URL for a repository of the organization.
pub fn organization_remote_url(organization: &str, repository: &str) -> String {
    format!("https://github.com/{}/{}.git", organization, repository)
}
