//! Property-based tests for the URL grammars and changelog extraction.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;

use gdk_release::core::changelog::extract_release_notes;
use gdk_release::core::refs::{organization_remote_url, parse_pull_request_url, parse_remote_url};
use gdk_release::core::types::ParseError;

/// Owner and repository names: no `/` or `.`.
fn name_segment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{1,30}"
}

/// Body lines that are never headings.
fn body_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-z0-9 ]{1,20}",
        "- [a-z ]{1,20}",
        "### [A-Za-z]{1,10}",
        "##[a-z]{1,5}",
    ]
}

proptest! {
    #[test]
    fn pull_request_url_round_trips(repo in name_segment(), id in 1u64..=u64::MAX) {
        let url = format!("https://github.com/spatialos/{}/pull/{}", repo, id);
        let parsed = parse_pull_request_url(&url, "spatialos").unwrap();
        prop_assert_eq!(parsed.repository_name(), repo.as_str());
        prop_assert_eq!(parsed.id(), id);
    }

    #[test]
    fn pull_request_id_must_be_digits(repo in name_segment(), id in "[0-9]*[a-z.+-][0-9a-z]*") {
        let url = format!("https://github.com/spatialos/{}/pull/{}", repo, id);
        let err = parse_pull_request_url(&url, "spatialos").unwrap_err();
        prop_assert!(matches!(err, ParseError::InvalidPullRequestId(_)));
    }

    #[test]
    fn pull_request_of_other_organization_is_rejected(
        org in "[a-z]{3,10}",
        repo in name_segment(),
        id in 1u64..100_000,
    ) {
        prop_assume!(org != "spatialos");
        let url = format!("https://github.com/{}/{}/pull/{}", org, repo, id);
        prop_assert!(parse_pull_request_url(&url, "spatialos").is_err());
    }

    #[test]
    fn https_and_ssh_remotes_agree(owner in name_segment(), name in name_segment()) {
        let https = parse_remote_url(&format!("https://github.com/{}/{}.git", owner, name)).unwrap();
        let ssh = parse_remote_url(&format!("git@github.com:{}/{}.git", owner, name)).unwrap();
        prop_assert_eq!(https.owner(), owner.as_str());
        prop_assert_eq!(https.name(), name.as_str());
        prop_assert_eq!(https, ssh);
    }

    #[test]
    fn organization_url_is_parseable(org in name_segment(), repo in name_segment()) {
        let parsed = parse_remote_url(&organization_remote_url(&org, &repo)).unwrap();
        prop_assert_eq!(parsed.owner(), org.as_str());
        prop_assert_eq!(parsed.name(), repo.as_str());
    }

    #[test]
    fn arbitrary_text_is_never_partially_parsed(s in "[a-z:/. ]{0,40}") {
        prop_assume!(!s.contains("github.com"));
        prop_assert!(parse_remote_url(&s).is_err());
        prop_assert!(parse_pull_request_url(&s, "spatialos").is_err());
    }

    #[test]
    fn only_second_section_is_extracted(
        first in prop::collection::vec(body_line(), 0..5),
        second in prop::collection::vec(body_line(), 0..8),
        rest in prop::collection::vec(body_line(), 0..5),
    ) {
        let mut doc = vec!["# Changelog".to_string(), "## Unreleased".to_string()];
        doc.extend(first);
        doc.push("## 1.0.0".to_string());
        doc.extend(second.iter().cloned());
        doc.push("## 0.9.0".to_string());
        doc.extend(rest);

        prop_assert_eq!(extract_release_notes(&doc.join("\n")), second.join("\n"));
    }
}
