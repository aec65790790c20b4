//! Markdown rewriting for migrated text.
//!
//! GitLab issue bodies use relative `/uploads/` attachment paths, `#N` issue
//! references, and bare `@user` mentions. None of those resolve on GitHub,
//! so they are rewritten to absolute GitLab URLs before migration.

use crate::gitlab::User;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

static UPLOADS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(/uploads/[^\s\)]+)").expect("valid regex"));

static ISSUE_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([1-9][0-9]*)").expect("valid regex"));

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_][A-Za-z0-9_.-]*)").expect("valid regex"));

/// Prefixes relative `/uploads/...` attachment paths with the project URL.
#[must_use]
pub fn rewrite_upload_links(text: &str, project_url: &str) -> String {
    UPLOADS_RE
        .replace_all(text, |caps: &Captures| {
            format!("{project_url}{}", &caps[1])
        })
        .into_owned()
}

/// Rewrites `#N` issue references to absolute GitLab issue URLs.
///
/// Issue numbering differs between the two systems, so a bare `#N` on GitHub
/// would point at an unrelated issue.
#[must_use]
pub fn rewrite_issue_references(text: &str, project_url: &str) -> String {
    ISSUE_REF_RE
        .replace_all(text, |caps: &Captures| {
            format!("{project_url}/-/issues/{}", &caps[1])
        })
        .into_owned()
}

/// Rewrites `@user` mentions of issue participants to GitLab profile links.
///
/// A bare `@user` on GitHub would ping whoever happens to own that name
/// there. Mentions of non-participants are left untouched. Single-pass
/// replacement, so rewritten text is never matched again.
#[must_use]
pub fn rewrite_mentions(text: &str, participants: &[User]) -> String {
    let by_name: HashMap<&str, &User> = participants
        .iter()
        .map(|user| (user.username.as_str(), user))
        .collect();

    MENTION_RE
        .replace_all(text, |caps: &Captures| match by_name.get(&caps[1]) {
            Some(user) => format!("[@{}]({})", user.username, user.web_url),
            None => caps[0].to_string(),
        })
        .into_owned()
}
