//! GitLab v4 API response models.
//!
//! Only the fields the migration needs are deserialized; everything else in
//! the API payloads is ignored.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A GitLab project.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    /// Numeric project id.
    pub id: u64,

    /// Full path, e.g. `group/project`.
    pub path_with_namespace: String,

    /// Web URL of the project, used to absolutize relative links.
    pub web_url: String,
}

/// A GitLab user as embedded in issues, notes, and participant lists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    /// Login name, without the `@`.
    pub username: String,

    /// Profile URL.
    pub web_url: String,
}

/// Open/closed state of a source issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// The issue is open.
    Opened,
    /// The issue has been closed.
    Closed,
}

impl IssueState {
    /// Returns a short display name for the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opened => "open",
            Self::Closed => "closed",
        }
    }
}

/// A source issue.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    /// Project-scoped issue number.
    pub iid: u64,

    /// Issue title.
    pub title: String,

    /// Issue body; GitLab returns `null` for empty descriptions.
    #[serde(default)]
    pub description: Option<String>,

    /// Open/closed state.
    pub state: IssueState,

    /// Label names attached to the issue.
    #[serde(default)]
    pub labels: Vec<String>,

    /// Issue author.
    pub author: User,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Confidential issues are not migrated.
    #[serde(default)]
    pub confidential: bool,

    /// Web URL of the issue, used in the provenance footer.
    pub web_url: String,
}

/// A comment (note) on a source issue.
#[derive(Debug, Clone, Deserialize)]
pub struct Note {
    /// Note id, unique within the GitLab instance.
    pub id: u64,

    /// Comment body.
    pub body: String,

    /// Comment author.
    pub author: User,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// System notes ("changed the description", ...) are not migrated.
    #[serde(default)]
    pub system: bool,

    /// Internal (confidential) notes are not migrated.
    #[serde(default)]
    pub internal: bool,
}

/// A label defined on the source project.
#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    /// Label name.
    pub name: String,

    /// Hex color with leading `#`.
    pub color: String,

    /// Optional label description.
    #[serde(default)]
    pub description: Option<String>,
}
