//! Pure field mapping from source records to destination requests.
//!
//! Nothing in this module performs I/O. Mapping the same inputs twice yields
//! identical requests, which the orchestrator relies on for dry-run previews.

mod links;

pub use links::{rewrite_issue_references, rewrite_mentions, rewrite_upload_links};

use crate::gitlab::{Issue, IssueState, Label, Note, Project, SourceIssue, User};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Marker label applied to every migrated issue.
pub const MARKER_LABEL: &str = "gitlab";

/// GitLab brand color, used for the marker label.
const MARKER_LABEL_COLOR: &str = "FC6D27";

const MARKER_LABEL_DESCRIPTION: &str = "For issues migrated from GitLab";

/// GitHub rejects label descriptions longer than 100 characters.
const MAX_LABEL_DESCRIPTION_CHARS: usize = 100;

/// A destination issue ready to be created, with its queued comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRequest {
    /// Title, copied verbatim from the source.
    pub title: String,

    /// Rewritten body with provenance footer.
    pub body: String,

    /// Lowercased source labels plus the marker label.
    pub labels: Vec<String>,

    /// Whether to close the issue right after creation. GitHub can only
    /// create issues in the open state.
    pub close_after_create: bool,

    /// Comments to create after the issue, in source order.
    pub comments: Vec<CommentRequest>,
}

/// A destination comment queued for creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRequest {
    /// Source note id, kept for error reporting.
    pub note_id: u64,

    /// Rewritten body with provenance footer.
    pub body: String,
}

/// A destination label to create before any issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRequest {
    /// Lowercased label name.
    pub name: String,

    /// Hex color without the leading `#`.
    pub color: String,

    /// Description, truncated to GitHub's limit.
    pub description: String,
}

/// Maps a source issue to a destination request.
///
/// System and internal notes are dropped; everything else is rewritten and
/// queued in source order.
#[must_use]
pub fn map_issue(source: &SourceIssue, project: &Project) -> IssueRequest {
    let issue = &source.issue;

    let description = issue.description.as_deref().unwrap_or_default();
    let body = rewrite_text(description, project, &source.participants);
    let body = with_issue_footer(&body, issue);

    let mut labels: Vec<String> = issue
        .labels
        .iter()
        .map(|label| label.to_lowercase())
        .collect();
    labels.push(MARKER_LABEL.to_string());

    let comments = source
        .notes
        .iter()
        .filter(|note| !note.system && !note.internal)
        .map(|note| CommentRequest {
            note_id: note.id,
            body: map_comment_body(note, issue, project, &source.participants),
        })
        .collect();

    IssueRequest {
        title: issue.title.clone(),
        body,
        labels,
        close_after_create: issue.state == IssueState::Closed,
        comments,
    }
}

/// Maps source labels to the label-create requests the destination is
/// missing.
///
/// Names are compared case-insensitively against `existing`. The marker
/// label is appended when absent on both sides.
#[must_use]
pub fn map_labels(source: &[Label], existing: &HashSet<String>) -> Vec<LabelRequest> {
    let existing: HashSet<String> = existing.iter().map(|name| name.to_lowercase()).collect();
    let mut requests: Vec<LabelRequest> = Vec::new();

    for label in source {
        let name = label.name.to_lowercase();
        if existing.contains(&name) || requests.iter().any(|request| request.name == name) {
            continue;
        }
        requests.push(LabelRequest {
            name,
            color: label.color.trim_start_matches('#').to_string(),
            description: truncate_chars(
                label.description.as_deref().unwrap_or_default(),
                MAX_LABEL_DESCRIPTION_CHARS,
            ),
        });
    }

    if !existing.contains(MARKER_LABEL)
        && !requests.iter().any(|request| request.name == MARKER_LABEL)
    {
        requests.push(LabelRequest {
            name: MARKER_LABEL.to_string(),
            color: MARKER_LABEL_COLOR.to_string(),
            description: MARKER_LABEL_DESCRIPTION.to_string(),
        });
    }

    requests
}

/// Runs the full text rewriting pipeline over one body.
fn rewrite_text(text: &str, project: &Project, participants: &[User]) -> String {
    let text = rewrite_upload_links(text, &project.web_url);
    let text = rewrite_issue_references(&text, &project.web_url);
    rewrite_mentions(&text, participants)
}

/// Appends the provenance footer to an issue body.
///
/// The destination cannot backdate authorship, so original author and
/// timestamp travel in the body itself. An empty description becomes just
/// the footer.
fn with_issue_footer(body: &str, issue: &Issue) -> String {
    let footer = format!(
        "<sub>Migrated from GitLab: originally opened by `{}` on {}. Original issue: {}</sub>\n",
        issue.author.username,
        format_timestamp(&issue.created_at),
        issue.web_url
    );
    if body.trim().is_empty() {
        footer
    } else {
        format!("{body}\n\n---\n{footer}")
    }
}

/// Rewrites one note body and appends its provenance footer.
fn map_comment_body(note: &Note, issue: &Issue, project: &Project, participants: &[User]) -> String {
    let body = rewrite_text(&note.body, project, participants);
    format!(
        "{body}\n\n---\n<sub>Migrated from GitLab: originally posted by `{}` on {}. Original comment: {}#note_{}</sub>\n",
        note.author.username,
        format_timestamp(&note.created_at),
        issue.web_url,
        note.id
    )
}

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn project() -> Project {
        Project {
            id: 1,
            path_with_namespace: "acme/widgets".to_string(),
            web_url: "https://gitlab.com/acme/widgets".to_string(),
        }
    }

    fn user(name: &str) -> User {
        User {
            username: name.to_string(),
            web_url: format!("https://gitlab.com/{name}"),
        }
    }

    fn issue(iid: u64, state: IssueState) -> Issue {
        Issue {
            iid,
            title: format!("Issue {iid}"),
            description: Some("Something is broken".to_string()),
            state,
            labels: vec!["Bug".to_string(), "P1".to_string()],
            author: user("alice"),
            created_at: Utc.with_ymd_and_hms(2021, 3, 1, 10, 15, 0).unwrap(),
            confidential: false,
            web_url: format!("https://gitlab.com/acme/widgets/-/issues/{iid}"),
        }
    }

    fn note(id: u64, body: &str, system: bool, internal: bool) -> Note {
        Note {
            id,
            body: body.to_string(),
            author: user("bob"),
            created_at: Utc.with_ymd_and_hms(2021, 3, 2, 8, 0, 0).unwrap(),
            system,
            internal,
        }
    }

    fn source(state: IssueState, notes: Vec<Note>) -> SourceIssue {
        SourceIssue {
            issue: issue(7, state),
            notes,
            participants: vec![user("alice"), user("bob")],
        }
    }

    #[test]
    fn mapping_is_deterministic() {
        let source = source(IssueState::Opened, vec![note(1, "fix pending", false, false)]);
        let first = map_issue(&source, &project());
        let second = map_issue(&source, &project());
        assert_eq!(first, second);
    }

    #[test]
    fn title_is_copied_verbatim() {
        let request = map_issue(&source(IssueState::Opened, vec![]), &project());
        assert_eq!(request.title, "Issue 7");
    }

    #[test]
    fn body_carries_provenance_footer() {
        let request = map_issue(&source(IssueState::Opened, vec![]), &project());
        assert!(request.body.starts_with("Something is broken"));
        assert!(request.body.contains("originally opened by `alice`"));
        assert!(request.body.contains("2021-03-01 10:15 UTC"));
        assert!(request
            .body
            .contains("https://gitlab.com/acme/widgets/-/issues/7"));
    }

    #[test]
    fn empty_description_maps_to_footer_only() {
        let mut source = source(IssueState::Opened, vec![]);
        source.issue.description = None;
        let request = map_issue(&source, &project());
        assert!(request.body.starts_with("<sub>Migrated from GitLab"));
        assert!(!request.body.contains("---"));
    }

    #[test]
    fn closed_issue_requests_close_after_create() {
        assert!(map_issue(&source(IssueState::Closed, vec![]), &project()).close_after_create);
        assert!(!map_issue(&source(IssueState::Opened, vec![]), &project()).close_after_create);
    }

    #[test]
    fn labels_are_lowercased_and_marked() {
        let request = map_issue(&source(IssueState::Opened, vec![]), &project());
        assert_eq!(request.labels, vec!["bug", "p1", "gitlab"]);
    }

    #[test]
    fn system_and_internal_notes_are_dropped() {
        let source = source(
            IssueState::Opened,
            vec![
                note(1, "changed the description", true, false),
                note(2, "internal remark", false, true),
                note(3, "fix pending", false, false),
            ],
        );
        let request = map_issue(&source, &project());
        assert_eq!(request.comments.len(), 1);
        assert_eq!(request.comments[0].note_id, 3);
        assert!(request.comments[0].body.starts_with("fix pending"));
        assert!(request.comments[0].body.contains("originally posted by `bob`"));
        assert!(request.comments[0].body.contains("#note_3"));
    }

    #[test]
    fn comment_body_rewrites_references_and_mentions() {
        let source = source(
            IssueState::Opened,
            vec![note(1, "see #3, thanks @bob", false, false)],
        );
        let request = map_issue(&source, &project());
        let body = &request.comments[0].body;
        assert!(body.contains("https://gitlab.com/acme/widgets/-/issues/3"));
        assert!(body.contains("[@bob](https://gitlab.com/bob)"));
    }

    #[test]
    fn map_labels_skips_existing_and_adds_marker() {
        let source_labels = vec![
            Label {
                name: "Bug".to_string(),
                color: "#FF0000".to_string(),
                description: Some("broken things".to_string()),
            },
            Label {
                name: "docs".to_string(),
                color: "#00FF00".to_string(),
                description: None,
            },
        ];
        let existing: HashSet<String> = ["bug".to_string()].into_iter().collect();

        let requests = map_labels(&source_labels, &existing);

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].name, "docs");
        assert_eq!(requests[0].color, "00FF00");
        assert_eq!(requests[1].name, MARKER_LABEL);
        assert_eq!(requests[1].color, MARKER_LABEL_COLOR);
    }

    #[test]
    fn map_labels_truncates_long_descriptions() {
        let long = "x".repeat(250);
        let source_labels = vec![Label {
            name: "wordy".to_string(),
            color: "#112233".to_string(),
            description: Some(long),
        }];

        let requests = map_labels(&source_labels, &HashSet::new());
        assert_eq!(requests[0].description.chars().count(), 100);
    }

    #[test]
    fn map_labels_does_not_duplicate_marker() {
        let existing: HashSet<String> = ["GitLab".to_string()].into_iter().collect();
        let requests = map_labels(&[], &existing);
        assert!(requests.is_empty());
    }
}
