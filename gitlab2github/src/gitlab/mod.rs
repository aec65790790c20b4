//! GitLab source reader.
//!
//! A thin client over the GitLab v4 REST API that reads everything the
//! migration needs: the project itself, its issues (paginated, sorted by
//! iid), and per-issue notes and participants.

mod error;
mod models;

pub use error::GitlabError;
pub use models::{Issue, IssueState, Label, Note, Project, User};

use crate::config::RepoPath;
use serde::de::DeserializeOwned;
use tracing::debug;

/// GitLab authenticates with a private token header rather than bearer auth.
const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Default page size for list endpoints (GitLab maximum).
const DEFAULT_PAGE_SIZE: usize = 100;

/// A source issue together with the related records needed to migrate it.
#[derive(Debug, Clone)]
pub struct SourceIssue {
    /// The issue itself.
    pub issue: Issue,

    /// Notes in creation order. Empty if the note fetch failed.
    pub notes: Vec<Note>,

    /// Participants, used for mention rewriting. Empty if the fetch failed.
    pub participants: Vec<User>,
}

/// Client for reading issues from a single GitLab project.
pub struct GitlabClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    /// URL-encoded `namespace/name` path.
    project_path: String,
    page_size: usize,
}

impl GitlabClient {
    /// Creates a client for the given GitLab instance and project.
    #[must_use]
    pub fn new(base_url: &str, token: &str, repo: &RepoPath) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            project_path: urlencoding::encode(repo.full_name()).into_owned(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Overrides the list-endpoint page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Fetches the project record.
    ///
    /// This is the first call of a run and doubles as the authentication
    /// check: a rejected token surfaces here as [`GitlabError::Auth`].
    ///
    /// # Errors
    ///
    /// Returns [`GitlabError`] on authentication or API failure.
    pub async fn project(&self) -> Result<Project, GitlabError> {
        let url = self.project_url("");
        let response = self.get(&url, &[]).await?;
        Ok(response.json().await?)
    }

    /// Fetches all issues of the project, sorted ascending by iid.
    ///
    /// # Errors
    ///
    /// Returns [`GitlabError`] if any page fails to fetch.
    pub async fn list_issues(&self) -> Result<Vec<Issue>, GitlabError> {
        let url = self.project_url("/issues");
        let mut issues: Vec<Issue> = self
            .paginated(&url, &[("order_by", "created_at"), ("sort", "asc")])
            .await?;
        issues.sort_by_key(|issue| issue.iid);
        Ok(issues)
    }

    /// Fetches all notes of one issue, sorted by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`GitlabError`] if any page fails to fetch.
    pub async fn list_notes(&self, iid: u64) -> Result<Vec<Note>, GitlabError> {
        let url = self.project_url(&format!("/issues/{iid}/notes"));
        let mut notes: Vec<Note> = self
            .paginated(&url, &[("order_by", "created_at"), ("sort", "asc")])
            .await?;
        notes.sort_by_key(|note| (note.created_at, note.id));
        Ok(notes)
    }

    /// Fetches the participants of one issue.
    ///
    /// # Errors
    ///
    /// Returns [`GitlabError`] if any page fails to fetch.
    pub async fn participants(&self, iid: u64) -> Result<Vec<User>, GitlabError> {
        let url = self.project_url(&format!("/issues/{iid}/participants"));
        self.paginated(&url, &[]).await
    }

    /// Fetches all labels defined on the project.
    ///
    /// # Errors
    ///
    /// Returns [`GitlabError`] if any page fails to fetch.
    pub async fn list_labels(&self) -> Result<Vec<Label>, GitlabError> {
        let url = self.project_url("/labels");
        self.paginated(&url, &[]).await
    }

    /// Builds a project-scoped API URL.
    fn project_url(&self, suffix: &str) -> String {
        format!(
            "{}/api/v4/projects/{}{}",
            self.base_url, self.project_path, suffix
        )
    }

    /// Follows pagination until a short page is returned.
    async fn paginated<T: DeserializeOwned>(
        &self,
        url: &str,
        extra: &[(&str, &str)],
    ) -> Result<Vec<T>, GitlabError> {
        let mut all = Vec::new();
        let mut page = 1usize;

        loop {
            let mut query: Vec<(String, String)> = vec![
                ("page".to_string(), page.to_string()),
                ("per_page".to_string(), self.page_size.to_string()),
            ];
            query.extend(
                extra
                    .iter()
                    .map(|(key, value)| ((*key).to_string(), (*value).to_string())),
            );

            debug!(url, page, "Fetching page");
            let batch: Vec<T> = self.get(url, &query).await?.json().await?;
            let batch_len = batch.len();
            all.extend(batch);

            if batch_len < self.page_size {
                return Ok(all);
            }
            page += 1;
        }
    }

    /// Performs an authenticated GET and maps non-success statuses to errors.
    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<reqwest::Response, GitlabError> {
        let response = self
            .http
            .get(url)
            .header(PRIVATE_TOKEN_HEADER, &self.token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GitlabError::Auth);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GitlabError::Api {
                status: status.as_u16(),
                message: extract_message(&body),
            });
        }
        Ok(response)
    }
}

/// Pulls the `message` (or `error`) field out of a GitLab error body.
///
/// Falls back to the raw body when it is not the usual JSON shape.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("error"))
                .map(|message| match message.as_str() {
                    Some(text) => text.to_string(),
                    None => message.to_string(),
                })
        })
        .unwrap_or_else(|| body.trim().to_string())
}
