//! GitHub destination writer.
//!
//! The orchestrator talks to the destination through the [`IssueSink`]
//! trait; [`GithubWriter`] is the octocrab-backed implementation. Every
//! write checks the core rate limit first and sleeps through a near-empty
//! budget rather than failing mid-issue.

mod error;

pub use error::WriterError;

use crate::config::RepoPath;
use crate::mapper::{IssueRequest, LabelRequest};
use crate::rate_limit::ensure_core_rate_limit;
use async_trait::async_trait;
use octocrab::models::IssueState;
use octocrab::Octocrab;
use std::collections::HashSet;
use tracing::{debug, info};

/// A successfully created destination issue.
#[derive(Debug, Clone)]
pub struct CreatedIssue {
    /// Destination issue number.
    pub number: u64,

    /// Destination issue URL.
    pub url: String,
}

/// Write operations the migration needs from the destination repository.
#[async_trait]
pub trait IssueSink {
    /// Returns the names of labels already defined on the repository.
    async fn existing_labels(&self) -> Result<HashSet<String>, WriterError>;

    /// Creates one label definition.
    async fn create_label(&self, label: &LabelRequest) -> Result<(), WriterError>;

    /// Creates one issue (always open) and returns its number and URL.
    async fn create_issue(&self, request: &IssueRequest) -> Result<CreatedIssue, WriterError>;

    /// Creates one comment on an existing issue.
    async fn create_comment(&self, issue_number: u64, body: &str) -> Result<(), WriterError>;

    /// Closes an existing issue.
    async fn close_issue(&self, issue_number: u64) -> Result<(), WriterError>;
}

/// Octocrab-backed [`IssueSink`] for a single GitHub repository.
pub struct GithubWriter {
    octocrab: Octocrab,
    owner: String,
    repo: String,
}

impl GithubWriter {
    /// Builds a writer authenticated with a personal access token.
    ///
    /// # Errors
    ///
    /// Returns [`WriterError`] if the client cannot be constructed.
    pub fn new(token: &str, repo: &RepoPath) -> Result<Self, WriterError> {
        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .build()?;
        Ok(Self {
            octocrab,
            owner: repo.owner().to_string(),
            repo: repo.name().to_string(),
        })
    }
}

#[async_trait]
impl IssueSink for GithubWriter {
    async fn existing_labels(&self) -> Result<HashSet<String>, WriterError> {
        debug!(owner = %self.owner, repo = %self.repo, "Listing existing labels");

        let mut names = HashSet::new();
        let mut page = self
            .octocrab
            .issues(&self.owner, &self.repo)
            .list_labels_for_repo()
            .per_page(100)
            .send()
            .await?;

        names.extend(page.items.iter().map(|label| label.name.clone()));

        while let Some(next_page) = self
            .octocrab
            .get_page::<octocrab::models::Label>(&page.next)
            .await?
        {
            names.extend(next_page.items.iter().map(|label| label.name.clone()));
            page.next = next_page.next;
            if page.next.is_none() {
                break;
            }
        }

        Ok(names)
    }

    async fn create_label(&self, label: &LabelRequest) -> Result<(), WriterError> {
        info!(name = %label.name, "Creating label");
        ensure_core_rate_limit(&self.octocrab).await?;
        self.octocrab
            .issues(&self.owner, &self.repo)
            .create_label(&label.name, &label.color, &label.description)
            .await?;
        Ok(())
    }

    async fn create_issue(&self, request: &IssueRequest) -> Result<CreatedIssue, WriterError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let issue = self
            .octocrab
            .issues(&self.owner, &self.repo)
            .create(&request.title)
            .body(&request.body)
            .labels(request.labels.clone())
            .send()
            .await?;

        Ok(CreatedIssue {
            number: issue.number,
            url: issue.html_url.to_string(),
        })
    }

    async fn create_comment(&self, issue_number: u64, body: &str) -> Result<(), WriterError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        self.octocrab
            .issues(&self.owner, &self.repo)
            .create_comment(issue_number, body)
            .await?;
        Ok(())
    }

    async fn close_issue(&self, issue_number: u64) -> Result<(), WriterError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        self.octocrab
            .issues(&self.owner, &self.repo)
            .update(issue_number)
            .state(IssueState::Closed)
            .send()
            .await?;
        Ok(())
    }
}
