//! Orchestrates the end-to-end migration.
//!
//! One issue is fully migrated, comments and close call included, before the
//! next begins. The only state shared across issues is the summary being
//! accumulated and the destination label set created up front.

use crate::config::RepoPath;
use crate::gitlab::{GitlabClient, GitlabError, Issue, Project, SourceIssue};
use crate::github::{GithubWriter, IssueSink, WriterError};
use crate::mapper::{map_issue, map_labels};
use crate::summary::{MigrationResult, RunSummary};
use std::time::Duration;
use tracing::{error, info, warn};

/// Default GitLab instance for repositories given as `namespace/name`.
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

/// Configuration for a migration run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Source project as `namespace/name`.
    gitlab_repo: RepoPath,
    /// Destination repository as `owner/name`.
    github_repo: RepoPath,
    /// GitLab personal access token.
    gitlab_token: String,
    /// GitHub personal access token.
    github_token: String,
    /// Base URL of the GitLab instance.
    gitlab_url: String,
    /// Whether to preview without writing to GitHub.
    dry_run: bool,
    /// Fixed delay inserted before each destination write.
    throttle: Duration,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(
        gitlab_repo: RepoPath,
        github_repo: RepoPath,
        gitlab_token: String,
        github_token: String,
    ) -> Self {
        Self {
            gitlab_repo,
            github_repo,
            gitlab_token,
            github_token,
            gitlab_url: DEFAULT_GITLAB_URL.to_string(),
            dry_run: false,
            throttle: Duration::ZERO,
        }
    }

    /// Sets a custom GitLab base URL (self-hosted instances).
    #[must_use]
    pub fn with_gitlab_url(mut self, gitlab_url: impl Into<String>) -> Self {
        self.gitlab_url = gitlab_url.into();
        self
    }

    /// Enables or disables dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets a fixed delay before each destination write.
    #[must_use]
    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Returns the source project path.
    pub fn gitlab_repo(&self) -> &RepoPath {
        &self.gitlab_repo
    }

    /// Returns the destination repository path.
    pub fn github_repo(&self) -> &RepoPath {
        &self.github_repo
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}

/// Errors that abort the whole run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration validation errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Fatal GitLab errors: rejected token, unreachable project, or a failed
    /// issue listing.
    #[error(transparent)]
    Gitlab(#[from] GitlabError),

    /// Fatal GitHub errors: client construction or the initial label fetch,
    /// which doubles as the destination auth check.
    #[error(transparent)]
    Writer(#[from] WriterError),
}

/// Drives a full migration run.
pub struct Runner<S = GithubWriter> {
    config: RunnerConfig,
    gitlab: GitlabClient,
    sink: S,
}

impl Runner<GithubWriter> {
    /// Builds a runner with the production GitLab and GitHub clients.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the GitHub client cannot be constructed.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let gitlab = GitlabClient::new(
            &config.gitlab_url,
            &config.gitlab_token,
            &config.gitlab_repo,
        );
        let sink = GithubWriter::new(&config.github_token, &config.github_repo)?;
        Ok(Self {
            config,
            gitlab,
            sink,
        })
    }
}

impl<S: IssueSink> Runner<S> {
    /// Builds a runner over an arbitrary destination sink.
    pub fn with_sink(config: RunnerConfig, gitlab: GitlabClient, sink: S) -> Self {
        Self {
            config,
            gitlab,
            sink,
        }
    }

    /// Executes the full migration and returns the summary.
    ///
    /// Per-issue and per-comment failures are recorded in the summary; only
    /// configuration, authentication, and source-listing failures abort.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] on fatal failures.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.config.dry_run);

        info!(project = %self.config.gitlab_repo, "Fetching source project");
        let project = self.gitlab.project().await?;

        let issues = self.gitlab.list_issues().await?;
        info!(count = issues.len(), "Found source issues");

        if self.config.dry_run {
            print_dry_run_preview(&project, &issues);
            return Ok(summary);
        }

        self.migrate_labels(&mut summary).await?;

        for issue in issues {
            let result = self.migrate_issue(&project, issue).await;
            summary.record_result(result);
        }

        info!(
            migrated = summary.issues_migrated,
            skipped = summary.issues_skipped,
            failed = summary.issues_failed,
            "Migration finished"
        );
        Ok(summary)
    }

    /// Creates the source project's labels on the destination.
    ///
    /// The initial destination label fetch is the first GitHub call of the
    /// run; a rejected token aborts here, before any issue is touched.
    async fn migrate_labels(&self, summary: &mut RunSummary) -> Result<(), RunnerError> {
        let existing = self.sink.existing_labels().await?;
        let source_labels = self.gitlab.list_labels().await?;

        for label in map_labels(&source_labels, &existing) {
            self.throttle().await;
            match self.sink.create_label(&label).await {
                Ok(()) => {
                    info!(name = %label.name, "Label created");
                    summary.labels_created += 1;
                }
                // Label creation is best-effort; issues still get the label
                // names attached.
                Err(e) => warn!(name = %label.name, error = %e, "Failed to create label"),
            }
        }
        Ok(())
    }

    /// Migrates one issue and everything attached to it.
    async fn migrate_issue(&self, project: &Project, issue: Issue) -> MigrationResult {
        let source_iid = issue.iid;
        info!(iid = source_iid, title = %issue.title, "Migrating issue");

        if issue.confidential {
            info!(iid = source_iid, "Confidential issue, skipping");
            return MigrationResult::Skipped {
                source_iid,
                reason: "confidential".to_string(),
            };
        }

        let mut errors = Vec::new();

        let notes = match self.gitlab.list_notes(source_iid).await {
            Ok(notes) => notes,
            Err(e) => {
                warn!(iid = source_iid, error = %e, "Failed to fetch comments, migrating without them");
                errors.push(format!("failed to fetch comments: {e}"));
                Vec::new()
            }
        };

        let participants = match self.gitlab.participants(source_iid).await {
            Ok(participants) => participants,
            Err(e) => {
                // Mentions stay as plain text without the participant list.
                warn!(iid = source_iid, error = %e, "Failed to fetch participants");
                Vec::new()
            }
        };

        let source = SourceIssue {
            issue,
            notes,
            participants,
        };
        let request = map_issue(&source, project);

        self.throttle().await;
        let created = match self.sink.create_issue(&request).await {
            Ok(created) => created,
            Err(e) => {
                error!(iid = source_iid, error = %e, "Failed to create issue");
                return MigrationResult::Failed {
                    source_iid,
                    error: e.to_string(),
                };
            }
        };
        info!(iid = source_iid, number = created.number, "Issue created");

        let mut comments_created = 0;
        for comment in &request.comments {
            self.throttle().await;
            match self.sink.create_comment(created.number, &comment.body).await {
                Ok(()) => comments_created += 1,
                // A failed comment does not stop the remaining ones.
                Err(e) => {
                    warn!(
                        iid = source_iid,
                        note_id = comment.note_id,
                        error = %e,
                        "Failed to create comment, continuing"
                    );
                    errors.push(format!("comment for note {} failed: {e}", comment.note_id));
                }
            }
        }

        if request.close_after_create {
            self.throttle().await;
            if let Err(e) = self.sink.close_issue(created.number).await {
                warn!(iid = source_iid, error = %e, "Failed to close issue");
                errors.push(format!("failed to close issue: {e}"));
            }
        }

        MigrationResult::Migrated {
            source_iid,
            issue_number: created.number,
            issue_url: created.url,
            comments_created,
            errors,
        }
    }

    async fn throttle(&self) {
        if !self.config.throttle.is_zero() {
            tokio::time::sleep(self.config.throttle).await;
        }
    }
}

/// Prints what a live run would migrate.
fn print_dry_run_preview(project: &Project, issues: &[Issue]) {
    println!(
        "\n[DRY RUN] Would migrate {} issues from {}:\n",
        issues.len(),
        project.path_with_namespace
    );

    for (i, issue) in issues.iter().enumerate() {
        if issue.confidential {
            println!(
                "  [{}/{}] #{} \"{}\" (confidential, would skip)",
                i + 1,
                issues.len(),
                issue.iid,
                issue.title
            );
            continue;
        }
        println!(
            "  [{}/{}] #{} \"{}\" ({})",
            i + 1,
            issues.len(),
            issue.iid,
            issue.title,
            issue.state.as_str()
        );
    }

    println!();
}
