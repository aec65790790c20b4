#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod github;
pub mod gitlab;
pub mod mapper;
pub mod rate_limit;
pub mod runner;
pub mod summary;

pub use config::{require_token, ConfigError, RepoPath};
pub use github::{CreatedIssue, GithubWriter, IssueSink, WriterError};
pub use gitlab::{GitlabClient, GitlabError, SourceIssue};
pub use mapper::{map_issue, map_labels, CommentRequest, IssueRequest, LabelRequest};
pub use rate_limit::{check_core_rate_limit, ensure_core_rate_limit, wait_if_needed, RateLimitInfo};
pub use runner::{Runner, RunnerConfig, RunnerError, DEFAULT_GITLAB_URL};
pub use summary::{MigrationResult, RunSummary};
