//! CLI for the GitLab to GitHub issue migrator.
//!
//! Reads the source project, destination repository, and both access tokens
//! from flags or environment variables, runs the migration to completion,
//! and prints a summary of what happened.

use clap::Parser;
use gitlab2github::{
    require_token, MigrationResult, RepoPath, RunSummary, Runner, RunnerConfig, RunnerError,
    DEFAULT_GITLAB_URL,
};
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Migrate issues, comments, and labels from a GitLab project to a GitHub repository.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Source GitLab project as 'namespace/name'.
    #[arg(long, env = "GITLAB_REPO")]
    gitlab_repo: RepoPath,

    /// Destination GitHub repository as 'owner/name'.
    #[arg(long, env = "GITHUB_REPO")]
    github_repo: RepoPath,

    /// GitLab personal access token.
    #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true)]
    gitlab_token: String,

    /// GitHub personal access token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: String,

    /// Base URL of the GitLab instance.
    #[arg(long, env = "GITLAB_URL", default_value = DEFAULT_GITLAB_URL)]
    gitlab_url: String,

    /// Preview the migration without writing to GitHub.
    #[arg(long)]
    dry_run: bool,

    /// Fixed delay in seconds before each GitHub write.
    #[arg(long, default_value_t = 0)]
    throttle_secs: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    // Parse arguments; missing required values abort here, before any
    // network call.
    let args = Args::parse();

    // Run the main logic
    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);

            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        // Use compact formatting without module target paths for cleaner output
        .with(fmt::layer().compact().with_target(false))
        // Allow runtime log filtering via RUST_LOG env var (e.g., RUST_LOG=debug)
        // Falls back to "info" level if RUST_LOG is not set or invalid
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        // Register as the global default subscriber
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let gitlab_token = require_token("GITLAB_TOKEN", &args.gitlab_token)?;
    let github_token = require_token("GITHUB_TOKEN", &args.github_token)?;

    let config = RunnerConfig::new(
        args.gitlab_repo,
        args.github_repo,
        gitlab_token,
        github_token,
    )
    .with_gitlab_url(args.gitlab_url)
    .with_dry_run(args.dry_run)
    .with_throttle(Duration::from_secs(args.throttle_secs));

    let runner = Runner::new(config)?;
    runner.run().await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );

    if summary.dry_run {
        return;
    }

    println!("  Labels created: {}", summary.labels_created);
    println!("  Issues migrated: {}", summary.issues_migrated);
    println!("  Issues skipped: {}", summary.issues_skipped);
    println!("  Issues failed: {}", summary.issues_failed);
    println!("  Comments migrated: {}", summary.comments_migrated);
    println!("  Non-fatal errors: {}", summary.partial_errors);

    if summary.has_failures() {
        println!("\nNeeds manual follow-up:");
        for result in summary.problems() {
            match result {
                MigrationResult::Failed { source_iid, error } => {
                    println!("  #{source_iid}: {error}");
                }
                MigrationResult::Migrated {
                    source_iid,
                    issue_number,
                    errors,
                    ..
                } => {
                    for err in errors {
                        println!("  #{source_iid} (migrated as #{issue_number}): {err}");
                    }
                }
                MigrationResult::Skipped { .. } => {}
            }
        }
    }
}
