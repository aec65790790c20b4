//! Run summary types.

use super::result::MigrationResult;

/// Summary of a complete migration run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of issues successfully created on the destination.
    pub issues_migrated: usize,

    /// Number of issues skipped (e.g., confidential).
    pub issues_skipped: usize,

    /// Number of issues that failed to create.
    pub issues_failed: usize,

    /// Number of comments successfully created.
    pub comments_migrated: usize,

    /// Number of non-fatal per-issue errors (comment fetch, comment create,
    /// close).
    pub partial_errors: usize,

    /// Number of label definitions created on the destination.
    pub labels_created: usize,

    /// Whether this was a dry run.
    pub dry_run: bool,

    /// Per-issue results in source order.
    pub results: Vec<MigrationResult>,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Records one per-issue result and updates the counters.
    pub fn record_result(&mut self, result: MigrationResult) {
        match &result {
            MigrationResult::Migrated {
                comments_created,
                errors,
                ..
            } => {
                self.issues_migrated += 1;
                self.comments_migrated += comments_created;
                self.partial_errors += errors.len();
            }
            MigrationResult::Skipped { .. } => self.issues_skipped += 1,
            MigrationResult::Failed { .. } => self.issues_failed += 1,
        }
        self.results.push(result);
    }

    /// Returns true if any issue or comment failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.issues_failed > 0 || self.partial_errors > 0
    }

    /// Returns true if everything migrated cleanly.
    #[must_use]
    pub fn all_success(&self) -> bool {
        !self.has_failures()
    }

    /// Iterates the results that recorded at least one problem.
    pub fn problems(&self) -> impl Iterator<Item = &MigrationResult> {
        self.results.iter().filter(|result| !result.is_clean())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_one_result_per_issue() {
        let mut summary = RunSummary::new(false);

        summary.record_result(MigrationResult::Migrated {
            source_iid: 1,
            issue_number: 10,
            issue_url: "https://github.com/acme/widgets/issues/10".to_string(),
            comments_created: 2,
            errors: vec![],
        });
        summary.record_result(MigrationResult::Skipped {
            source_iid: 2,
            reason: "confidential".to_string(),
        });
        summary.record_result(MigrationResult::Failed {
            source_iid: 3,
            error: "HTTP 502".to_string(),
        });

        assert_eq!(summary.results.len(), 3);
        assert_eq!(summary.issues_migrated, 1);
        assert_eq!(summary.issues_skipped, 1);
        assert_eq!(summary.issues_failed, 1);
        assert_eq!(summary.comments_migrated, 2);
        assert!(summary.has_failures());
    }

    #[test]
    fn comment_failures_count_as_failures() {
        let mut summary = RunSummary::new(false);

        summary.record_result(MigrationResult::Migrated {
            source_iid: 1,
            issue_number: 10,
            issue_url: "https://github.com/acme/widgets/issues/10".to_string(),
            comments_created: 1,
            errors: vec!["comment 2 failed: HTTP 502".to_string()],
        });

        assert_eq!(summary.issues_migrated, 1);
        assert_eq!(summary.partial_errors, 1);
        assert!(summary.has_failures());
        assert_eq!(summary.problems().count(), 1);
    }

    #[test]
    fn clean_run_is_all_success() {
        let mut summary = RunSummary::new(false);
        summary.record_result(MigrationResult::Migrated {
            source_iid: 1,
            issue_number: 10,
            issue_url: "https://github.com/acme/widgets/issues/10".to_string(),
            comments_created: 0,
            errors: vec![],
        });

        assert!(summary.all_success());
        assert_eq!(summary.problems().count(), 0);
    }
}
