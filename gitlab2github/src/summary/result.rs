//! Per-issue migration outcomes.

/// Outcome of migrating a single source issue.
///
/// Exactly one result is produced per source issue, in source order.
#[derive(Debug, Clone)]
pub enum MigrationResult {
    /// The destination issue was created.
    Migrated {
        /// Source issue iid.
        source_iid: u64,
        /// Destination issue number.
        issue_number: u64,
        /// Destination issue URL.
        issue_url: String,
        /// Comments successfully created.
        comments_created: usize,
        /// Non-fatal problems hit along the way: a failed comment fetch,
        /// individual comment creations, or the close call.
        errors: Vec<String>,
    },

    /// The issue was intentionally not migrated.
    Skipped {
        /// Source issue iid.
        source_iid: u64,
        /// Reason for skipping.
        reason: String,
    },

    /// The destination issue could not be created.
    Failed {
        /// Source issue iid.
        source_iid: u64,
        /// Error message.
        error: String,
    },
}

impl MigrationResult {
    /// Returns the source issue iid this result belongs to.
    #[must_use]
    pub fn source_iid(&self) -> u64 {
        match self {
            Self::Migrated { source_iid, .. }
            | Self::Skipped { source_iid, .. }
            | Self::Failed { source_iid, .. } => *source_iid,
        }
    }

    /// Returns true if the issue migrated without any recorded problem.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        match self {
            Self::Migrated { errors, .. } => errors.is_empty(),
            Self::Skipped { .. } => true,
            Self::Failed { .. } => false,
        }
    }
}
