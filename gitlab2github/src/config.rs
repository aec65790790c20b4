//! Run configuration parsing and validation.
//!
//! Everything here is validated before any network call is made, so a bad
//! repository path or an empty token aborts the run without touching either
//! API.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Repository path not in `namespace/name` form.
    #[error("invalid repository path '{path}': expected 'namespace/name'")]
    InvalidRepoPath { path: String },

    /// A required value was missing or empty.
    #[error("missing required value for {name}")]
    MissingValue { name: &'static str },
}

/// A repository identifier in `namespace/name` form.
///
/// GitLab project paths may be nested (`group/subgroup/project`); everything
/// after the first `/` is treated as the name. GitHub repositories always
/// have exactly one segment on each side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPath {
    full: String,
}

impl RepoPath {
    /// Returns the full `namespace/name` path.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full
    }

    /// Returns the namespace (owner) portion.
    #[must_use]
    pub fn owner(&self) -> &str {
        // Validated to contain a '/' at construction.
        self.full.split_once('/').map(|(o, _)| o).unwrap_or(&self.full)
    }

    /// Returns the name portion after the first `/`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.full.split_once('/').map(|(_, n)| n).unwrap_or(&self.full)
    }
}

impl FromStr for RepoPath {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let valid = matches!(trimmed.split_once('/'), Some((owner, name)) if !owner.is_empty() && !name.is_empty());
        if !valid {
            return Err(ConfigError::InvalidRepoPath {
                path: s.to_string(),
            });
        }
        Ok(Self {
            full: trimmed.to_string(),
        })
    }
}

impl fmt::Display for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

/// Validates that a token value is non-empty.
///
/// # Errors
///
/// Returns [`ConfigError::MissingValue`] if the value is empty or whitespace.
pub fn require_token(name: &'static str, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingValue { name });
    }
    Ok(trimmed.to_string())
}
