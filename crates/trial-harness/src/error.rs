//! Error type for the trial-aggregation pipeline.
//!
//! Every kind aborts the whole run. There is no partial-result mode.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    /// Empty samples, or sample data whose shape or axis disagrees with
    /// what was accumulated before it.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Every sample of a column was rejected by the outlier filter.
    #[error("All {samples} samples of column {column} were filtered out (threshold {threshold})")]
    EmptyAggregate {
        column: usize,
        samples: usize,
        threshold: f64,
    },

    /// External command exited unsuccessfully, timed out, or could not start.
    #[error("Trial execution failed ({stage}): {reason}")]
    TrialExecutionFailure { stage: String, reason: String },

    /// Output table missing, ragged, or not integer-valued.
    #[error("Malformed table {}: {reason}", .path.display())]
    MalformedTable { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        HarnessError::MalformedTable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn execution(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        HarnessError::TrialExecutionFailure {
            stage: stage.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
