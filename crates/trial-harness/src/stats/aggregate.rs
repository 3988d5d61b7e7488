//! Collapse a trial stack into one timing value per input size.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::moments::{mean, population_std_dev};
use super::outliers::OutlierResult;
use super::percentiles::median;
use crate::error::{HarnessError, Result};
use crate::stack::TrialStack;

/// Summary of one input column after outlier removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    /// Input size of this column
    pub input: i64,
    /// Mean of the retained samples (the curve value)
    pub mean: f64,
    /// Median of the retained samples
    pub median: f64,
    /// Smallest retained sample
    pub min: f64,
    /// Largest retained sample
    pub max: f64,
    /// Population standard deviation of the retained samples
    pub std_dev: f64,
    /// Number of samples kept
    pub retained: usize,
    /// Number of samples discarded as outliers
    pub discarded: usize,
}

/// One variant's aggregated timing curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedCurve {
    /// Variant name
    pub variant: String,
    /// One summary per input column, in axis order
    pub columns: Vec<ColumnSummary>,
}

impl AggregatedCurve {
    /// Curve values: the retained mean of every column.
    pub fn values(&self) -> Vec<f64> {
        self.columns.iter().map(|c| c.mean).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Total outliers discarded across all columns.
    pub fn outliers_removed(&self) -> usize {
        self.columns.iter().map(|c| c.discarded).sum()
    }
}

/// Aggregate `metric_row` of every column across the stack's trials.
///
/// Each column is filtered with the z-score `threshold` and averaged.
/// The result has one entry per input column regardless of trial count.
///
/// # Errors
///
/// - [`HarnessError::InvalidInput`] if the stack is empty or `metric_row`
///   is out of range.
/// - [`HarnessError::EmptyAggregate`] if every sample of a column is
///   filtered out.
///
/// # Examples
///
/// ```
/// use trial_harness::stack::TrialStack;
/// use trial_harness::stats::aggregate;
///
/// let stack = TrialStack::from_matrices(
///     vec![0],
///     vec![vec![vec![10.0]], vec![vec![11.0]], vec![vec![1000.0]]],
/// ).unwrap();
/// let curve = aggregate("iterative", &stack, 0, 1.4).unwrap();
/// assert_eq!(curve.values(), vec![10.5]);
/// ```
pub fn aggregate(
    variant: &str,
    stack: &TrialStack,
    metric_row: usize,
    threshold: f64,
) -> Result<AggregatedCurve> {
    if stack.is_empty() {
        return Err(HarnessError::InvalidInput(format!(
            "no trials to aggregate for variant '{variant}'"
        )));
    }
    if metric_row >= stack.metric_rows() {
        return Err(HarnessError::InvalidInput(format!(
            "metric row {metric_row} out of range, variant '{variant}' has {} metric rows",
            stack.metric_rows()
        )));
    }

    let columns = stack
        .axis()
        .iter()
        .enumerate()
        .map(|(column, &input)| {
            let samples = stack.column(metric_row, column);
            summarize_column(column, input, &samples, threshold)
        })
        .collect::<Result<Vec<_>>>()?;

    let curve = AggregatedCurve {
        variant: variant.to_string(),
        columns,
    };

    let removed = curve.outliers_removed();
    if removed > 0 {
        warn!(variant, removed, "discarded outlier samples");
    }

    Ok(curve)
}

fn summarize_column(
    column: usize,
    input: i64,
    samples: &[f64],
    threshold: f64,
) -> Result<ColumnSummary> {
    let outliers = OutlierResult::detect(samples, threshold)?;
    let retained = outliers.clean_samples(samples);

    let Some(avg) = mean(&retained) else {
        return Err(HarnessError::EmptyAggregate {
            column,
            samples: samples.len(),
            threshold,
        });
    };

    let min = retained.iter().copied().fold(f64::INFINITY, f64::min);
    let max = retained.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    debug!(
        column,
        input,
        mean = avg,
        discarded = outliers.outlier_indices.len(),
        "aggregated column"
    );

    Ok(ColumnSummary {
        input,
        mean: avg,
        median: median(&retained).unwrap_or(avg),
        min,
        max,
        std_dev: population_std_dev(&retained, avg),
        retained: retained.len(),
        discarded: outliers.outlier_indices.len(),
    })
}
