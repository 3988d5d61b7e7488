//! Per-trial tables and the per-variant stack that accumulates them.
//!
//! A [`RawTrialOutput`] is one variant's table from one trial: the
//! input-size axis plus one row per measured metric, each row holding one
//! value per input size. A [`TrialStack`] owns the metric rows of every
//! trial for one variant and enforces that they all share the same axis and
//! shape.

use crate::error::{HarnessError, Result};

/// One variant's table from one trial.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTrialOutput {
    axis: Vec<i64>,
    rows: Vec<Vec<f64>>,
}

impl RawTrialOutput {
    /// Build a table from its axis and metric rows.
    ///
    /// # Errors
    ///
    /// [`HarnessError::InvalidInput`] if the axis is empty, there are no
    /// metric rows, or a row's length differs from the axis length.
    pub fn new(axis: Vec<i64>, rows: Vec<Vec<f64>>) -> Result<Self> {
        if axis.is_empty() {
            return Err(HarnessError::InvalidInput("table has no input columns".into()));
        }
        if rows.is_empty() {
            return Err(HarnessError::InvalidInput("table has no metric rows".into()));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != axis.len()) {
            return Err(HarnessError::InvalidInput(format!(
                "metric row {i} has {} values, axis has {}",
                row.len(),
                axis.len()
            )));
        }
        Ok(Self { axis, rows })
    }

    /// Input-size axis.
    pub fn axis(&self) -> &[i64] {
        &self.axis
    }

    /// Metric rows, axis excluded.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Number of input columns.
    pub fn columns(&self) -> usize {
        self.axis.len()
    }

    pub fn into_parts(self) -> (Vec<i64>, Vec<Vec<f64>>) {
        (self.axis, self.rows)
    }
}

/// Trials × metric rows × inputs for a single variant.
///
/// The axis is taken from the first pushed trial. Every later trial must
/// match it exactly and carry the same number of metric rows.
#[derive(Debug, Clone, Default)]
pub struct TrialStack {
    axis: Vec<i64>,
    metric_rows: usize,
    trials: Vec<Vec<Vec<f64>>>,
}

impl TrialStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty stack with room for `trials` tables.
    pub fn with_capacity(trials: usize) -> Self {
        Self {
            trials: Vec::with_capacity(trials),
            ..Self::default()
        }
    }

    /// Build a stack from a shared axis and per-trial metric matrices.
    ///
    /// # Examples
    ///
    /// ```
    /// use trial_harness::stack::TrialStack;
    ///
    /// let stack = TrialStack::from_matrices(
    ///     vec![1, 2],
    ///     vec![vec![vec![5.0, 50.0]], vec![vec![7.0, 70.0]]],
    /// ).unwrap();
    /// assert_eq!(stack.len(), 2);
    /// assert_eq!(stack.columns(), 2);
    /// ```
    pub fn from_matrices(axis: Vec<i64>, matrices: Vec<Vec<Vec<f64>>>) -> Result<Self> {
        let mut stack = Self::with_capacity(matrices.len());
        for rows in matrices {
            stack.push(RawTrialOutput::new(axis.clone(), rows)?)?;
        }
        Ok(stack)
    }

    /// Append one trial's table, consuming it.
    ///
    /// # Errors
    ///
    /// [`HarnessError::InvalidInput`] if the table's column count, metric
    /// row count or axis differs from the first trial's.
    pub fn push(&mut self, output: RawTrialOutput) -> Result<()> {
        let trial = self.trials.len();
        let (axis, rows) = output.into_parts();

        if self.trials.is_empty() {
            self.axis = axis;
            self.metric_rows = rows.len();
            self.trials.push(rows);
            return Ok(());
        }

        if axis.len() != self.axis.len() {
            return Err(HarnessError::InvalidInput(format!(
                "trial {trial} has {} input columns, expected {}",
                axis.len(),
                self.axis.len()
            )));
        }
        if rows.len() != self.metric_rows {
            return Err(HarnessError::InvalidInput(format!(
                "trial {trial} has {} metric rows, expected {}",
                rows.len(),
                self.metric_rows
            )));
        }
        if let Some(col) = axis.iter().zip(&self.axis).position(|(a, b)| a != b) {
            return Err(HarnessError::InvalidInput(format!(
                "trial {trial} input axis differs at column {col}: {} vs {}",
                axis[col], self.axis[col]
            )));
        }

        self.trials.push(rows);
        Ok(())
    }

    /// Shared input-size axis, empty until the first push.
    pub fn axis(&self) -> &[i64] {
        &self.axis
    }

    /// Number of trials accumulated.
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// Number of input columns.
    pub fn columns(&self) -> usize {
        self.axis.len()
    }

    /// Number of metric rows per trial.
    pub fn metric_rows(&self) -> usize {
        self.metric_rows
    }

    /// One value per trial for `(metric_row, column)`, in trial order.
    ///
    /// Callers check bounds against [`metric_rows`](Self::metric_rows) and
    /// [`columns`](Self::columns).
    pub fn column(&self, metric_row: usize, column: usize) -> Vec<f64> {
        self.trials
            .iter()
            .map(|rows| rows[metric_row][column])
            .collect()
    }
}
