//! Trial orchestration
//!
//! This module drives the benchmark through its lifecycle and turns the
//! tables it writes into one aggregated curve per variant.
//!
//! # Architecture
//!
//! Trials run strictly one after another: each needs the benchmarked core
//! to itself, so there is no parallelism anywhere in the loop.
//!
//! ```text
//! build ─▶ trial 0 ─▶ trial 1 ─▶ … ─▶ trial N-1 ─▶ teardown
//!            │           │                │
//!            ▼           ▼                ▼
//!       load tables  load tables      load tables
//!            └───────────┴──── push ──────┘
//!                              │
//!                   TrialStack per variant
//!                              │
//!                   aggregate per variant ─▶ TrialReport
//! ```
//!
//! Any failure (build, trial exit status, timeout, missing or malformed
//! table, shape mismatch, empty column) aborts the whole run. Teardown is
//! still attempted; its own failure is only logged.
//!
//! # Example
//!
//! ```no_run
//! use trial_harness::{Config, ShellExecutor, TrialRunner};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_file("bench.toml")?;
//! let mut runner = TrialRunner::new(ShellExecutor::from_config(&config));
//! let report = runner.run(&config).await?;
//!
//! for curve in &report.curves {
//!     println!("{}: {} points", curve.variant, curve.len());
//! }
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::{HarnessError, Result};
use crate::executor::TrialExecutor;
use crate::loader::{discard_table, load_table};
use crate::stack::TrialStack;
use crate::stats::{aggregate, AggregatedCurve};

/// Results from a complete trial run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialReport {
    /// Input-size axis shared by every variant
    pub axis: Vec<i64>,
    /// One curve per variant, in configuration order
    pub curves: Vec<AggregatedCurve>,
    /// Number of trials aggregated
    pub trials: usize,
    /// Z-score threshold used
    pub threshold: f64,
    /// Timestamp when the run started
    pub started_at: String,
    /// Total duration of the run
    pub duration_ms: u64,
}

impl TrialReport {
    /// Curve for the named variant.
    pub fn curve(&self, variant: &str) -> Option<&AggregatedCurve> {
        self.curves.iter().find(|c| c.variant == variant)
    }
}

/// Drives a [`TrialExecutor`] through build, trials and teardown.
pub struct TrialRunner<E> {
    executor: E,
}

impl<E: TrialExecutor> TrialRunner<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn into_executor(self) -> E {
        self.executor
    }

    /// Run `config.benchmark.trials` trials and aggregate every variant.
    #[instrument(skip(self, config), fields(trials = config.benchmark.trials))]
    pub async fn run(&mut self, config: &Config) -> Result<TrialReport> {
        let start_time = Instant::now();
        let started_at = chrono::Utc::now().to_rfc3339();

        info!(
            "Starting {} trials over {} variants",
            config.benchmark.trials,
            config.variants.len()
        );

        let collected = self.collect(config).await;

        if let Err(e) = self.executor.teardown().await {
            warn!("Teardown failed (ignored): {}", e);
        }

        let stacks = collected?;
        let axis = shared_axis(config, &stacks)?;

        let curves = config
            .variants
            .iter()
            .zip(&stacks)
            .map(|(variant, stack)| {
                aggregate(
                    &variant.name,
                    stack,
                    config.benchmark.metric_row,
                    config.benchmark.threshold,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let report = TrialReport {
            axis,
            curves,
            trials: config.benchmark.trials,
            threshold: config.benchmark.threshold,
            started_at,
            duration_ms: millis(start_time.elapsed()),
        };

        info!(
            "Aggregated {} trials into {} curves of {} points in {}ms",
            report.trials,
            report.curves.len(),
            report.axis.len(),
            report.duration_ms
        );

        Ok(report)
    }

    /// Build, then run every trial and load its tables into the stacks.
    async fn collect(&mut self, config: &Config) -> Result<Vec<TrialStack>> {
        self.executor.build().await?;

        let mut stacks: Vec<TrialStack> = config
            .variants
            .iter()
            .map(|_| TrialStack::with_capacity(config.benchmark.trials))
            .collect();

        for trial in 0..config.benchmark.trials {
            self.run_trial(config, trial, &mut stacks).await?;
        }

        Ok(stacks)
    }

    #[instrument(skip(self, config, stacks))]
    async fn run_trial(
        &mut self,
        config: &Config,
        trial: usize,
        stacks: &mut [TrialStack],
    ) -> Result<()> {
        // Tables persist between trials; a run that skips writing one must
        // not hand the previous trial's data to the stack again.
        for variant in &config.variants {
            discard_table(&variant.table)?;
        }

        self.executor.run_trial(trial).await?;

        for (variant, stack) in config.variants.iter().zip(stacks.iter_mut()) {
            let table = load_table(&variant.table)?;
            stack.push(table)?;
        }

        debug!("Trial {} collected", trial);
        Ok(())
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// First variant's axis, after checking every other variant agrees.
fn shared_axis(config: &Config, stacks: &[TrialStack]) -> Result<Vec<i64>> {
    let Some(first) = stacks.first() else {
        return Err(HarnessError::InvalidInput("no variants configured".into()));
    };

    for (variant, stack) in config.variants.iter().zip(stacks).skip(1) {
        if stack.axis() != first.axis() {
            return Err(HarnessError::InvalidInput(format!(
                "variant '{}' input axis ({} columns) differs from variant '{}' ({} columns)",
                variant.name,
                stack.columns(),
                config.variants[0].name,
                first.columns()
            )));
        }
    }

    Ok(first.axis().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VariantConfig;
    use crate::stack::RawTrialOutput;
    use std::path::PathBuf;

    fn two_variants() -> Config {
        let mut config = Config::default();
        config.variants = vec![
            VariantConfig {
                name: "a".to_string(),
                table: PathBuf::from("a.txt"),
            },
            VariantConfig {
                name: "b".to_string(),
                table: PathBuf::from("b.txt"),
            },
        ];
        config
    }

    fn stack(axis: Vec<i64>) -> TrialStack {
        let rows = vec![axis.iter().map(|&x| x as f64).collect()];
        let mut stack = TrialStack::new();
        stack.push(RawTrialOutput::new(axis, rows).unwrap()).unwrap();
        stack
    }

    #[test]
    fn test_shared_axis_matching() {
        let axis = shared_axis(&two_variants(), &[stack(vec![1, 2]), stack(vec![1, 2])]).unwrap();
        assert_eq!(axis, vec![1, 2]);
    }

    #[test]
    fn test_shared_axis_mismatch() {
        let err = shared_axis(&two_variants(), &[stack(vec![1, 2]), stack(vec![1, 2, 3])])
            .unwrap_err();
        assert!(matches!(err, HarnessError::InvalidInput(ref m) if m.contains("'b'")));
    }

    #[test]
    fn test_millis_saturates() {
        assert_eq!(millis(Duration::from_millis(1_500)), 1_500);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_report_curve_lookup() {
        let report = TrialReport {
            axis: vec![0],
            curves: vec![AggregatedCurve {
                variant: "iterative".to_string(),
                columns: Vec::new(),
            }],
            trials: 1,
            threshold: 2.0,
            started_at: "2024-01-01T00:00:00Z".to_string(),
            duration_ms: 0,
        };

        assert!(report.curve("iterative").is_some());
        assert!(report.curve("fast_doubling").is_none());
    }
}
