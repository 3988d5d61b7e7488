//! Trial report rendering
//!
//! This module formats a [`TrialReport`] and persists it. The SVG plot is
//! the run's artifact; JSON and console output carry the same curves with
//! per-column detail.
//!
//! # Output Formats
//!
//! - **Svg**: line plot of every curve against the shared input axis
//! - **Json**: machine-readable report
//! - **Console**: human-readable table
//!
//! # Example
//!
//! ```no_run
//! use trial_harness::reporter::{OutputFormat, Reporter};
//! use trial_harness::runner::TrialReport;
//!
//! # fn example(report: TrialReport) -> anyhow::Result<()> {
//! Reporter::new(OutputFormat::Console).report(&report)?;
//! Reporter::new(OutputFormat::Svg).write_to_file(&report, "time.svg")?;
//! # Ok(())
//! # }
//! ```

mod console;
mod json;
mod svg;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::config::OutputConfig;
use crate::runner::TrialReport;

pub use console::ConsoleReporter;
pub use json::JsonReporter;
pub use svg::{PlotLabels, SvgReporter};

/// Output format for trial reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// SVG line plot
    #[default]
    Svg,
    /// JSON format for machine parsing
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Console table
    Console,
}

/// Reporter for trial results
pub struct Reporter {
    format: OutputFormat,
    labels: PlotLabels,
}

impl Reporter {
    /// Create a new reporter with the specified output format
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            labels: PlotLabels::default(),
        }
    }

    /// Reporter using the configured format and plot labels.
    pub fn from_config(output: &OutputConfig) -> Self {
        Self {
            format: output.format,
            labels: PlotLabels {
                title: output.title.clone(),
                x_label: output.x_label.clone(),
                y_label: output.y_label.clone(),
            },
        }
    }

    pub fn with_labels(mut self, labels: PlotLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Report results to stdout
    pub fn report(&self, report: &TrialReport) -> Result<()> {
        let output = self.format_results(report)?;
        print!("{}", output);
        io::stdout().flush()?;
        Ok(())
    }

    /// Write results to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, report: &TrialReport, path: P) -> Result<()> {
        let path = path.as_ref();
        let output = self.format_results(report)?;
        fs::write(path, output)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        Ok(())
    }

    /// Format results as a string
    pub fn format_results(&self, report: &TrialReport) -> Result<String> {
        match self.format {
            OutputFormat::Svg => SvgReporter::format(report, &self.labels),
            OutputFormat::Json => JsonReporter::format(report, false),
            OutputFormat::JsonPretty => JsonReporter::format(report, true),
            OutputFormat::Console => ConsoleReporter::format(report),
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::runner::TrialReport;
    use crate::stats::{AggregatedCurve, ColumnSummary};

    fn column(input: i64, mean: f64, discarded: usize) -> ColumnSummary {
        ColumnSummary {
            input,
            mean,
            median: mean,
            min: mean - 1.0,
            max: mean + 1.0,
            std_dev: 0.5,
            retained: 100 - discarded,
            discarded,
        }
    }

    pub(crate) fn report() -> TrialReport {
        TrialReport {
            axis: vec![0, 1, 2],
            curves: vec![
                AggregatedCurve {
                    variant: "iterative".to_string(),
                    columns: vec![column(0, 40.0, 2), column(1, 52.0, 0), column(2, 64.0, 1)],
                },
                AggregatedCurve {
                    variant: "fast_doubling".to_string(),
                    columns: vec![column(0, 30.0, 0), column(1, 33.0, 3), column(2, 35.0, 0)],
                },
            ],
            trials: 100,
            threshold: 2.0,
            started_at: "2024-01-01T00:00:00Z".to_string(),
            duration_ms: 5000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_json_format() {
        let output = Reporter::new(OutputFormat::Json)
            .format_results(&fixtures::report())
            .unwrap();
        assert!(output.contains("fast_doubling"));
        assert!(output.contains("\"trials\":100"));
    }

    #[test]
    fn test_reporter_console_format() {
        let output = Reporter::new(OutputFormat::Console)
            .format_results(&fixtures::report())
            .unwrap();
        assert!(output.contains("iterative"));
    }

    #[test]
    fn test_reporter_svg_uses_config_labels() {
        let config = OutputConfig {
            title: "sum".to_string(),
            ..OutputConfig::default()
        };
        let output = Reporter::from_config(&config)
            .format_results(&fixtures::report())
            .unwrap();
        assert!(output.starts_with("<svg"));
        assert!(output.contains(">sum<"));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("time.svg");
        Reporter::default()
            .write_to_file(&fixtures::report(), &path)
            .unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("</svg>"));
    }

    #[test]
    fn test_default_format() {
        let reporter = Reporter::default();
        assert_eq!(reporter.format, OutputFormat::Svg);
    }
}
