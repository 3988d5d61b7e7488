//! Console reporter for trial results
//!
//! Prints one row per input size with every variant's aggregated mean,
//! followed by per-variant outlier counts.

use anyhow::Result;
use std::fmt::Write;

use crate::runner::TrialReport;

/// Console format reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Format a trial report for console output
    pub fn format(report: &TrialReport) -> Result<String> {
        let mut output = String::new();

        writeln!(output)?;
        writeln!(output, "╔══════════════════════════════════════════════════════════════╗")?;
        writeln!(output, "║                       TRIAL RESULTS                          ║")?;
        writeln!(output, "╚══════════════════════════════════════════════════════════════╝")?;
        writeln!(output)?;

        writeln!(output, "Started:    {}", report.started_at)?;
        writeln!(output, "Duration:   {}ms", report.duration_ms)?;
        writeln!(output, "Trials:     {}", report.trials)?;
        writeln!(output, "Threshold:  |z| < {}", report.threshold)?;
        writeln!(output)?;

        Self::format_table(&mut output, report)?;

        writeln!(output)?;
        writeln!(output, "Outliers removed:")?;
        for curve in &report.curves {
            let total = curve.columns.iter().map(|c| c.retained + c.discarded).sum::<usize>();
            writeln!(
                output,
                "  {:<16} {} of {} samples",
                curve.variant,
                curve.outliers_removed(),
                total
            )?;
        }
        writeln!(output)?;

        Ok(output)
    }

    fn format_table(output: &mut String, report: &TrialReport) -> Result<()> {
        write!(output, "  {:>8}", "input")?;
        for curve in &report.curves {
            write!(output, " │ {:>16}", curve.variant)?;
        }
        writeln!(output)?;

        write!(output, "  {}", "─".repeat(8))?;
        for _ in &report.curves {
            write!(output, "─┼─{}", "─".repeat(16))?;
        }
        writeln!(output)?;

        for (i, input) in report.axis.iter().enumerate() {
            write!(output, "  {:>8}", input)?;
            for curve in &report.curves {
                match curve.columns.get(i) {
                    Some(column) => write!(output, " │ {:>16.1}", column.mean)?,
                    None => write!(output, " │ {:>16}", "-")?,
                }
            }
            writeln!(output)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::fixtures;

    #[test]
    fn test_console_format_contains_header_and_variants() {
        let output = ConsoleReporter::format(&fixtures::report()).unwrap();

        assert!(output.contains("TRIAL RESULTS"));
        assert!(output.contains("iterative"));
        assert!(output.contains("fast_doubling"));
    }

    #[test]
    fn test_console_format_has_row_per_input() {
        let output = ConsoleReporter::format(&fixtures::report()).unwrap();

        assert!(output.contains("52.0"));
        assert!(output.contains("35.0"));
        let rows = output.lines().filter(|l| l.contains(" │ ")).count();
        // header plus three inputs
        assert_eq!(rows, 4);
    }

    #[test]
    fn test_console_format_outlier_counts() {
        let output = ConsoleReporter::format(&fixtures::report()).unwrap();

        assert!(output.contains("3 of 300 samples"));
    }
}
