//! Loading of per-trial timing tables.
//!
//! The benchmark writes one whitespace-delimited integer table per variant,
//! one line per input size:
//!
//! ```text
//! # n  time_ns
//! 0    38
//! 1    41
//! 2    45
//! ```
//!
//! Column 0 is the input size and becomes the axis. Every other column is
//! a metric and becomes one metric row of the [`RawTrialOutput`]. Blank lines
//! and `#` comments are skipped.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::error::{HarnessError, Result};
use crate::stack::RawTrialOutput;

/// Read and parse one table file.
///
/// # Errors
///
/// [`HarnessError::MalformedTable`] if the file is missing or its content
/// does not parse; other read failures surface as [`HarnessError::Io`].
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<RawTrialOutput> {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(HarnessError::malformed(path, "file not found"));
        }
        Err(e) => return Err(e.into()),
    };
    let table = parse_table(&content, path)?;
    debug!(path = %path.display(), columns = table.columns(), "loaded table");
    Ok(table)
}

/// Remove a table left behind by an earlier trial.
///
/// A table that is already absent is not an error.
pub fn discard_table<P: AsRef<Path>>(path: P) -> Result<()> {
    match fs::remove_file(path.as_ref()) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Parse table text. `path` is only used in error messages.
///
/// # Examples
///
/// ```
/// use trial_harness::loader::parse_table;
///
/// let table = parse_table("0 38\n1 41\n2 45\n", "iterative.txt").unwrap();
/// assert_eq!(table.axis(), &[0, 1, 2]);
/// assert_eq!(table.rows()[0], vec![38.0, 41.0, 45.0]);
/// ```
pub fn parse_table(content: &str, path: impl AsRef<Path>) -> Result<RawTrialOutput> {
    let path = path.as_ref();
    let mut width = None;
    let mut records: Vec<Vec<i64>> = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let record = line
            .split_whitespace()
            .map(|token| {
                token.parse::<i64>().map_err(|_| {
                    HarnessError::malformed(
                        path,
                        format!("line {line_no}: `{token}` is not an integer"),
                    )
                })
            })
            .collect::<Result<Vec<i64>>>()?;

        match width {
            None if record.len() < 2 => {
                return Err(HarnessError::malformed(
                    path,
                    format!("line {line_no}: expected an input size and at least one metric"),
                ));
            }
            None => width = Some(record.len()),
            Some(w) if w != record.len() => {
                return Err(HarnessError::malformed(
                    path,
                    format!("line {line_no}: {} columns, expected {w}", record.len()),
                ));
            }
            Some(_) => {}
        }

        records.push(record);
    }

    let Some(width) = width else {
        return Err(HarnessError::malformed(path, "no data rows"));
    };

    let axis = records.iter().map(|r| r[0]).collect();
    let rows = (1..width)
        .map(|metric| records.iter().map(|r| r[metric] as f64).collect())
        .collect();

    RawTrialOutput::new(axis, rows)
}
