//! Statistical reduction of trial samples
//!
//! This module provides the z-score outlier filter and the aggregator that
//! turns a trial stack into one curve value per input size.
//!
//! # Examples
//!
//! ```
//! use trial_harness::stats::{filter, OutlierResult};
//!
//! let samples = vec![10.0, 11.0, 10.0, 11.0, 10.0, 11.0, 10.0, 11.0, 10.0, 1000.0];
//!
//! let outliers = OutlierResult::detect(&samples, 2.0).unwrap();
//! assert_eq!(outliers.outlier_indices, vec![9]);
//!
//! let clean = filter(&samples, 2.0).unwrap();
//! assert_eq!(clean.len(), 9);
//! ```

pub mod aggregate;
pub mod moments;
pub mod outliers;
pub mod percentiles;

pub use aggregate::{aggregate, AggregatedCurve, ColumnSummary};
pub use outliers::{filter, OutlierResult, DEFAULT_THRESHOLD};
pub use percentiles::{median, percentile};
