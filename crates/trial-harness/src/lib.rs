//! Repeated-trial harness for comparing algorithm variants
//!
//! This crate drives an external micro-benchmark many times, loads the
//! per-variant timing tables each trial writes, drops outliers per input
//! size by z-score and averages what remains into one curve per variant.
//!
//! # Pipeline
//!
//! - **Loader**: parses a trial's integer table into an input axis plus
//!   metric rows
//! - **Stack**: accumulates one variant's tables across trials, rejecting
//!   shape or axis drift
//! - **Stats**: z-score filter and per-column aggregation
//! - **Runner**: build, sequential fail-fast trials, teardown
//! - **Reporter**: SVG plot, JSON or console table
//!
//! # Example
//!
//! ```no_run
//! use trial_harness::{Config, Reporter, ShellExecutor, TrialRunner};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load_or_default("bench.toml")?;
//! config.validate()?;
//!
//! let mut runner = TrialRunner::new(ShellExecutor::from_config(&config));
//! let report = runner.run(&config).await?;
//!
//! Reporter::from_config(&config.output).write_to_file(&report, &config.output.path)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [benchmark]
//! trials = 100
//! threshold = 2.0
//! timeout_secs = 60
//!
//! [commands]
//! build = "make for_py"
//! run = "./client"
//! teardown = "rmmod fibdrv"
//! privileged = true
//! cpu_core = 5
//!
//! [[variants]]
//! name = "iterative"
//! table = "scripts/iterative.txt"
//!
//! [[variants]]
//! name = "fast_doubling"
//! table = "scripts/fast_doubling.txt"
//!
//! [output]
//! path = "time.svg"
//! format = "svg"
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod loader;
pub mod reporter;
pub mod runner;
pub mod stack;
pub mod stats;

pub use config::Config;
pub use error::HarnessError;
pub use executor::{ShellExecutor, TrialExecutor};
pub use reporter::{OutputFormat, Reporter};
pub use runner::{TrialReport, TrialRunner};
pub use stack::{RawTrialOutput, TrialStack};
pub use stats::{aggregate, filter, AggregatedCurve};
