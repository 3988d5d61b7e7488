//! Configuration parsing for trial runs
//!
//! This module provides TOML-based configuration for the trial loop, the
//! external commands that build and run the benchmark, the variant tables it
//! produces and the report artifact. Every field has a default, so an empty
//! file (or no file at all) describes the stock two-variant setup.

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::reporter::OutputFormat;
use crate::stats::DEFAULT_THRESHOLD;

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Trial loop and aggregation settings
    pub benchmark: BenchmarkConfig,
    /// External commands
    pub commands: CommandsConfig,
    /// Variants compared, in plot order
    pub variants: Vec<VariantConfig>,
    /// Report artifact
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            benchmark: BenchmarkConfig::default(),
            commands: CommandsConfig::default(),
            variants: default_variants(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML is malformed
    ///
    /// # Example
    ///
    /// ```no_run
    /// use trial_harness::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = Config::from_file("bench.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use trial_harness::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let toml = r#"
    ///     [benchmark]
    ///     trials = 20
    ///
    ///     [commands]
    ///     run = "./client"
    /// "#;
    /// let config = Config::from_str(toml)?;
    /// assert_eq!(config.benchmark.trials, 20);
    /// assert_eq!(config.variants.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.benchmark.trials > 0, "benchmark.trials must be at least 1");
        ensure!(
            self.benchmark.threshold.is_finite() && self.benchmark.threshold > 0.0,
            "benchmark.threshold must be a positive number (got {})",
            self.benchmark.threshold
        );
        ensure!(
            !self.benchmark.timeout.is_zero(),
            "benchmark.timeout_secs must be at least 1"
        );
        ensure!(
            !self.commands.run.trim().is_empty(),
            "commands.run must not be empty"
        );
        ensure!(!self.variants.is_empty(), "at least one variant is required");
        for variant in &self.variants {
            ensure!(!variant.name.is_empty(), "variant names must not be empty");
        }
        Ok(())
    }
}

/// Trial loop and aggregation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Number of trials (default: 100)
    pub trials: usize,
    /// Z-score threshold for outlier removal (default: 2.0)
    pub threshold: f64,
    /// Metric row aggregated, counted after the axis row (default: 0, timing)
    pub metric_row: usize,
    /// Timeout applied to every external command (default: 60s)
    #[serde(rename = "timeout_secs", with = "duration_secs")]
    pub timeout: Duration,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            trials: 100,
            threshold: DEFAULT_THRESHOLD,
            metric_row: 0,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Shell commands run around and during the trials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Run once before the first trial
    pub build: Option<String>,
    /// Run once per trial; writes fresh variant tables
    pub run: String,
    /// Run after the last trial; failure is tolerated
    pub teardown: Option<String>,
    /// Prefix `run` and `teardown` with `sudo`
    pub privileged: bool,
    /// Pin `run` to this CPU core with `taskset`
    pub cpu_core: Option<usize>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            build: Some("make for_py".to_string()),
            run: "./client".to_string(),
            teardown: Some("rmmod fibdrv".to_string()),
            privileged: true,
            cpu_core: Some(5),
        }
    }
}

/// One compared implementation and the table it writes each trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantConfig {
    /// Legend label
    pub name: String,
    /// Table path, overwritten by every trial
    pub table: PathBuf,
}

fn default_variants() -> Vec<VariantConfig> {
    vec![
        VariantConfig {
            name: "iterative".to_string(),
            table: PathBuf::from("scripts/iterative.txt"),
        },
        VariantConfig {
            name: "fast_doubling".to_string(),
            table: PathBuf::from("scripts/fast_doubling.txt"),
        },
    ]
}

/// Report artifact settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where the report is written
    pub path: PathBuf,
    pub format: OutputFormat,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("time.svg"),
            format: OutputFormat::Svg,
            title: "perf".to_string(),
            x_label: "n-th fibonacci".to_string(),
            y_label: "time (ns)".to_string(),
        }
    }
}

/// Serde module for serializing/deserializing Duration as whole seconds
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
