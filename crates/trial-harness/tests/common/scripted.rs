//! Executor that writes canned tables instead of running a benchmark

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::TempDir;
use trial_harness::config::{Config, VariantConfig};
use trial_harness::{HarnessError, TrialExecutor};

/// Writes `trials[i]` into the variant tables when trial `i` runs and
/// records every lifecycle call.
pub struct ScriptedExecutor {
    paths: Vec<PathBuf>,
    trials: Vec<Vec<String>>,
    pub fail_build: bool,
    pub fail_at: Option<usize>,
    pub fail_teardown: bool,
    /// Trials from this index on exit cleanly without writing any table.
    pub silent_from: Option<usize>,
    pub calls: Vec<String>,
}

impl ScriptedExecutor {
    pub fn new(paths: Vec<PathBuf>, trials: Vec<Vec<String>>) -> Self {
        Self {
            paths,
            trials,
            fail_build: false,
            fail_at: None,
            fail_teardown: false,
            silent_from: None,
            calls: Vec::new(),
        }
    }

    pub fn trials_run(&self) -> usize {
        self.calls.iter().filter(|c| c.starts_with("trial")).count()
    }
}

#[async_trait]
impl TrialExecutor for ScriptedExecutor {
    async fn build(&mut self) -> trial_harness::error::Result<()> {
        self.calls.push("build".to_string());
        if self.fail_build {
            return Err(HarnessError::TrialExecutionFailure {
                stage: "build".to_string(),
                reason: "make: *** [for_py] Error 2".to_string(),
            });
        }
        Ok(())
    }

    async fn run_trial(&mut self, trial: usize) -> trial_harness::error::Result<()> {
        self.calls.push(format!("trial {trial}"));
        if self.fail_at == Some(trial) {
            return Err(HarnessError::TrialExecutionFailure {
                stage: format!("trial {trial}"),
                reason: "exit status: 1".to_string(),
            });
        }
        if self.silent_from.is_some_and(|from| trial >= from) {
            return Ok(());
        }
        for (path, table) in self.paths.iter().zip(&self.trials[trial]) {
            fs::write(path, table)?;
        }
        Ok(())
    }

    async fn teardown(&mut self) -> trial_harness::error::Result<()> {
        self.calls.push("teardown".to_string());
        if self.fail_teardown {
            return Err(HarnessError::TrialExecutionFailure {
                stage: "teardown".to_string(),
                reason: "rmmod: ERROR: Module fibdrv is not currently loaded".to_string(),
            });
        }
        Ok(())
    }
}

/// Config with two variants whose tables live in `dir`.
pub fn config_in(dir: &Path, trials: usize) -> Config {
    let mut config = Config::default();
    config.benchmark.trials = trials;
    config.variants = vec![
        VariantConfig {
            name: "iterative".to_string(),
            table: dir.join("iterative.txt"),
        },
        VariantConfig {
            name: "fast_doubling".to_string(),
            table: dir.join("fast_doubling.txt"),
        },
    ];
    config
}

pub fn table_paths(config: &Config) -> Vec<PathBuf> {
    config.variants.iter().map(|v| v.table.clone()).collect()
}

/// Table text with input sizes `0..` and one timing value per line.
pub fn table(times: &[i64]) -> String {
    times
        .iter()
        .enumerate()
        .map(|(n, t)| format!("{n} {t}\n"))
        .collect()
}

pub fn workspace() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}
