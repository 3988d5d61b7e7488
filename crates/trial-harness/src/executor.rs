//! External command execution for the benchmark lifecycle.
//!
//! The benchmark is prepared once (`build`), run once per trial
//! (`run_trial`) and released at the end (`teardown`). [`ShellExecutor`]
//! runs each step through `sh -c` with stdout discarded, stderr captured
//! for diagnostics, and a hard timeout after which the child is killed.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, instrument};

use crate::config::{CommandsConfig, Config};
use crate::error::{HarnessError, Result};

/// Longest stderr tail carried into an error message.
const STDERR_TAIL: usize = 512;

/// Lifecycle of the external benchmark.
#[async_trait]
pub trait TrialExecutor: Send {
    /// Prepare the benchmark artifact. Called once before any trial.
    async fn build(&mut self) -> Result<()>;

    /// Run the benchmark once. On success both variant tables are fresh.
    async fn run_trial(&mut self, trial: usize) -> Result<()>;

    /// Release whatever `build` or the trials acquired.
    async fn teardown(&mut self) -> Result<()>;
}

/// Runs the configured shell commands.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    commands: CommandsConfig,
    timeout: Duration,
}

impl ShellExecutor {
    pub fn new(commands: CommandsConfig, timeout: Duration) -> Self {
        Self { commands, timeout }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.commands.clone(), config.benchmark.timeout)
    }

    /// Per-trial command line, with the `sudo` and `taskset` prefixes applied.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use trial_harness::config::CommandsConfig;
    /// use trial_harness::executor::ShellExecutor;
    ///
    /// let executor = ShellExecutor::new(CommandsConfig::default(), Duration::from_secs(60));
    /// assert_eq!(executor.trial_command(), "sudo taskset -c 5 ./client");
    /// ```
    pub fn trial_command(&self) -> String {
        let mut line = String::new();
        if self.commands.privileged {
            line.push_str("sudo ");
        }
        if let Some(core) = self.commands.cpu_core {
            line.push_str(&format!("taskset -c {core} "));
        }
        line.push_str(&self.commands.run);
        line
    }

    /// Teardown command line, if one is configured.
    pub fn teardown_command(&self) -> Option<String> {
        self.commands.teardown.as_ref().map(|cmd| {
            if self.commands.privileged {
                format!("sudo {cmd}")
            } else {
                cmd.clone()
            }
        })
    }

    #[instrument(skip(self), fields(timeout_secs = self.timeout.as_secs()))]
    async fn run_shell(&self, stage: &str, script: &str) -> Result<()> {
        debug!("Running: {}", script);

        let child = Command::new("sh")
            .arg("-c")
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, child).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(HarnessError::execution(
                    stage,
                    format!("failed to start `{script}`: {e}"),
                ));
            }
            Err(_) => {
                return Err(HarnessError::execution(
                    stage,
                    format!("`{script}` timed out after {}s", self.timeout.as_secs()),
                ));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            let tail_start = stderr
                .char_indices()
                .rev()
                .nth(STDERR_TAIL - 1)
                .map_or(0, |(i, _)| i);
            return Err(HarnessError::execution(
                stage,
                format!("`{script}` {}: {}", output.status, &stderr[tail_start..]),
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl TrialExecutor for ShellExecutor {
    async fn build(&mut self) -> Result<()> {
        let Some(build) = self.commands.build.clone() else {
            return Ok(());
        };
        info!("Building benchmark: {}", build);
        self.run_shell("build", &build).await
    }

    async fn run_trial(&mut self, trial: usize) -> Result<()> {
        let command = self.trial_command();
        self.run_shell(&format!("trial {trial}"), &command).await
    }

    async fn teardown(&mut self) -> Result<()> {
        let Some(teardown) = self.teardown_command() else {
            return Ok(());
        };
        info!("Tearing down: {}", teardown);
        self.run_shell("teardown", &teardown).await
    }
}
