//! Trial harness binary
//!
//! Runs the configured benchmark repeatedly and writes the comparison report.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trial_harness::{Config, OutputFormat, Reporter, ShellExecutor, TrialRunner};

#[derive(Parser, Debug)]
#[command(name = "trial-harness")]
#[command(version, about = "Repeat a benchmark, drop outliers, plot the averaged curves")]
struct Args {
    /// TOML configuration; defaults apply when the file does not exist
    #[arg(short, long, default_value = "bench.toml")]
    config: PathBuf,

    /// Override benchmark.trials
    #[arg(short, long)]
    trials: Option<usize>,

    /// Override output.path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so console reports on stdout stay clean.
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::load_or_default(&args.config)?;
    if let Some(trials) = args.trials {
        config.benchmark.trials = trials;
    }
    if let Some(output) = args.output {
        config.output.path = output;
    }
    config.validate()?;

    tracing::info!(
        "Loaded {} ({} variants, {} trials)",
        args.config.display(),
        config.variants.len(),
        config.benchmark.trials
    );

    let mut runner = TrialRunner::new(ShellExecutor::from_config(&config));
    let report = runner.run(&config).await.context("Trial run aborted")?;

    Reporter::from_config(&config.output).write_to_file(&report, &config.output.path)?;
    tracing::info!("Report written to {}", config.output.path.display());

    if config.output.format != OutputFormat::Console {
        Reporter::new(OutputFormat::Console).report(&report)?;
    }

    Ok(())
}
