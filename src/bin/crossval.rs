//! Cross-Validation Binary
//!
//! Runs one scenario many times and checks the sample mean against the
//! theoretical value.
//!
//! ## Usage
//! ```bash
//! cargo run --bin crossval --release -- --scenario kelly --runs 5000 --parallel
//! cargo run --bin crossval --release -- --config experiment.toml --json
//! RUST_LOG=debug cargo run --bin crossval
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use odds_lab::config::{ExperimentConfig, ScenarioKind};

/// Monte Carlo vs theory for a betting scenario
#[derive(Parser)]
#[command(name = "crossval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Experiment file (TOML); flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scenario: kelly, gambling, doubling-box, chicken-leg
    #[arg(short, long)]
    scenario: Option<ScenarioKind>,

    /// Number of independent runs
    #[arg(short, long)]
    runs: Option<usize>,

    /// Base seed; run i uses the stream (seed, i)
    #[arg(long)]
    seed: Option<u64>,

    /// Accepted relative error
    #[arg(short, long)]
    tolerance: Option<f64>,

    /// Spread runs over all cores
    #[arg(short, long)]
    parallel: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut experiment = match &cli.config {
        Some(path) => ExperimentConfig::load(path)?,
        None => ExperimentConfig::default(),
    };
    if let Some(scenario) = cli.scenario {
        experiment.scenario = scenario;
    }
    if let Some(runs) = cli.runs {
        experiment.runner.runs = runs;
    }
    if let Some(seed) = cli.seed {
        experiment.runner.seed = seed;
    }
    if let Some(tolerance) = cli.tolerance {
        experiment.runner.tolerance = tolerance;
    }
    experiment.runner.parallel |= cli.parallel;

    info!(
        scenario = %experiment.scenario,
        runs = experiment.runner.runs,
        seed = experiment.runner.seed,
        "Running scenario"
    );
    let result = experiment.cross_validate()?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("=======================================================");
        println!("  Cross-validation: {}", experiment.scenario);
        println!("=======================================================\n");
        result.print();
    }

    if !result.passed() {
        std::process::exit(1);
    }
    Ok(())
}
