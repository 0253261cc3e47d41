//! # sales-dashboard
//!
//! Command-line front end: loads the model once, runs the forecast pipeline
//! and prints the statuses and insights.

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sales_dashboard::DashboardReport;
use sales_forecast::{load_model, DashboardConfig, ForecastPipeline, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sales-dashboard")]
#[command(about = "Sales history and 15-day demand forecast", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sales CSV to analyse; takes precedence over the default data file
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Model artifact (JSON linear model)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Sales CSV used when --data is not given
    #[arg(long)]
    default_data: Option<PathBuf>,

    /// Fill a missing value column with random values instead of rejecting the file
    #[arg(long)]
    allow_synthetic_values: bool,

    /// Write the combined history + forecast series to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Seed for the demo data and demo forecast generators
    #[arg(long)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "sales_dashboard=debug,sales_forecast=debug"
    } else {
        "sales_dashboard=info,sales_forecast=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

/// Configuration file first, then command-line overrides
fn build_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_json_file(path)?,
        None => DashboardConfig::default(),
    };

    if let Some(model) = &cli.model {
        config.model_path = Some(model.clone());
    }
    if let Some(default_data) = &cli.default_data {
        config.default_data_path = Some(default_data.clone());
    }
    if cli.allow_synthetic_values {
        config.allow_synthetic_values = true;
    }

    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;
    let model = load_model(&config);

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let pipeline = ForecastPipeline::new(&config, model.predictor());
    let run = pipeline.run(cli.data.as_deref(), &mut rng)?;
    let report = DashboardReport::new(&model.status, &run);

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report);
    }

    if let Some(path) = &cli.output {
        report.write_combined_csv(path)?;
        info!(path = %path.display(), rows = run.combined.len(), "Wrote combined series");
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
