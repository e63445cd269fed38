// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Veleta CLI - scheduled ingestion jobs from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Stage the OpenAQ sensor listing and print the sensor ids
//! veleta sensors --bucket my-staging
//!
//! # Stage daily measurements for one sensor
//! veleta measurements --bucket my-staging --sensor-id 4270
//!
//! # Stage health indicators matching the default pattern
//! veleta health --bucket my-staging
//!
//! # Stage the electricity demand series for a range
//! veleta demand --bucket my-staging --start 2023-01-01 --end 2025-01-01
//!
//! # Split sensor ids into fan-out batches
//! veleta sensors --bucket my-staging | veleta split --batch-size 500
//!
//! # List available jobs
//! veleta jobs
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{demand, health, jobs, measurements, sensors, split};

// ============================================================================
// CLI Definition
// ============================================================================

/// Veleta CLI - data ingestion for Spanish environmental time series.
#[derive(Parser)]
#[command(name = "veleta")]
#[command(about = "Ingestion jobs for air-quality, health and electricity-demand data")]
#[command(version)]
#[command(author = "Veleta Contributors")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands, one per ingestion job plus the fan-out helpers.
#[derive(Subcommand)]
pub enum Commands {
    /// Stage OpenAQ parameters and locations, print the sensor ids.
    Sensors(sensors::SensorsArgs),

    /// Stage daily measurements for one OpenAQ sensor.
    Measurements(measurements::MeasurementsArgs),

    /// Stage INCLASNS health indicators matching a pattern.
    Health(health::HealthArgs),

    /// Stage the REE electricity demand series.
    Demand(demand::DemandArgs),

    /// Split ids into batches for the fan-out orchestrator.
    Split(split::SplitArgs),

    /// List available jobs.
    Jobs,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

// ============================================================================
// Logging Setup
// ============================================================================

/// Builds the log filter. Directives name the workspace crates by their
/// real targets (`veleta_fetch`, ...); the binary's own target is
/// `veleta_cli`.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(
            "veleta_core=debug,veleta_fetch=debug,veleta_providers=debug,\
             veleta_store=debug,veleta_cli=debug,info",
        )
    } else {
        EnvFilter::new(
            "veleta_core=warn,veleta_fetch=warn,veleta_providers=warn,\
             veleta_store=warn,veleta_cli=warn",
        )
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(log_filter(verbose))
        .init();
}


// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Sensors(args) => sensors::run(args, &cli).await,
        Commands::Measurements(args) => measurements::run(args, &cli).await,
        Commands::Health(args) => health::run(args, &cli).await,
        Commands::Demand(args) => demand::run(args, &cli).await,
        Commands::Split(args) => split::run(args, &cli),
        Commands::Jobs => jobs::run(&cli),
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }

    Ok(())
}
