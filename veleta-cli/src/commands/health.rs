//! Health command - stage INCLASNS indicators.

use anyhow::Result;
use clap::Args;
use veleta_core::IngestJob;
use veleta_providers::{HealthConfig, HealthIndicatorsJob};

use super::{CommonArgs, api_client, print_report};
use crate::Cli;

/// Arguments for the health command.
#[derive(Args)]
pub struct HealthArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Regex selecting indicators by name.
    #[arg(long, env = "VELETA_INDICATOR_PATTERN", default_value = "EPOC|asma|tosferina")]
    pub pattern: String,

    /// Secret holding the INCLASNS API key.
    #[arg(long, env = "VELETA_INCLASNS_SECRET", default_value = "tfm-ucm-dev")]
    pub secret: String,
}

/// Runs the health command.
pub async fn run(args: &HealthArgs, cli: &Cli) -> Result<()> {
    let config = HealthConfig::new(args.common.destination())
        .with_indicator_pattern(&args.pattern)
        .with_secret_name(&args.secret);

    let job = HealthIndicatorsJob::new(
        api_client()?,
        args.common.writer()?,
        args.common.secrets(),
        config,
    );
    let report = job.run().await?;

    print_report(&report, cli)
}
