//! Sensors command - stage the OpenAQ listing and print sensor ids.

use anyhow::Result;
use clap::Args;
use tracing::info;
use veleta_core::IngestJob;
use veleta_providers::{OpenAqConfig, SensorListingJob};

use super::{CommonArgs, api_client};
use crate::{Cli, OutputFormat};

/// Arguments for the sensors command.
#[derive(Args)]
pub struct SensorsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// ISO country code for the location listing.
    #[arg(long, env = "VELETA_COUNTRY", default_value = "ES")]
    pub country: String,

    /// Secret holding the OpenAQ API key.
    #[arg(long, env = "VELETA_OPENAQ_SECRET", default_value = "tfm-ucm")]
    pub secret: String,
}

/// Runs the sensors command.
pub async fn run(args: &SensorsArgs, cli: &Cli) -> Result<()> {
    let config = OpenAqConfig::new(args.common.destination())
        .with_country_code(&args.country)
        .with_secret_name(&args.secret);

    let job = SensorListingJob::new(
        api_client()?,
        args.common.writer()?,
        args.common.secrets(),
        config,
    );
    let ids = job.run().await?;

    info!(sensors = ids.len(), "sensor listing complete");

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&ids)?),
        OutputFormat::Text => {
            for id in &ids {
                println!("{id}");
            }
        }
    }
    Ok(())
}
