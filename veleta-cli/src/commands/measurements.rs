//! Measurements command - stage daily measurements for one sensor.

use anyhow::Result;
use clap::Args;
use veleta_core::IngestJob;
use veleta_providers::{MeasurementsJob, OpenAqConfig};

use super::{CommonArgs, api_client, print_report};
use crate::Cli;

/// Arguments for the measurements command.
#[derive(Args)]
pub struct MeasurementsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Sensor to stage.
    #[arg(long, env = "VELETA_SENSOR_ID")]
    pub sensor_id: String,

    /// Inclusive start of the range (RFC 3339).
    #[arg(long, env = "VELETA_START_DATE")]
    pub start: Option<String>,

    /// Inclusive end of the range (RFC 3339); defaults to now.
    #[arg(long, env = "VELETA_END_DATE")]
    pub end: Option<String>,

    /// Secret holding the OpenAQ API key.
    #[arg(long, env = "VELETA_OPENAQ_SECRET", default_value = "tfm-ucm")]
    pub secret: String,
}

/// Runs the measurements command.
pub async fn run(args: &MeasurementsArgs, cli: &Cli) -> Result<()> {
    let config = build_config(args);

    let job = MeasurementsJob::new(
        api_client()?,
        args.common.writer()?,
        args.common.secrets(),
        config,
        &args.sensor_id,
    );
    let report = job.run().await?;

    print_report(&report, cli)
}

/// Builds the job configuration, applying each date override
/// independently of the other.
fn build_config(args: &MeasurementsArgs) -> OpenAqConfig {
    let mut config =
        OpenAqConfig::new(args.common.destination()).with_secret_name(&args.secret);
    if let Some(start) = &args.start {
        config.start_date = start.clone();
    }
    if let Some(end) = &args.end {
        config.end_date = end.clone();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(start: Option<&str>, end: Option<&str>) -> MeasurementsArgs {
        MeasurementsArgs {
            common: CommonArgs {
                bucket: Some("aq-staging".into()),
                region: "us-east-1".into(),
                staging_dir: None,
                secrets_dir: None,
            },
            sensor_id: "4270".into(),
            start: start.map(Into::into),
            end: end.map(Into::into),
            secret: "tfm-ucm".into(),
        }
    }

    #[test]
    fn test_end_override_applies_without_start() {
        let config = build_config(&args(None, Some("2024-06-30T00:00:00Z")));
        assert_eq!(config.end_date, "2024-06-30T00:00:00Z");
        assert_eq!(config.start_date, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_start_override_applies_without_end() {
        let config = build_config(&args(Some("2023-01-01T00:00:00Z"), None));
        assert_eq!(config.start_date, "2023-01-01T00:00:00Z");
        // The end keeps its default: now, UTC at second precision.
        assert!(config.end_date.ends_with('Z'));
    }
}
