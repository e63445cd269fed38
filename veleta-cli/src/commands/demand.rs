//! Demand command - stage the REE electricity demand series.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use clap::Args;
use veleta_core::IngestJob;
use veleta_providers::{DemandConfig, DemandJob};

use super::{CommonArgs, api_client, print_report};
use crate::Cli;

/// Arguments for the demand command.
#[derive(Args)]
pub struct DemandArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Inclusive start of the range (`YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`).
    #[arg(long, env = "VELETA_DEMAND_START", value_parser = parse_datetime, default_value = "2024-01-01")]
    pub start: NaiveDateTime,

    /// Inclusive end of the range; defaults to now (UTC).
    #[arg(long, env = "VELETA_DEMAND_END", value_parser = parse_datetime)]
    pub end: Option<NaiveDateTime>,

    /// Aggregation granularity (hour, day, month).
    #[arg(long, env = "VELETA_TIME_TRUNC", default_value = "day")]
    pub time_trunc: String,

    /// Staged dataset name.
    #[arg(long, env = "VELETA_DEMAND_DATASET", default_value = "consumo_energetico")]
    pub dataset: String,
}

/// Runs the demand command.
pub async fn run(args: &DemandArgs, cli: &Cli) -> Result<()> {
    let end = args.end.unwrap_or_else(|| Utc::now().naive_utc());
    let config = DemandConfig::new(args.common.destination(), args.start, end)
        .with_time_trunc(&args.time_trunc)
        .with_dataset_name(&args.dataset);

    let job = DemandJob::new(api_client()?, args.common.writer()?, config);
    let report = job.run().await?;

    print_report(&report, cli)
}

/// Parses a date or datetime argument, dates landing at midnight.
fn parse_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.into())
        .map_err(|_| format!("not a date: {raw} (expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_accepts_both_shapes() {
        assert_eq!(
            parse_datetime("2024-01-01").unwrap().to_string(),
            "2024-01-01 00:00:00"
        );
        assert_eq!(
            parse_datetime("2024-01-01T06:30:00").unwrap().to_string(),
            "2024-01-01 06:30:00"
        );
        assert!(parse_datetime("January 1st").is_err());
    }
}
