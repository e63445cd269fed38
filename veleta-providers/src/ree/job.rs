//! Electricity-demand job.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::{info, instrument, warn};

use veleta_core::{CoreError, IngestJob, JobKind, JobReport};
use veleta_fetch::{ApiClient, ApiRequest, FetchOutcome};
use veleta_store::{ColumnValues, StagingWriter, StoreError, Table, WriteOptions};

use super::api::{REE_API_BASE, REE_HOST, SeriesValue};
use super::config::DemandConfig;
use crate::shape::{parse_local_naive, parse_rows};

/// Datetime rendering the REE API expects in query parameters.
const REE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

// ============================================================================
// Job
// ============================================================================

/// Stages one electricity-demand series over a date range.
///
/// The REE open data API needs no credentials; it does reject windows
/// longer than a year, so long ranges are fetched in calendar-year blocks
/// and the values accumulated before staging.
pub struct DemandJob {
    client: ApiClient,
    writer: StagingWriter,
    config: DemandConfig,
}

impl DemandJob {
    /// Creates the job.
    pub fn new(client: ApiClient, writer: StagingWriter, config: DemandConfig) -> Self {
        Self {
            client,
            writer,
            config,
        }
    }

    /// Fetches one block of the series.
    async fn fetch_block(&self, start: NaiveDateTime, end: NaiveDateTime) -> Option<Vec<SeriesValue>> {
        let request = ApiRequest::new(format!("{REE_API_BASE}{}", self.config.series_path))
            .with_header("Host", REE_HOST)
            .with_param("start_date", start.format(REE_DATE_FORMAT).to_string())
            .with_param("end_date", end.format(REE_DATE_FORMAT).to_string())
            .with_param("time_trunc", &self.config.time_trunc);

        let FetchOutcome::Success(body) = self.client.fetch(&request).await else {
            return None;
        };

        let values = body
            .get("included")?
            .as_array()?
            .first()?
            .get("attributes")?
            .get("values")?
            .as_array()?
            .clone();
        Some(parse_rows(values))
    }
}

impl IngestJob for DemandJob {
    type Output = JobReport;

    fn kind(&self) -> JobKind {
        JobKind::Demand
    }

    #[instrument(skip(self), fields(series = %self.config.series_path))]
    async fn run(&self) -> Result<JobReport, CoreError> {
        let blocks = year_blocks(self.config.start, self.config.end);
        info!(blocks = blocks.len(), "fetching demand series");

        let mut values: Vec<SeriesValue> = Vec::new();
        for (start, end) in blocks {
            match self.fetch_block(start, end).await {
                Some(block_values) => {
                    values.extend(block_values.into_iter().filter(|v| v.value.is_some()));
                }
                None => {
                    warn!(
                        start = %start.format(REE_DATE_FORMAT),
                        end = %end.format(REE_DATE_FORMAT),
                        "block unavailable, skipping it"
                    );
                }
            }
        }

        if values.is_empty() {
            return Ok(JobReport::skipped("Demand series: no values in range"));
        }

        let table = shape_series(&values).map_err(Into::<CoreError>::into)?;
        let path = format!("staging/ree/{}.parquet", self.config.dataset_name);
        let report = self
            .writer
            .write(&path, &table, &WriteOptions::single_object())
            .await
            .map_err(Into::<CoreError>::into)?;

        Ok(JobReport::ok(
            format!("Staged demand series {}", self.config.dataset_name),
            report.rows,
        ))
    }
}

// ============================================================================
// Range splitting
// ============================================================================

/// Splits a range into calendar-year blocks when longer than 365 days.
///
/// Each block ends at 23:59:59 on December 31 of its starting year, or at
/// the range end for the last block. Short ranges come back unsplit.
pub(crate) fn year_blocks(
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Vec<(NaiveDateTime, NaiveDateTime)> {
    if (end - start).num_days() <= 365 {
        return vec![(start, end)];
    }

    let mut blocks = Vec::new();
    let mut block_start = start;
    while block_start < end {
        let year_end = NaiveDate::from_ymd_opt(block_start.year(), 12, 31)
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .unwrap_or(end);
        blocks.push((block_start, year_end.min(end)));

        let Some(next) = NaiveDate::from_ymd_opt(block_start.year() + 1, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        else {
            break;
        };
        block_start = next;
    }
    blocks
}

// ============================================================================
// Shaping
// ============================================================================

fn shape_series(values: &[SeriesValue]) -> Result<Table, StoreError> {
    Table::new()
        .with_column(
            "datetime",
            ColumnValues::Timestamp(
                values
                    .iter()
                    .map(|v| v.datetime.as_deref().and_then(parse_local_naive))
                    .collect(),
            ),
        )?
        .with_column(
            "value",
            ColumnValues::Float64(values.iter().map(|v| v.value).collect()),
        )?
        .with_column(
            "percentage",
            ColumnValues::Float64(values.iter().map(|v| v.percentage).collect()),
        )
}

// ============================================================================
// Tests
// ============================================================================
