//! OpenAQ per-sensor daily measurements job.
//!
//! One invocation stages the aggregated daily series of a single sensor.
//! The orchestrator launches one invocation per sensor id emitted by the
//! listing job, so a sensor with no data (or a retired API) reports itself
//! as skipped instead of failing the whole fan-out.

use std::sync::Arc;
use tracing::{info, instrument};

use veleta_core::{CoreError, IngestJob, JobKind, JobReport};
use veleta_fetch::{ApiClient, ApiRequest, Paginator, SecretStore};
use veleta_store::{ColumnValues, StagingWriter, StoreError, Table, WriteOptions};

use super::api::{API_KEY_HEADER, MeasurementRow, Summary, daily_measurements_url};
use super::config::{API_KEY_SECRET_KEY, OpenAqConfig};
use crate::shape::{parse_local_naive, parse_rows};

// ============================================================================
// Job
// ============================================================================

/// Stages aggregated daily measurements for one sensor.
pub struct MeasurementsJob {
    client: ApiClient,
    writer: StagingWriter,
    secrets: Arc<dyn SecretStore>,
    config: OpenAqConfig,
    sensor_id: String,
}

impl MeasurementsJob {
    /// Creates the job for one sensor.
    pub fn new(
        client: ApiClient,
        writer: StagingWriter,
        secrets: Arc<dyn SecretStore>,
        config: OpenAqConfig,
        sensor_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            writer,
            secrets,
            config,
            sensor_id: sensor_id.into(),
        }
    }

    fn staging_path(&self) -> String {
        format!("staging/OpenAQ/measurements/{}.parquet", self.sensor_id)
    }
}

impl IngestJob for MeasurementsJob {
    type Output = JobReport;

    fn kind(&self) -> JobKind {
        JobKind::Measurements
    }

    #[instrument(skip(self), fields(sensor_id = %self.sensor_id))]
    async fn run(&self) -> Result<JobReport, CoreError> {
        let api_key = self
            .secrets
            .get_key(&self.config.secret_name, API_KEY_SECRET_KEY)?;

        let template = ApiRequest::new(daily_measurements_url(&self.sensor_id))
            .with_header(API_KEY_HEADER, &api_key)
            .with_param("datetime_from", &self.config.start_date)
            .with_param("datetime_to", &self.config.end_date);

        let rows = Paginator::new(&self.client)
            .fetch_all(&template, self.config.page_size)
            .await;
        let measurements: Vec<MeasurementRow> = parse_rows(rows);

        if measurements.is_empty() {
            info!("no measurements in range, skipping staging write");
            return Ok(JobReport::skipped(format!(
                "Sensor {}: no measurements found",
                self.sensor_id
            )));
        }

        let table =
            shape_measurements(&self.sensor_id, &measurements).map_err(Into::<CoreError>::into)?;
        let report = self
            .writer
            .write(&self.staging_path(), &table, &WriteOptions::single_object())
            .await
            .map_err(Into::<CoreError>::into)?;

        Ok(JobReport::ok(
            format!("Sensor {}: staged daily measurements", self.sensor_id),
            report.rows,
        ))
    }
}

// ============================================================================
// Shaping
// ============================================================================

/// Builds the staging table for one sensor's daily series.
///
/// Summary statistics columns are appended only when at least one row
/// carries a summary, mirroring the varying payload of the endpoint.
fn shape_measurements(
    sensor_id: &str,
    measurements: &[MeasurementRow],
) -> Result<Table, StoreError> {
    let local_from = |row: &MeasurementRow| {
        row.period
            .as_ref()
            .and_then(|p| p.datetime_from.as_ref())
            .and_then(|d| d.local.as_deref())
            .and_then(parse_local_naive)
    };
    let local_to = |row: &MeasurementRow| {
        row.period
            .as_ref()
            .and_then(|p| p.datetime_to.as_ref())
            .and_then(|d| d.local.as_deref())
            .and_then(parse_local_naive)
    };

    let mut table = Table::new()
        .with_column(
            "sensor_id",
            ColumnValues::Utf8(vec![Some(sensor_id.to_string()); measurements.len()]),
        )?
        .with_column(
            "value",
            ColumnValues::Float64(measurements.iter().map(|m| m.value).collect()),
        )?
        .with_column(
            "datetime_from",
            ColumnValues::Timestamp(measurements.iter().map(local_from).collect()),
        )?
        .with_column(
            "datetime_to",
            ColumnValues::Timestamp(measurements.iter().map(local_to).collect()),
        )?;

    if measurements.iter().any(|m| m.summary.is_some()) {
        let stat = |pick: fn(&Summary) -> Option<f64>| {
            ColumnValues::Float64(
                measurements
                    .iter()
                    .map(|m| m.summary.as_ref().and_then(pick))
                    .collect(),
            )
        };

        table = table
            .with_column("min", stat(|s| s.min))?
            .with_column("q02", stat(|s| s.q02))?
            .with_column("q25", stat(|s| s.q25))?
            .with_column("median", stat(|s| s.median))?
            .with_column("q75", stat(|s| s.q75))?
            .with_column("q98", stat(|s| s.q98))?
            .with_column("max", stat(|s| s.max))?
            .with_column("avg", stat(|s| s.avg))?
            .with_column("sd", stat(|s| s.sd))?;
    }

    Ok(table)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use opendal::Operator;
    use opendal::services;
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;
    use veleta_fetch::transport::scripted::ScriptedTransport;
    use veleta_fetch::{RawResponse, RetryPolicy, SecretError};

    struct StaticSecrets;

    impl SecretStore for StaticSecrets {
        fn get(&self, _name: &str) -> Result<HashMap<String, String>, SecretError> {
            Ok(HashMap::from([("openaq".to_string(), "key-123".to_string())]))
        }
    }

    fn memory_writer() -> StagingWriter {
        StagingWriter::new(Operator::new(services::Memory::default()).unwrap().finish())
    }

    fn job(transport: Arc<ScriptedTransport>, writer: StagingWriter) -> MeasurementsJob {
        let client = ApiClient::with_transport(
            transport,
            RetryPolicy::new(2, Duration::from_secs(1)),
        );
        MeasurementsJob::new(
            client,
            writer,
            Arc::new(StaticSecrets),
            OpenAqConfig::new("aq-staging"),
            "4270",
        )
    }

    fn measurement(value: f64, day: u32) -> serde_json::Value {
        json!({
            "value": value,
            "period": {
                "datetimeFrom": {"local": format!("2024-01-{day:02}T00:00:00+01:00")},
                "datetimeTo": {"local": format!("2024-01-{day:02}T23:59:59+01:00")}
            },
            "summary": {"min": value - 1.0, "max": value + 1.0, "avg": value}
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_stages_one_object_per_sensor() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(RawResponse::new(
            200,
            json!({
                "meta": {"found": 2, "limit": 1000},
                "results": [measurement(12.5, 1), measurement(14.0, 2)]
            })
            .to_string(),
        ));

        let writer = memory_writer();
        let report = job(transport.clone(), writer.clone()).run().await.unwrap();

        assert_eq!(report.status_code, 200);
        assert_eq!(report.rows, 2);
        assert!(writer
            .operator()
            .exists("staging/OpenAQ/measurements/4270.parquet")
            .await
            .unwrap());

        // The date range rides on every page request.
        let first = &transport.requests()[0];
        assert!(first.query.iter().any(|(k, _)| k == "datetime_from"));
        assert!(first.query.iter().any(|(k, _)| k == "datetime_to"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_data_reports_skip_without_write() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(RawResponse::new(
            200,
            json!({"meta": {"found": 0, "limit": 1000}, "results": []}).to_string(),
        ));

        let writer = memory_writer();
        let report = job(transport, writer.clone()).run().await.unwrap();

        assert!(report.is_empty());
        assert!(report.message.contains("no measurements found"));
        assert!(!writer
            .operator()
            .exists("staging/OpenAQ/measurements/4270.parquet")
            .await
            .unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_degrade_to_skip() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(RawResponse::new(500, ""));
        transport.push(RawResponse::new(500, ""));

        let report = job(transport, memory_writer()).run().await.unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_summary_columns_present_only_when_reported() {
        let with_summary: Vec<MeasurementRow> = vec![
            serde_json::from_value(measurement(10.0, 1)).unwrap(),
            serde_json::from_value(json!({"value": 11.0})).unwrap(),
        ];
        let table = shape_measurements("4270", &with_summary).unwrap();
        assert!(table.column("avg").is_some());
        assert_eq!(table.num_rows(), 2);

        let bare: Vec<MeasurementRow> =
            vec![serde_json::from_value(json!({"value": 11.0})).unwrap()];
        let table = shape_measurements("4270", &bare).unwrap();
        assert!(table.column("avg").is_none());
        assert_eq!(
            table.column_names(),
            vec!["sensor_id", "value", "datetime_from", "datetime_to"]
        );
    }

    #[test]
    fn test_local_timestamps_dropped_of_offset() {
        let rows: Vec<MeasurementRow> =
            vec![serde_json::from_value(measurement(10.0, 5)).unwrap()];
        let table = shape_measurements("4270", &rows).unwrap();

        let Some(ColumnValues::Timestamp(from)) = table.column("datetime_from") else {
            panic!("datetime_from should be a timestamp column");
        };
        // +01:00 offset normalized to UTC before dropping it.
        assert_eq!(from[0].unwrap().to_string(), "2024-01-04 23:00:00");
    }
}
