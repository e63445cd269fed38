//! Health-indicators job.

use regex::Regex;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use veleta_core::{CoreError, IngestJob, JobKind, JobReport};
use veleta_fetch::{ApiClient, ApiRequest, FetchOutcome, SecretStore};
use veleta_store::{ColumnValues, StagingWriter, StoreError, Table, WriteOptions};

use super::api::{
    API_KEY_PARAM, DATA_ENDPOINT, INCLASNS_API_BASE, INDICATOR_ENDPOINT, IndicatorRow,
};
use super::config::{API_KEY_SECRET_KEY, HealthConfig};
use crate::error::ProviderError;
use crate::shape::{parse_rows, render_string};

// ============================================================================
// Job
// ============================================================================

/// Stages one dataset per health indicator matching the configured
/// pattern.
pub struct HealthIndicatorsJob {
    client: ApiClient,
    writer: StagingWriter,
    secrets: Arc<dyn SecretStore>,
    config: HealthConfig,
}

impl HealthIndicatorsJob {
    /// Creates the job.
    pub fn new(
        client: ApiClient,
        writer: StagingWriter,
        secrets: Arc<dyn SecretStore>,
        config: HealthConfig,
    ) -> Self {
        Self {
            client,
            writer,
            secrets,
            config,
        }
    }

    /// Fetches the data rows for one indicator code.
    ///
    /// The endpoint wraps the rows in a one-element array; empty query
    /// parameters request all sexes, regions and years.
    async fn fetch_indicator(&self, api_key: &str, code: &str) -> Option<Vec<Value>> {
        let request = ApiRequest::new(format!("{INCLASNS_API_BASE}{DATA_ENDPOINT}"))
            .with_param("indicador", code)
            .with_param("sexo", "")
            .with_param("ccaa", "")
            .with_param("anio", "")
            .with_param(API_KEY_PARAM, api_key);

        let FetchOutcome::Success(body) = self.client.fetch(&request).await else {
            return None;
        };

        let rows = body
            .as_array()?
            .first()?
            .get("datos")?
            .as_array()?
            .clone();
        Some(rows)
    }
}

impl IngestJob for HealthIndicatorsJob {
    type Output = JobReport;

    fn kind(&self) -> JobKind {
        JobKind::HealthIndicators
    }

    #[instrument(skip(self))]
    async fn run(&self) -> Result<JobReport, CoreError> {
        let pattern = Regex::new(&self.config.indicator_pattern).map_err(|e| {
            ProviderError::InvalidConfig(format!(
                "bad indicator pattern {:?}: {e}",
                self.config.indicator_pattern
            ))
        })?;

        let api_key = self
            .secrets
            .get_key(&self.config.secret_name, API_KEY_SECRET_KEY)?;

        let listing = ApiRequest::new(format!("{INCLASNS_API_BASE}{INDICATOR_ENDPOINT}"))
            .with_param(API_KEY_PARAM, &api_key);
        let FetchOutcome::Success(body) = self.client.fetch(&listing).await else {
            warn!("indicator catalogue unavailable");
            return Ok(JobReport::skipped("Indicator catalogue unavailable"));
        };

        let catalogue: Vec<IndicatorRow> = match body.as_array() {
            Some(rows) => parse_rows(rows.clone()),
            None => Vec::new(),
        };

        let selected: Vec<(String, String)> = catalogue
            .iter()
            .filter_map(|row| Some((row.codigo.clone()?, row.nombre.clone()?)))
            .filter(|(_, nombre)| pattern.is_match(nombre))
            .collect();

        if selected.is_empty() {
            info!(pattern = %self.config.indicator_pattern, "no indicators matched");
            return Ok(JobReport::skipped("No indicators matched the pattern"));
        }

        info!(
            indicators = ?selected.iter().map(|(c, _)| c.as_str()).collect::<Vec<_>>(),
            "fetching matched indicators"
        );

        let mut staged = 0;
        for (code, name) in &selected {
            let Some(rows) = self.fetch_indicator(&api_key, code).await else {
                warn!(code = %code, "indicator data unavailable, skipping it");
                continue;
            };

            let table =
                shape_indicator(code, name, &rows).map_err(Into::<CoreError>::into)?;
            if table.is_empty() {
                warn!(code = %code, "indicator carried no rows, skipping it");
                continue;
            }

            let path = format!("staging/inclasns/{}.parquet", dataset_file_name(name));
            self.writer
                .write(&path, &table, &WriteOptions::single_object())
                .await
                .map_err(Into::<CoreError>::into)?;
            staged += 1;
        }

        Ok(JobReport::ok(
            format!("Staged {staged} health indicator datasets"),
            staged,
        ))
    }
}

// ============================================================================
// Shaping
// ============================================================================

/// File name for an indicator dataset: spaces become underscores, dots
/// and commas are dropped.
fn dataset_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '.' && *c != ',')
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

/// Builds the staging table for one indicator.
///
/// Row keys vary per indicator, so the columns are the union of keys in
/// first-appearance order, every value rendered as a string. The code and
/// name columns from the catalogue are appended last.
fn shape_indicator(code: &str, name: &str, rows: &[Value]) -> Result<Table, StoreError> {
    let mut keys: Vec<String> = Vec::new();
    for row in rows {
        if let Some(object) = row.as_object() {
            for key in object.keys() {
                if !keys.iter().any(|k| k == key) {
                    keys.push(key.clone());
                }
            }
        }
    }

    let mut table = Table::new();
    for key in &keys {
        let values: Vec<Option<String>> = rows
            .iter()
            .map(|row| row.get(key).and_then(render_string))
            .collect();
        table = table.with_column(key, ColumnValues::Utf8(values))?;
    }

    table
        .with_column(
            "codigo",
            ColumnValues::Utf8(vec![Some(code.to_string()); rows.len()]),
        )?
        .with_column(
            "nombre",
            ColumnValues::Utf8(vec![Some(name.to_string()); rows.len()]),
        )
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
            Ok(HashMap::from([(
                "inclasns".to_string(),
                "health-key".to_string(),
            )]))
        }
    }

    fn memory_writer() -> StagingWriter {
        StagingWriter::new(Operator::new(services::Memory::default()).unwrap().finish())
    }

    fn job(transport: Arc<ScriptedTransport>, writer: StagingWriter) -> HealthIndicatorsJob {
        let client = ApiClient::with_transport(
            transport,
            RetryPolicy::new(1, Duration::from_secs(1)),
        );
        HealthIndicatorsJob::new(
            client,
            writer,
            Arc::new(StaticSecrets),
            HealthConfig::new("health-staging"),
        )
    }

    fn catalogue() -> String {
        json!([
            {"codigo": "DEF07", "nombre": "Mortalidad por EPOC"},
            {"codigo": "HOS01", "nombre": "Hospitalización por asma"},
            {"codigo": "CAR03", "nombre": "Mortalidad cardiovascular"}
        ])
        .to_string()
    }

    fn indicator_data(code: &str) -> String {
        json!([{
            "codigo": code,
            "datos": [
                {"anio": 2022, "valor": 11.4, "ambito": "Nacional"},
                {"anio": 2023, "valor": 10.9, "sexo": "Mujeres"}
            ]
        }])
        .to_string()
    }

    #[test]
    fn test_dataset_file_name_sanitized() {
        assert_eq!(
            dataset_file_name("Mortalidad por EPOC, ajustada por edad."),
            "Mortalidad_por_EPOC_ajustada_por_edad"
        );
    }

    #[test]
    fn test_shape_unions_keys_and_stringifies() {
        let rows = vec![
            json!({"anio": 2022, "valor": 11.4}),
            json!({"anio": 2023, "sexo": "Mujeres"}),
        ];
        let table = shape_indicator("DEF07", "Mortalidad por EPOC", &rows).unwrap();

        assert_eq!(
            table.column_names(),
            vec!["anio", "valor", "sexo", "codigo", "nombre"]
        );

        let Some(ColumnValues::Utf8(valor)) = table.column("valor") else {
            panic!("valor should be a string column");
        };
        assert_eq!(valor, &vec![Some("11.4".to_string()), None]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stages_one_dataset_per_matched_indicator() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(RawResponse::new(200, catalogue()));
        transport.push(RawResponse::new(200, indicator_data("DEF07")));
        transport.push(RawResponse::new(200, indicator_data("HOS01")));

        let writer = memory_writer();
        let report = job(transport.clone(), writer.clone()).run().await.unwrap();

        assert_eq!(report.rows, 2);
        assert!(writer
            .operator()
            .exists("staging/inclasns/Mortalidad_por_EPOC.parquet")
            .await
            .unwrap());
        assert!(writer
            .operator()
            .exists("staging/inclasns/Hospitalización_por_asma.parquet")
            .await
            .unwrap());

        // The cardiovascular indicator must not be requested.
        assert_eq!(transport.request_count(), 3);
        // Every request carries the API key as a query parameter.
        for request in transport.requests() {
            assert!(request
                .query
                .iter()
                .any(|(k, v)| k == "API_KEY" && v == "health-key"));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_indicator_skipped_others_staged() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(RawResponse::new(200, catalogue()));
        transport.push(RawResponse::new(500, "boom"));
        transport.push(RawResponse::new(200, indicator_data("HOS01")));

        let writer = memory_writer();
        let report = job(transport, writer.clone()).run().await.unwrap();

        assert_eq!(report.rows, 1);
        assert!(!writer
            .operator()
            .exists("staging/inclasns/Mortalidad_por_EPOC.parquet")
            .await
            .unwrap());
        assert!(writer
            .operator()
            .exists("staging/inclasns/Hospitalización_por_asma.parquet")
            .await
            .unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_catalogue_reports_skip() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(RawResponse::new(500, "boom"));

        let report = job(transport, memory_writer()).run().await.unwrap();
        assert!(report.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_bad_pattern_is_a_config_error() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = ApiClient::with_transport(
            transport,
            RetryPolicy::new(1, Duration::from_secs(1)),
        );
        let job = HealthIndicatorsJob::new(
            client,
            memory_writer(),
            Arc::new(StaticSecrets),
            HealthConfig::new("health-staging").with_indicator_pattern("(unclosed"),
        );

        assert!(matches!(
            job.run().await.unwrap_err(),
            CoreError::InvalidConfig(_)
        ));
    }
}
