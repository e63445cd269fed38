//! OpenAQ sensor-listing job.
//!
//! Stages the parameter catalogue and the per-country location listing,
//! then emits the deduplicated sensor id list. The orchestrator feeds that
//! list through the batch splitter and fans the batches out to one
//! measurements invocation per sensor.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use veleta_core::{CoreError, IngestJob, JobKind};
use veleta_fetch::{ApiClient, ApiRequest, FetchOutcome, Paginator, SecretStore};
use veleta_store::{ColumnValues, StagingWriter, StoreError, Table, WriteOptions};

use super::api::{
    API_KEY_HEADER, LOCATIONS_ENDPOINT, LocationRow, OPENAQ_API_BASE, PARAMETERS_ENDPOINT,
    ParameterRow,
};
use super::config::{API_KEY_SECRET_KEY, OpenAqConfig};
use crate::shape::parse_rows;

/// Staging path for the parameter catalogue.
const PARAMETERS_PATH: &str = "staging/OpenAQ/parameters/parameters.parquet";

/// Staging path for the location listing.
const LOCATIONS_PATH: &str = "staging/OpenAQ/locations/locations.parquet";

/// Pause between location pages. The listing endpoint is touched once per
/// run, so it can afford a politer pace than the per-sensor endpoints.
const LOCATION_PAGE_DELAY: Duration = Duration::from_millis(500);

// ============================================================================
// Job
// ============================================================================

/// Lists the sensors available in one country and stages the supporting
/// catalogues.
pub struct SensorListingJob {
    client: ApiClient,
    writer: StagingWriter,
    secrets: Arc<dyn SecretStore>,
    config: OpenAqConfig,
}

impl SensorListingJob {
    /// Creates the job.
    pub fn new(
        client: ApiClient,
        writer: StagingWriter,
        secrets: Arc<dyn SecretStore>,
        config: OpenAqConfig,
    ) -> Self {
        Self {
            client,
            writer,
            secrets,
            config,
        }
    }

    /// Fetches and stages the measurement-parameter catalogue.
    ///
    /// The catalogue is reference data; if it cannot be fetched the run
    /// continues without it rather than losing the location listing.
    async fn stage_parameters(&self, api_key: &str) -> Result<(), CoreError> {
        let request = ApiRequest::new(format!("{OPENAQ_API_BASE}{PARAMETERS_ENDPOINT}"))
            .with_header(API_KEY_HEADER, api_key)
            .with_param("limit", self.config.page_size.to_string());

        let FetchOutcome::Success(body) = self.client.fetch(&request).await else {
            warn!("parameter catalogue unavailable, continuing without it");
            return Ok(());
        };

        let Some(results) = body.get("results").and_then(|r| r.as_array()).cloned() else {
            warn!("parameter catalogue carried no results, continuing without it");
            return Ok(());
        };

        let parameters: Vec<ParameterRow> = parse_rows(results);
        let table = shape_parameters(&parameters).map_err(Into::<CoreError>::into)?;
        if table.is_empty() {
            return Ok(());
        }

        self.writer
            .write(PARAMETERS_PATH, &table, &WriteOptions::single_object())
            .await
            .map_err(Into::<CoreError>::into)?;
        Ok(())
    }
}

impl IngestJob for SensorListingJob {
    type Output = Vec<String>;

    fn kind(&self) -> JobKind {
        JobKind::SensorListing
    }

    #[instrument(skip(self), fields(country = %self.config.country_code))]
    async fn run(&self) -> Result<Vec<String>, CoreError> {
        let api_key = self
            .secrets
            .get_key(&self.config.secret_name, API_KEY_SECRET_KEY)?;

        self.stage_parameters(&api_key).await?;

        let template = ApiRequest::new(format!("{OPENAQ_API_BASE}{LOCATIONS_ENDPOINT}"))
            .with_header(API_KEY_HEADER, &api_key)
            .with_param("iso", &self.config.country_code);

        let rows = Paginator::new(&self.client)
            .with_page_delay(LOCATION_PAGE_DELAY)
            .fetch_all(&template, self.config.page_size)
            .await;
        let locations: Vec<LocationRow> = parse_rows(rows);

        if locations.is_empty() {
            warn!("no locations returned, emitting an empty sensor list");
            return Ok(Vec::new());
        }

        let table = shape_locations(&locations).map_err(Into::<CoreError>::into)?;
        self.writer
            .write(LOCATIONS_PATH, &table, &WriteOptions::single_object())
            .await
            .map_err(Into::<CoreError>::into)?;

        let sensor_ids = unique_sensor_ids(&locations);
        info!(
            locations = locations.len(),
            sensors = sensor_ids.len(),
            "sensor listing staged"
        );
        Ok(sensor_ids)
    }
}

// ============================================================================
// Shaping
// ============================================================================

fn shape_parameters(parameters: &[ParameterRow]) -> Result<Table, StoreError> {
    Table::new()
        .with_column(
            "id",
            ColumnValues::Int64(parameters.iter().map(|p| p.id).collect()),
        )?
        .with_column(
            "name",
            ColumnValues::Utf8(parameters.iter().map(|p| p.name.clone()).collect()),
        )?
        .with_column(
            "units",
            ColumnValues::Utf8(parameters.iter().map(|p| p.units.clone()).collect()),
        )?
        .with_column(
            "displayName",
            ColumnValues::Utf8(parameters.iter().map(|p| p.display_name.clone()).collect()),
        )
}

/// Explodes the listing into one row per (location, sensor) pair.
///
/// A location with no sensors still yields one row with null sensor
/// columns, so the location itself is not lost from the staged listing.
fn shape_locations(locations: &[LocationRow]) -> Result<Table, StoreError> {
    let mut id = Vec::new();
    let mut name = Vec::new();
    let mut locality = Vec::new();
    let mut timezone = Vec::new();
    let mut country = Vec::new();
    let mut latitud = Vec::new();
    let mut longitud = Vec::new();
    let mut datetime_first = Vec::new();
    let mut datetime_last = Vec::new();
    let mut sensor_id = Vec::new();
    let mut parameter_id = Vec::new();

    for location in locations {
        let exploded: Vec<(Option<i64>, Option<i64>)> = if location.sensors.is_empty() {
            vec![(None, None)]
        } else {
            location
                .sensors
                .iter()
                .map(|s| (s.id, s.parameter.as_ref().and_then(|p| p.id)))
                .collect()
        };

        for (sid, pid) in exploded {
            id.push(location.id);
            name.push(location.name.clone());
            locality.push(location.locality.clone());
            timezone.push(location.timezone.clone());
            country.push(location.country.as_ref().and_then(|c| c.name.clone()));
            latitud.push(location.coordinates.as_ref().and_then(|c| c.latitude));
            longitud.push(location.coordinates.as_ref().and_then(|c| c.longitude));
            datetime_first.push(
                location
                    .datetime_first
                    .as_ref()
                    .and_then(|d| d.local.clone()),
            );
            datetime_last.push(location.datetime_last.as_ref().and_then(|d| d.local.clone()));
            sensor_id.push(sid);
            parameter_id.push(pid);
        }
    }

    Table::new()
        .with_column("id", ColumnValues::Int64(id))?
        .with_column("name", ColumnValues::Utf8(name))?
        .with_column("locality", ColumnValues::Utf8(locality))?
        .with_column("timezone", ColumnValues::Utf8(timezone))?
        .with_column("country", ColumnValues::Utf8(country))?
        .with_column("latitud", ColumnValues::Float64(latitud))?
        .with_column("longitud", ColumnValues::Float64(longitud))?
        .with_column("datetimeFirst", ColumnValues::Utf8(datetime_first))?
        .with_column("datetimeLast", ColumnValues::Utf8(datetime_last))?
        .with_column("sensor_id", ColumnValues::Int64(sensor_id))?
        .with_column("parameter_id", ColumnValues::Int64(parameter_id))
}

/// Deduplicated sensor ids in order of first appearance.
fn unique_sensor_ids(locations: &[LocationRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for location in locations {
        for sensor in &location.sensors {
            if let Some(id) = sensor.id {
                if seen.insert(id) {
                    ids.push(id.to_string());
                }
            }
        }
    }
    ids
}

// ============================================================================
// Tests
// ============================================================================
