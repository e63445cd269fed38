//! OpenAQ v3 API surface: endpoints and tolerant response row types.
//!
//! Only the fields the staging schema needs are modeled; everything else
//! in the payload is ignored. All fields are optional so one odd row never
//! fails a unit.

use serde::Deserialize;

/// OpenAQ API base URL.
pub const OPENAQ_API_BASE: &str = "https://api.openaq.org";

/// Measurement-parameter catalogue endpoint.
pub const PARAMETERS_ENDPOINT: &str = "/v3/parameters";

/// Location listing endpoint.
pub const LOCATIONS_ENDPOINT: &str = "/v3/locations";

/// Header carrying the OpenAQ API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Aggregated daily measurements endpoint for one sensor.
pub fn daily_measurements_url(sensor_id: &str) -> String {
    format!("{OPENAQ_API_BASE}/v3/sensors/{sensor_id}/measurements/daily")
}

// ============================================================================
// Shared fragments
// ============================================================================

/// A datetime reported in both UTC and station-local form.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalInstant {
    /// Station-local rendering, with offset.
    pub local: Option<String>,
    /// UTC rendering.
    pub utc: Option<String>,
}

/// Geographic coordinates.
#[derive(Debug, Clone, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
}

// ============================================================================
// Parameters
// ============================================================================

/// One measurement parameter (pollutant) from the catalogue.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterRow {
    /// Parameter id.
    pub id: Option<i64>,
    /// Machine name, e.g. `pm25`.
    pub name: Option<String>,
    /// Measurement units.
    pub units: Option<String>,
    /// Human-readable name.
    pub display_name: Option<String>,
}

// ============================================================================
// Locations
// ============================================================================

/// Country reference embedded in a location.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryRef {
    /// Country display name.
    pub name: Option<String>,
}

/// Parameter reference embedded in a sensor.
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterRef {
    /// Parameter id.
    pub id: Option<i64>,
}

/// Sensor reference embedded in a location.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorRef {
    /// Sensor id.
    pub id: Option<i64>,
    /// The parameter this sensor measures.
    pub parameter: Option<ParameterRef>,
}

/// One location row from the listing endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRow {
    /// Location id.
    pub id: Option<i64>,
    /// Location name.
    pub name: Option<String>,
    /// Locality / municipality.
    pub locality: Option<String>,
    /// IANA timezone.
    pub timezone: Option<String>,
    /// Country reference.
    pub country: Option<CountryRef>,
    /// Coordinates.
    pub coordinates: Option<Coordinates>,
    /// First measurement instant.
    pub datetime_first: Option<LocalInstant>,
    /// Last measurement instant.
    pub datetime_last: Option<LocalInstant>,
    /// Sensors installed at this location.
    #[serde(default)]
    pub sensors: Vec<SensorRef>,
}

// ============================================================================
// Daily measurements
// ============================================================================

/// Measurement period with from/to instants.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    /// Period start.
    pub datetime_from: Option<LocalInstant>,
    /// Period end.
    pub datetime_to: Option<LocalInstant>,
}

/// Daily summary statistics. Optional on the wire; dropped when absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Summary {
    /// Minimum.
    pub min: Option<f64>,
    /// 2nd percentile.
    pub q02: Option<f64>,
    /// 25th percentile.
    pub q25: Option<f64>,
    /// Median.
    pub median: Option<f64>,
    /// 75th percentile.
    pub q75: Option<f64>,
    /// 98th percentile.
    pub q98: Option<f64>,
    /// Maximum.
    pub max: Option<f64>,
    /// Mean.
    pub avg: Option<f64>,
    /// Standard deviation.
    pub sd: Option<f64>,
}

/// One aggregated daily measurement row.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasurementRow {
    /// Aggregated value.
    pub value: Option<f64>,
    /// Aggregation period.
    pub period: Option<Period>,
    /// Summary statistics.
    pub summary: Option<Summary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_row_tolerates_missing_fields() {
        let row: LocationRow = serde_json::from_value(json!({
            "id": 5,
            "name": "Madrid Centro",
            "sensors": [{"id": 100, "parameter": {"id": 2}}]
        }))
        .unwrap();

        assert_eq!(row.id, Some(5));
        assert!(row.country.is_none());
        assert_eq!(row.sensors.len(), 1);
        assert_eq!(row.sensors[0].parameter.as_ref().unwrap().id, Some(2));
    }

    #[test]
    fn test_measurement_row_without_summary() {
        let row: MeasurementRow = serde_json::from_value(json!({
            "value": 12.5,
            "period": {"datetimeFrom": {"local": "2024-01-01T00:00:00+01:00"}}
        }))
        .unwrap();

        assert_eq!(row.value, Some(12.5));
        assert!(row.summary.is_none());
    }

    #[test]
    fn test_daily_measurements_url() {
        assert_eq!(
            daily_measurements_url("4270"),
            "https://api.openaq.org/v3/sensors/4270/measurements/daily"
        );
    }
}
