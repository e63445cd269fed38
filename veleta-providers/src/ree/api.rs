//! REE open data API surface.

use serde::Deserialize;

/// REE API base URL.
pub const REE_API_BASE: &str = "https://apidatos.ree.es";

/// Demand evolution series path.
pub const DEMAND_SERIES_PATH: &str = "/en/datos/demanda/evolucion";

/// The API routes on the `Host` header; requests without it are rejected.
pub const REE_HOST: &str = "apidatos.ree.es";

/// One value of a series, from `included[0].attributes.values`.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesValue {
    /// Measured value. Null entries are placeholder rows and are dropped.
    pub value: Option<f64>,
    /// Share of the total, when the series reports one.
    pub percentage: Option<f64>,
    /// Value instant, RFC 3339 with offset.
    pub datetime: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_series_value_tolerates_nulls() {
        let value: SeriesValue = serde_json::from_value(json!({
            "value": null,
            "datetime": "2024-01-01T00:00:00.000+01:00"
        }))
        .unwrap();
        assert!(value.value.is_none());
        assert!(value.percentage.is_none());
    }
}
