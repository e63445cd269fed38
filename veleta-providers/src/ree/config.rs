//! REE job configuration.

use chrono::NaiveDateTime;

use super::api::DEMAND_SERIES_PATH;

/// Default aggregation granularity.
pub const DEFAULT_TIME_TRUNC: &str = "day";

/// Default staged dataset name.
pub const DEFAULT_DATASET_NAME: &str = "consumo_energetico";

/// Configuration for the demand job.
#[derive(Debug, Clone)]
pub struct DemandConfig {
    /// Staging bucket (used by the caller to build the writer).
    pub bucket: String,
    /// Inclusive start of the range.
    pub start: NaiveDateTime,
    /// Inclusive end of the range.
    pub end: NaiveDateTime,
    /// Aggregation granularity (`hour`, `day`, `month`).
    pub time_trunc: String,
    /// Series path under the API base.
    pub series_path: String,
    /// Staged dataset name (file stem under `staging/ree/`).
    pub dataset_name: String,
}

impl DemandConfig {
    /// Creates a configuration for the demand evolution series with the
    /// documented defaults.
    pub fn new(bucket: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            bucket: bucket.into(),
            start,
            end,
            time_trunc: DEFAULT_TIME_TRUNC.to_string(),
            series_path: DEMAND_SERIES_PATH.to_string(),
            dataset_name: DEFAULT_DATASET_NAME.to_string(),
        }
    }

    /// Overrides the aggregation granularity.
    pub fn with_time_trunc(mut self, trunc: impl Into<String>) -> Self {
        self.time_trunc = trunc.into();
        self
    }

    /// Overrides the series path.
    pub fn with_series_path(mut self, path: impl Into<String>) -> Self {
        self.series_path = path.into();
        self
    }

    /// Overrides the dataset name.
    pub fn with_dataset_name(mut self, name: impl Into<String>) -> Self {
        self.dataset_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_defaults() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().into();
        let end = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().into();
        let config = DemandConfig::new("energy-staging", start, end);

        assert_eq!(config.time_trunc, "day");
        assert_eq!(config.series_path, "/en/datos/demanda/evolucion");
        assert_eq!(config.dataset_name, "consumo_energetico");
    }
}
