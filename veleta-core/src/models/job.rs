//! Job identification types.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Job Kind
// ============================================================================

/// Enum of all Veleta ingestion jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// OpenAQ sensor listing (locations + parameters, emits sensor ids).
    SensorListing,
    /// OpenAQ daily measurements for one sensor.
    Measurements,
    /// INCLASNS public-health indicators.
    HealthIndicators,
    /// REE electricity demand series.
    Demand,
}

impl JobKind {
    /// Returns all job kinds in registry order.
    pub fn all() -> &'static [JobKind] {
        &[
            JobKind::SensorListing,
            JobKind::Measurements,
            JobKind::HealthIndicators,
            JobKind::Demand,
        ]
    }

    /// Returns the CLI name for this job.
    pub fn cli_name(&self) -> &'static str {
        match self {
            JobKind::SensorListing => "sensors",
            JobKind::Measurements => "measurements",
            JobKind::HealthIndicators => "health",
            JobKind::Demand => "demand",
        }
    }

    /// Returns the display name for this job.
    pub fn display_name(&self) -> &'static str {
        match self {
            JobKind::SensorListing => "OpenAQ sensor listing",
            JobKind::Measurements => "OpenAQ daily measurements",
            JobKind::HealthIndicators => "INCLASNS health indicators",
            JobKind::Demand => "REE electricity demand",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cli_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_names_are_unique() {
        let names: Vec<&str> = JobKind::all().iter().map(JobKind::cli_name).collect();
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(names.len(), deduped.len());
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&JobKind::SensorListing).unwrap();
        assert_eq!(json, "\"sensor_listing\"");
        let kind: JobKind = serde_json::from_str(&json).unwrap();
        assert_eq!(kind, JobKind::SensorListing);
    }
}
