//! Invocation result types.

use serde::{Deserialize, Serialize};

// ============================================================================
// Job Report
// ============================================================================

/// Structured result of one job invocation.
///
/// Every job finishes with a report: a status code, a human-readable
/// message, and the number of rows staged. "No data for this unit" is a
/// normal completion (the scheduler should not re-run the unit), so it is
/// reported with a success status and zero rows rather than as an error.
///
/// Field names on the wire match the invocation contract consumed by the
/// workflow orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    /// Status code, HTTP-style. 200 for any normal completion.
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Human-readable outcome description.
    #[serde(rename = "body")]
    pub message: String,
    /// Number of rows staged by this invocation.
    #[serde(rename = "size")]
    pub rows: usize,
}

impl JobReport {
    /// Creates a success report.
    pub fn ok(message: impl Into<String>, rows: usize) -> Self {
        Self {
            status_code: 200,
            message: message.into(),
            rows,
        }
    }

    /// Creates a "no data for this unit" report.
    ///
    /// Skips are normal completions, not failures: retry exhaustion or an
    /// empty result set must not fail the overall job.
    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            message: message.into(),
            rows: 0,
        }
    }

    /// Returns true if this invocation staged no rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let report = JobReport::ok("staged", 42);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["body"], "staged");
        assert_eq!(json["size"], 42);
    }

    #[test]
    fn test_skipped_is_success_with_zero_rows() {
        let report = JobReport::skipped("no measurements");
        assert_eq!(report.status_code, 200);
        assert!(report.is_empty());
    }
}
