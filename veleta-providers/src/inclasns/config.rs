//! INCLASNS job configuration.

/// Default pattern selecting the respiratory-health indicators.
pub const DEFAULT_INDICATOR_PATTERN: &str = "EPOC|asma|tosferina";

/// Default secret holding the INCLASNS API key.
pub const DEFAULT_SECRET_NAME: &str = "tfm-ucm-dev";

/// Key inside the secret carrying the API key.
pub const API_KEY_SECRET_KEY: &str = "inclasns";

/// Configuration for the health-indicators job.
#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// Staging bucket (used by the caller to build the writer).
    pub bucket: String,
    /// Regex selecting indicators by name.
    pub indicator_pattern: String,
    /// Secret name holding the API key.
    pub secret_name: String,
}

impl HealthConfig {
    /// Creates a configuration with the documented defaults.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            indicator_pattern: DEFAULT_INDICATOR_PATTERN.to_string(),
            secret_name: DEFAULT_SECRET_NAME.to_string(),
        }
    }

    /// Overrides the indicator selection pattern.
    pub fn with_indicator_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.indicator_pattern = pattern.into();
        self
    }

    /// Overrides the secret name.
    pub fn with_secret_name(mut self, name: impl Into<String>) -> Self {
        self.secret_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HealthConfig::new("health-staging");
        assert_eq!(config.indicator_pattern, "EPOC|asma|tosferina");
        assert_eq!(config.secret_name, "tfm-ucm-dev");
    }
}
