//! OpenAQ job configuration.
//!
//! Every knob is an explicit field with its default documented as a named
//! constant; nothing reads ambient environment variables from in here.

use chrono::{SecondsFormat, Utc};

/// Default country filter for the location listing.
pub const DEFAULT_COUNTRY_CODE: &str = "ES";

/// Default start of the measurement date range.
pub const DEFAULT_START_DATE: &str = "2024-01-01T00:00:00Z";

/// Default page size for paged OpenAQ endpoints.
pub const DEFAULT_PAGE_SIZE: u64 = 1000;

/// Default secret holding the OpenAQ API key.
pub const DEFAULT_SECRET_NAME: &str = "tfm-ucm";

/// Key inside the secret carrying the API key.
pub const API_KEY_SECRET_KEY: &str = "openaq";

/// Configuration for OpenAQ jobs.
#[derive(Debug, Clone)]
pub struct OpenAqConfig {
    /// Staging bucket (used by the caller to build the writer; paths in
    /// this crate are bucket-relative).
    pub bucket: String,
    /// ISO country code for the location listing.
    pub country_code: String,
    /// Inclusive start of the measurement range (RFC 3339).
    pub start_date: String,
    /// Inclusive end of the measurement range (RFC 3339).
    pub end_date: String,
    /// Rows requested per page.
    pub page_size: u64,
    /// Secret name holding the API key.
    pub secret_name: String,
}

impl OpenAqConfig {
    /// Creates a configuration with documented defaults; the end of the
    /// date range defaults to the current UTC time at second precision.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            start_date: DEFAULT_START_DATE.to_string(),
            end_date: default_end_date(),
            page_size: DEFAULT_PAGE_SIZE,
            secret_name: DEFAULT_SECRET_NAME.to_string(),
        }
    }

    /// Overrides the country filter.
    pub fn with_country_code(mut self, code: impl Into<String>) -> Self {
        self.country_code = code.into();
        self
    }

    /// Overrides the measurement date range.
    pub fn with_date_range(
        mut self,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        self.start_date = start.into();
        self.end_date = end.into();
        self
    }

    /// Overrides the secret name.
    pub fn with_secret_name(mut self, name: impl Into<String>) -> Self {
        self.secret_name = name.into();
        self
    }
}

/// Current UTC time, RFC 3339 at second precision with a `Z` suffix.
pub fn default_end_date() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
