//! Fetch error types.

use thiserror::Error;

// ============================================================================
// Fetch Error
// ============================================================================

/// Error type for transport-level fetch failures.
///
/// These are the failures the retry loop classifies as transient; terminal
/// protocol outcomes (`Gone`, retry exhaustion) are not errors but
/// [`crate::FetchOutcome`] variants.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection-level failure.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Secret Error
// ============================================================================

/// Error type for secret store operations.
///
/// Credential failures are fatal to the invocation: every variant
/// propagates up instead of degrading to "no data".
#[derive(Debug, Error)]
pub enum SecretError {
    /// Secret not found.
    #[error("Secret not found: {0}")]
    NotFound(String),

    /// Secret exists but a required key is missing.
    #[error("Secret {secret} has no key {key}")]
    MissingKey {
        /// Secret name.
        secret: String,
        /// The key that was requested.
        key: String,
    },

    /// Secret payload is not a valid JSON object of strings.
    #[error("Malformed secret {0}: {1}")]
    Malformed(String, #[source] serde_json::Error),

    /// IO error reading a file-backed secret.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SecretError> for veleta_core::CoreError {
    fn from(err: SecretError) -> Self {
        veleta_core::CoreError::Credential(err.to_string())
    }
}
