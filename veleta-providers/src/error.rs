//! Provider error types.

use thiserror::Error;
use veleta_core::CoreError;
use veleta_fetch::SecretError;
use veleta_store::StoreError;

/// Error type for job execution.
///
/// Only fatal failures surface here: credential retrieval
/// and staging writes. Upstream API trouble (rate limits, retired
/// versions, retry exhaustion) degrades to "no data" inside the job and
/// never becomes an error.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Credential retrieval failed.
    #[error("Credential error: {0}")]
    Secret(#[from] SecretError),

    /// Staging write failed.
    #[error("Staging error: {0}")]
    Store(#[from] StoreError),

    /// Job configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<ProviderError> for CoreError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Secret(e) => CoreError::Credential(e.to_string()),
            ProviderError::Store(e) => CoreError::Storage(e.to_string()),
            ProviderError::InvalidConfig(msg) => CoreError::InvalidConfig(msg),
        }
    }
}
