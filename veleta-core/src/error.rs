//! Core error types for Veleta.

use thiserror::Error;

/// Core error type for Veleta operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid job configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid data from an upstream API response.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Credential retrieval failed. Fatal: credentials are required.
    #[error("Credential error: {0}")]
    Credential(String),

    /// Staging storage failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
