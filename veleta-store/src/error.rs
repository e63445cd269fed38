//! Store error types.

use thiserror::Error;

/// Error type for staging operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Column length disagreement while building a table.
    #[error("Column {column} has {actual} values, table has {expected} rows")]
    ColumnLength {
        /// Offending column name.
        column: String,
        /// Row count established by earlier columns.
        expected: usize,
        /// Row count of the offending column.
        actual: usize,
    },

    /// Duplicate column name.
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// A partition column named in the write options is not in the table.
    #[error("Unknown partition column: {0}")]
    UnknownPartitionColumn(String),

    /// Refusing to stage an empty table.
    #[error("Cannot write an empty table")]
    EmptyTable,

    /// Arrow conversion failed.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet encoding failed.
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Object storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] opendal::Error),
}

impl From<StoreError> for veleta_core::CoreError {
    fn from(err: StoreError) -> Self {
        veleta_core::CoreError::Storage(err.to_string())
    }
}
