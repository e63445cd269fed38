// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Veleta Store
//!
//! Columnar staging for Veleta ingestion jobs.
//!
//! Jobs shape their fetched rows into a [`Table`] (ordered, named, typed
//! columns) and hand it to the [`StagingWriter`], which encodes Parquet and
//! writes to object storage through an OpenDAL operator. Partitioned
//! datasets use Hive-style `col=value` directories; a write only ever
//! creates or updates the partitions present in the table, so concurrent
//! per-unit invocations can safely share one dataset.

pub mod error;
pub mod table;
pub mod writer;

pub use error::StoreError;
pub use table::{ColumnValues, Table};
pub use writer::{StagingWriter, WriteMode, WriteOptions, WriteReport};
