// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Veleta Core
//!
//! Core types and contracts shared by all Veleta ingestion crates.
//!
//! Veleta is a collection of scheduled ingestion jobs: each job pulls one
//! time series (air-quality measurements, public-health indicators,
//! electricity demand) from a third-party REST API and stages the result as
//! columnar files in object storage. This crate holds everything the jobs
//! have in common:
//!
//! - [`JobKind`] - Enum of all ingestion jobs
//! - [`JobReport`] - Structured invocation result (status, message, row count)
//! - [`IngestJob`] - Trait every job implements
//! - [`split_batches`] - Pure batching utility for fan-out of id lists
//! - [`CoreError`] - Shared error type

pub mod batch;
pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export model types
pub use models::{JobKind, JobReport};

// Re-export utilities and traits
pub use batch::split_batches;
pub use traits::IngestJob;
