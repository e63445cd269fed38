//! Trait definitions for Veleta.
//!
//! This module defines the contract every ingestion job implements.

use crate::error::CoreError;
use crate::models::JobKind;

/// Trait for ingestion jobs.
///
/// Implementors are responsible for:
/// - Obtaining credentials from the secret store (failures propagate)
/// - Fetching data from the upstream API via the shared retry client
/// - Shaping rows and handing them to the staging writer
///
/// One invocation processes one logical unit of work (one sensor, one API,
/// one date range) to completion. Parallelism happens across invocations,
/// never inside one.
pub trait IngestJob: Send + Sync {
    /// The invocation output. Most jobs produce a [`crate::JobReport`];
    /// the sensor-listing job produces the plain id list handed to the
    /// batch splitter.
    type Output;

    /// Returns the kind of job this implementation handles.
    fn kind(&self) -> JobKind;

    /// Returns the display name for this job.
    fn display_name(&self) -> &str {
        self.kind().display_name()
    }

    /// Runs the job to completion.
    ///
    /// Retry exhaustion on a unit degrades to an empty result, not an
    /// error; only credential and storage failures are fatal.
    fn run(&self) -> impl std::future::Future<Output = Result<Self::Output, CoreError>> + Send;
}
