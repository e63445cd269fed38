// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Veleta Providers
//!
//! One module per upstream API:
//!
//! - [`openaq`] - air-quality sensors: the sensor-listing job (locations +
//!   measurement parameters, emits the sensor id list for fan-out) and the
//!   per-sensor daily-measurements job
//! - [`inclasns`] - Spanish public-health indicators
//! - [`ree`] - Spanish electricity-demand series
//!
//! Every job goes through the shared retry client in `veleta-fetch` and
//! stages its rows through `veleta-store`. Configuration is an explicit
//! per-job struct with documented defaults; credentials come from the
//! secret store, never from source or ambient process state.

pub mod error;
pub mod inclasns;
pub mod openaq;
pub mod ree;
pub mod registry;
mod shape;

pub use error::ProviderError;
pub use inclasns::{HealthConfig, HealthIndicatorsJob};
pub use openaq::{MeasurementsJob, OpenAqConfig, SensorListingJob};
pub use ree::{DemandConfig, DemandJob};
pub use registry::{JobDescriptor, JobRegistry};
