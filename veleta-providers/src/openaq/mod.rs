//! OpenAQ air-quality ingestion.
//!
//! Two jobs share the OpenAQ v3 API:
//!
//! - [`SensorListingJob`] stages the measurement-parameter catalogue and
//!   the per-country location/sensor listing, and emits the sensor id list
//!   the orchestrator splits into fan-out batches.
//! - [`MeasurementsJob`] stages aggregated daily measurements for a single
//!   sensor over a date range; one invocation per sensor.

pub mod api;
pub mod config;
pub mod measurements;
pub mod sensors;

pub use config::OpenAqConfig;
pub use measurements::MeasurementsJob;
pub use sensors::SensorListingJob;
