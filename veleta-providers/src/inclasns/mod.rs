//! INCLASNS public-health indicator ingestion.
//!
//! INCLASNS (INdicadores CLAve del Sistema Nacional de Salud) publishes
//! key health indicators for Spain. [`HealthIndicatorsJob`] pulls the
//! indicator catalogue, keeps the indicators whose names match a
//! configurable pattern, and stages one dataset per matching indicator.

pub mod api;
pub mod config;
pub mod job;

pub use config::HealthConfig;
pub use job::HealthIndicatorsJob;
