//! REE electricity-demand ingestion.
//!
//! REE (Red Eléctrica de España) publishes national electricity series
//! through its open data API. [`DemandJob`] pulls one demand series over a
//! date range, splitting ranges longer than a year into calendar-year
//! blocks the API will accept, and stages the accumulated values.

pub mod api;
pub mod config;
pub mod job;

pub use config::DemandConfig;
pub use job::DemandJob;
