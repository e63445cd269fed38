//! Domain models for Veleta.
//!
//! ## Submodules
//!
//! - [`job`] - Job identification ([`JobKind`])
//! - [`report`] - Invocation results ([`JobReport`])

mod job;
mod report;

pub use job::JobKind;
pub use report::JobReport;
