//! Job registry.
//!
//! Static descriptors for every ingestion job, used by the CLI for
//! listing and name lookup. Construction of the jobs themselves stays
//! with the caller, which owns the client, writer and secret store.

use std::sync::OnceLock;
use veleta_core::JobKind;

// ============================================================================
// Descriptor
// ============================================================================

/// Static description of one ingestion job.
#[derive(Debug, Clone, Copy)]
pub struct JobDescriptor {
    /// Job kind.
    pub kind: JobKind,
    /// One-line summary for listings.
    pub summary: &'static str,
    /// True when the job needs a per-unit argument (a sensor id).
    pub per_unit: bool,
}

/// Static storage for all job descriptors.
static DESCRIPTORS: OnceLock<Vec<JobDescriptor>> = OnceLock::new();

fn init_descriptors() -> Vec<JobDescriptor> {
    vec![
        JobDescriptor {
            kind: JobKind::SensorListing,
            summary: "Stage OpenAQ parameters and locations, emit sensor ids",
            per_unit: false,
        },
        JobDescriptor {
            kind: JobKind::Measurements,
            summary: "Stage daily measurements for one OpenAQ sensor",
            per_unit: true,
        },
        JobDescriptor {
            kind: JobKind::HealthIndicators,
            summary: "Stage INCLASNS health indicators matching a pattern",
            per_unit: false,
        },
        JobDescriptor {
            kind: JobKind::Demand,
            summary: "Stage the REE electricity demand series",
            per_unit: false,
        },
    ]
}

// ============================================================================
// Registry
// ============================================================================

/// Global registry of job descriptors, initialized lazily.
pub struct JobRegistry;

impl JobRegistry {
    /// Returns all job descriptors in registry order.
    pub fn all() -> &'static [JobDescriptor] {
        DESCRIPTORS.get_or_init(init_descriptors)
    }

    /// Gets a descriptor by kind.
    pub fn get(kind: JobKind) -> Option<&'static JobDescriptor> {
        Self::all().iter().find(|d| d.kind == kind)
    }

    /// Looks up a descriptor by CLI name.
    pub fn get_by_cli_name(name: &str) -> Option<&'static JobDescriptor> {
        Self::all().iter().find(|d| d.kind.cli_name() == name)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_registered() {
        for kind in JobKind::all() {
            assert!(JobRegistry::get(*kind).is_some(), "missing {kind:?}");
        }
        assert_eq!(JobRegistry::all().len(), JobKind::all().len());
    }

    #[test]
    fn test_cli_name_lookup() {
        let measurements = JobRegistry::get_by_cli_name("measurements").unwrap();
        assert_eq!(measurements.kind, JobKind::Measurements);
        assert!(measurements.per_unit);

        assert!(JobRegistry::get_by_cli_name("nope").is_none());
    }
}
