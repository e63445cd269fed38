//! INCLASNS v2 API surface.
//!
//! The indicator catalogue is a flat array of `{codigo, nombre}` objects.
//! The data endpoint returns an array whose first element carries the
//! indicator code and a `datos` array of loosely-shaped row objects; row
//! keys vary per indicator, so rows stay as raw JSON until shaping.

use serde::Deserialize;

/// INCLASNS API base URL.
pub const INCLASNS_API_BASE: &str = "https://inclasns.sanidad.gob.es";

/// Indicator catalogue endpoint.
pub const INDICATOR_ENDPOINT: &str = "/api/v2/indicador";

/// Indicator data endpoint.
pub const DATA_ENDPOINT: &str = "/api/v2/datos";

/// Query parameter carrying the API key.
pub const API_KEY_PARAM: &str = "API_KEY";

/// One catalogue entry.
#[derive(Debug, Clone, Deserialize)]
pub struct IndicatorRow {
    /// Indicator code, e.g. `DEF07`.
    pub codigo: Option<String>,
    /// Indicator display name.
    pub nombre: Option<String>,
}
