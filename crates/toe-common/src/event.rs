//! Lightning event types and ingest-boundary validation.
//!
//! Upstream ingestion payloads arrive as loosely-typed JSON records.
//! They are converted to strongly-typed [`LightningEvent`]s exactly once,
//! at the ingest boundary; records that fail validation are dropped there
//! and never reach the aggregation pipeline.

use serde::{Deserialize, Serialize};

/// A raw event record as received in an ingestion payload.
///
/// Field names follow the upstream feed; common synonyms are accepted as
/// serde aliases so partially normalized batches still parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEventRecord {
    /// Latitude in degrees
    #[serde(alias = "latitude")]
    pub lat: f64,

    /// Longitude in degrees
    #[serde(alias = "longitude")]
    pub lon: f64,

    /// Total optical energy in femtojoules
    #[serde(alias = "energy")]
    pub energy_fj: f64,

    /// Observation time in epoch milliseconds; defaults to ingest time
    #[serde(default, alias = "timeMs")]
    pub time_ms: Option<i64>,
}

/// A validated GLM lightning event. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightningEvent {
    /// Latitude in degrees, -90..=90
    pub lat: f64,
    /// Longitude in degrees, -180..=180
    pub lon: f64,
    /// Total optical energy in femtojoules, finite and non-negative
    pub energy_fj: f64,
    /// Observation time in epoch milliseconds
    pub observed_at_ms: i64,
}

impl LightningEvent {
    /// Validate a raw record, stamping a missing timestamp with `now_ms`.
    ///
    /// Returns `None` when latitude, longitude, or energy is non-finite,
    /// when |lat| > 90 or |lon| > 180, or when energy is negative. Callers
    /// skip such records silently; a malformed record is never an error.
    pub fn from_raw(raw: &RawEventRecord, now_ms: i64) -> Option<Self> {
        if !raw.lat.is_finite() || !raw.lon.is_finite() || !raw.energy_fj.is_finite() {
            return None;
        }
        if raw.lat.abs() > 90.0 || raw.lon.abs() > 180.0 || raw.energy_fj < 0.0 {
            return None;
        }

        Some(Self {
            lat: raw.lat,
            lon: raw.lon,
            energy_fj: raw.energy_fj,
            observed_at_ms: raw.time_ms.unwrap_or(now_ms),
        })
    }
}
