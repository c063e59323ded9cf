//! Configuration for the event aggregator.

use serde::{Deserialize, Serialize};
use toe_common::{ToeError, ToeResult};

/// Configuration for the event aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Retention window in milliseconds. Events older than this relative
    /// to "now" are evicted at the next prune.
    pub window_ms: i64,

    /// Target ground size of one spatial bin in meters.
    pub bin_meters: f64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            // 20 minutes, the typical deployment window
            window_ms: 1_200_000,
            bin_meters: 2000.0,
        }
    }
}

impl AggregatorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("TOE_WINDOW_MS") {
            if let Ok(ms) = val.parse() {
                config.window_ms = ms;
            }
        }

        if let Ok(val) = std::env::var("TOE_BIN_METERS") {
            if let Ok(meters) = val.parse() {
                config.bin_meters = meters;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ToeResult<()> {
        if self.window_ms <= 0 {
            return Err(ToeError::InvalidConfig(
                "window_ms must be > 0".to_string(),
            ));
        }

        if !self.bin_meters.is_finite() || self.bin_meters <= 0.0 {
            return Err(ToeError::InvalidConfig(
                "bin_meters must be a positive number".to_string(),
            ));
        }

        Ok(())
    }
}
