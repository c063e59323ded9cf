//! Configuration for the TOE tile API service.

use std::path::PathBuf;

use aggregator::AggregatorConfig;
use toe_common::ToeResult;

/// Runtime configuration for the toe-api service.
#[derive(Debug, Clone)]
pub struct ToeApiConfig {
    /// HTTP listen port.
    pub port: u16,

    /// Optional path to a color-ramp JSON file; the compiled-in reference
    /// ramp is used when absent.
    pub ramp_file: Option<PathBuf>,

    /// Aggregator settings (retention window, bin size).
    pub aggregator: AggregatorConfig,
}

impl Default for ToeApiConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            ramp_file: None,
            aggregator: AggregatorConfig::default(),
        }
    }
}

impl ToeApiConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("TOE_API_PORT") {
            if let Ok(port) = val.parse() {
                config.port = port;
            }
        }

        if let Ok(val) = std::env::var("TOE_RAMP_FILE") {
            if !val.is_empty() {
                config.ramp_file = Some(PathBuf::from(val));
            }
        }

        config.aggregator = AggregatorConfig::from_env();
        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ToeResult<()> {
        self.aggregator.validate()
    }
}
