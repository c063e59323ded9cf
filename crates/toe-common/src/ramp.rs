//! Color ramp configuration for TOE tile rendering.
//!
//! A ramp is an ascending sequence of `{threshold, color}` stops loaded
//! from JSON at configuration time. Lookup is by upper bound: a bin's
//! energy takes the color of the **first** stop whose threshold is greater
//! than or equal to it, and saturates to the last stop's color above the
//! top threshold. An energy exactly equal to a threshold takes that stop's
//! color, not the next one up.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ToeError, ToeResult};

/// An RGBA color, 0-255 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// A single ramp stop: the upper energy bound (femtojoules) and its color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RampStop {
    pub threshold: f64,
    pub color: Rgba,
}

/// An ordered threshold-to-color ramp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRamp {
    pub stops: Vec<RampStop>,
}

impl ColorRamp {
    /// Load a ramp from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> ToeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a ramp from a JSON string and validate it.
    pub fn from_json(json: &str) -> ToeResult<Self> {
        let ramp: ColorRamp =
            serde_json::from_str(json).map_err(|e| ToeError::InvalidRamp(e.to_string()))?;
        ramp.validate()?;
        Ok(ramp)
    }

    /// Check that the ramp is non-empty with strictly ascending thresholds.
    pub fn validate(&self) -> ToeResult<()> {
        if self.stops.is_empty() {
            return Err(ToeError::InvalidRamp("ramp has no stops".to_string()));
        }

        for pair in self.stops.windows(2) {
            if pair[1].threshold <= pair[0].threshold {
                return Err(ToeError::InvalidRamp(
                    "ramp thresholds must be strictly ascending".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Look up the color for an accumulated bin energy.
    ///
    /// Thresholds are upper bounds: the first stop with
    /// `threshold >= energy_fj` wins, and energies above the top threshold
    /// take the last stop's color.
    pub fn color_for(&self, energy_fj: f64) -> Rgba {
        self.stops
            .iter()
            .find(|stop| stop.threshold >= energy_fj)
            .or_else(|| self.stops.last())
            .map(|stop| stop.color)
            .unwrap_or(Rgba::TRANSPARENT)
    }

    /// The reference six-stop TOE ramp (femtojoules).
    pub fn default_toe() -> Self {
        Self {
            stops: vec![
                RampStop {
                    threshold: 0.0,
                    color: Rgba::TRANSPARENT,
                },
                RampStop {
                    threshold: 50.0,
                    color: Rgba::new(65, 182, 196, 160),
                },
                RampStop {
                    threshold: 200.0,
                    color: Rgba::new(44, 127, 184, 200),
                },
                RampStop {
                    threshold: 500.0,
                    color: Rgba::new(37, 52, 148, 220),
                },
                RampStop {
                    threshold: 1000.0,
                    color: Rgba::new(255, 255, 0, 240),
                },
                RampStop {
                    threshold: 2000.0,
                    color: Rgba::new(255, 140, 0, 255),
                },
                RampStop {
                    threshold: 5000.0,
                    color: Rgba::new(220, 20, 60, 255),
                },
            ],
        }
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::default_toe()
    }
}
