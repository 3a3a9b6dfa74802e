//! Measurement utilities
//!
//! Shape measures come out of the geometry engine in image pixels and are
//! scaled to physical units with the image's microns-per-pixel factor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of decimals used when a caller does not ask for a precision.
pub const DEFAULT_DECIMALS: u32 = 2;

/// Unit used when presenting physical measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementUnit {
    /// Micrometers (the native scale of microns-per-pixel)
    #[default]
    Microns,
    /// Millimeters
    Millimeters,
}

impl MeasurementUnit {
    /// Converts a length in microns to this unit.
    pub fn from_microns(self, value: f64) -> f64 {
        match self {
            Self::Microns => value,
            Self::Millimeters => value / 1000.0,
        }
    }

    /// Short label ("µm" or "mm")
    pub fn label(self) -> &'static str {
        match self {
            Self::Microns => "µm",
            Self::Millimeters => "mm",
        }
    }
}

impl fmt::Display for MeasurementUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Microns => write!(f, "microns"),
            Self::Millimeters => write!(f, "millimeters"),
        }
    }
}

impl FromStr for MeasurementUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "microns" | "um" | "µm" => Ok(Self::Microns),
            "millimeters" | "mm" => Ok(Self::Millimeters),
            _ => Err(format!("Unknown measurement unit: {}", s)),
        }
    }
}

/// Most decimal places [`round_to`] honors; `f64` carries no more.
pub const MAX_DECIMALS: u32 = 15;

/// Rounds `value` to `decimals` decimal places, at most [`MAX_DECIMALS`].
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(MAX_DECIMALS) as i32);
    (value * factor).round() / factor
}
