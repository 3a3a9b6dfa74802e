//! Configuration and settings management for annokit
//!
//! Configuration is organized into logical sections:
//! - Shape defaults (fill/stroke style applied when a draw call omits a field)
//! - Engine settings (curve approximation used by the geometry engine)
//! - Measurement settings (precision and unit of reported dimensions)
//!
//! Files are JSON or TOML, chosen by extension.

use crate::error::{ConfigError, SettingsError, SettingsResult};
pub use annokit_core::units::MeasurementUnit;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default style applied to shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeDefaults {
    /// Fill color as `#rrggbb`
    pub fill_color: String,
    /// Fill opacity, 0..=1
    pub fill_alpha: f64,
    /// Stroke color as `#rrggbb`
    pub stroke_color: String,
    /// Stroke opacity, 0..=1
    pub stroke_alpha: f64,
    /// Stroke width in image pixels
    pub stroke_width: f64,
}

impl Default for ShapeDefaults {
    fn default() -> Self {
        Self {
            fill_color: "#ffffff".to_string(),
            fill_alpha: 1.0,
            stroke_color: "#000000".to_string(),
            stroke_alpha: 1.0,
            stroke_width: 20.0,
        }
    }
}

/// Geometry engine tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Number of segments used to approximate circles and ellipses
    pub curve_segments: usize,
    /// Maximum deviation when flattening Bezier segments
    pub flatten_tolerance: f64,
    /// Extra distance accepted by hit tests on open paths
    pub hit_tolerance: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            curve_segments: 128,
            flatten_tolerance: 0.05,
            hit_tolerance: 2.0,
        }
    }
}

/// How dimensions are reported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementSettings {
    /// Decimal places for area and perimeter
    pub decimals: u32,
    /// Display unit for the command-line summary
    pub unit: MeasurementUnit,
}

impl Default for MeasurementSettings {
    fn default() -> Self {
        Self {
            decimals: annokit_core::DEFAULT_DECIMALS,
            unit: MeasurementUnit::Microns,
        }
    }
}

/// Complete annokit configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Default shape style
    pub shape_defaults: ShapeDefaults,
    /// Geometry engine settings
    pub engine: EngineSettings,
    /// Measurement presentation
    pub measurement: MeasurementSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config location (`<config_dir>/annokit/config.toml`)
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("annokit").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".into())
            })
    }

    /// Loads the config at the default path, falling back to defaults when absent.
    pub fn load_or_default() -> Self {
        let path = match Self::default_path() {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!("{}; using default configuration", e);
                return Self::default();
            }
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into())
            }
        };

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into())
            }
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let style = &self.shape_defaults;
        check_color("shape_defaults.fill_color", &style.fill_color)?;
        check_color("shape_defaults.stroke_color", &style.stroke_color)?;
        check_unit_interval("shape_defaults.fill_alpha", style.fill_alpha)?;
        check_unit_interval("shape_defaults.stroke_alpha", style.stroke_alpha)?;

        if !(style.stroke_width >= 0.0) {
            return Err(ConfigError::ValueOutOfRange {
                key: "shape_defaults.stroke_width".to_string(),
                value: style.stroke_width.to_string(),
            }
            .into());
        }

        if self.engine.curve_segments < 8 {
            return Err(ConfigError::ValueOutOfRange {
                key: "engine.curve_segments".to_string(),
                value: self.engine.curve_segments.to_string(),
            }
            .into());
        }

        if !(self.engine.flatten_tolerance > 0.0) {
            return Err(ConfigError::ValueOutOfRange {
                key: "engine.flatten_tolerance".to_string(),
                value: self.engine.flatten_tolerance.to_string(),
            }
            .into());
        }

        if self.engine.hit_tolerance < 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "engine.hit_tolerance".to_string(),
                value: self.engine.hit_tolerance.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

fn check_unit_interval(key: &str, value: f64) -> SettingsResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ValueOutOfRange {
            key: key.to_string(),
            value: value.to_string(),
        }
        .into())
    }
}

fn check_color(key: &str, value: &str) -> SettingsResult<()> {
    let digits = value.strip_prefix('#').unwrap_or("");
    let valid = matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(SettingsError::InvalidSetting {
            key: key.to_string(),
            reason: format!("'{}' is not a #rrggbb color", value),
        })
    }
}
