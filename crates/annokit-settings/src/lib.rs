//! annokit Settings Crate
//!
//! Handles the annotation defaults (shape style, geometry engine tuning,
//! measurement presentation) and their persistence as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{Config, EngineSettings, MeasurementSettings, ShapeDefaults};
pub use error::{ConfigError, SettingsError, SettingsResult};
