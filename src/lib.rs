//! # annokit
//!
//! Image annotation shapes for Rust hosts:
//! - Rectangles, ellipses, circles, polylines and polygons anchored to an image
//! - Styling, selection, visibility and drag-to-move
//! - JSON persistence in image coordinates
//! - Intersection and union of shapes
//!
//! ## Architecture
//!
//! annokit is organized as a workspace with multiple crates:
//!
//! 1. **annokit-core** - Error taxonomy and measurement helpers
//! 2. **annokit-settings** - Default style, engine tuning, JSON/TOML config files
//! 3. **annokit-annotations** - Shape model, controller, geometry engine
//! 4. **annokit** - Command-line front end that integrates all crates

pub mod commands;

pub use annokit_annotations as annotations;

pub use annokit_core::{AnnotationError, Error, MeasurementUnit, Result};

pub use annokit_annotations::{
    AnnotationController, Circle, Color, CombineOutcome, CoordinateOffset, Dimensions, Ellipse,
    PixmapSurface, Point, PointerEvent, Polygon, Polyline, RecordingSurface, Rectangle,
    RenderSurface, Segment, Shape, ShapeConfig, ShapeDimensions, ShapeJson, ShapeKind, ShapeStyle,
    StaticViewport, TransformMatrix, ViewportSource,
};

pub use annokit_settings::{Config, EngineSettings, MeasurementSettings, ShapeDefaults};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, leaving stdout to command results
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
