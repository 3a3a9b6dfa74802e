//! # annokit Annotations
//!
//! Shape annotations anchored to an image: a shape model, a cache/controller
//! that draws, styles, persists and combines shapes, and the geometry engine
//! they render through.
//!
//! ## Coordinate spaces
//!
//! ```text
//! image space   persisted JSON, caller-facing positions
//!     │  - offset (half the image size)
//!     ▼
//! canvas space  renderables, hit tests, surface view
//! ```
//!
//! Shape parameters stay in local, untransformed coordinates. A renderable is
//! placed with the shape's original transform and then shifted by the offset.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use annokit_annotations::{AnnotationController, ShapeConfig, StaticViewport};
//!
//! let mut controller = AnnotationController::default();
//! controller.build_canvas(&StaticViewport::new(2048.0, 1536.0, 0.25), None);
//! let id = controller.draw_circle(None, 300.0, 200.0, 40.0, None, &ShapeConfig::new(), true);
//! let json = controller.shapes_json_string(None)?;
//! ```

pub mod color;
pub mod controller;
pub mod engine;
pub mod events;
pub mod extract;
pub mod model;
pub mod serialization;
pub mod transform;
pub mod viewport;

pub use color::{Color, ShapeConfig, ShapeStyle};
pub use controller::{AnnotationController, CombineOutcome, ShapeDimensions};
pub use engine::{PixmapSurface, RecordingSurface, RenderSurface, Renderable, RenderableId, View};
pub use events::{EventFlags, PointerEvent, ShapeEvent};
pub use model::{
    Circle, Ellipse, Geometry, PathShape, Point, Polygon, Polyline, Rectangle, Segment, Shape,
    ShapeGeometry, ShapeKind,
};
pub use serialization::{GeometryJson, ShapeJson};
pub use transform::TransformMatrix;
pub use viewport::{CoordinateOffset, Dimensions, StaticViewport, ViewportSource};
