use std::fmt;

use annokit_settings::EngineSettings;
use serde::{Deserialize, Serialize};

use crate::engine::Renderable;
use crate::serialization::GeometryJson;
use crate::transform::TransformMatrix;

mod circle;
mod ellipse;
mod path;
mod rectangle;
mod shape;

pub use circle::Circle;
pub use ellipse::Ellipse;
pub use path::{PathShape, Polygon, Polyline};
pub use rectangle::Rectangle;
pub use shape::{Shape, ShapeBase};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// `self + delta`, component-wise.
    pub fn offset_by(&self, delta: Point) -> Point {
        Point::new(self.x + delta.x, self.y + delta.y)
    }
}

/// Path vertex with optional Bezier handles relative to `point`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub point: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_in: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_out: Option<Point>,
}

impl Segment {
    /// Straight corner at `point`.
    pub fn new(point: Point) -> Self {
        Self {
            point,
            handle_in: None,
            handle_out: None,
        }
    }

    pub fn with_handle_in(mut self, handle: Point) -> Self {
        self.handle_in = Some(handle);
        self
    }

    pub fn with_handle_out(mut self, handle: Point) -> Self {
        self.handle_out = Some(handle);
        self
    }

    pub fn has_handles(&self) -> bool {
        self.handle_in.is_some() || self.handle_out.is_some()
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            point: Point::new(self.point.x + dx, self.point.y + dy),
            ..*self
        }
    }

    /// Point through the full affine, handles through its linear part.
    pub fn transformed(&self, matrix: &TransformMatrix) -> Self {
        Self {
            point: matrix.apply(self.point),
            handle_in: self.handle_in.map(|h| matrix.apply_vector(h)),
            handle_out: self.handle_out.map(|h| matrix.apply_vector(h)),
        }
    }
}

impl From<Point> for Segment {
    fn from(point: Point) -> Self {
        Segment::new(point)
    }
}

/// Closed set of shape variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Circle,
    Polyline,
    Polygon,
}

impl ShapeKind {
    /// Tag used in shape JSON and as the generated id prefix.
    pub fn type_tag(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Circle => "circle",
            ShapeKind::Polyline => "polyline",
            ShapeKind::Polygon => "polygon",
        }
    }

    pub fn is_path(self) -> bool {
        matches!(self, ShapeKind::Polyline | ShapeKind::Polygon)
    }

    /// Only polylines have no area.
    pub fn has_area(self) -> bool {
        self != ShapeKind::Polyline
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

/// Per-variant behavior over the parametric fields.
///
/// Parametric fields are local coordinates: no original transform and no
/// canvas offset applied.
pub trait Geometry {
    fn kind(&self) -> ShapeKind;

    /// Renderable for the parametric fields, before any transform.
    fn outline(&self, engine: &EngineSettings) -> Renderable;

    /// Moves the parametric fields by a local-space delta.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Own fields in persisted form.
    fn to_geometry_json(&self) -> GeometryJson;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeGeometry {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Circle(Circle),
    Polyline(Polyline),
    Polygon(Polygon),
}

impl ShapeGeometry {
    pub fn as_path(&self) -> Option<&dyn PathShape> {
        match self {
            ShapeGeometry::Polyline(s) => Some(s),
            ShapeGeometry::Polygon(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_path_mut(&mut self) -> Option<&mut dyn PathShape> {
        match self {
            ShapeGeometry::Polyline(s) => Some(s),
            ShapeGeometry::Polygon(s) => Some(s),
            _ => None,
        }
    }
}

impl Geometry for ShapeGeometry {
    fn kind(&self) -> ShapeKind {
        match self {
            ShapeGeometry::Rectangle(s) => s.kind(),
            ShapeGeometry::Ellipse(s) => s.kind(),
            ShapeGeometry::Circle(s) => s.kind(),
            ShapeGeometry::Polyline(s) => s.kind(),
            ShapeGeometry::Polygon(s) => s.kind(),
        }
    }

    fn outline(&self, engine: &EngineSettings) -> Renderable {
        match self {
            ShapeGeometry::Rectangle(s) => s.outline(engine),
            ShapeGeometry::Ellipse(s) => s.outline(engine),
            ShapeGeometry::Circle(s) => s.outline(engine),
            ShapeGeometry::Polyline(s) => s.outline(engine),
            ShapeGeometry::Polygon(s) => s.outline(engine),
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            ShapeGeometry::Rectangle(s) => s.translate(dx, dy),
            ShapeGeometry::Ellipse(s) => s.translate(dx, dy),
            ShapeGeometry::Circle(s) => s.translate(dx, dy),
            ShapeGeometry::Polyline(s) => s.translate(dx, dy),
            ShapeGeometry::Polygon(s) => s.translate(dx, dy),
        }
    }

    fn to_geometry_json(&self) -> GeometryJson {
        match self {
            ShapeGeometry::Rectangle(s) => s.to_geometry_json(),
            ShapeGeometry::Ellipse(s) => s.to_geometry_json(),
            ShapeGeometry::Circle(s) => s.to_geometry_json(),
            ShapeGeometry::Polyline(s) => s.to_geometry_json(),
            ShapeGeometry::Polygon(s) => s.to_geometry_json(),
        }
    }
}

impl From<Rectangle> for ShapeGeometry {
    fn from(s: Rectangle) -> Self {
        ShapeGeometry::Rectangle(s)
    }
}

impl From<Ellipse> for ShapeGeometry {
    fn from(s: Ellipse) -> Self {
        ShapeGeometry::Ellipse(s)
    }
}

impl From<Circle> for ShapeGeometry {
    fn from(s: Circle) -> Self {
        ShapeGeometry::Circle(s)
    }
}

impl From<Polyline> for ShapeGeometry {
    fn from(s: Polyline) -> Self {
        ShapeGeometry::Polyline(s)
    }
}

impl From<Polygon> for ShapeGeometry {
    fn from(s: Polygon) -> Self {
        ShapeGeometry::Polygon(s)
    }
}

impl From<&GeometryJson> for ShapeGeometry {
    fn from(json: &GeometryJson) -> Self {
        match json {
            GeometryJson::Rectangle {
                origin_x,
                origin_y,
                width,
                height,
            } => Rectangle::new(Point::new(*origin_x, *origin_y), *width, *height).into(),
            GeometryJson::Ellipse {
                center_x,
                center_y,
                radius_x,
                radius_y,
            } => Ellipse::new(Point::new(*center_x, *center_y), *radius_x, *radius_y).into(),
            GeometryJson::Circle {
                center_x,
                center_y,
                radius,
            } => Circle::new(Point::new(*center_x, *center_y), *radius).into(),
            GeometryJson::Line {
                from_x,
                from_y,
                to_x,
                to_y,
            } => Polyline::line(Point::new(*from_x, *from_y), Point::new(*to_x, *to_y)).into(),
            GeometryJson::Polyline { segments } => Polyline::new(segments.clone()).into(),
            GeometryJson::Polygon { segments } => Polygon::new(segments.clone()).into(),
        }
    }
}
