use annokit_settings::EngineSettings;
use serde::{Deserialize, Serialize};

use super::{Geometry, Point, ShapeKind};
use crate::engine::Renderable;
use crate::serialization::GeometryJson;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Top-left corner in image space.
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub fn new(origin: Point, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }
}

impl Geometry for Rectangle {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Rectangle
    }

    fn outline(&self, _engine: &EngineSettings) -> Renderable {
        Renderable::rectangle(self.origin, self.width, self.height)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.origin = Point::new(self.origin.x + dx, self.origin.y + dy);
    }

    fn to_geometry_json(&self) -> GeometryJson {
        GeometryJson::Rectangle {
            origin_x: self.origin.x,
            origin_y: self.origin.y,
            width: self.width,
            height: self.height,
        }
    }
}
