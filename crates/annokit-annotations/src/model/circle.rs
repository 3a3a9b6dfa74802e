use annokit_settings::EngineSettings;
use serde::{Deserialize, Serialize};

use super::{Geometry, Point, ShapeKind};
use crate::engine::Renderable;
use crate::serialization::GeometryJson;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl Geometry for Circle {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Circle
    }

    fn outline(&self, engine: &EngineSettings) -> Renderable {
        Renderable::circle(self.center, self.radius, engine.curve_segments)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.center = Point::new(self.center.x + dx, self.center.y + dy);
    }

    fn to_geometry_json(&self) -> GeometryJson {
        GeometryJson::Circle {
            center_x: self.center.x,
            center_y: self.center.y,
            radius: self.radius,
        }
    }
}
