use annokit_settings::EngineSettings;
use serde::{Deserialize, Serialize};

use super::{Geometry, Point, ShapeKind};
use crate::engine::Renderable;
use crate::serialization::GeometryJson;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
}

impl Ellipse {
    pub fn new(center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            center,
            radius_x,
            radius_y,
        }
    }
}

impl Geometry for Ellipse {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Ellipse
    }

    fn outline(&self, engine: &EngineSettings) -> Renderable {
        Renderable::ellipse(
            self.center,
            self.radius_x,
            self.radius_y,
            engine.curve_segments,
        )
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.center = Point::new(self.center.x + dx, self.center.y + dy);
    }

    fn to_geometry_json(&self) -> GeometryJson {
        GeometryJson::Ellipse {
            center_x: self.center.x,
            center_y: self.center.y,
            radius_x: self.radius_x,
            radius_y: self.radius_y,
        }
    }
}
