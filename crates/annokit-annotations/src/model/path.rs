use annokit_core::AnnotationError;
use annokit_settings::EngineSettings;
use serde::{Deserialize, Serialize};

use super::{Geometry, Point, Segment, ShapeKind};
use crate::engine::Renderable;
use crate::serialization::GeometryJson;

/// Shared behavior of the segment-based variants.
pub trait PathShape {
    fn segments(&self) -> &[Segment];
    fn segments_mut(&mut self) -> &mut Vec<Segment>;
    fn is_closed(&self) -> bool;

    /// Appends a straight corner at `(x, y)`.
    fn push_point(&mut self, x: f64, y: f64) {
        self.segments_mut().push(Segment::new(Point::new(x, y)));
    }

    /// Removes the segment at `index`, or the last one.
    fn remove_segment(&mut self, index: Option<usize>) -> Result<Segment, AnnotationError> {
        let segments = self.segments_mut();
        if segments.is_empty() {
            return Err(AnnotationError::precondition(
                "cannot remove a point from a path without segments",
            ));
        }
        let index = index.unwrap_or(segments.len() - 1);
        if index >= segments.len() {
            return Err(AnnotationError::precondition(format!(
                "segment index {} out of range for {} segments",
                index,
                segments.len()
            )));
        }
        Ok(segments.remove(index))
    }
}

/// Open path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline {
    pub segments: Vec<Segment>,
}

impl Polyline {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn from_points(points: &[Point]) -> Self {
        Self::new(points.iter().copied().map(Segment::new).collect())
    }

    /// Two-point polyline.
    pub fn line(from: Point, to: Point) -> Self {
        Self::from_points(&[from, to])
    }
}

impl PathShape for Polyline {
    fn segments(&self) -> &[Segment] {
        &self.segments
    }

    fn segments_mut(&mut self) -> &mut Vec<Segment> {
        &mut self.segments
    }

    fn is_closed(&self) -> bool {
        false
    }
}

impl Geometry for Polyline {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Polyline
    }

    fn outline(&self, engine: &EngineSettings) -> Renderable {
        Renderable::path(&self.segments, false, engine.flatten_tolerance)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        translate_segments(&mut self.segments, dx, dy);
    }

    fn to_geometry_json(&self) -> GeometryJson {
        GeometryJson::Polyline {
            segments: self.segments.clone(),
        }
    }
}

/// Closed path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub segments: Vec<Segment>,
}

impl Polygon {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn from_points(points: &[Point]) -> Self {
        Self::new(points.iter().copied().map(Segment::new).collect())
    }
}

impl PathShape for Polygon {
    fn segments(&self) -> &[Segment] {
        &self.segments
    }

    fn segments_mut(&mut self) -> &mut Vec<Segment> {
        &mut self.segments
    }

    fn is_closed(&self) -> bool {
        true
    }
}

impl Geometry for Polygon {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Polygon
    }

    fn outline(&self, engine: &EngineSettings) -> Renderable {
        Renderable::path(&self.segments, true, engine.flatten_tolerance)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        translate_segments(&mut self.segments, dx, dy);
    }

    fn to_geometry_json(&self) -> GeometryJson {
        GeometryJson::Polygon {
            segments: self.segments.clone(),
        }
    }
}

// Handles are relative to their point and move with it.
fn translate_segments(segments: &mut [Segment], dx: f64, dy: f64) {
    for segment in segments.iter_mut() {
        *segment = segment.translated(dx, dy);
    }
}
