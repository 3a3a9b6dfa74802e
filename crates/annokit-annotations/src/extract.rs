//! Path segment extraction from live renderables.
//!
//! Turns the geometry of a renderable (canvas space) back into persisted
//! segments (image space). Regions keep only the exterior ring of their
//! largest polygon; holes and smaller pieces are dropped.

use crate::engine::{RegionPolygon, Renderable};
use crate::model::{Point, Segment};
use crate::viewport::CoordinateOffset;

/// Vertices of the outline in canvas space.
pub fn outline_vertices(renderable: &Renderable) -> Vec<Point> {
    if let Some(points) = renderable.stroke_points() {
        return points.to_vec();
    }
    let polygons = renderable.polygons();
    let largest = polygons.into_iter().max_by(|a, b| {
        a.area()
            .partial_cmp(&b.area())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    largest.map(|p: RegionPolygon| p.exterior).unwrap_or_default()
}

/// Outline vertices as straight segments, shifted back to image space.
pub fn extract_path_segments(renderable: &Renderable, offset: CoordinateOffset) -> Vec<Segment> {
    outline_vertices(renderable)
        .into_iter()
        .map(|p| Segment::new(offset.to_image(p)))
        .collect()
}
