use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use csgrs::sketch::Sketch;
use csgrs::traits::CSG;
use lyon::math::point;
use lyon::path::iterator::*;
use lyon::path::Path;

use crate::color::ShapeStyle;
use crate::events::{EventFlags, ShapeEvent};
use crate::model::{Point, Segment};
use crate::transform::TransformMatrix;

/// Areas below this are treated as empty.
pub const AREA_EPSILON: f64 = 1e-9;

const DEFAULT_FLATTEN_TOLERANCE: f64 = 0.05;

/// Relative slack when comparing an intersection area to an operand area.
const CONTAINMENT_TOLERANCE: f64 = 1e-5;

/// Opaque handle of a renderable, unique for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderableId(u64);

impl RenderableId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RenderableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axis-aligned bounding box in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut b = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in iter {
            b.min_x = b.min_x.min(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_x = b.max_x.max(p.x);
            b.max_y = b.max_y.max(p.y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }
}

/// One polygon of a region: its outer ring and any holes.
///
/// Rings do not repeat their first vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPolygon {
    pub exterior: Vec<Point>,
    pub holes: Vec<Vec<Point>>,
}

impl RegionPolygon {
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| signed_area(h).abs()).sum();
        (signed_area(&self.exterior).abs() - holes).max(0.0)
    }
}

#[derive(Debug, Clone)]
enum Body {
    /// Closed area (rectangle, ellipse, circle, polygon, boolean results).
    Region(Sketch<()>),
    /// Open polyline.
    Stroke(Vec<Point>),
}

/// Live engine object drawn on the surface.
///
/// Geometry is held in canvas space. `placement` accumulates every affine
/// applied through [`Renderable::transform`] so that the local model can be
/// re-flattened and placed again; drag translations are not part of it.
#[derive(Debug)]
pub struct Renderable {
    id: RenderableId,
    body: Body,
    placement: TransformMatrix,
    style: ShapeStyle,
    selected: bool,
    visible: bool,
    active_events: EventFlags,
    hit_tolerance: f64,
    flatten_tolerance: f64,
}

impl Renderable {
    fn with_body(body: Body) -> Self {
        Self {
            id: RenderableId::next(),
            body,
            placement: TransformMatrix::identity(),
            style: ShapeStyle::default(),
            selected: false,
            visible: true,
            active_events: EventFlags::empty(),
            hit_tolerance: 0.0,
            flatten_tolerance: DEFAULT_FLATTEN_TOLERANCE,
        }
    }

    /// Closed region bounded by `ring`. Fewer than three vertices give an
    /// empty region.
    pub fn region(ring: &[Point]) -> Self {
        Self::with_body(Body::Region(ring_sketch(ring)))
    }

    /// Open polyline through `points`.
    pub fn stroke(points: Vec<Point>) -> Self {
        Self::with_body(Body::Stroke(points))
    }

    pub fn rectangle(origin: Point, width: f64, height: f64) -> Self {
        Self::region(&[
            origin,
            Point::new(origin.x + width, origin.y),
            Point::new(origin.x + width, origin.y + height),
            Point::new(origin.x, origin.y + height),
        ])
    }

    /// Ellipse approximated by `segments` vertices.
    pub fn ellipse(center: Point, radius_x: f64, radius_y: f64, segments: usize) -> Self {
        let n = segments.max(3);
        let ring: Vec<Point> = (0..n)
            .map(|i| {
                let theta = std::f64::consts::TAU * i as f64 / n as f64;
                Point::new(
                    center.x + radius_x * theta.cos(),
                    center.y + radius_y * theta.sin(),
                )
            })
            .collect();
        Self::region(&ring)
    }

    pub fn circle(center: Point, radius: f64, segments: usize) -> Self {
        Self::ellipse(center, radius, radius, segments)
    }

    /// Path through `segments`, Bezier handles flattened within `tolerance`.
    pub fn path(segments: &[Segment], closed: bool, tolerance: f64) -> Self {
        let points = flatten_segments(segments, closed, tolerance);
        let mut renderable = if closed {
            Self::region(&points)
        } else {
            Self::stroke(points)
        };
        renderable.flatten_tolerance = tolerance;
        renderable
    }

    pub fn id(&self) -> RenderableId {
        self.id
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.body, Body::Region(_))
    }

    pub fn placement(&self) -> &TransformMatrix {
        &self.placement
    }

    pub fn set_hit_tolerance(&mut self, tolerance: f64) {
        self.hit_tolerance = tolerance.max(0.0);
    }

    /// Re-flattens `segments` and places the result with the accumulated
    /// placement. Identity, style and state are kept.
    pub fn rebuild_path(&mut self, segments: &[Segment], closed: bool) {
        let fresh = Self::path(segments, closed, self.flatten_tolerance);
        self.body = fresh.body;
        let placement = self.placement;
        self.apply_to_body(&placement);
    }

    pub fn transform(&mut self, matrix: &TransformMatrix) {
        self.apply_to_body(matrix);
        self.placement = self.placement.then(matrix);
    }

    /// Moves the geometry without recording the move in the placement.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.apply_to_body(&TransformMatrix::translation(dx, dy));
    }

    fn apply_to_body(&mut self, matrix: &TransformMatrix) {
        if matrix.is_identity() {
            return;
        }
        self.body = match &self.body {
            Body::Region(sketch) => Body::Region(sketch.transform(&matrix.to_matrix4())),
            Body::Stroke(points) => Body::Stroke(points.iter().map(|p| matrix.apply(*p)).collect()),
        };
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: ShapeStyle) {
        self.style = style;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn active_events(&self) -> EventFlags {
        self.active_events
    }

    pub fn set_active_events(&mut self, events: EventFlags) {
        self.active_events = events;
    }

    pub fn is_event_active(&self, event: ShapeEvent) -> bool {
        self.active_events.contains(event)
    }

    /// Polygons of a closed region; empty for strokes.
    pub fn polygons(&self) -> Vec<RegionPolygon> {
        match &self.body {
            Body::Region(sketch) => sketch
                .to_multipolygon()
                .0
                .iter()
                .map(|poly| RegionPolygon {
                    exterior: open_ring(poly.exterior().0.iter().map(|c| Point::new(c.x, c.y))),
                    holes: poly
                        .interiors()
                        .iter()
                        .map(|ring| open_ring(ring.0.iter().map(|c| Point::new(c.x, c.y))))
                        .collect(),
                })
                .filter(|poly| poly.exterior.len() >= 3)
                .collect(),
            Body::Stroke(_) => Vec::new(),
        }
    }

    /// Vertices of an open stroke; `None` for regions.
    pub fn stroke_points(&self) -> Option<&[Point]> {
        match &self.body {
            Body::Stroke(points) => Some(points),
            Body::Region(_) => None,
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        match &self.body {
            Body::Stroke(points) => Bounds::from_points(points),
            Body::Region(_) => {
                let polygons = self.polygons();
                Bounds::from_points(polygons.iter().flat_map(|p| p.exterior.iter()))
            }
        }
    }

    /// Enclosed area, holes excluded. `None` for open strokes.
    pub fn area(&self) -> Option<f64> {
        match self.body {
            Body::Region(_) => Some(self.polygons().iter().map(RegionPolygon::area).sum()),
            Body::Stroke(_) => None,
        }
    }

    /// Length of every closed ring. `None` for open strokes.
    pub fn perimeter(&self) -> Option<f64> {
        match self.body {
            Body::Region(_) => Some(
                self.polygons()
                    .iter()
                    .flat_map(|p| std::iter::once(&p.exterior).chain(p.holes.iter()))
                    .map(|ring| ring_length(ring, true))
                    .sum(),
            ),
            Body::Stroke(_) => None,
        }
    }

    /// Length along an open stroke. `None` for regions.
    pub fn length(&self) -> Option<f64> {
        self.stroke_points().map(|points| ring_length(points, false))
    }

    /// Hit test in canvas space.
    pub fn contains_point(&self, p: Point) -> bool {
        match &self.body {
            Body::Region(_) => self.polygons().iter().any(|poly| polygon_contains(poly, p)),
            Body::Stroke(points) => {
                let reach = self.style.stroke_width / 2.0 + self.hit_tolerance;
                points
                    .windows(2)
                    .any(|w| distance_to_segment(p, w[0], w[1]) <= reach)
                    || (points.len() == 1 && points[0].distance_to(&p) <= reach)
            }
        }
    }

    /// True when the two bodies share area. A stroke meets a region when
    /// one of its vertices lies inside it; two strokes never do.
    pub fn intersects(&self, other: &Renderable) -> bool {
        if !self.bounds_overlap(other) {
            return false;
        }
        match (&self.body, &other.body) {
            (Body::Region(a), Body::Region(b)) => {
                let overlap = region_area(&a.intersection(b));
                overlap > AREA_EPSILON
            }
            (Body::Region(_), Body::Stroke(points)) => {
                points.iter().any(|p| self.contains_point(*p))
            }
            (Body::Stroke(points), Body::Region(_)) => {
                points.iter().any(|p| other.contains_point(*p))
            }
            (Body::Stroke(_), Body::Stroke(_)) => false,
        }
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Renderable) -> bool {
        if !self.bounds_overlap(other) {
            return false;
        }
        match (&self.body, &other.body) {
            (Body::Region(a), Body::Region(b)) => {
                let inner = region_area(b);
                if inner <= AREA_EPSILON {
                    return false;
                }
                let overlap = region_area(&a.intersection(b));
                (inner - overlap).abs() <= inner * CONTAINMENT_TOLERANCE + AREA_EPSILON
            }
            (Body::Region(_), Body::Stroke(points)) => {
                !points.is_empty() && points.iter().all(|p| self.contains_point(*p))
            }
            (Body::Stroke(_), _) => false,
        }
    }

    /// Shared area of two regions as a new, detached renderable.
    pub fn intersection(&self, other: &Renderable) -> Option<Renderable> {
        match (&self.body, &other.body) {
            (Body::Region(a), Body::Region(b)) => Some(self.derived(a.intersection(b))),
            _ => None,
        }
    }

    /// Combined area of two regions as a new, detached renderable.
    pub fn union(&self, other: &Renderable) -> Option<Renderable> {
        match (&self.body, &other.body) {
            (Body::Region(a), Body::Region(b)) => Some(self.derived(a.union(b))),
            _ => None,
        }
    }

    fn derived(&self, sketch: Sketch<()>) -> Renderable {
        let mut result = Self::with_body(Body::Region(sketch));
        result.style = self.style;
        result.hit_tolerance = self.hit_tolerance;
        result.flatten_tolerance = self.flatten_tolerance;
        result
    }

    fn bounds_overlap(&self, other: &Renderable) -> bool {
        match (self.bounds(), other.bounds()) {
            (Some(a), Some(b)) => a.overlaps(&b),
            _ => false,
        }
    }
}

fn ring_sketch(ring: &[Point]) -> Sketch<()> {
    if ring.len() < 3 {
        return Sketch::new();
    }
    let pts: Vec<[f64; 2]> = ring.iter().map(|p| [p.x, p.y]).collect();
    Sketch::polygon(&pts, None)
}

fn region_area(sketch: &Sketch<()>) -> f64 {
    sketch
        .to_multipolygon()
        .0
        .iter()
        .map(|poly| {
            let outer = signed_area_coords(poly.exterior().0.iter().map(|c| (c.x, c.y))).abs();
            let holes: f64 = poly
                .interiors()
                .iter()
                .map(|ring| signed_area_coords(ring.0.iter().map(|c| (c.x, c.y))).abs())
                .sum();
            (outer - holes).max(0.0)
        })
        .sum()
}

fn open_ring(coords: impl Iterator<Item = Point>) -> Vec<Point> {
    let mut ring: Vec<Point> = coords.collect();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

/// Shoelace area, positive for counter-clockwise rings.
fn signed_area(ring: &[Point]) -> f64 {
    signed_area_coords(ring.iter().map(|p| (p.x, p.y)))
}

fn signed_area_coords(coords: impl Iterator<Item = (f64, f64)>) -> f64 {
    let pts: Vec<(f64, f64)> = coords.collect();
    if pts.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..pts.len() {
        let (x1, y1) = pts[i];
        let (x2, y2) = pts[(i + 1) % pts.len()];
        sum += x1 * y2 - x2 * y1;
    }
    sum / 2.0
}

fn ring_length(points: &[Point], closed: bool) -> f64 {
    let open: f64 = points.windows(2).map(|w| w[0].distance_to(&w[1])).sum();
    match (closed, points.first(), points.last()) {
        (true, Some(first), Some(last)) if points.len() > 2 => open + last.distance_to(first),
        _ => open,
    }
}

fn ring_contains(ring: &[Point], p: Point) -> bool {
    let mut inside = false;
    let n = ring.len();
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn polygon_contains(poly: &RegionPolygon, p: Point) -> bool {
    ring_contains(&poly.exterior, p) && !poly.holes.iter().any(|h| ring_contains(h, p))
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance_to(&a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance_to(&Point::new(a.x + t * dx, a.y + t * dy))
}

/// Flattens a segment list to vertices.
///
/// Straight segments are copied as-is. Curved ones go through lyon, which
/// works in `f32`, so they are built relative to the first vertex.
fn flatten_segments(segments: &[Segment], closed: bool, tolerance: f64) -> Vec<Point> {
    let Some(first) = segments.first() else {
        return Vec::new();
    };
    if segments.iter().all(|s| !s.has_handles()) {
        return segments.iter().map(|s| s.point).collect();
    }

    let origin = first.point;
    let local = |p: Point| point((p.x - origin.x) as f32, (p.y - origin.y) as f32);

    let mut builder = Path::builder();
    builder.begin(local(first.point));
    let mut edges: Vec<(&Segment, &Segment)> = segments.windows(2).map(|w| (&w[0], &w[1])).collect();
    if closed && segments.len() >= 2 {
        if let Some(last) = segments.last() {
            edges.push((last, first));
        }
    }
    for (from, to) in edges {
        if from.handle_out.is_some() || to.handle_in.is_some() {
            let ctrl1 = from.point.offset_by(from.handle_out.unwrap_or_default());
            let ctrl2 = to.point.offset_by(to.handle_in.unwrap_or_default());
            builder.cubic_bezier_to(local(ctrl1), local(ctrl2), local(to.point));
        } else {
            builder.line_to(local(to.point));
        }
    }
    builder.end(false);
    let path = builder.build();

    let mut points = Vec::new();
    for event in path.iter().flattened(tolerance.max(1e-4) as f32) {
        match event {
            lyon::path::Event::Begin { at } => points.push(at),
            lyon::path::Event::Line { to, .. } => points.push(to),
            _ => {}
        }
    }

    let mut result: Vec<Point> = points
        .into_iter()
        .map(|p| Point::new(p.x as f64 + origin.x, p.y as f64 + origin.y))
        .collect();
    if closed && result.len() > 1 {
        if let (Some(a), Some(b)) = (result.first(), result.last()) {
            if a.distance_to(b) < 1e-6 {
                result.pop();
            }
        }
    }
    result
}
