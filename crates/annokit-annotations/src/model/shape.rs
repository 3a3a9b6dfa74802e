use annokit_core::{round_to, AnnotationError};
use annokit_settings::EngineSettings;

use super::{Geometry, PathShape, Point, Segment, ShapeGeometry, ShapeKind};
use crate::color::ShapeStyle;
use crate::engine::{Renderable, RenderableId};
use crate::events::{EventFlags, ShapeEvent};
use crate::extract;
use crate::serialization::ShapeJson;
use crate::transform::TransformMatrix;
use crate::viewport::{CoordinateOffset, Dimensions};

/// State shared by every shape variant.
#[derive(Debug)]
pub struct ShapeBase {
    pub id: String,
    /// Captured once at construction and re-applied on every build.
    pub original_transform: Option<TransformMatrix>,
    renderable: Option<Renderable>,
    style: Option<ShapeStyle>,
    event_flags: EventFlags,
}

impl ShapeBase {
    pub fn new(id: impl Into<String>, original_transform: Option<TransformMatrix>) -> Self {
        Self {
            id: id.into(),
            original_transform,
            renderable: None,
            style: None,
            event_flags: EventFlags::empty(),
        }
    }
}

/// An annotation: common state plus variant geometry.
#[derive(Debug)]
pub struct Shape {
    base: ShapeBase,
    geometry: ShapeGeometry,
}

impl Shape {
    pub fn new(
        id: impl Into<String>,
        geometry: impl Into<ShapeGeometry>,
        transform: Option<TransformMatrix>,
    ) -> Self {
        Self {
            base: ShapeBase::new(id, transform),
            geometry: geometry.into(),
        }
    }

    /// Shape described by a persisted record. Style is applied on draw.
    pub fn from_json(json: &ShapeJson) -> Self {
        Self::new(
            json.shape_id.clone(),
            ShapeGeometry::from(&json.geometry),
            json.transform,
        )
    }

    pub fn id(&self) -> &str {
        &self.base.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    pub fn type_tag(&self) -> &'static str {
        self.kind().type_tag()
    }

    pub fn base(&self) -> &ShapeBase {
        &self.base
    }

    pub fn geometry(&self) -> &ShapeGeometry {
        &self.geometry
    }

    pub fn original_transform(&self) -> Option<&TransformMatrix> {
        self.base.original_transform.as_ref()
    }

    pub fn renderable(&self) -> Option<&Renderable> {
        self.base.renderable.as_ref()
    }

    pub fn is_rendered(&self) -> bool {
        self.base.renderable.is_some()
    }

    /// Live style while rendered, otherwise the last applied one.
    pub fn style(&self) -> Option<ShapeStyle> {
        self.renderable()
            .map(|r| *r.style())
            .or(self.base.style)
    }

    pub fn event_flags(&self) -> EventFlags {
        self.base.event_flags
    }

    /// Segments of a path variant.
    pub fn segments(&self) -> Option<&[Segment]> {
        self.geometry.as_path().map(|p| p.segments())
    }

    /// Builds the renderable from the parametric fields and places it with
    /// the original transform. Any previous renderable is replaced.
    ///
    /// With `activate_events` every event is enabled; otherwise handlers
    /// start inactive and the enabled set is left as it was.
    pub fn build_renderable(&mut self, activate_events: bool, engine: &EngineSettings) -> RenderableId {
        let mut renderable = self.geometry.outline(engine);
        renderable.set_hit_tolerance(engine.hit_tolerance);
        if let Some(transform) = &self.base.original_transform {
            renderable.transform(transform);
        }
        if let Some(style) = self.base.style {
            renderable.set_style(style);
        }
        if activate_events {
            self.base.event_flags = EventFlags::all();
            renderable.set_active_events(self.base.event_flags);
        }

        let id = renderable.id();
        tracing::debug!("Built renderable {} for {} {}", id, self.type_tag(), self.base.id);
        self.base.renderable = Some(renderable);
        id
    }

    /// Applies `style` to the live renderable.
    pub fn configure(&mut self, style: ShapeStyle) {
        match self.base.renderable.as_mut() {
            Some(renderable) => {
                renderable.set_style(style);
                self.base.style = Some(style);
            }
            None => tracing::warn!(
                "{}; style of {} not applied",
                AnnotationError::not_initialized("renderable"),
                self.base.id
            ),
        }
    }

    /// Applies an extra affine to the live renderable.
    pub fn transform(&mut self, matrix: &TransformMatrix) {
        match self.base.renderable.as_mut() {
            Some(renderable) => renderable.transform(matrix),
            None => tracing::warn!(
                "{}; transform of {} not applied",
                AnnotationError::not_initialized("renderable"),
                self.base.id
            ),
        }
    }

    /// Bounding-box center in canvas space.
    pub fn center(&self) -> Option<Point> {
        self.renderable().and_then(|r| r.bounds()).map(|b| b.center())
    }

    pub fn bounding_box_dimensions(&self) -> Option<Dimensions> {
        self.renderable()
            .and_then(|r| r.bounds())
            .map(|b| Dimensions::new(b.width(), b.height()))
    }

    /// Enclosed area scaled by `pixel_size`. `None` for polylines and shapes
    /// that are not rendered.
    pub fn area(&self, pixel_size: f64, decimals: u32) -> Option<f64> {
        if !self.kind().has_area() {
            return None;
        }
        let raw = self.measured("area")?.area()?;
        Some(round_to(raw * pixel_size, decimals))
    }

    /// Outline length scaled by `pixel_size`; open paths report their length.
    pub fn perimeter(&self, pixel_size: f64, decimals: u32) -> Option<f64> {
        let renderable = self.measured("perimeter")?;
        let raw = renderable.perimeter().or_else(|| renderable.length())?;
        Some(round_to(raw * pixel_size, decimals))
    }

    fn measured(&self, what: &str) -> Option<&Renderable> {
        if self.base.renderable.is_none() {
            tracing::debug!(
                "{} of {}: {}",
                what,
                self.base.id,
                AnnotationError::not_initialized("renderable")
            );
        }
        self.base.renderable.as_ref()
    }

    /// Hit test at a canvas position.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.renderable()
            .is_some_and(|r| r.contains_point(Point::new(x, y)))
    }

    pub fn select(&mut self) {
        if let Some(r) = self.base.renderable.as_mut() {
            r.set_selected(true);
        }
    }

    pub fn deselect(&mut self) {
        if let Some(r) = self.base.renderable.as_mut() {
            r.set_selected(false);
        }
    }

    pub fn is_selected(&self) -> bool {
        self.renderable().is_some_and(|r| r.is_selected())
    }

    pub fn show(&mut self) {
        if let Some(r) = self.base.renderable.as_mut() {
            r.set_visible(true);
        }
    }

    pub fn hide(&mut self) {
        if let Some(r) = self.base.renderable.as_mut() {
            r.set_visible(false);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.renderable().is_some_and(|r| r.is_visible())
    }

    /// Drops the renderable, returning its handle.
    pub fn delete(&mut self) -> Option<RenderableId> {
        self.base.renderable.take().map(|r| r.id())
    }

    /// Enables the named events (`None` = all). Unknown names are logged
    /// and skipped.
    pub fn enable_events(&mut self, names: Option<&[&str]>) {
        for event in ShapeEvent::parse_list(names) {
            self.base.event_flags.insert(event);
        }
        self.sync_events();
    }

    pub fn disable_events(&mut self, names: Option<&[&str]>) {
        for event in ShapeEvent::parse_list(names) {
            self.base.event_flags.remove(event);
        }
        self.sync_events();
    }

    fn sync_events(&mut self) {
        let flags = self.base.event_flags;
        if let Some(r) = self.base.renderable.as_mut() {
            r.set_active_events(flags);
        }
    }

    /// Pointer drag by a canvas delta. Returns `false` when the shape is not
    /// rendered or drag is not active.
    pub fn drag(&mut self, dx: f64, dy: f64) -> bool {
        let Some(renderable) = self.base.renderable.as_mut() else {
            return false;
        };
        if !renderable.is_event_active(ShapeEvent::Drag) {
            return false;
        }
        renderable.translate(dx, dy);

        let local = renderable
            .placement()
            .linear()
            .inverse()
            .map(|inv| inv.apply_vector(Point::new(dx, dy)))
            .unwrap_or(Point::new(dx, dy));
        self.update_position(local.x, local.y);
        true
    }

    /// Moves the parametric fields by a local-space delta.
    pub fn update_position(&mut self, dx: f64, dy: f64) {
        self.geometry.translate(dx, dy);
    }

    /// Appends a corner to a path shape and its renderable.
    pub fn add_point(&mut self, x: f64, y: f64) -> Result<(), AnnotationError> {
        self.materialize_segments();
        let path = self.path_mut()?;
        path.push_point(x, y);
        self.rebuild_path();
        Ok(())
    }

    /// Removes the segment at `index` (or the last one) from a path shape.
    pub fn remove_point(&mut self, index: Option<usize>) -> Result<Segment, AnnotationError> {
        self.materialize_segments();
        let removed = self.path_mut()?.remove_segment(index)?;
        self.rebuild_path();
        Ok(removed)
    }

    fn path_mut(&mut self) -> Result<&mut dyn PathShape, AnnotationError> {
        let tag = self.type_tag();
        self.geometry
            .as_path_mut()
            .ok_or_else(|| AnnotationError::invalid_operand("path operation on shape type", tag))
    }

    fn rebuild_path(&mut self) {
        let (Some(path), Some(renderable)) =
            (self.geometry.as_path(), self.base.renderable.as_mut())
        else {
            return;
        };
        renderable.rebuild_path(path.segments(), path.is_closed());
    }

    // A path built interactively has a renderable but no segments yet. Pull
    // them into local coordinates before editing.
    fn materialize_segments(&mut self) {
        let Some(renderable) = self.base.renderable.as_ref() else {
            return;
        };
        let Some(to_local) = renderable.placement().inverse() else {
            return;
        };
        let Some(path) = self.geometry.as_path_mut() else {
            return;
        };
        if !path.segments().is_empty() {
            return;
        }
        let local: Vec<Segment> = extract::outline_vertices(renderable)
            .into_iter()
            .map(|p| Segment::new(to_local.apply(p)))
            .collect();
        path.segments_mut().extend(local);
    }

    /// Persisted form in image space.
    ///
    /// A path without segments takes them from its live renderable once;
    /// the result is kept on the shape. A shape that was never styled is
    /// written with `fallback`.
    pub fn to_json(&mut self, offset: CoordinateOffset, fallback: &ShapeStyle) -> ShapeJson {
        self.extract_segments_once(offset);
        ShapeJson {
            shape_id: self.base.id.clone(),
            transform: self.base.original_transform,
            style: self.style().unwrap_or(*fallback).to_config(),
            geometry: self.geometry.to_geometry_json(),
        }
    }

    fn extract_segments_once(&mut self, offset: CoordinateOffset) {
        let Some(renderable) = self.base.renderable.as_ref() else {
            return;
        };
        let Some(path) = self.geometry.as_path_mut() else {
            return;
        };
        if !path.segments().is_empty() {
            return;
        }

        let mut segments = extract::extract_path_segments(renderable, offset);
        if let Some(inverse) = self.base.original_transform.and_then(|t| t.inverse()) {
            segments = segments.iter().map(|s| s.transformed(&inverse)).collect();
        }
        tracing::debug!(
            "Extracted {} segments from renderable of {}",
            segments.len(),
            self.base.id
        );
        path.segments_mut().extend(segments);
    }

    /// Wraps an interactively built renderable (canvas space) whose path
    /// segments are filled in lazily.
    pub(crate) fn adopt_renderable(&mut self, renderable: Renderable) -> RenderableId {
        let id = renderable.id();
        self.base.style = Some(*renderable.style());
        self.base.renderable = Some(renderable);
        id
    }
}
