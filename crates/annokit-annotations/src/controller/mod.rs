//! Annotation controller: the shape cache and everything drawn into it.
//!
//! The controller owns every shape, keyed by id. Persisted coordinates are
//! image pixels; renderables live in canvas space, which is the image shifted
//! by half its size (see [`crate::viewport`]).

mod boolean;
mod operations;
mod types;

pub use types::{CombineOutcome, ShapeDimensions};

use std::collections::HashMap;

use annokit_core::AnnotationError;
use annokit_settings::{Config, EngineSettings, ShapeDefaults};

use crate::color::{ShapeConfig, ShapeStyle};
use crate::engine::{PixmapSurface, RenderSurface, Renderable, RenderableId};
use crate::events::PointerEvent;
use crate::model::{
    Circle, Ellipse, Point, Polygon, Polyline, Rectangle, Segment, Shape, ShapeGeometry, ShapeKind,
};
use crate::transform::TransformMatrix;
use crate::viewport::{CoordinateOffset, ViewportSource};

/// Owner of the annotation cache and the drawing surface.
pub struct AnnotationController {
    shapes: HashMap<String, Shape>,
    renderable_owners: HashMap<RenderableId, String>,
    defaults: ShapeDefaults,
    engine: EngineSettings,
    decimals: u32,
    offset: CoordinateOffset,
    microns_per_pixel: f64,
    surface: Option<Box<dyn RenderSurface>>,
    mouse_events_enabled: bool,
}

impl Default for AnnotationController {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl AnnotationController {
    pub fn new(config: &Config) -> Self {
        Self {
            shapes: HashMap::new(),
            renderable_owners: HashMap::new(),
            defaults: config.shape_defaults.clone(),
            engine: config.engine.clone(),
            decimals: config.measurement.decimals,
            offset: CoordinateOffset::ZERO,
            microns_per_pixel: 1.0,
            surface: None,
            mouse_events_enabled: true,
        }
    }

    /// Binds the controller to an image and a surface.
    ///
    /// Captures the coordinate offset and microns-per-pixel, takes `surface`
    /// or creates a [`PixmapSurface`], sizes it to the viewport and clears the
    /// cache. Only the first call has any effect.
    pub fn build_canvas(
        &mut self,
        viewport: &dyn ViewportSource,
        surface: Option<Box<dyn RenderSurface>>,
    ) -> bool {
        if self.surface.is_some() {
            tracing::warn!("Canvas already built, ignoring");
            return false;
        }

        let image = viewport.image_dimensions();
        let canvas = viewport.canvas_size();
        let (width, height) = (
            canvas.width.max(0.0).round() as u32,
            canvas.height.max(0.0).round() as u32,
        );

        let mut surface = match surface {
            Some(surface) => {
                tracing::info!("Using existing canvas");
                surface
            }
            None => {
                tracing::info!("Creating a new {}x{} canvas", width, height);
                Box::new(PixmapSurface::new(width, height)) as Box<dyn RenderSurface>
            }
        };
        surface.resize(width, height);

        self.offset = CoordinateOffset::for_image(image);
        self.microns_per_pixel = viewport.image_microns_per_pixel();
        self.surface = Some(surface);
        self.shapes.clear();
        self.renderable_owners.clear();

        tracing::debug!(
            "Canvas built for {} image, offset ({}, {}), {} µm/px",
            image,
            self.offset.x,
            self.offset.y,
            self.microns_per_pixel
        );
        true
    }

    pub fn is_canvas_built(&self) -> bool {
        self.surface.is_some()
    }

    /// Image-to-canvas translation.
    pub fn offsets(&self) -> CoordinateOffset {
        self.offset
    }

    pub fn image_microns_per_pixel(&self) -> f64 {
        self.microns_per_pixel
    }

    pub fn defaults(&self) -> &ShapeDefaults {
        &self.defaults
    }

    pub fn engine_settings(&self) -> &EngineSettings {
        &self.engine
    }

    pub fn surface(&self) -> Option<&dyn RenderSurface> {
        self.surface.as_deref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut (dyn RenderSurface + 'static)> {
        self.surface.as_deref_mut()
    }

    /// Returns the number of shapes in the cache.
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// `prefix_N` for the smallest positive `N` not in use.
    pub fn generate_id(&self, prefix: &str) -> String {
        (1..)
            .map(|n| format!("{}_{}", prefix, n))
            .find(|id| !self.shapes.contains_key(id))
            .unwrap_or_else(|| prefix.to_string())
    }

    /// Inserts `shape`, refusing duplicate ids.
    pub fn add_to_cache(&mut self, shape: Shape) -> bool {
        if self.shapes.contains_key(shape.id()) {
            tracing::error!("{}", AnnotationError::conflict(shape.id()));
            return false;
        }
        self.shapes.insert(shape.id().to_string(), shape);
        true
    }

    fn resolve_id(&self, id: Option<&str>, kind: ShapeKind) -> String {
        match id {
            Some(id) => id.to_string(),
            None => self.generate_id(kind.type_tag()),
        }
    }

    /// Caches `shape`, builds its renderable, styles it and moves it to
    /// canvas space. Returns the id, or `None` on an id conflict.
    pub fn draw_shape(&mut self, shape: Shape, config: &ShapeConfig, refresh: bool) -> Option<String> {
        let id = shape.id().to_string();
        if !self.add_to_cache(shape) {
            return None;
        }

        let style = ShapeStyle::resolve(config, &self.defaults);
        let to_canvas = TransformMatrix::translation(-self.offset.x, -self.offset.y);
        let shape = self.shapes.get_mut(&id)?;
        let renderable_id = shape.build_renderable(false, &self.engine);
        shape.configure(style);
        shape.transform(&to_canvas);
        self.renderable_owners.insert(renderable_id, id.clone());

        tracing::debug!("Drew {} {}", shape.type_tag(), id);
        self.refresh(refresh);
        Some(id)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_rectangle(
        &mut self,
        id: Option<&str>,
        origin_x: f64,
        origin_y: f64,
        width: f64,
        height: f64,
        transform: Option<TransformMatrix>,
        config: &ShapeConfig,
        refresh: bool,
    ) -> Option<String> {
        let id = self.resolve_id(id, ShapeKind::Rectangle);
        let rect = Rectangle::new(Point::new(origin_x, origin_y), width, height);
        self.draw_shape(Shape::new(id, rect, transform), config, refresh)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_ellipse(
        &mut self,
        id: Option<&str>,
        center_x: f64,
        center_y: f64,
        radius_x: f64,
        radius_y: f64,
        transform: Option<TransformMatrix>,
        config: &ShapeConfig,
        refresh: bool,
    ) -> Option<String> {
        let id = self.resolve_id(id, ShapeKind::Ellipse);
        let ellipse = Ellipse::new(Point::new(center_x, center_y), radius_x, radius_y);
        self.draw_shape(Shape::new(id, ellipse, transform), config, refresh)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_circle(
        &mut self,
        id: Option<&str>,
        center_x: f64,
        center_y: f64,
        radius: f64,
        transform: Option<TransformMatrix>,
        config: &ShapeConfig,
        refresh: bool,
    ) -> Option<String> {
        let id = self.resolve_id(id, ShapeKind::Circle);
        let circle = Circle::new(Point::new(center_x, center_y), radius);
        self.draw_shape(Shape::new(id, circle, transform), config, refresh)
    }

    pub fn draw_polyline(
        &mut self,
        id: Option<&str>,
        segments: Vec<Segment>,
        transform: Option<TransformMatrix>,
        config: &ShapeConfig,
        refresh: bool,
    ) -> Option<String> {
        let id = self.resolve_id(id, ShapeKind::Polyline);
        self.draw_shape(Shape::new(id, Polyline::new(segments), transform), config, refresh)
    }

    pub fn draw_polygon(
        &mut self,
        id: Option<&str>,
        segments: Vec<Segment>,
        transform: Option<TransformMatrix>,
        config: &ShapeConfig,
        refresh: bool,
    ) -> Option<String> {
        let id = self.resolve_id(id, ShapeKind::Polygon);
        self.draw_shape(Shape::new(id, Polygon::new(segments), transform), config, refresh)
    }

    /// Two-point polyline.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_line(
        &mut self,
        id: Option<&str>,
        from: Point,
        to: Point,
        transform: Option<TransformMatrix>,
        config: &ShapeConfig,
        refresh: bool,
    ) -> Option<String> {
        let id = self.resolve_id(id, ShapeKind::Polyline);
        self.draw_shape(Shape::new(id, Polyline::line(from, to), transform), config, refresh)
    }

    /// Caches a path drawn directly on the canvas, e.g. by a freehand tool.
    ///
    /// `canvas_points` are canvas coordinates. The shape starts without
    /// segments; they are taken from the renderable when first needed.
    pub fn draw_freehand_path(
        &mut self,
        id: Option<&str>,
        closed: bool,
        canvas_points: &[Point],
        config: &ShapeConfig,
        refresh: bool,
    ) -> Option<String> {
        let (kind, geometry): (ShapeKind, ShapeGeometry) = if closed {
            (ShapeKind::Polygon, Polygon::default().into())
        } else {
            (ShapeKind::Polyline, Polyline::default().into())
        };
        let id = self.resolve_id(id, kind);
        if !self.add_to_cache(Shape::new(id.clone(), geometry, None)) {
            return None;
        }

        let image_points: Vec<Point> = canvas_points.iter().map(|p| self.offset.to_image(*p)).collect();
        let mut renderable = if closed {
            Renderable::region(&image_points)
        } else {
            Renderable::stroke(image_points)
        };
        renderable.set_hit_tolerance(self.engine.hit_tolerance);
        renderable.set_style(ShapeStyle::resolve(config, &self.defaults));
        renderable.transform(&TransformMatrix::translation(-self.offset.x, -self.offset.y));

        let shape = self.shapes.get_mut(&id)?;
        let renderable_id = shape.adopt_renderable(renderable);
        self.renderable_owners.insert(renderable_id, id.clone());
        self.refresh(refresh);
        Some(id)
    }

    /// Redraws the surface with every visible renderable.
    pub fn refresh_view(&mut self) {
        let scene: Vec<&Renderable> = self
            .shapes
            .values()
            .filter_map(|s| s.renderable())
            .filter(|r| r.is_visible())
            .collect();
        match self.surface.as_mut() {
            Some(surface) => surface.draw(&scene),
            None => tracing::debug!("No canvas yet, skipping refresh"),
        }
    }

    pub(crate) fn refresh(&mut self, refresh: bool) {
        if refresh {
            self.refresh_view();
        }
    }

    pub fn get_zoom(&self) -> Option<f64> {
        self.surface.as_ref().map(|s| s.zoom())
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        match self.surface.as_mut() {
            Some(surface) => surface.set_zoom(zoom),
            None => tracing::warn!("{}", AnnotationError::not_initialized("canvas")),
        }
    }

    /// Centers the view on an image-space position.
    pub fn set_center(&mut self, x: f64, y: f64) {
        let center = self.offset.to_canvas(Point::new(x, y));
        match self.surface.as_mut() {
            Some(surface) => surface.set_center(center),
            None => tracing::warn!("{}", AnnotationError::not_initialized("canvas")),
        }
    }

    pub fn enable_mouse_events(&mut self) {
        self.mouse_events_enabled = true;
    }

    pub fn disable_mouse_events(&mut self) {
        self.mouse_events_enabled = false;
    }

    pub fn mouse_events_enabled(&self) -> bool {
        self.mouse_events_enabled
    }

    /// Id of the shape owning a renderable.
    pub fn owner_of(&self, renderable: RenderableId) -> Option<&str> {
        self.renderable_owners.get(&renderable).map(String::as_str)
    }

    /// Routes pointer input to the owning shape. Returns `true` when a
    /// shape handled it.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> bool {
        if !self.mouse_events_enabled {
            return false;
        }
        let Some(id) = self.renderable_owners.get(&event.target()).cloned() else {
            tracing::debug!("Pointer event for unknown renderable {}", event.target());
            return false;
        };
        let Some(shape) = self.shapes.get_mut(&id) else {
            return false;
        };

        match event {
            PointerEvent::Drag { dx, dy, .. } => {
                let moved = shape.drag(dx, dy);
                if moved {
                    self.refresh_view();
                }
                moved
            }
            PointerEvent::DragEnd { .. } => {
                let center = shape.center().map(|c| self.offset.to_image(c));
                tracing::debug!("Drag of {} ended at {:?}", id, center);
                true
            }
        }
    }
}
