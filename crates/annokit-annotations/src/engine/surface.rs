//! Screen surface abstraction.
//!
//! A surface owns the view state (zoom, center, pixel size) and draws the
//! visible renderables. Canvas coordinates have their origin at the image
//! center with y pointing down, so the default view centers on `(0, 0)`.

use std::fmt;

use crate::engine::{Renderable, RenderableId};
use crate::model::Point;

pub const MIN_ZOOM: f64 = 0.01;
pub const MAX_ZOOM: f64 = 100.0;

/// Zoom, center and pixel size of a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    zoom: f64,
    center: Point,
    width: u32,
    height: u32,
}

impl View {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            zoom: 1.0,
            center: Point::new(0.0, 0.0),
            width,
            height,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level, constrained between `MIN_ZOOM` and `MAX_ZOOM`.
    pub fn set_zoom(&mut self, zoom: f64) {
        if (MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            self.zoom = zoom;
        } else {
            tracing::warn!("Ignoring zoom level {} outside {}..={}", zoom, MIN_ZOOM, MAX_ZOOM);
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Canvas point to pixel position.
    ///
    /// ```text
    /// pixel = (canvas - center) * zoom + size / 2
    /// ```
    pub fn canvas_to_pixel(&self, p: Point) -> (f64, f64) {
        (
            (p.x - self.center.x) * self.zoom + self.width as f64 / 2.0,
            (p.y - self.center.y) * self.zoom + self.height as f64 / 2.0,
        )
    }

    pub fn pixel_to_canvas(&self, px: f64, py: f64) -> Point {
        Point::new(
            (px - self.width as f64 / 2.0) / self.zoom + self.center.x,
            (py - self.height as f64 / 2.0) / self.zoom + self.center.y,
        )
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | Center: ({:.1}, {:.1}) | {}x{}",
            self.zoom, self.center.x, self.center.y, self.width, self.height
        )
    }
}

/// Drawing target owned by the controller.
pub trait RenderSurface {
    fn view(&self) -> &View;
    fn view_mut(&mut self) -> &mut View;

    /// Draws one frame. `scene` holds the visible renderables.
    fn draw(&mut self, scene: &[&Renderable]);

    /// Frames drawn since creation.
    fn frames_drawn(&self) -> u64;

    fn resize(&mut self, width: u32, height: u32) {
        self.view_mut().resize(width, height);
    }

    fn zoom(&self) -> f64 {
        self.view().zoom()
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.view_mut().set_zoom(zoom);
    }

    fn center(&self) -> Point {
        self.view().center()
    }

    fn set_center(&mut self, center: Point) {
        self.view_mut().set_center(center);
    }
}

/// Surface that records frames without rasterizing.
///
/// Useful for hosts that draw elsewhere and in tests.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    view: View,
    frames: u64,
    last_frame: Vec<RenderableId>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            view: View::new(width, height),
            frames: 0,
            last_frame: Vec::new(),
        }
    }

    /// Renderables drawn by the latest frame.
    pub fn last_frame(&self) -> &[RenderableId] {
        &self.last_frame
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl RenderSurface for RecordingSurface {
    fn view(&self) -> &View {
        &self.view
    }

    fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    fn draw(&mut self, scene: &[&Renderable]) {
        self.frames += 1;
        self.last_frame = scene.iter().map(|r| r.id()).collect();
    }

    fn frames_drawn(&self) -> u64 {
        self.frames
    }
}
