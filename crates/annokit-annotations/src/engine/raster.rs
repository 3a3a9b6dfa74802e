//! Raster surface backed by tiny-skia.
//!
//! Features:
//! - Anti-aliased fill and stroke in the annotation's own colors
//! - Holes in merged regions (even-odd fill)
//! - Selection indicator around selected shapes

use std::path::Path as FsPath;

use annokit_core::{Error, Result};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::engine::surface::{RenderSurface, View};
use crate::engine::Renderable;
use crate::model::Point;

fn selection_color() -> Color {
    Color::from_rgba8(255, 235, 59, 255)
}

/// [`RenderSurface`] drawing into an in-memory pixmap.
pub struct PixmapSurface {
    view: View,
    pixmap: Option<Pixmap>,
    frames: u64,
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            view: View::new(width, height),
            pixmap: Pixmap::new(width, height),
            frames: 0,
        }
    }

    /// The last drawn frame. `None` while the surface has zero size.
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    pub fn save_png(&self, path: &FsPath) -> Result<()> {
        let pixmap = self
            .pixmap
            .as_ref()
            .ok_or_else(|| Error::other("surface has no pixels to save"))?;
        pixmap
            .save_png(path)
            .map_err(|e| Error::other(format!("{}: {}", path.display(), e)))
    }

    fn view_transform(&self) -> Transform {
        let zoom = self.view.zoom() as f32;
        let (tx, ty) = self.view.canvas_to_pixel(Point::new(0.0, 0.0));
        Transform::from_row(zoom, 0.0, 0.0, zoom, tx as f32, ty as f32)
    }
}

impl RenderSurface for PixmapSurface {
    fn view(&self) -> &View {
        &self.view
    }

    fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.view.resize(width, height);
        self.pixmap = Pixmap::new(width, height);
    }

    fn draw(&mut self, scene: &[&Renderable]) {
        self.frames += 1;
        let transform = self.view_transform();
        let zoom = self.view.zoom() as f32;
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        pixmap.fill(Color::TRANSPARENT);

        for renderable in scene.iter().filter(|r| r.is_visible()) {
            let Some(path) = outline_path(renderable) else {
                continue;
            };
            let style = renderable.style();

            if renderable.is_closed() {
                let [r, g, b, a] = style.fill.to_rgba8();
                let mut paint = Paint::default();
                paint.set_color_rgba8(r, g, b, a);
                paint.anti_alias = true;
                pixmap.fill_path(&path, &paint, FillRule::EvenOdd, transform, None);
            }

            if style.stroke_width > 0.0 {
                let [r, g, b, a] = style.stroke.to_rgba8();
                let mut paint = Paint::default();
                paint.set_color_rgba8(r, g, b, a);
                paint.anti_alias = true;
                let stroke = Stroke {
                    width: style.stroke_width as f32,
                    ..Default::default()
                };
                pixmap.stroke_path(&path, &paint, &stroke, transform, None);
            }

            if renderable.is_selected() {
                if let Some(bounds) = renderable.bounds() {
                    let rect = Rect::from_ltrb(
                        bounds.min_x as f32,
                        bounds.min_y as f32,
                        bounds.max_x as f32,
                        bounds.max_y as f32,
                    );
                    if let Some(rect) = rect {
                        let mut paint = Paint::default();
                        paint.set_color(selection_color());
                        paint.anti_alias = true;
                        let stroke = Stroke {
                            width: 1.0 / zoom,
                            ..Default::default()
                        };
                        let outline = PathBuilder::from_rect(rect);
                        pixmap.stroke_path(&outline, &paint, &stroke, transform, None);
                    }
                }
            }
        }
    }

    fn frames_drawn(&self) -> u64 {
        self.frames
    }
}

fn outline_path(renderable: &Renderable) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    if let Some(points) = renderable.stroke_points() {
        push_ring(&mut pb, points, false);
    } else {
        for polygon in renderable.polygons() {
            push_ring(&mut pb, &polygon.exterior, true);
            for hole in &polygon.holes {
                push_ring(&mut pb, hole, true);
            }
        }
    }
    pb.finish()
}

fn push_ring(pb: &mut PathBuilder, ring: &[Point], closed: bool) {
    let Some((first, rest)) = ring.split_first() else {
        return;
    };
    pb.move_to(first.x as f32, first.y as f32);
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }
    if closed {
        pb.close();
    }
}
