//! Geometry engine: renderables and the surfaces that draw them.

mod raster;
mod renderable;
mod surface;

pub use raster::PixmapSurface;
pub use renderable::{Bounds, RegionPolygon, Renderable, RenderableId, AREA_EPSILON};
pub use surface::{RecordingSurface, RenderSurface, View, MAX_ZOOM, MIN_ZOOM};
