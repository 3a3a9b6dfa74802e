//! Image viewport and the image/canvas coordinate mapping.
//!
//! Persisted coordinates are image pixels with the origin at the top-left
//! corner. Canvas coordinates put the origin at the image center:
//!
//! ```text
//! canvas = image - offset
//! image  = canvas + offset
//! offset = (image_width / 2, image_height / 2)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Point;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Source of image geometry for the controller.
pub trait ViewportSource {
    /// Full image size in pixels.
    fn image_dimensions(&self) -> Dimensions;

    /// Physical size of one image pixel.
    fn image_microns_per_pixel(&self) -> f64;

    /// Size of the drawing surface in screen pixels.
    fn canvas_size(&self) -> Dimensions;
}

/// Fixed viewport description.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticViewport {
    image: Dimensions,
    microns_per_pixel: f64,
    canvas: Dimensions,
}

/// Largest canvas [`StaticViewport::new`] picks on its own.
pub const DEFAULT_CANVAS_SIZE: Dimensions = Dimensions {
    width: 1920.0,
    height: 1080.0,
};

impl StaticViewport {
    /// Viewport whose canvas is the image scaled down, aspect kept, to fit
    /// [`DEFAULT_CANVAS_SIZE`]. Smaller images keep their own size.
    pub fn new(image_width: f64, image_height: f64, microns_per_pixel: f64) -> Self {
        let image = Dimensions::new(image_width, image_height);
        Self {
            image,
            microns_per_pixel,
            canvas: fit_within(image, DEFAULT_CANVAS_SIZE),
        }
    }

    pub fn with_canvas_size(mut self, width: f64, height: f64) -> Self {
        self.canvas = Dimensions::new(width, height);
        self
    }
}

fn fit_within(size: Dimensions, bound: Dimensions) -> Dimensions {
    let scale = (bound.width / size.width)
        .min(bound.height / size.height)
        .min(1.0);
    if !scale.is_finite() || scale <= 0.0 {
        return Dimensions::new(size.width.min(bound.width), size.height.min(bound.height));
    }
    Dimensions::new((size.width * scale).round(), (size.height * scale).round())
}

impl ViewportSource for StaticViewport {
    fn image_dimensions(&self) -> Dimensions {
        self.image
    }

    fn image_microns_per_pixel(&self) -> f64 {
        self.microns_per_pixel
    }

    fn canvas_size(&self) -> Dimensions {
        self.canvas
    }
}

/// Translation between image and canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoordinateOffset {
    pub x: f64,
    pub y: f64,
}

impl CoordinateOffset {
    pub const ZERO: CoordinateOffset = CoordinateOffset { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Half the image size.
    pub fn for_image(image: Dimensions) -> Self {
        Self::new(image.width / 2.0, image.height / 2.0)
    }

    pub fn to_canvas(&self, image_point: Point) -> Point {
        Point::new(image_point.x - self.x, image_point.y - self.y)
    }

    pub fn to_image(&self, canvas_point: Point) -> Point {
        Point::new(canvas_point.x + self.x, canvas_point.y + self.y)
    }
}
