//! Color and style adapter.
//!
//! Shapes are styled with `#rrggbb` strings plus a separate alpha, the way
//! they are persisted. The geometry engine works with [`Color`], an RGBA
//! value with floating-point components. This module converts between the two
//! and merges per-call style overrides over the controller defaults.

use annokit_core::AnnotationError;
use annokit_settings::ShapeDefaults;
use serde::{Deserialize, Serialize};

/// Engine-native RGBA color, every component in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

pub const WHITE: Color = Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};

pub const BLACK: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

impl Color {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#rrggbb` (or the `#rgb` shorthand) with the given alpha.
    ///
    /// Alpha outside `0..=1` is clamped.
    pub fn from_hex(hex: &str, alpha: f64) -> Result<Self, AnnotationError> {
        let invalid = || AnnotationError::invalid_operand("color", hex);
        let digits = hex.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        let (r, g, b) = match digits.len() {
            6 => (
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            ),
            3 => (
                channel(&digits[0..1])? * 17,
                channel(&digits[1..2])? * 17,
                channel(&digits[2..3])? * 17,
            ),
            _ => return Err(invalid()),
        };

        Ok(Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: alpha.clamp(0.0, 1.0),
        })
    }

    /// `#rrggbb` representation, alpha dropped.
    pub fn to_hex(&self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        let quantize = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }
}

/// Converts a hex color and alpha to the engine representation.
pub fn hex_to_native(hex: &str, alpha: f64) -> Result<Color, AnnotationError> {
    Color::from_hex(hex, alpha)
}

/// Converts an engine color back to `(hex, alpha)`.
pub fn native_to_hex(color: &Color) -> (String, f64) {
    (color.to_hex(), color.a)
}

/// Style request as it appears in draw calls and shape JSON.
///
/// Every field is optional; missing fields fall back to the controller
/// defaults when the style is resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_alpha: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_alpha: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

impl ShapeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill(mut self, color: impl Into<String>, alpha: f64) -> Self {
        self.fill_color = Some(color.into());
        self.fill_alpha = Some(alpha);
        self
    }

    pub fn stroke(mut self, color: impl Into<String>, alpha: f64) -> Self {
        self.stroke_color = Some(color.into());
        self.stroke_alpha = Some(alpha);
        self
    }

    pub fn stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }

    /// Field-by-field merge: explicit values win over `defaults`.
    pub fn resolve(&self, defaults: &ShapeDefaults) -> ShapeDefaults {
        ShapeDefaults {
            fill_color: self
                .fill_color
                .clone()
                .unwrap_or_else(|| defaults.fill_color.clone()),
            fill_alpha: self.fill_alpha.unwrap_or(defaults.fill_alpha),
            stroke_color: self
                .stroke_color
                .clone()
                .unwrap_or_else(|| defaults.stroke_color.clone()),
            stroke_alpha: self.stroke_alpha.unwrap_or(defaults.stroke_alpha),
            stroke_width: self.stroke_width.unwrap_or(defaults.stroke_width),
        }
    }
}

impl From<&ShapeDefaults> for ShapeConfig {
    fn from(defaults: &ShapeDefaults) -> Self {
        Self {
            fill_color: Some(defaults.fill_color.clone()),
            fill_alpha: Some(defaults.fill_alpha),
            stroke_color: Some(defaults.stroke_color.clone()),
            stroke_alpha: Some(defaults.stroke_alpha),
            stroke_width: Some(defaults.stroke_width),
        }
    }
}

/// Engine-native style applied to a renderable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: WHITE,
            stroke: BLACK,
            stroke_width: 20.0,
        }
    }
}

impl ShapeStyle {
    /// Resolves `request` over `defaults` and converts colors.
    ///
    /// A color that fails to parse is reported and replaced by the default
    /// for that field, so one bad field never discards the whole style.
    pub fn resolve(request: &ShapeConfig, defaults: &ShapeDefaults) -> Self {
        let merged = request.resolve(defaults);
        let fallback = ShapeStyle::default();
        let fill = parse_or_default(
            &merged.fill_color,
            merged.fill_alpha,
            &defaults.fill_color,
            fallback.fill,
        );
        let stroke = parse_or_default(
            &merged.stroke_color,
            merged.stroke_alpha,
            &defaults.stroke_color,
            fallback.stroke,
        );
        Self {
            fill,
            stroke,
            stroke_width: merged.stroke_width.max(0.0),
        }
    }

    /// Persisted representation with every field present.
    pub fn to_config(&self) -> ShapeConfig {
        let (fill_color, fill_alpha) = native_to_hex(&self.fill);
        let (stroke_color, stroke_alpha) = native_to_hex(&self.stroke);
        ShapeConfig {
            fill_color: Some(fill_color),
            fill_alpha: Some(fill_alpha),
            stroke_color: Some(stroke_color),
            stroke_alpha: Some(stroke_alpha),
            stroke_width: Some(self.stroke_width),
        }
    }
}

fn parse_or_default(hex: &str, alpha: f64, default_hex: &str, fallback: Color) -> Color {
    match hex_to_native(hex, alpha) {
        Ok(color) => color,
        Err(e) => {
            tracing::warn!("{}, using default color {}", e, default_hex);
            hex_to_native(default_hex, alpha).unwrap_or(Color { a: alpha, ..fallback })
        }
    }
}
