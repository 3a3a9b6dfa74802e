//! Shape JSON schema.
//!
//! Every shape is one flat object: the common fields (`shape_id`,
//! `transform`, style, `type`) plus the fields of its variant. Coordinates are
//! image pixels. `"line"` is accepted on input and loaded as a polyline.

use annokit_core::{AnnotationError, Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::ShapeConfig;
use crate::model::Segment;
use crate::transform::TransformMatrix;

/// Type tags the loader understands.
pub const KNOWN_TYPES: [&str; 6] = ["rectangle", "ellipse", "circle", "line", "polyline", "polygon"];

/// Variant-specific fields, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GeometryJson {
    Rectangle {
        origin_x: f64,
        origin_y: f64,
        width: f64,
        height: f64,
    },
    Ellipse {
        center_x: f64,
        center_y: f64,
        radius_x: f64,
        radius_y: f64,
    },
    Circle {
        center_x: f64,
        center_y: f64,
        radius: f64,
    },
    Line {
        from_x: f64,
        from_y: f64,
        to_x: f64,
        to_y: f64,
    },
    Polyline {
        #[serde(default)]
        segments: Vec<Segment>,
    },
    Polygon {
        #[serde(default)]
        segments: Vec<Segment>,
    },
}

/// One persisted shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeJson {
    pub shape_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<TransformMatrix>,
    #[serde(flatten)]
    pub style: ShapeConfig,
    #[serde(flatten)]
    pub geometry: GeometryJson,
}

impl ShapeJson {
    pub fn type_tag(&self) -> &'static str {
        match self.geometry {
            GeometryJson::Rectangle { .. } => "rectangle",
            GeometryJson::Ellipse { .. } => "ellipse",
            GeometryJson::Circle { .. } => "circle",
            GeometryJson::Line { .. } => "line",
            GeometryJson::Polyline { .. } => "polyline",
            GeometryJson::Polygon { .. } => "polygon",
        }
    }

    /// Parses one shape object.
    ///
    /// The `type` tag is checked first so an unknown kind is reported as
    /// such rather than as a generic schema error.
    pub fn from_value(value: &Value) -> std::result::Result<Self, AnnotationError> {
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| AnnotationError::invalid_operand("shape type", "<missing>"))?;
        if !KNOWN_TYPES.contains(&tag) {
            return Err(AnnotationError::invalid_operand("shape type", tag));
        }
        Self::deserialize(value)
            .map_err(|e| AnnotationError::invalid_operand(format!("{} JSON", tag), e.to_string()))
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Splits a JSON document into shape objects.
///
/// Accepts an array of shapes or a single shape object.
pub fn shape_values_from_str(json: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(items) => Ok(items),
        object @ Value::Object(_) => Ok(vec![object]),
        other => Err(Error::other(format!(
            "expected an array of shapes, found {}",
            json_kind(&other)
        ))),
    }
}

/// Serializes shapes as a pretty-printed JSON array.
pub fn shapes_to_string(shapes: &[ShapeJson]) -> Result<String> {
    Ok(serde_json::to_string_pretty(shapes)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
