//! Cache queries, bulk operations and the JSON surface of the controller.
//!
//! Every bulk operation takes `Option<&[&str]>`; `None` means every shape.
//! The ids are snapshotted before iterating, missing ids are skipped with a
//! warning and the view is refreshed once at the end.

use std::collections::BTreeMap;

use annokit_core::{AnnotationError, Result};
use serde_json::Value;

use super::{AnnotationController, ShapeDimensions};
use crate::color::{ShapeConfig, ShapeStyle};
use crate::model::{Point, Shape};
use crate::serialization::{self, ShapeJson};

impl AnnotationController {
    pub fn get_shape(&self, id: &str) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn get_shape_mut(&mut self, id: &str) -> Option<&mut Shape> {
        self.shapes.get_mut(id)
    }

    /// Cached ids, sorted.
    pub fn shape_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.shapes.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn get_shapes(&self, ids: Option<&[&str]>) -> Vec<&Shape> {
        self.target_ids(ids)
            .iter()
            .filter_map(|id| self.shapes.get(id))
            .collect()
    }

    // Snapshot of the ids a bulk operation works on.
    fn target_ids(&self, ids: Option<&[&str]>) -> Vec<String> {
        match ids {
            None => self.shape_ids(),
            Some(ids) => ids
                .iter()
                .filter(|id| {
                    let found = self.shapes.contains_key(**id);
                    if !found {
                        tracing::warn!("{}", AnnotationError::not_found(**id));
                    }
                    found
                })
                .map(|id| id.to_string())
                .collect(),
        }
    }

    fn for_each_shape(&mut self, ids: Option<&[&str]>, refresh: bool, mut f: impl FnMut(&mut Shape)) {
        for id in self.target_ids(ids) {
            if let Some(shape) = self.shapes.get_mut(&id) {
                f(shape);
            }
        }
        self.refresh(refresh);
    }

    pub fn select_shape(&mut self, id: &str, clear_selected: bool, refresh: bool) {
        self.select_shapes(Some(&[id]), clear_selected, refresh);
    }

    /// Selects shapes, optionally deselecting everything else first.
    pub fn select_shapes(&mut self, ids: Option<&[&str]>, clear_selected: bool, refresh: bool) {
        if clear_selected {
            self.shapes.values_mut().for_each(Shape::deselect);
        }
        self.for_each_shape(ids, refresh, Shape::select);
    }

    pub fn deselect_shape(&mut self, id: &str, refresh: bool) {
        self.deselect_shapes(Some(&[id]), refresh);
    }

    pub fn deselect_shapes(&mut self, ids: Option<&[&str]>, refresh: bool) {
        self.for_each_shape(ids, refresh, Shape::deselect);
    }

    /// Ids of the selected shapes, sorted.
    pub fn selected_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .shapes
            .values()
            .filter(|s| s.is_selected())
            .map(|s| s.id().to_string())
            .collect();
        ids.sort();
        ids
    }

    pub fn show_shape(&mut self, id: &str, refresh: bool) {
        self.show_shapes(Some(&[id]), refresh);
    }

    pub fn show_shapes(&mut self, ids: Option<&[&str]>, refresh: bool) {
        self.for_each_shape(ids, refresh, Shape::show);
    }

    pub fn hide_shape(&mut self, id: &str, refresh: bool) {
        self.hide_shapes(Some(&[id]), refresh);
    }

    pub fn hide_shapes(&mut self, ids: Option<&[&str]>, refresh: bool) {
        self.for_each_shape(ids, refresh, Shape::hide);
    }

    /// Removes a shape and its renderable. Returns `false` if it is not cached.
    pub fn delete_shape(&mut self, id: &str, refresh: bool) -> bool {
        let Some(mut shape) = self.shapes.remove(id) else {
            tracing::warn!("{}", AnnotationError::not_found(id));
            return false;
        };
        if let Some(renderable) = shape.delete() {
            self.renderable_owners.remove(&renderable);
        }
        tracing::debug!("Deleted {} {}", shape.type_tag(), id);
        self.refresh(refresh);
        true
    }

    /// Returns the number of shapes deleted.
    pub fn delete_shapes(&mut self, ids: Option<&[&str]>, refresh: bool) -> usize {
        let deleted = self
            .target_ids(ids)
            .iter()
            .filter(|id| self.delete_shape(id, false))
            .count();
        self.refresh(refresh);
        deleted
    }

    /// Empties the cache.
    pub fn clear(&mut self, refresh: bool) {
        let count = self.delete_shapes(None, refresh);
        self.renderable_owners.clear();
        tracing::debug!("Cleared {} shapes", count);
    }

    /// Enables the named events (`None` = all) on the given shapes.
    pub fn enable_events_on_shapes(&mut self, ids: Option<&[&str]>, events: Option<&[&str]>) {
        self.for_each_shape(ids, false, |shape| shape.enable_events(events));
    }

    pub fn disable_events_on_shapes(&mut self, ids: Option<&[&str]>, events: Option<&[&str]>) {
        self.for_each_shape(ids, false, |shape| shape.disable_events(events));
    }

    /// Bounding-box center; image space when `apply_offset`, canvas space
    /// otherwise.
    pub fn get_shape_center(&self, id: &str, apply_offset: bool) -> Option<Point> {
        let Some(shape) = self.shapes.get(id) else {
            tracing::warn!("{}", AnnotationError::not_found(id));
            return None;
        };
        let center = shape.center()?;
        Some(if apply_offset {
            self.offset.to_image(center)
        } else {
            center
        })
    }

    /// Visible shape under an image-space position. Overlaps resolve to the
    /// smallest outline.
    pub fn shape_at(&self, x: f64, y: f64) -> Option<&str> {
        let canvas = self.offset.to_canvas(Point::new(x, y));
        self.shapes
            .values()
            .filter(|s| s.is_visible() && s.contains(canvas.x, canvas.y))
            .map(|s| {
                let size = s
                    .renderable()
                    .and_then(|r| r.area().or_else(|| r.length()))
                    .unwrap_or(0.0);
                (size, s.id())
            })
            .min_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(b.1)))
            .map(|(_, id)| id)
    }

    /// Area and perimeter in physical units.
    pub fn get_shape_dimensions(&self, id: &str, decimals: Option<u32>) -> Option<ShapeDimensions> {
        let Some(shape) = self.shapes.get(id) else {
            tracing::warn!("{}", AnnotationError::not_found(id));
            return None;
        };
        let decimals = decimals.unwrap_or(self.decimals);
        Some(ShapeDimensions {
            area: shape.area(self.microns_per_pixel, decimals),
            perimeter: shape.perimeter(self.microns_per_pixel, decimals),
        })
    }

    pub fn get_shapes_dimensions(
        &self,
        ids: Option<&[&str]>,
        decimals: Option<u32>,
    ) -> BTreeMap<String, ShapeDimensions> {
        self.target_ids(ids)
            .into_iter()
            .filter_map(|id| {
                let dims = self.get_shape_dimensions(&id, decimals)?;
                Some((id, dims))
            })
            .collect()
    }

    /// Persisted form of one shape, image space. Shapes cached without a
    /// renderable carry the default style.
    pub fn get_shape_json(&mut self, id: &str) -> Option<ShapeJson> {
        let offset = self.offset;
        let fallback = ShapeStyle::resolve(&ShapeConfig::new(), &self.defaults);
        match self.shapes.get_mut(id) {
            Some(shape) => Some(shape.to_json(offset, &fallback)),
            None => {
                tracing::warn!("{}", AnnotationError::not_found(id));
                None
            }
        }
    }

    pub fn get_shapes_json(&mut self, ids: Option<&[&str]>) -> Vec<ShapeJson> {
        self.target_ids(ids)
            .iter()
            .filter_map(|id| self.get_shape_json(id))
            .collect()
    }

    /// Shapes as a pretty-printed JSON array.
    pub fn shapes_json_string(&mut self, ids: Option<&[&str]>) -> Result<String> {
        serialization::shapes_to_string(&self.get_shapes_json(ids))
    }

    /// Draws one shape from a JSON object. Unknown types and malformed
    /// records are logged and skipped.
    pub fn draw_shape_from_json(&mut self, value: &Value, refresh: bool) -> Option<String> {
        match ShapeJson::from_value(value) {
            Ok(record) => self.draw_shape_from_record(&record, refresh),
            Err(err) => {
                tracing::warn!("Skipping shape: {}", err);
                None
            }
        }
    }

    pub fn draw_shape_from_record(&mut self, record: &ShapeJson, refresh: bool) -> Option<String> {
        self.draw_shape(Shape::from_json(record), &record.style, refresh)
    }

    /// Returns the ids drawn.
    pub fn draw_shapes_from_json(&mut self, values: &[Value], refresh: bool) -> Vec<String> {
        let drawn: Vec<String> = values
            .iter()
            .filter_map(|value| self.draw_shape_from_json(value, false))
            .collect();
        tracing::info!("Loaded {} of {} shapes", drawn.len(), values.len());
        self.refresh(refresh);
        drawn
    }

    /// Accepts a JSON array of shapes or a single shape object.
    pub fn draw_shapes_from_json_str(&mut self, json: &str, refresh: bool) -> Result<Vec<String>> {
        let values = serialization::shape_values_from_str(json)?;
        Ok(self.draw_shapes_from_json(&values, refresh))
    }
}
