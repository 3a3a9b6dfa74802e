//! Boolean combination of cached shapes.
//!
//! A combined outline always comes back as a Polygon that keeps the id and
//! style of the shape it replaces; the original transform is baked into the
//! new segments.

use super::{AnnotationController, CombineOutcome};
use crate::color::ShapeConfig;
use crate::engine::Renderable;
use crate::extract;
use crate::model::Segment;

struct Operands {
    a_contains_b: bool,
    b_contains_a: bool,
    overlap: bool,
}

impl AnnotationController {
    fn operands(&self, a: &str, b: &str) -> Result<(&Renderable, &Renderable), CombineOutcome> {
        if a == b {
            return Err(CombineOutcome::skipped(format!(
                "Cannot combine {} with itself",
                a
            )));
        }
        let find = |id: &str| {
            self.shapes
                .get(id)
                .and_then(|s| s.renderable())
                .ok_or_else(|| CombineOutcome::skipped(format!("Shape {} is missing or not rendered", id)))
        };
        Ok((find(a)?, find(b)?))
    }

    fn classify(ra: &Renderable, rb: &Renderable) -> Operands {
        let a_contains_b = ra.contains(rb);
        let b_contains_a = !a_contains_b && rb.contains(ra);
        Operands {
            a_contains_b,
            b_contains_a,
            overlap: ra.intersects(rb),
        }
    }

    /// Intersects `a` with `b`.
    ///
    /// `replace_a` redraws `a` with the result, otherwise `replace_b` redraws
    /// `b`; with neither the cache is left alone. With `clear_originals` unset
    /// the computed region is handed back in the outcome.
    pub fn intersect_shapes(
        &mut self,
        a: &str,
        b: &str,
        replace_a: bool,
        replace_b: bool,
        clear_originals: bool,
    ) -> CombineOutcome {
        let (ra, rb) = match self.operands(a, b) {
            Ok(pair) => pair,
            Err(outcome) => return outcome,
        };
        let ops = Self::classify(ra, rb);
        if !(ops.overlap || ops.a_contains_b || ops.b_contains_a) {
            tracing::warn!("Shapes {} and {} do not intersect", a, b);
            return CombineOutcome::Disjoint;
        }
        let Some(region) = ra.intersection(rb) else {
            return CombineOutcome::skipped(format!("Intersection of {} and {} is not a region", a, b));
        };

        let segments = extract::extract_path_segments(&region, self.offset);
        if segments.is_empty() {
            return CombineOutcome::skipped(format!("Intersection of {} and {} is empty", a, b));
        }

        let target = if replace_a {
            Some(a)
        } else if replace_b {
            Some(b)
        } else {
            None
        };
        let replaced = target
            .filter(|id| self.replace_shape_path(id, segments.clone(), true))
            .map(str::to_string);

        tracing::debug!("Intersected {} and {} into {} vertices", a, b, segments.len());
        CombineOutcome::Computed {
            segments,
            replaced,
            retained: (!clear_originals).then_some(region),
        }
    }

    /// Merges `b` into `a`.
    ///
    /// When one shape contains the other the inner one is deleted. Overlapping
    /// shapes are unioned: `b` is deleted and `a` redrawn with the union.
    /// Without `replace` nothing in the cache changes. With `clear_union`
    /// unset the union region is handed back in the outcome.
    pub fn merge_shapes(&mut self, a: &str, b: &str, replace: bool, clear_union: bool) -> CombineOutcome {
        let (ra, rb) = match self.operands(a, b) {
            Ok(pair) => pair,
            Err(outcome) => return outcome,
        };
        let ops = Self::classify(ra, rb);

        if ops.a_contains_b || ops.b_contains_a {
            let (outer, inner) = if ops.a_contains_b { (a, b) } else { (b, a) };
            if !replace {
                return CombineOutcome::Contained {
                    outer: outer.to_string(),
                    inner: inner.to_string(),
                };
            }
            self.delete_shape(inner, true);
            tracing::debug!("{} contains {}, removed the inner shape", outer, inner);
            return CombineOutcome::Absorbed {
                removed: inner.to_string(),
            };
        }

        if !ops.overlap {
            tracing::warn!("Shapes {} and {} do not intersect, nothing to merge", a, b);
            return CombineOutcome::Disjoint;
        }
        let Some(region) = ra.union(rb) else {
            return CombineOutcome::skipped(format!("Union of {} and {} is not a region", a, b));
        };

        let segments = extract::extract_path_segments(&region, self.offset);
        let replaced = if replace {
            self.delete_shape(b, false);
            self.replace_shape_path(a, segments.clone(), true)
                .then(|| a.to_string())
        } else {
            None
        };

        tracing::debug!("Merged {} and {} into {} vertices", a, b, segments.len());
        CombineOutcome::Computed {
            segments,
            replaced,
            retained: (!clear_union).then_some(region),
        }
    }

    /// Redraws `id` as a Polygon through image-space `segments`, keeping its
    /// style.
    pub fn replace_shape_path(&mut self, id: &str, segments: Vec<Segment>, refresh: bool) -> bool {
        let Some(shape) = self.shapes.get(id) else {
            tracing::warn!("{}", annokit_core::AnnotationError::not_found(id));
            return false;
        };
        let config: ShapeConfig = shape.style().map(|s| s.to_config()).unwrap_or_default();
        self.delete_shape(id, false);
        self.draw_polygon(Some(id), segments, None, &config, refresh).is_some()
    }
}
