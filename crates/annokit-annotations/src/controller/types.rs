//! Controller type definitions: ShapeDimensions, CombineOutcome.

use serde::{Deserialize, Serialize};

use crate::engine::Renderable;
use crate::model::Segment;

/// Physical measures of one shape.
///
/// `area` is absent for polylines and for shapes that are not rendered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeDimensions {
    pub area: Option<f64>,
    pub perimeter: Option<f64>,
}

/// Result of a boolean combination.
#[derive(Debug)]
pub enum CombineOutcome {
    /// An operand is missing, not rendered or the same shape twice. Nothing
    /// changed.
    Skipped { reason: String },
    /// The operands share no area. Nothing changed.
    Disjoint,
    /// A new outline was computed.
    ///
    /// `replaced` names the shape redrawn with it, if any. `retained` holds
    /// the computed region when the caller asked to keep it.
    Computed {
        segments: Vec<Segment>,
        replaced: Option<String>,
        retained: Option<Renderable>,
    },
    /// One operand contained the other and was deleted.
    Absorbed { removed: String },
    /// One operand contains the other; the caller asked for no replacement.
    Contained { outer: String, inner: String },
}

impl CombineOutcome {
    pub(crate) fn skipped(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::warn!("{}", reason);
        CombineOutcome::Skipped { reason }
    }

    /// True when the cache was modified.
    pub fn changed_cache(&self) -> bool {
        matches!(
            self,
            CombineOutcome::Absorbed { .. }
                | CombineOutcome::Computed {
                    replaced: Some(_),
                    ..
                }
        )
    }

    /// Segments of a computed outline.
    pub fn segments(&self) -> Option<&[Segment]> {
        match self {
            CombineOutcome::Computed { segments, .. } => Some(segments),
            _ => None,
        }
    }
}
