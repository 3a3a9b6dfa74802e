//! Interaction events attached to shapes.

use std::fmt;
use std::str::FromStr;

use annokit_core::AnnotationError;

use crate::engine::RenderableId;

/// Interaction a shape can respond to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeEvent {
    /// Pointer drag moves the shape.
    Drag,
}

impl ShapeEvent {
    pub const ALL: [ShapeEvent; 1] = [ShapeEvent::Drag];

    pub fn name(self) -> &'static str {
        match self {
            ShapeEvent::Drag => "drag",
        }
    }

    fn bit(self) -> u8 {
        match self {
            ShapeEvent::Drag => 1,
        }
    }

    /// Parses `names`, logging and skipping the ones that are not events.
    /// `None` selects every event.
    pub fn parse_list(names: Option<&[&str]>) -> Vec<ShapeEvent> {
        let Some(names) = names else {
            return Self::ALL.to_vec();
        };
        names
            .iter()
            .filter_map(|name| match name.parse::<ShapeEvent>() {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::warn!("{}", e);
                    None
                }
            })
            .collect()
    }
}

impl fmt::Display for ShapeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeEvent {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "drag" => Ok(ShapeEvent::Drag),
            _ => Err(AnnotationError::invalid_operand("event", s)),
        }
    }
}

/// Small set of [`ShapeEvent`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventFlags(u8);

impl EventFlags {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Self::ALL_BITS
    }

    const ALL_BITS: EventFlags = EventFlags(1);

    pub fn insert(&mut self, event: ShapeEvent) {
        self.0 |= event.bit();
    }

    pub fn remove(&mut self, event: ShapeEvent) {
        self.0 &= !event.bit();
    }

    pub fn contains(self, event: ShapeEvent) -> bool {
        self.0 & event.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = ShapeEvent> {
        ShapeEvent::ALL.into_iter().filter(move |e| self.contains(*e))
    }
}

impl FromIterator<ShapeEvent> for EventFlags {
    fn from_iter<I: IntoIterator<Item = ShapeEvent>>(iter: I) -> Self {
        let mut flags = EventFlags::empty();
        for event in iter {
            flags.insert(event);
        }
        flags
    }
}

/// Pointer input routed to the shape owning `target`.
///
/// Deltas are canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Drag { target: RenderableId, dx: f64, dy: f64 },
    DragEnd { target: RenderableId },
}

impl PointerEvent {
    pub fn target(&self) -> RenderableId {
        match self {
            PointerEvent::Drag { target, .. } | PointerEvent::DragEnd { target } => *target,
        }
    }
}
