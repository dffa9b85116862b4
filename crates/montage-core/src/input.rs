//! Pointer input payloads consumed by the interaction engine.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::default()
        }
    }
}

/// A pointer sample in screen coordinates, with the modifier keys held at
/// the time of the event. Every interaction-engine entry point takes one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub screen: Point,
    pub modifiers: Modifiers,
}

impl PointerInput {
    pub fn new(screen: Point) -> Self {
        Self {
            screen,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(screen: Point, modifiers: Modifiers) -> Self {
        Self { screen, modifiers }
    }
}
