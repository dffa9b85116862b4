//! View transform between screen pixels and canvas units.
//!
//! The editing surface shows a fixed-size page at a pan offset and zoom
//! factor. Pointer events arrive in screen pixels; the interaction engine
//! divides pointer deltas by the zoom factor and maps absolute positions
//! through `screen_to_canvas`. Presentation concerns (scrolling the page
//! into view, zoom gestures, fit-to-window) live in the host shell, which
//! writes the offset and zoom it arrives at back into this state.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest zoom factor the host UI may set.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest zoom factor the host UI may set.
pub const MAX_ZOOM: f64 = 8.0;

/// Pan/zoom state of the editing surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen position of the page's top-left corner, in pixels.
    pub offset: Vec2,
    /// Zoom factor (1.0 = 100%). Kept in range by `set_zoom`.
    zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom factor, clamped to the supported range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Map an absolute screen position to canvas units.
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.offset.x) / self.zoom,
            (screen.y - self.offset.y) / self.zoom,
        )
    }
}
