//! Alignment solver for snapping a dragged layer to its siblings and to the
//! canvas center.
//!
//! The solver is a pure function over geometry: it never touches the
//! document. During a drag the interaction engine feeds it the leader's
//! candidate bounds each frame and applies the result; the emitted guide
//! lines exist only for the lifetime of the gesture.

use crate::layer::Layer;
use kurbo::{Rect, Size};

/// Distance threshold for alignment snapping, in canvas units.
pub const SNAP_THRESHOLD: f64 = 5.0;

/// Guide line orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideOrientation {
    Horizontal,
    Vertical,
}

/// Transient alignment indicator emitted while a snap match is active.
/// Vertical guides sit at an x position, horizontal guides at a y position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    pub orientation: GuideOrientation,
    pub position: f64,
}

impl GuideLine {
    pub fn vertical(position: f64) -> Self {
        Self {
            orientation: GuideOrientation::Vertical,
            position,
        }
    }

    pub fn horizontal(position: f64) -> Self {
        Self {
            orientation: GuideOrientation::Horizontal,
            position,
        }
    }
}

/// Result of a snap query.
///
/// `x`/`y` are the snapped top-left coordinates for the moving node, or
/// `None` when nothing on that axis fell within the threshold (the caller
/// keeps the raw position). `guides` carries one entry per match for the
/// rendering surface to draw.
#[derive(Debug, Clone, Default)]
pub struct SnapResult {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub guides: Vec<GuideLine>,
}

impl SnapResult {
    pub fn is_snapped(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }
}

/// Compute snap adjustments for a moving node against its siblings and the
/// canvas center. Both axes are resolved independently.
///
/// Checks per axis, in order: canvas center (node center vs canvas center),
/// then per sibling edge-to-edge (left/left, right/right for x; top/top,
/// bottom/bottom for y) and center-to-center. Every match within the
/// threshold overwrites the axis result and appends a guide line, so the
/// last matching candidate in iteration order wins when several siblings
/// would snap the same axis. Guide rendering and the geometry update must
/// agree on that resolution, which is why the overwrite order is part of
/// the contract here.
///
/// Callers pre-filter the sibling list (the current selection never snaps
/// to itself), but the solver also skips invisible siblings on its own.
pub fn calculate_snap(moving: Rect, siblings: &[&Layer], canvas: Size) -> SnapResult {
    let mut result = SnapResult::default();
    let width = moving.width();
    let height = moving.height();
    let center = moving.center();

    let canvas_center_x = canvas.width / 2.0;
    let canvas_center_y = canvas.height / 2.0;
    if (center.x - canvas_center_x).abs() <= SNAP_THRESHOLD {
        result.x = Some(canvas_center_x - width / 2.0);
        result.guides.push(GuideLine::vertical(canvas_center_x));
    }
    if (center.y - canvas_center_y).abs() <= SNAP_THRESHOLD {
        result.y = Some(canvas_center_y - height / 2.0);
        result.guides.push(GuideLine::horizontal(canvas_center_y));
    }

    for sibling in siblings {
        if !sibling.common().visible {
            continue;
        }
        let bounds = sibling.bounds();
        let sibling_center = bounds.center();

        if (moving.x0 - bounds.x0).abs() <= SNAP_THRESHOLD {
            result.x = Some(bounds.x0);
            result.guides.push(GuideLine::vertical(bounds.x0));
        }
        if (moving.x1 - bounds.x1).abs() <= SNAP_THRESHOLD {
            result.x = Some(bounds.x1 - width);
            result.guides.push(GuideLine::vertical(bounds.x1));
        }
        if (center.x - sibling_center.x).abs() <= SNAP_THRESHOLD {
            result.x = Some(sibling_center.x - width / 2.0);
            result.guides.push(GuideLine::vertical(sibling_center.x));
        }

        if (moving.y0 - bounds.y0).abs() <= SNAP_THRESHOLD {
            result.y = Some(bounds.y0);
            result.guides.push(GuideLine::horizontal(bounds.y0));
        }
        if (moving.y1 - bounds.y1).abs() <= SNAP_THRESHOLD {
            result.y = Some(bounds.y1 - height);
            result.guides.push(GuideLine::horizontal(bounds.y1));
        }
        if (center.y - sibling_center.y).abs() <= SNAP_THRESHOLD {
            result.y = Some(sibling_center.y - height / 2.0);
            result.guides.push(GuideLine::horizontal(sibling_center.y));
        }
    }

    result
}
