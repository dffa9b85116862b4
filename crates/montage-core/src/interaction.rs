//! Direct-manipulation interaction engine.
//!
//! Translates raw pointer gestures (down / move / up) into document-store
//! calls. One gesture runs at a time: `Idle -> Active -> Idle`, entered on
//! pointer-down over a layer or a handle and left on pointer-up, which the
//! host wires to the global input surface so a release outside the original
//! element still terminates the gesture. Pointer-up is also the only
//! cancellation path.
//!
//! Every gesture writes exactly one history checkpoint, at gesture start.
//! All per-frame geometry updates go through `update_layer` with history
//! recording off.

use crate::document::DocumentStore;
use crate::input::PointerInput;
use crate::layer::{LayerId, LayerPatch};
use crate::snap::{calculate_snap, GuideLine};
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Size, Vec2};
use std::collections::HashSet;
use std::f64::consts::{FRAC_PI_2, PI};

/// Hard floor for layer dimensions during a resize, in canvas units.
pub const MIN_LAYER_SIZE: f64 = 20.0;

/// Which edges a resize handle moves.
#[derive(Debug, Clone, Copy, Default)]
struct Edges {
    north: bool,
    south: bool,
    east: bool,
    west: bool,
}

/// Resize handle identifiers (corner and edge handles).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeHandle {
    fn edges(self) -> Edges {
        match self {
            ResizeHandle::North => Edges { north: true, ..Edges::default() },
            ResizeHandle::South => Edges { south: true, ..Edges::default() },
            ResizeHandle::East => Edges { east: true, ..Edges::default() },
            ResizeHandle::West => Edges { west: true, ..Edges::default() },
            ResizeHandle::NorthEast => Edges { north: true, east: true, ..Edges::default() },
            ResizeHandle::NorthWest => Edges { north: true, west: true, ..Edges::default() },
            ResizeHandle::SouthEast => Edges { south: true, east: true, ..Edges::default() },
            ResizeHandle::SouthWest => Edges { south: true, west: true, ..Edges::default() },
        }
    }
}

/// The active gesture, if any.
#[derive(Debug, Clone)]
enum Gesture {
    Idle,
    Drag {
        /// The layer originally under the cursor; the only layer whose
        /// position is tested against the snap solver.
        leader: LayerId,
        /// Starting position of every layer in the selection at drag start.
        origins: Vec<(LayerId, Point)>,
        start_screen: Point,
        guides: Vec<GuideLine>,
    },
    Resize {
        layer: LayerId,
        handle: ResizeHandle,
        start_screen: Point,
        origin: Point,
        original_size: Size,
        /// Aspect ratio is always locked for image layers; other layers
        /// lock only while shift is held.
        always_lock_aspect: bool,
    },
    Rotate {
        layer: LayerId,
        center: Point,
    },
}

/// Per-session gesture state machine driving the document store.
#[derive(Debug, Clone)]
pub struct InteractionEngine {
    gesture: Gesture,
}

impl InteractionEngine {
    pub fn new() -> Self {
        Self {
            gesture: Gesture::Idle,
        }
    }

    /// Whether a gesture is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    /// Guide lines for the current drag frame (empty outside a drag or when
    /// nothing snapped).
    pub fn guides(&self) -> &[GuideLine] {
        match &self.gesture {
            Gesture::Drag { guides, .. } => guides,
            _ => &[],
        }
    }

    /// Pointer-down on a layer: resolve the selection, then start a drag.
    ///
    /// Resolution, evaluated once per gesture:
    /// 1. A locked layer rejects the gesture entirely (no selection change).
    /// 2. Shift-click toggles: an already-selected layer is taken out of the
    ///    selection by itself (its group members stay selected); an
    ///    unselected layer joins, expanded to its whole group.
    /// 3. Plain click: an already-selected layer leaves the selection
    ///    untouched, which is what lets a multi-selection be dragged as a
    ///    rigid body; anything else becomes the new selection (expanded).
    ///
    /// Returns whether a drag gesture started.
    pub fn begin_drag(
        &mut self,
        store: &mut DocumentStore,
        layer: LayerId,
        input: PointerInput,
    ) -> bool {
        let Some(target) = store.layer(layer) else {
            return false;
        };
        if target.common().locked {
            return false;
        }

        if input.modifiers.shift {
            if store.is_selected(layer) {
                store.deselect_layer(layer);
            } else {
                store.extend_selection(layer);
            }
        } else if !store.is_selected(layer) {
            store.select_layer(Some(layer));
        }

        // A shift-click that removed the clicked layer leaves nothing to
        // lead the drag.
        if !store.is_selected(layer) {
            self.gesture = Gesture::Idle;
            return false;
        }

        store.record_history();

        let origins = store
            .selection()
            .iter()
            .filter_map(|&id| store.layer(id).map(|l| (id, l.common().position)))
            .collect();
        self.gesture = Gesture::Drag {
            leader: layer,
            origins,
            start_screen: input.screen,
            guides: Vec::new(),
        };
        true
    }

    /// Pointer-down on a resize handle. Single layer only; multi-select
    /// resize is not supported.
    pub fn begin_resize(
        &mut self,
        store: &mut DocumentStore,
        layer: LayerId,
        handle: ResizeHandle,
        input: PointerInput,
    ) -> bool {
        let Some(target) = store.layer(layer) else {
            return false;
        };
        if target.common().locked {
            return false;
        }
        let common = target.common();
        let origin = common.position;
        let original_size = Size::new(common.width, common.height);
        let always_lock_aspect = target.is_image();

        store.record_history();
        self.gesture = Gesture::Resize {
            layer,
            handle,
            start_screen: input.screen,
            origin,
            original_size,
            always_lock_aspect,
        };
        true
    }

    /// Pointer-down on the rotation handle.
    pub fn begin_rotate(
        &mut self,
        store: &mut DocumentStore,
        layer: LayerId,
        _input: PointerInput,
    ) -> bool {
        let Some(target) = store.layer(layer) else {
            return false;
        };
        if target.common().locked {
            return false;
        }
        let center = target.center();

        store.record_history();
        self.gesture = Gesture::Rotate { layer, center };
        true
    }

    /// Advance the active gesture for one pointer-move frame.
    pub fn pointer_move(
        &mut self,
        store: &mut DocumentStore,
        viewport: &Viewport,
        input: PointerInput,
    ) {
        match &mut self.gesture {
            Gesture::Idle => {}

            Gesture::Drag {
                leader,
                origins,
                start_screen,
                guides,
            } => {
                let leader_id = *leader;
                // Screen pixels to canvas units.
                let delta = Vec2::new(
                    (input.screen.x - start_screen.x) / viewport.zoom(),
                    (input.screen.y - start_screen.y) / viewport.zoom(),
                );

                let Some(&(_, leader_origin)) =
                    origins.iter().find(|(id, _)| *id == leader_id)
                else {
                    return;
                };
                let Some(leader_layer) = store.layer(leader_id) else {
                    return;
                };
                let leader_size =
                    Size::new(leader_layer.common().width, leader_layer.common().height);

                // The raw delta moves only the leader; its candidate position
                // is what the snap solver judges.
                let candidate = Rect::from_origin_size(
                    Point::new(leader_origin.x + delta.x, leader_origin.y + delta.y),
                    leader_size,
                );
                let selected: HashSet<LayerId> = origins.iter().map(|(id, _)| *id).collect();
                let snap = {
                    let siblings: Vec<&crate::layer::Layer> = store
                        .layers()
                        .iter()
                        .filter(|l| !selected.contains(&l.id()))
                        .collect();
                    calculate_snap(candidate, &siblings, store.canvas_size())
                };

                // Leader's actual position: snapped where a match landed,
                // raw otherwise. The effective delta it implies is applied
                // identically to every other selected layer, so the
                // selection translates as a rigid body and only the leader
                // participates in snapping.
                let actual = Point::new(
                    snap.x.unwrap_or(candidate.x0),
                    snap.y.unwrap_or(candidate.y0),
                );
                let effective = Vec2::new(
                    actual.x - leader_origin.x,
                    actual.y - leader_origin.y,
                );

                *guides = snap.guides;
                let moves: Vec<(LayerId, Point)> = origins
                    .iter()
                    .map(|(id, origin)| {
                        (*id, Point::new(origin.x + effective.x, origin.y + effective.y))
                    })
                    .collect();
                for (id, position) in moves {
                    store.update_layer(id, LayerPatch::move_to(position), false);
                }
            }

            Gesture::Resize {
                layer,
                handle,
                start_screen,
                origin,
                original_size,
                always_lock_aspect,
            } => {
                let dx = (input.screen.x - start_screen.x) / viewport.zoom();
                let dy = (input.screen.y - start_screen.y) / viewport.zoom();
                let edges = handle.edges();

                let mut x = origin.x;
                let mut y = origin.y;
                let mut width = original_size.width;
                let mut height = original_size.height;

                if edges.east {
                    width = original_size.width + dx;
                }
                if edges.west {
                    x = origin.x + dx;
                    width = original_size.width - dx;
                }
                if edges.south {
                    height = original_size.height + dy;
                }
                if edges.north {
                    y = origin.y + dy;
                    height = original_size.height - dy;
                }

                let lock_aspect = *always_lock_aspect || input.modifiers.shift;
                if lock_aspect && original_size.height > f64::EPSILON {
                    // Height follows the new width at the original ratio;
                    // a north handle re-anchors so the bottom edge holds.
                    let ratio = original_size.width / original_size.height;
                    height = width / ratio;
                    if edges.north {
                        y = origin.y + (original_size.height - height);
                    }
                }

                // Floor applies after all other math.
                width = width.max(MIN_LAYER_SIZE);
                height = height.max(MIN_LAYER_SIZE);

                store.update_layer(*layer, LayerPatch::frame(x, y, width, height), false);
            }

            Gesture::Rotate { layer, center } => {
                let pointer = viewport.screen_to_canvas(input.screen);
                // Angle from center to cursor, offset so 0 is upright.
                let mut angle =
                    (pointer.y - center.y).atan2(pointer.x - center.x) + FRAC_PI_2;
                if input.modifiers.shift {
                    let step = PI / 12.0; // 15 degrees
                    angle = (angle / step).round() * step;
                }
                store.update_layer(*layer, LayerPatch::rotate(angle), false);
            }
        }
    }

    /// Global pointer-up: terminate the gesture. The history checkpoint was
    /// already written at gesture start, so there is nothing to record here.
    pub fn pointer_up(&mut self) {
        self.gesture = Gesture::Idle;
    }
}

impl Default for InteractionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::layer::{Color, LayerSpec, ShapeKind};

    fn setup(positions: &[(f64, f64)]) -> (DocumentStore, Vec<LayerId>) {
        let mut store = DocumentStore::new();
        let ids = positions
            .iter()
            .map(|&(x, y)| {
                store.add_layer(
                    LayerSpec::shape(ShapeKind::Rectangle, Color::black())
                        .with_position(Point::new(x, y))
                        .with_size(Size::new(50.0, 50.0)),
                )
            })
            .collect();
        (store, ids)
    }

    fn pointer(x: f64, y: f64) -> PointerInput {
        PointerInput::new(Point::new(x, y))
    }

    fn shift_pointer(x: f64, y: f64) -> PointerInput {
        PointerInput::with_modifiers(Point::new(x, y), Modifiers::shift())
    }

    fn position(store: &DocumentStore, id: LayerId) -> Point {
        store.layer(id).unwrap().common().position
    }

    #[test]
    fn test_locked_layer_rejects_gesture() {
        let (mut store, ids) = setup(&[(100.0, 100.0)]);
        store.select_layer(None);
        store.toggle_layer_lock(ids[0]);

        let mut engine = InteractionEngine::new();
        assert!(!engine.begin_drag(&mut store, ids[0], pointer(110.0, 110.0)));
        assert!(!engine.is_active());
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_plain_click_keeps_existing_multi_selection() {
        let (mut store, ids) = setup(&[(0.0, 0.0), (300.0, 0.0)]);
        store.select_layers(&[ids[0], ids[1]]);

        let mut engine = InteractionEngine::new();
        assert!(engine.begin_drag(&mut store, ids[0], pointer(10.0, 10.0)));
        assert_eq!(store.selection(), &[ids[0], ids[1]]);
    }

    #[test]
    fn test_plain_click_replaces_unrelated_selection() {
        let (mut store, ids) = setup(&[(0.0, 0.0), (300.0, 0.0)]);
        store.select_layer(Some(ids[1]));

        let mut engine = InteractionEngine::new();
        assert!(engine.begin_drag(&mut store, ids[0], pointer(10.0, 10.0)));
        assert_eq!(store.selection(), &[ids[0]]);
    }

    #[test]
    fn test_plain_click_on_group_member_selects_whole_group() {
        let (mut store, ids) = setup(&[(0.0, 0.0), (300.0, 0.0), (600.0, 0.0)]);
        store.select_layers(&[ids[0], ids[1]]);
        store.group_selected_layers().unwrap();
        store.select_layer(None);

        let mut engine = InteractionEngine::new();
        assert!(engine.begin_drag(&mut store, ids[1], pointer(310.0, 10.0)));
        assert_eq!(store.selection(), &[ids[0], ids[1]]);
    }

    #[test]
    fn test_shift_click_adds_and_removes() {
        let (mut store, ids) = setup(&[(0.0, 0.0), (300.0, 0.0)]);
        store.select_layer(Some(ids[0]));

        let mut engine = InteractionEngine::new();
        // Shift-click an unselected layer: it joins, and leads a drag.
        assert!(engine.begin_drag(&mut store, ids[1], shift_pointer(310.0, 10.0)));
        assert_eq!(store.selection(), &[ids[0], ids[1]]);
        engine.pointer_up();

        // Shift-click a selected layer: it leaves, and no drag starts.
        assert!(!engine.begin_drag(&mut store, ids[1], shift_pointer(310.0, 10.0)));
        assert_eq!(store.selection(), &[ids[0]]);
        assert!(!engine.is_active());
    }

    #[test]
    fn test_drag_translates_selection_rigidly() {
        let (mut store, ids) = setup(&[(0.0, 0.0), (300.0, 200.0)]);
        store.select_layers(&[ids[0], ids[1]]);

        let mut engine = InteractionEngine::new();
        let viewport = Viewport::new();
        assert!(engine.begin_drag(&mut store, ids[0], pointer(10.0, 10.0)));
        engine.pointer_move(&mut store, &viewport, pointer(43.0, 27.0));
        engine.pointer_up();

        // No snap candidates in range: both layers moved by the raw delta.
        let a = position(&store, ids[0]);
        let b = position(&store, ids[1]);
        assert!((a.x - 33.0).abs() < f64::EPSILON);
        assert!((a.y - 17.0).abs() < f64::EPSILON);
        assert!((b.x - 333.0).abs() < f64::EPSILON);
        assert!((b.y - 217.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drag_divides_screen_delta_by_zoom() {
        let (mut store, ids) = setup(&[(0.0, 0.0)]);

        let mut engine = InteractionEngine::new();
        let mut viewport = Viewport::new();
        viewport.set_zoom(2.0);

        assert!(engine.begin_drag(&mut store, ids[0], pointer(0.0, 0.0)));
        engine.pointer_move(&mut store, &viewport, pointer(100.0, 60.0));

        let p = position(&store, ids[0]);
        assert!((p.x - 50.0).abs() < f64::EPSILON);
        assert!((p.y - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drag_snaps_leader_and_carries_followers() {
        // A sibling at x=200 offers a left-edge snap target. Layer sizes
        // differ so only the left-left check can fire.
        let (mut store, ids) = setup(&[(0.0, 0.0), (100.0, 300.0)]);
        let sibling = store.add_layer(
            LayerSpec::shape(ShapeKind::Rectangle, Color::white())
                .with_position(Point::new(200.0, 450.0))
                .with_size(Size::new(200.0, 40.0)),
        );
        store.select_layers(&[ids[0], ids[1]]);

        let mut engine = InteractionEngine::new();
        let viewport = Viewport::new();
        assert!(engine.begin_drag(&mut store, ids[0], pointer(10.0, 10.0)));
        // Raw delta (203, 0) puts the leader's left edge at 203, within the
        // 5-unit threshold of the sibling's left edge at 200.
        engine.pointer_move(&mut store, &viewport, pointer(213.0, 10.0));

        let leader = position(&store, ids[0]);
        let follower = position(&store, ids[1]);
        assert!((leader.x - 200.0).abs() < f64::EPSILON);

        // The follower moves by the post-snap effective delta (200, 0),
        // not the raw (203, 0): the selection stays rigid.
        assert!((follower.x - 300.0).abs() < f64::EPSILON);
        assert!((follower.y - 300.0).abs() < f64::EPSILON);

        assert_eq!(engine.guides().len(), 1);
        engine.pointer_up();
        assert!(engine.guides().is_empty());

        // Sanity: the sibling never moved.
        assert!((position(&store, sibling).x - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drag_records_one_checkpoint_per_gesture() {
        let (mut store, ids) = setup(&[(0.0, 0.0)]);

        let mut engine = InteractionEngine::new();
        let viewport = Viewport::new();
        assert!(engine.begin_drag(&mut store, ids[0], pointer(0.0, 0.0)));
        for step in 1..=20 {
            engine.pointer_move(&mut store, &viewport, pointer(step as f64 * 5.0, 0.0));
        }
        engine.pointer_up();

        // One undo rewinds the entire drag.
        assert!(store.undo());
        let p = position(&store, ids[0]);
        assert!((p.x).abs() < f64::EPSILON);
        assert!((p.y).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_southeast_grows_layer() {
        let (mut store, ids) = setup(&[(100.0, 100.0)]);

        let mut engine = InteractionEngine::new();
        let viewport = Viewport::new();
        assert!(engine.begin_resize(
            &mut store,
            ids[0],
            ResizeHandle::SouthEast,
            pointer(150.0, 150.0)
        ));
        engine.pointer_move(&mut store, &viewport, pointer(180.0, 170.0));

        let common = store.layer(ids[0]).unwrap().common();
        assert!((common.position.x - 100.0).abs() < f64::EPSILON);
        assert!((common.position.y - 100.0).abs() < f64::EPSILON);
        assert!((common.width - 80.0).abs() < f64::EPSILON);
        assert!((common.height - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_northwest_anchors_opposite_corner() {
        let (mut store, ids) = setup(&[(100.0, 100.0)]);

        let mut engine = InteractionEngine::new();
        let viewport = Viewport::new();
        assert!(engine.begin_resize(
            &mut store,
            ids[0],
            ResizeHandle::NorthWest,
            pointer(100.0, 100.0)
        ));
        engine.pointer_move(&mut store, &viewport, pointer(90.0, 80.0));

        let common = store.layer(ids[0]).unwrap().common();
        // Anchor moved with the handle; the south-east corner stays put.
        assert!((common.position.x - 90.0).abs() < f64::EPSILON);
        assert!((common.position.y - 80.0).abs() < f64::EPSILON);
        assert!((common.position.x + common.width - 150.0).abs() < f64::EPSILON);
        assert!((common.position.y + common.height - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_floors_at_minimum_size() {
        let (mut store, ids) = setup(&[(100.0, 100.0)]);

        let mut engine = InteractionEngine::new();
        let viewport = Viewport::new();
        assert!(engine.begin_resize(
            &mut store,
            ids[0],
            ResizeHandle::SouthEast,
            pointer(150.0, 150.0)
        ));
        // Collapse well past zero on both axes.
        engine.pointer_move(&mut store, &viewport, pointer(0.0, 0.0));

        let common = store.layer(ids[0]).unwrap().common();
        assert!((common.width - MIN_LAYER_SIZE).abs() < f64::EPSILON);
        assert!((common.height - MIN_LAYER_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_image_locks_aspect_ratio() {
        let mut store = DocumentStore::new();
        let id = store.add_layer(
            LayerSpec::image("https://example.com/a.png")
                .with_position(Point::new(0.0, 0.0))
                .with_size(Size::new(200.0, 100.0)),
        );

        let mut engine = InteractionEngine::new();
        let viewport = Viewport::new();
        assert!(engine.begin_resize(
            &mut store,
            id,
            ResizeHandle::SouthEast,
            pointer(200.0, 100.0)
        ));
        engine.pointer_move(&mut store, &viewport, pointer(300.0, 110.0));

        let common = store.layer(id).unwrap().common();
        // Height derives from the new width at the original 2:1 ratio.
        assert!((common.width - 300.0).abs() < f64::EPSILON);
        assert!((common.height - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_shift_locks_aspect_with_north_anchor_correction() {
        let (mut store, ids) = setup(&[(100.0, 100.0)]);

        let mut engine = InteractionEngine::new();
        let viewport = Viewport::new();
        assert!(engine.begin_resize(
            &mut store,
            ids[0],
            ResizeHandle::NorthEast,
            pointer(150.0, 100.0)
        ));
        engine.pointer_move(
            &mut store,
            &viewport,
            PointerInput::with_modifiers(Point::new(180.0, 100.0), Modifiers::shift()),
        );

        let common = store.layer(ids[0]).unwrap().common();
        // Square layer grown to 80 wide: height follows, and the bottom
        // edge (y 150) holds because the gesture uses a north handle.
        assert!((common.width - 80.0).abs() < f64::EPSILON);
        assert!((common.height - 80.0).abs() < f64::EPSILON);
        assert!((common.position.y + common.height - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rotate_follows_cursor() {
        let (mut store, ids) = setup(&[(100.0, 100.0)]);

        let mut engine = InteractionEngine::new();
        let viewport = Viewport::new();
        assert!(engine.begin_rotate(&mut store, ids[0], pointer(125.0, 80.0)));

        // Cursor due east of the center (125, 125): angle is 90 degrees.
        engine.pointer_move(&mut store, &viewport, pointer(200.0, 125.0));
        let rotation = store.layer(ids[0]).unwrap().common().rotation;
        assert!((rotation - FRAC_PI_2).abs() < 1e-10);
    }

    #[test]
    fn test_rotate_shift_snaps_to_increments() {
        let (mut store, ids) = setup(&[(100.0, 100.0)]);

        let mut engine = InteractionEngine::new();
        let viewport = Viewport::new();
        assert!(engine.begin_rotate(&mut store, ids[0], pointer(125.0, 80.0)));

        // Slightly past east: snaps back to exactly 90 degrees.
        engine.pointer_move(
            &mut store,
            &viewport,
            PointerInput::with_modifiers(Point::new(200.0, 128.0), Modifiers::shift()),
        );
        let rotation = store.layer(ids[0]).unwrap().common().rotation;
        assert!((rotation - FRAC_PI_2).abs() < 1e-10);
    }

    #[test]
    fn test_resize_records_one_checkpoint() {
        let (mut store, ids) = setup(&[(100.0, 100.0)]);

        let mut engine = InteractionEngine::new();
        let viewport = Viewport::new();
        assert!(engine.begin_resize(
            &mut store,
            ids[0],
            ResizeHandle::East,
            pointer(150.0, 125.0)
        ));
        engine.pointer_move(&mut store, &viewport, pointer(250.0, 125.0));
        engine.pointer_up();

        assert!(store.undo());
        let common = store.layer(ids[0]).unwrap().common();
        assert!((common.width - 50.0).abs() < f64::EPSILON);
    }
}
