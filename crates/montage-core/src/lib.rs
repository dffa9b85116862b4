//! Montage Core Library
//!
//! Platform-agnostic document model and direct-manipulation interaction
//! engine for the Montage composition editor: pages of image/text/shape
//! layers, group-aware selection, pointer-driven drag/resize/rotate with
//! snap-to-guide alignment, and whole-document undo/redo.
//!
//! Rendering, export, persistence of documents and generation pipelines are
//! external collaborators; they talk to this crate exclusively through
//! [`DocumentStore`] and read [`InteractionEngine::guides`] for overlay
//! feedback.

pub mod config;
pub mod document;
pub mod history;
pub mod input;
pub mod interaction;
pub mod layer;
pub mod page;
pub mod selection;
pub mod snap;
pub mod viewport;

pub use config::{ConfigError, EditorConfig};
pub use document::{Document, DocumentStore, StackDirection, DEFAULT_CANVAS_SIZE, DUPLICATE_OFFSET};
pub use history::{History, MAX_HISTORY};
pub use input::{Modifiers, PointerInput};
pub use interaction::{InteractionEngine, ResizeHandle, MIN_LAYER_SIZE};
pub use layer::{
    Color, FontWeight, GroupId, ImageFilters, ImageLayer, Layer, LayerCommon, LayerContent,
    LayerId, LayerPatch, LayerSpec, Shadow, ShapeKind, ShapeLayer, TextAlign, TextLayer, TextStyle,
};
pub use page::{Page, PageBackground};
pub use selection::{expand_selection, expand_to_group};
pub use snap::{calculate_snap, GuideLine, GuideOrientation, SnapResult, SNAP_THRESHOLD};
pub use viewport::{Viewport, MAX_ZOOM, MIN_ZOOM};

#[cfg(not(target_arch = "wasm32"))]
pub use config::ConfigStore;
