//! Document store: pages, layers, selection and history behind one
//! mutation surface.

use crate::history::History;
use crate::layer::{
    GroupId, ImageLayer, Layer, LayerCommon, LayerContent, LayerId, LayerPatch, LayerSpec,
    ShapeLayer, TextLayer,
};
use crate::page::Page;
use crate::selection;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default canvas dimensions for a new session.
pub const DEFAULT_CANVAS_SIZE: Size = Size::new(800.0, 600.0);

/// Position offset applied to duplicated layers, in canvas units.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Default dimensions for image and shape layers created without geometry.
const DEFAULT_LAYER_SIZE: Size = Size::new(100.0, 100.0);

/// Default dimensions for text layers created without geometry.
const DEFAULT_TEXT_SIZE: Size = Size::new(240.0, 48.0);

/// The multi-page document: an ordered list of pages plus the active index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub pages: Vec<Page>,
    pub active_page: usize,
}

impl Document {
    /// Create a document with a single empty page.
    pub fn new() -> Self {
        Self {
            pages: vec![Page::new()],
            active_page: 0,
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction for reordering a layer within the paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackDirection {
    Top,
    Bottom,
    Up,
    Down,
}

/// Session-scoped document service.
///
/// Owns the page list, the selection and the undo history, and is the only
/// surface through which they are mutated: the interaction engine and
/// external collaborators (generation pipelines, toolbars, shortcut
/// handlers) all go through it. Constructed per editing session and passed
/// by `&mut`; all access is synchronous and single-threaded.
///
/// Operations target the active page unless stated otherwise, and are
/// silent no-ops when their target does not exist.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    document: Document,
    selection: Vec<LayerId>,
    history: History,
    canvas_size: Size,
}

impl DocumentStore {
    /// Create a store with an empty single-page document.
    pub fn new() -> Self {
        Self::with_canvas_size(DEFAULT_CANVAS_SIZE)
    }

    pub fn with_canvas_size(canvas_size: Size) -> Self {
        Self {
            document: Document::new(),
            selection: Vec::new(),
            history: History::new(),
            canvas_size,
        }
    }

    /// Create a store over an existing document (e.g. a loaded project).
    pub fn with_document(document: Document, canvas_size: Size) -> Self {
        let mut document = document;
        if document.pages.is_empty() {
            document.pages.push(Page::new());
        }
        document.active_page = document.active_page.min(document.pages.len() - 1);
        Self {
            document,
            selection: Vec::new(),
            history: History::new(),
            canvas_size,
        }
    }

    // --- read surface ---

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn pages(&self) -> &[Page] {
        &self.document.pages
    }

    pub fn active_page_index(&self) -> usize {
        self.document.active_page
    }

    /// Ordered layer list of the active page (back-to-front paint order).
    pub fn layers(&self) -> &[Layer] {
        &self.active_page().layers
    }

    /// Look up a layer on the active page.
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.active_page().layer(id)
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    pub fn set_canvas_size(&mut self, size: Size) {
        self.canvas_size = size;
    }

    fn active_page(&self) -> &Page {
        &self.document.pages[self.document.active_page]
    }

    fn active_page_mut(&mut self) -> &mut Page {
        let index = self.document.active_page;
        &mut self.document.pages[index]
    }

    // --- layer lifecycle ---

    /// Insert a new layer on the active page.
    ///
    /// Structural defaults are filled in (full opacity, visible, unlocked,
    /// identity filters, zero rotation, unit flip scalars), the layer gets a
    /// fresh id and the next dense z_index, is centered on the canvas when
    /// no position was given, and becomes the sole selection.
    pub fn add_layer(&mut self, spec: LayerSpec) -> LayerId {
        self.record_history();

        let LayerSpec {
            content,
            name,
            position,
            size,
        } = spec;

        let size = size.unwrap_or(match &content {
            LayerContent::Text { .. } => DEFAULT_TEXT_SIZE,
            _ => DEFAULT_LAYER_SIZE,
        });
        let position = position.unwrap_or_else(|| {
            Point::new(
                (self.canvas_size.width - size.width) / 2.0,
                (self.canvas_size.height - size.height) / 2.0,
            )
        });

        let count = self.active_page().len();
        let name = name.unwrap_or_else(|| format!("Layer {}", count + 1));
        let mut common = LayerCommon::new(name, position, size);
        common.z_index = count + 1;

        let layer = match content {
            LayerContent::Image { src } => Layer::Image(ImageLayer::new(common, src)),
            LayerContent::Text { content } => Layer::Text(TextLayer::new(common, content)),
            LayerContent::Shape { kind, fill } => {
                Layer::Shape(ShapeLayer::new(common, kind, fill))
            }
        };
        let id = layer.id();
        log::debug!("add layer {} ({})", id, layer.kind_name());

        self.active_page_mut().layers.push(layer);
        self.selection = vec![id];
        id
    }

    /// Merge a partial update into the target layer.
    ///
    /// `record_history == false` is the high-frequency path: live drags and
    /// resizes write geometry at pointer-move rate without flooding the
    /// undo stack. The single checkpoint for a gesture is taken at gesture
    /// start by the interaction engine.
    pub fn update_layer(&mut self, id: LayerId, patch: LayerPatch, record_history: bool) {
        if self.layer(id).is_none() {
            return;
        }
        if record_history {
            self.record_history();
        }
        if let Some(layer) = self.active_page_mut().layer_mut(id) {
            layer.apply_patch(&patch);
        }
    }

    /// Remove a layer from the active page, deselecting it.
    pub fn remove_layer(&mut self, id: LayerId) {
        if self.layer(id).is_none() {
            return;
        }
        self.record_history();
        self.active_page_mut().layers.retain(|l| l.id() != id);
        self.selection.retain(|s| *s != id);
    }

    /// Remove every selected layer.
    pub fn remove_selected_layers(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.record_history();
        let selected = std::mem::take(&mut self.selection);
        self.active_page_mut()
            .layers
            .retain(|l| !selected.contains(&l.id()));
    }

    /// Clone a layer with a fresh id, offset by the fixed duplication delta.
    /// The copy starts ungrouped, lands on top of the stack and becomes the
    /// sole selection.
    pub fn duplicate_layer(&mut self, id: LayerId) -> Option<LayerId> {
        let source = self.layer(id)?.clone();
        self.record_history();

        let mut copy = source;
        copy.regenerate_id();
        {
            let common = copy.common_mut();
            common.group_id = None;
            common.position.x += DUPLICATE_OFFSET;
            common.position.y += DUPLICATE_OFFSET;
        }
        let new_id = copy.id();

        let page = self.active_page_mut();
        copy.common_mut().z_index = page.len() + 1;
        page.layers.push(copy);

        self.selection = vec![new_id];
        Some(new_id)
    }

    /// Reorder a layer within the paint order, then renormalize every
    /// layer's z_index to its new array position + 1 (dense permutation).
    pub fn move_layer(&mut self, id: LayerId, direction: StackDirection) {
        let len = self.active_page().len();
        let Some(index) = self.active_page().index_of(id) else {
            return;
        };
        let target = match direction {
            StackDirection::Top => len - 1,
            StackDirection::Bottom => 0,
            StackDirection::Up => (index + 1).min(len - 1),
            StackDirection::Down => index.saturating_sub(1),
        };
        if target == index {
            return;
        }
        self.record_history();

        let page = self.active_page_mut();
        let layer = page.layers.remove(index);
        page.layers.insert(target, layer);
        page.normalize_z_indices();
    }

    /// Flip the lock flag. Reversible UI toggle, so no history entry.
    pub fn toggle_layer_lock(&mut self, id: LayerId) {
        if let Some(layer) = self.active_page_mut().layer_mut(id) {
            let common = layer.common_mut();
            common.locked = !common.locked;
        }
    }

    /// Flip the visibility flag. Reversible UI toggle, so no history entry.
    pub fn toggle_layer_visibility(&mut self, id: LayerId) {
        if let Some(layer) = self.active_page_mut().layer_mut(id) {
            let common = layer.common_mut();
            common.visible = !common.visible;
        }
    }

    // --- grouping ---

    /// Tag every selected layer with one freshly generated group id.
    /// No-op unless at least two layers are selected.
    pub fn group_selected_layers(&mut self) -> Option<GroupId> {
        if self.selection.len() < 2 {
            return None;
        }
        self.record_history();

        let group_id = Uuid::new_v4();
        let selected = self.selection.clone();
        let page = self.active_page_mut();
        for id in selected {
            if let Some(layer) = page.layer_mut(id) {
                layer.common_mut().group_id = Some(group_id);
            }
        }
        Some(group_id)
    }

    /// Dissolve every group touched by the current selection.
    ///
    /// Ungrouping is a whole-group operation: the group id is cleared on
    /// every member of an affected group, selected or not. No-op when the
    /// selection contains no grouped layers.
    pub fn ungroup_selected_layers(&mut self) {
        let mut group_ids: Vec<GroupId> = Vec::new();
        for id in &self.selection {
            if let Some(group_id) = self.layer(*id).and_then(|l| l.group_id()) {
                if !group_ids.contains(&group_id) {
                    group_ids.push(group_id);
                }
            }
        }
        if group_ids.is_empty() {
            return;
        }
        self.record_history();

        for layer in &mut self.active_page_mut().layers {
            if layer
                .group_id()
                .is_some_and(|group_id| group_ids.contains(&group_id))
            {
                layer.common_mut().group_id = None;
            }
        }
    }

    // --- selection ---

    /// Replace the selection. `None` clears it; a grouped layer expands to
    /// its whole group; a standalone layer becomes the singleton selection.
    pub fn select_layer(&mut self, id: Option<LayerId>) {
        match id {
            None => self.selection.clear(),
            Some(id) => {
                let expanded = selection::expand_to_group(&self.active_page().layers, id);
                if !expanded.is_empty() {
                    self.selection = expanded;
                }
            }
        }
    }

    /// Replace the selection with the group-expanded union of `ids`
    /// (e.g. a marquee hit set).
    pub fn select_layers(&mut self, ids: &[LayerId]) {
        self.selection = selection::expand_selection(&self.active_page().layers, ids);
    }

    /// Add a layer (group-expanded) to the selection.
    pub fn extend_selection(&mut self, id: LayerId) {
        for member in selection::expand_to_group(&self.active_page().layers, id) {
            if !self.selection.contains(&member) {
                self.selection.push(member);
            }
        }
    }

    /// Remove a single id from the selection. This intentionally does not
    /// expand to the group: a shift-click takes out just the clicked layer.
    pub fn deselect_layer(&mut self, id: LayerId) {
        self.selection.retain(|s| *s != id);
    }

    pub fn selection(&self) -> &[LayerId] {
        &self.selection
    }

    pub fn is_selected(&self, id: LayerId) -> bool {
        self.selection.contains(&id)
    }

    // --- history ---

    /// Take a whole-document checkpoint. Call once per user-perceived
    /// action, before mutating; identical consecutive states are deduped.
    pub fn record_history(&mut self) {
        self.history.record(&self.document.pages);
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.document.pages);
        if undone {
            self.sync_after_history();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.document.pages);
        if redone {
            self.sync_after_history();
        }
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Restoring a snapshot can change the page count and drop layers the
    /// selection still references; clamp and prune so both stay valid.
    fn sync_after_history(&mut self) {
        let last = self.document.pages.len().saturating_sub(1);
        self.document.active_page = self.document.active_page.min(last);
        let page = &self.document.pages[self.document.active_page];
        self.selection.retain(|id| page.layer(*id).is_some());
    }

    // --- pages ---

    /// Append a new empty page and make it active.
    pub fn add_page(&mut self) -> usize {
        self.record_history();
        self.document.pages.push(Page::new());
        self.document.active_page = self.document.pages.len() - 1;
        self.selection.clear();
        self.document.active_page
    }

    /// Remove a page. The document always keeps at least one page.
    pub fn remove_page(&mut self, index: usize) {
        if self.document.pages.len() <= 1 || index >= self.document.pages.len() {
            return;
        }
        self.record_history();
        self.document.pages.remove(index);
        if self.document.active_page >= index && self.document.active_page > 0 {
            self.document.active_page -= 1;
        }
        self.selection.clear();
    }

    /// Switch the active page. Selection is scoped to the active page, so
    /// switching clears it. No history entry.
    pub fn set_active_page(&mut self, index: usize) {
        if index >= self.document.pages.len() || index == self.document.active_page {
            return;
        }
        self.document.active_page = index;
        self.selection.clear();
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}
