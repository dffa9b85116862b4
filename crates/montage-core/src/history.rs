//! Snapshot-based undo/redo over the whole page list.

use crate::page::Page;

/// Maximum number of undo snapshots to keep.
pub const MAX_HISTORY: usize = 50;

/// Whole-document history.
///
/// Each entry is a full clone of the page list, not a diff. Callers record
/// exactly once per user-perceived action (at gesture start, never per
/// pointer-move frame); per-frame geometry writes bypass history entirely.
#[derive(Debug, Clone, Default)]
pub struct History {
    past: Vec<Vec<Page>>,
    future: Vec<Vec<Page>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the current state onto the past stack (call before mutating).
    ///
    /// Structurally identical to the top of the stack is a no-op, so
    /// repeated checkpoints without intervening changes do not pile up.
    /// Any recorded change clears the redo stack.
    pub fn record(&mut self, pages: &[Page]) {
        if self.past.last().is_some_and(|top| top.as_slice() == pages) {
            return;
        }
        self.past.push(pages.to_vec());
        self.future.clear();

        if self.past.len() > MAX_HISTORY {
            self.past.remove(0);
        }
    }

    /// Restore the most recent past snapshot.
    /// Returns false (leaving `pages` untouched) when there is nothing to undo.
    pub fn undo(&mut self, pages: &mut Vec<Page>) -> bool {
        match self.past.pop() {
            Some(snapshot) => {
                let current = std::mem::replace(pages, snapshot);
                self.future.push(current);
                true
            }
            None => false,
        }
    }

    /// Symmetric inverse of `undo`, using the future stack.
    pub fn redo(&mut self, pages: &mut Vec<Page>) -> bool {
        match self.future.pop() {
            Some(snapshot) => {
                let current = std::mem::replace(pages, snapshot);
                self.past.push(current);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }
}
