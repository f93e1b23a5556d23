use std::collections::BTreeMap;

use super::{StackOrder, WindowId};
use crate::constants::{Z_INDEX_BASE, Z_INDEX_UNSTACKED};

/// Tracks which windows are open and their front-to-back order.
///
/// Every open window appears in the stack exactly once and closed windows
/// never do, so the open set and the stack always hold the same members.
#[derive(Debug, Clone)]
pub struct WindowRegistry {
    open: BTreeMap<WindowId, bool>,
    stack: StackOrder<WindowId>,
}

impl Default for WindowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowRegistry {
    /// All windows start closed with an empty stack.
    pub fn new() -> Self {
        Self {
            open: WindowId::ALL.into_iter().map(|id| (id, false)).collect(),
            stack: StackOrder::new(),
        }
    }

    fn set_open(&mut self, id: WindowId, open: bool) -> bool {
        let slot = self.open.entry(id).or_insert(false);
        let changed = *slot != open;
        *slot = open;
        changed
    }

    /// Opens `id` (a no-op on the open set if it already is) and raises it.
    pub fn open(&mut self, id: WindowId) {
        if self.set_open(id, true) {
            tracing::debug!(window_id = ?id, "opening window");
        }
        self.stack.move_to_end(id);
    }

    /// Closes `id`. Closing a closed window changes nothing.
    pub fn close(&mut self, id: WindowId) {
        if self.set_open(id, false) {
            tracing::debug!(window_id = ?id, "closing window");
        }
        self.stack.remove(id);
    }

    /// Closes an open window, otherwise opens and raises it.
    pub fn toggle(&mut self, id: WindowId) {
        if self.is_open(id) {
            self.close(id);
        } else {
            self.open(id);
        }
    }

    /// Raises an open window. Focusing a closed window changes nothing.
    pub fn focus(&mut self, id: WindowId) {
        if !self.is_open(id) {
            return;
        }
        if self.stack.last() != Some(id) {
            tracing::trace!(window_id = ?id, "focusing window");
        }
        self.stack.move_to_end(id);
    }

    pub fn is_open(&self, id: WindowId) -> bool {
        self.open.get(&id).copied().unwrap_or(false)
    }

    /// Stacking rank of `id`: `Z_INDEX_BASE` plus its position from the
    /// bottom, or `Z_INDEX_UNSTACKED` when it is not stacked.
    pub fn z_index_of(&self, id: WindowId) -> i32 {
        match self.stack.position(id) {
            Some(pos) => Z_INDEX_BASE + pos as i32,
            None => Z_INDEX_UNSTACKED,
        }
    }

    pub fn topmost_open(&self) -> Option<WindowId> {
        self.stack.last()
    }

    /// Open windows from back to front.
    pub fn stack_order(&self) -> &[WindowId] {
        self.stack.as_slice()
    }

    /// Open windows in declaration order, regardless of stacking.
    pub fn open_windows(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.open
            .iter()
            .filter(|(_, open)| **open)
            .map(|(id, _)| *id)
    }

    pub fn open_count(&self) -> usize {
        self.open.values().filter(|open| **open).count()
    }
}
