// SPDX-License-Identifier: PMPL-1.0-or-later
//! Bounded undo history: a ring of reversible actions.
//!
//! Each successful mutation records exactly the state needed to invert it.
//! The history has a fixed depth; pushing at capacity evicts the oldest
//! entry. Undo itself is not undoable — applying an action never pushes.

use std::collections::VecDeque;

use crate::record::Record;

/// Fixed depth of the undo history.
pub const UNDO_DEPTH: usize = 64;

/// Enough state to undo one mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum ReversibleAction {
    /// Undone by removing `after.id` from the table.
    Insert { after: Record },
    /// Undone by overwriting `before.id` with `before` (a full replace,
    /// not a field-merge).
    Update { before: Record, after: Record },
    /// Undone by re-inserting `before`.
    Delete { before: Record },
}

impl ReversibleAction {
    /// The id of the record the action targets.
    pub fn target_id(&self) -> u32 {
        match self {
            ReversibleAction::Insert { after } => after.id,
            ReversibleAction::Update { before, .. } => before.id,
            ReversibleAction::Delete { before } => before.id,
        }
    }
}

/// Fixed-capacity, oldest-evicted-first action history.
#[derive(Debug, Clone)]
pub struct UndoStack {
    entries: VecDeque<ReversibleAction>,
    depth: usize,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_depth(UNDO_DEPTH)
    }

    /// A stack with a non-default depth, for tests exercising eviction.
    pub fn with_depth(depth: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(depth),
            depth,
        }
    }

    /// Append an action, discarding the single oldest entry when full.
    pub fn push(&mut self, action: ReversibleAction) {
        if self.entries.len() == self.depth {
            self.entries.pop_front();
        }
        self.entries.push_back(action);
    }

    /// Remove and return the most recent action.
    pub fn pop(&mut self) -> Option<ReversibleAction> {
        self.entries.pop_back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all history. Called when a new table is opened.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
