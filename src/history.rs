//! Bounded undo/redo history of full shape snapshots.
//!
//! Each undoable mutation pushes the state from *before* the mutation onto
//! the undo stack. Both stacks are capped; pushing onto a full stack evicts
//! its oldest entry. A new checkpoint clears the redo stack, so there is no
//! branching history.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use crate::consts::HISTORY_LIMIT;
use crate::shape::Shape;

/// An immutable copy of the full ordered shape collection at one instant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    shapes: Vec<Shape>,
}

impl Snapshot {
    #[must_use]
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    #[must_use]
    pub fn into_shapes(self) -> Vec<Shape> {
        self.shapes
    }
}

/// Undo and redo stacks, most recent entry at the back.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: VecDeque<Snapshot>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// History whose stacks each hold at most `limit` snapshots.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self { undo: VecDeque::with_capacity(limit), redo: VecDeque::with_capacity(limit), limit }
    }

    /// Record the pre-mutation state and invalidate redo.
    pub fn checkpoint(&mut self, before: Snapshot) {
        self.redo.clear();
        push_bounded(&mut self.undo, before, self.limit);
    }

    /// Step back. `current` moves onto the redo stack and the most recent
    /// undo snapshot is returned for restoration. `None` when there is
    /// nothing to undo; `current` is then dropped unchanged.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let prev = self.undo.pop_back()?;
        push_bounded(&mut self.redo, current, self.limit);
        Some(prev)
    }

    /// Mirror of [`History::undo`].
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo.pop_back()?;
        push_bounded(&mut self.undo, current, self.limit);
        Some(next)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

fn push_bounded(stack: &mut VecDeque<Snapshot>, snapshot: Snapshot, limit: usize) {
    if limit == 0 {
        return;
    }
    while stack.len() >= limit {
        stack.pop_front();
    }
    stack.push_back(snapshot);
}
