//! Bounded undo/redo history of placement snapshots.
//!
//! Entries before the cursor are undo targets; entries from the cursor on are
//! redo targets. The first undo taken from the tip also stores the live state,
//! so a following redo can return to it.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::consts::HISTORY_CAPACITY;
use crate::doc::BackingPlacement;

/// Owned copy of the placement list, labelled with the command that followed it.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub placements: Vec<BackingPlacement>,
    pub label: String,
}

impl Snapshot {
    #[must_use]
    pub fn new(placements: Vec<BackingPlacement>, label: impl Into<String>) -> Self {
        Self { placements, label: label.into() }
    }
}

/// Undo/redo stack with a fixed capacity; the oldest entry is evicted first.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    entries: Vec<Snapshot>,
    cursor: usize,
    capacity: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl HistoryManager {
    /// Create an empty history holding at most `capacity` undo steps (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { entries: Vec::new(), cursor: 0, capacity: capacity.max(1) }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record the state before a mutation. Discards any redo entries.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.truncate(self.cursor);
        self.entries.push(snapshot);
        if self.entries.len() > self.capacity {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len();
    }

    /// Step back. `current` is the live placement list, kept for redo on the first step.
    pub fn undo(&mut self, current: &[BackingPlacement]) -> Option<Snapshot> {
        if self.cursor == 0 {
            return None;
        }
        if self.cursor == self.entries.len() {
            let label = self.entries[self.cursor - 1].label.clone();
            self.entries.push(Snapshot::new(current.to_vec(), label));
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].clone())
    }

    /// Step forward to the state that the last undo left.
    pub fn redo(&mut self) -> Option<Snapshot> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.entries[self.cursor].clone())
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Label of the command the next undo reverts.
    #[must_use]
    pub fn undo_label(&self) -> Option<&str> {
        self.cursor.checked_sub(1).map(|i| self.entries[i].label.as_str())
    }

    /// Label of the command the next redo re-applies.
    #[must_use]
    pub fn redo_label(&self) -> Option<&str> {
        if self.can_redo() { Some(self.entries[self.cursor].label.as_str()) } else { None }
    }

    /// Number of undo steps available.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}
