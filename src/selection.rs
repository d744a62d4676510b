//! Selection model: the ordered set of selected entity ids.
//!
//! Order is insertion order, so "first selected" is well defined for
//! inspectors and for commands that need a primary entity.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::doc::{DocStore, EntityId};

/// Ordered, duplicate-free set of selected placement and measurement ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    ids: Vec<EntityId>,
}

impl SelectionModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.ids.contains(id)
    }

    /// The only selected id, when exactly one is selected.
    #[must_use]
    pub fn single(&self) -> Option<EntityId> {
        match self.ids.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Replace the selection with `id`.
    pub fn select_only(&mut self, id: EntityId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Add `id` if absent. Returns `true` if the selection changed.
    pub fn add(&mut self, id: EntityId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove `id` if present. Returns `true` if the selection changed.
    pub fn remove(&mut self, id: &EntityId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|x| x != id);
        self.ids.len() != before
    }

    /// Add `id` if absent, otherwise remove it.
    pub fn toggle(&mut self, id: EntityId) {
        if !self.remove(&id) {
            self.ids.push(id);
        }
    }

    /// Replace the selection with `ids`, dropping duplicates.
    pub fn replace<I: IntoIterator<Item = EntityId>>(&mut self, ids: I) {
        self.ids.clear();
        for id in ids {
            self.add(id);
        }
    }

    /// Select every placement in `doc`, in store order.
    pub fn select_all(&mut self, doc: &DocStore) {
        self.replace(doc.placements().iter().map(|p| p.id));
    }

    /// Returns `true` if anything was cleared.
    pub fn clear(&mut self) -> bool {
        let had_any = !self.ids.is_empty();
        self.ids.clear();
        had_any
    }

    /// Drop ids that no longer exist in `doc` (after undo, delete or load).
    pub fn retain_existing(&mut self, doc: &DocStore) {
        self.ids.retain(|id| doc.contains(id));
    }

    /// Selected ids that name placements in `doc`, in selection order.
    #[must_use]
    pub fn placement_ids(&self, doc: &DocStore) -> Vec<EntityId> {
        self.ids.iter().copied().filter(|id| doc.get(id).is_some()).collect()
    }
}
