use super::*;
use crate::coords::Point;
use crate::doc::BackingType;

fn state(xs: &[f64]) -> Vec<BackingPlacement> {
    xs.iter().map(|x| BackingPlacement::with_defaults(BackingType::Lumber2x4, Point::new(*x, 0.0))).collect()
}

fn xs(placements: &[BackingPlacement]) -> Vec<f64> {
    placements.iter().map(|p| p.location.x).collect()
}

// =============================================================
// Push and capacity
// =============================================================

#[test]
fn new_history_is_empty() {
    let history = HistoryManager::default();
    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert_eq!(history.capacity(), HISTORY_CAPACITY);
    assert_eq!(history.undo_label(), None);
}

#[test]
fn zero_capacity_is_raised_to_one() {
    assert_eq!(HistoryManager::new(0).capacity(), 1);
}

#[test]
fn oldest_entry_is_evicted() {
    let mut history = HistoryManager::new(3);
    for i in 0..5 {
        history.push(Snapshot::new(state(&[f64::from(i)]), format!("step {i}")));
    }
    assert_eq!(history.undo_depth(), 3);
    let mut labels = Vec::new();
    let mut current = state(&[5.0]);
    while let Some(snapshot) = history.undo(&current) {
        labels.push(snapshot.label.clone());
        current = snapshot.placements;
    }
    assert_eq!(labels, vec!["step 4", "step 3", "step 2"]);
    assert_eq!(xs(&current), vec![2.0]);
}

#[test]
fn capacity_fifty_by_default() {
    let mut history = HistoryManager::default();
    for i in 0..60 {
        history.push(Snapshot::new(state(&[f64::from(i)]), "move"));
    }
    assert_eq!(history.undo_depth(), 50);
}

// =============================================================
// Undo / redo
// =============================================================

#[test]
fn undo_then_redo_restores_live_state() {
    let mut history = HistoryManager::default();
    let before = state(&[0.0]);
    let after = state(&[24.0]);
    history.push(Snapshot::new(before.clone(), "move"));

    let undone = history.undo(&after);
    assert_eq!(undone.map(|s| s.placements), Some(before.clone()));
    assert!(history.can_redo());
    assert_eq!(history.redo_label(), Some("move"));

    let redone = history.redo();
    assert_eq!(redone.map(|s| s.placements), Some(after));
    assert!(!history.can_redo());
    assert!(history.can_undo());
}

#[test]
fn repeated_undo_redo_walks_the_stack() {
    let mut history = HistoryManager::default();
    history.push(Snapshot::new(state(&[0.0]), "a"));
    history.push(Snapshot::new(state(&[1.0]), "b"));
    let live = state(&[2.0]);

    let s1 = history.undo(&live).map(|s| xs(&s.placements));
    let s0 = history.undo(&live).map(|s| xs(&s.placements));
    assert_eq!(s1, Some(vec![1.0]));
    assert_eq!(s0, Some(vec![0.0]));
    assert!(history.undo(&live).is_none());

    assert_eq!(history.redo().map(|s| xs(&s.placements)), Some(vec![1.0]));
    assert_eq!(history.redo().map(|s| xs(&s.placements)), Some(vec![2.0]));
    assert!(history.redo().is_none());
}

#[test]
fn push_after_undo_discards_redo() {
    let mut history = HistoryManager::default();
    history.push(Snapshot::new(state(&[0.0]), "a"));
    history.push(Snapshot::new(state(&[1.0]), "b"));
    let _undone = history.undo(&state(&[2.0]));
    assert!(history.can_redo());

    history.push(Snapshot::new(state(&[1.0]), "c"));
    assert!(!history.can_redo());
    assert_eq!(history.undo_label(), Some("c"));
    assert_eq!(history.undo_depth(), 2);
}

#[test]
fn clear_forgets_everything() {
    let mut history = HistoryManager::default();
    history.push(Snapshot::new(state(&[0.0]), "a"));
    history.clear();
    assert!(!history.can_undo());
    assert!(history.undo(&[]).is_none());
}
