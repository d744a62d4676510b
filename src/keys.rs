//! Keyboard shortcut table.

#[cfg(test)]
#[path = "keys_test.rs"]
mod keys_test;

use crate::input::{Key, Modifiers};

/// Commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Undo,
    Redo,
    Copy,
    Paste,
    Duplicate,
    Delete,
    Save,
    Open,
    Cancel,
    SelectAll,
    /// Arrow key; `dx`/`dy` are unit steps.
    Nudge { dx: i8, dy: i8 },
}

/// Map a key press to its shortcut, if any.
#[must_use]
pub fn shortcut_for(key: &Key, modifiers: Modifiers) -> Option<Shortcut> {
    let name = key.0.as_str();
    if modifiers.command() {
        return match name.to_ascii_lowercase().as_str() {
            "z" if modifiers.shift => Some(Shortcut::Redo),
            "z" => Some(Shortcut::Undo),
            "y" => Some(Shortcut::Redo),
            "c" => Some(Shortcut::Copy),
            "v" => Some(Shortcut::Paste),
            "d" => Some(Shortcut::Duplicate),
            "s" => Some(Shortcut::Save),
            "o" => Some(Shortcut::Open),
            "a" => Some(Shortcut::SelectAll),
            _ => None,
        };
    }
    match name {
        "Delete" | "Backspace" => Some(Shortcut::Delete),
        "Escape" => Some(Shortcut::Cancel),
        "ArrowLeft" => Some(Shortcut::Nudge { dx: -1, dy: 0 }),
        "ArrowRight" => Some(Shortcut::Nudge { dx: 1, dy: 0 }),
        "ArrowUp" => Some(Shortcut::Nudge { dx: 0, dy: -1 }),
        "ArrowDown" => Some(Shortcut::Nudge { dx: 0, dy: 1 }),
        _ => None,
    }
}
