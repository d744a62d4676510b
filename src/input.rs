//! Input model: tools, modifier keys, pointer events, and the gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `InputState` is the gesture tracked between pointer-down and
//! pointer-up; each dragging variant carries the seeds needed to apply
//! incremental changes, to restore on cancel, and to record history on commit.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::coords::{CoordinateSystem, Point, Rect};
use crate::doc::{BackingPlacement, EntityId};
use crate::hit::ResizeHandle;
use crate::measure::MeasurePhase;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Select, move, resize and rotate placements (default).
    #[default]
    Select,
    /// Place a new default-sized backing on click; drags like Select over existing ones.
    Add,
    /// Two-click distance measurement.
    Measure,
    /// Drag pans the viewport.
    Pan,
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Meta / Command key.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Button {
    #[default]
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key name as reported by the host (e.g. `"Delete"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Wheel / trackpad scroll delta in pixels (positive `dy` = down).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelDelta {
    pub dx: f64,
    pub dy: f64,
}

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// Pointer event produced by the host's adapter layer, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub screen: Point,
    pub button: Button,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    #[must_use]
    pub fn new(kind: PointerKind, screen: Point) -> Self {
        Self { kind, screen, button: Button::Primary, modifiers: Modifiers::default() }
    }

    #[must_use]
    pub fn with_button(mut self, button: Button) -> Self {
        self.button = button;
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Geometry of one placement captured at gesture start, drawing units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSeed {
    pub id: EntityId,
    pub rect: Rect,
    pub orientation: f64,
}

impl DragSeed {
    #[must_use]
    pub fn of(placement: &BackingPlacement, coords: &CoordinateSystem) -> Self {
        Self { id: placement.id, rect: placement.rect(coords), orientation: placement.orientation }
    }

    /// Axis-aligned bounds of the seed as drawn, rotation included.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.rect.rotated_bounds(self.orientation)
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Dragging the viewport.
    Panning {
        /// Screen-space position of the previous pointer event.
        last_screen: Point,
        /// Measurement phase to return to when the pan ends.
        resume: Option<MeasurePhase>,
    },
    /// Moving one placement, or the whole selection when the pressed one is part of it.
    DraggingMove {
        /// Placement under the pointer at pointer-down; its rectangle drives snapping.
        anchor: EntityId,
        /// Drawing-unit pointer position at pointer-down.
        origin: Point,
        seeds: Vec<DragSeed>,
        /// Store placements before the gesture, pushed to history on commit.
        before: Vec<BackingPlacement>,
    },
    /// Resizing the single selected placement by one of its eight handles.
    DraggingResize {
        handle: ResizeHandle,
        seed: DragSeed,
        before: Vec<BackingPlacement>,
    },
    /// Rotating the single selected placement around its center.
    DraggingRotate {
        seed: DragSeed,
        center: Point,
        /// Compass angle of the pointer at pointer-down.
        start_angle: f64,
        before: Vec<BackingPlacement>,
    },
    /// Measure tool active.
    Measuring(MeasurePhase),
}

impl InputState {
    /// Whether a placement gesture is writing working geometry into the store.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::DraggingMove { .. } | Self::DraggingResize { .. } | Self::DraggingRotate { .. })
    }

    /// Seeds of the in-progress gesture, for restoring on cancel.
    #[must_use]
    pub fn seeds(&self) -> &[DragSeed] {
        match self {
            Self::DraggingMove { seeds, .. } => seeds,
            Self::DraggingResize { seed, .. } | Self::DraggingRotate { seed, .. } => std::slice::from_ref(seed),
            Self::Idle | Self::Panning { .. } | Self::Measuring(_) => &[],
        }
    }

    /// Short state name for trace output.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Panning { .. } => "panning",
            Self::DraggingMove { .. } => "dragging-move",
            Self::DraggingResize { .. } => "dragging-resize",
            Self::DraggingRotate { .. } => "dragging-rotate",
            Self::Measuring(MeasurePhase::StartPending) => "measuring-start",
            Self::Measuring(MeasurePhase::EndPending { .. }) => "measuring-end",
        }
    }
}
