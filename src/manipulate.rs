//! Geometry of direct manipulation and group transforms.
//!
//! Everything here is a pure function of its inputs plus, for the group
//! transforms, an in-place edit of the `DocStore`. History, selection and
//! event handling live in [`crate::engine`]; this module only answers "where
//! does the rectangle end up".

#[cfg(test)]
#[path = "manipulate_test.rs"]
mod manipulate_test;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{COMMIT_EPSILON, ROTATION_SNAP_STEP_DEG};
use crate::coords::{CoordinateSystem, Point, Rect, normalize_degrees_360, snap_value};
use crate::doc::{BackingPlacement, DocStore, EntityId};
use crate::hit::ResizeHandle;

/// Error returned when parsing a command argument from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseModeError {
    #[error("unknown alignment '{0}' (expected left, center-v, right, top, center-h or bottom)")]
    Alignment(String),
    #[error("unknown distribution axis '{0}' (expected horizontal or vertical)")]
    Axis(String),
    #[error("unknown rotation mode '{0}' (expected continuous or discrete)")]
    RotationMode(String),
}

/// How pointer-driven rotation is quantized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationMode {
    /// Any angle; Shift constrains to 15° steps.
    #[default]
    Continuous,
    /// Axis-aligned only: 0, 90, 180 or 270.
    Discrete,
}

impl FromStr for RotationMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continuous" => Ok(Self::Continuous),
            "discrete" => Ok(Self::Discrete),
            other => Err(ParseModeError::RotationMode(other.to_owned())),
        }
    }
}

/// Which shared coordinate an align command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Shared minimum x origin.
    Left,
    /// Shared vertical center line: midpoint of leftmost left and rightmost right.
    CenterV,
    /// Shared maximum right edge.
    Right,
    /// Shared minimum y origin.
    Top,
    /// Shared horizontal center line: midpoint of topmost top and bottommost bottom.
    CenterH,
    /// Shared maximum bottom edge.
    Bottom,
}

impl FromStr for Alignment {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "left" => Ok(Self::Left),
            "center-v" => Ok(Self::CenterV),
            "right" => Ok(Self::Right),
            "top" => Ok(Self::Top),
            "center-h" => Ok(Self::CenterH),
            "bottom" => Ok(Self::Bottom),
            other => Err(ParseModeError::Alignment(other.to_owned())),
        }
    }
}

/// Axis along which a distribute command spaces entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributeAxis {
    Horizontal,
    Vertical,
}

impl FromStr for DistributeAxis {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            other => Err(ParseModeError::Axis(other.to_owned())),
        }
    }
}

// =============================================================
// Resize
// =============================================================

/// Resize `orig` by dragging `handle` to `pointer` (drawing units).
///
/// The side opposite the handle stays fixed. Each moving dimension is the
/// distance from the fixed side to the pointer, rounded to `grid` (0 disables)
/// and clamped to `min_size`. Because the origin is derived from the fixed side
/// and the clamped dimension, the rectangle never inverts.
///
/// For a rotated rectangle the pointer is mapped into the rectangle's own frame
/// and the result is re-centered so the fixed anchor keeps its world position.
#[must_use]
pub fn resize_rect(orig: Rect, rotation: f64, handle: ResizeHandle, pointer: Point, grid: f64, min_size: f64) -> Rect {
    let pivot = orig.center();
    let local = pointer.rotated_around(pivot, -rotation);
    let resized = resize_axis_aligned(&orig, handle, local, grid, min_size);
    if normalize_degrees_360(rotation) == 0.0 {
        return resized;
    }

    let anchor_local = handle.fixed_anchor(&orig);
    let anchor_world = anchor_local.rotated_around(pivot, rotation);
    let offset = (anchor_local - resized.center()).rotated_around(Point::default(), rotation);
    let center = anchor_world - offset;
    Rect::new(center.x - resized.width * 0.5, center.y - resized.height * 0.5, resized.width, resized.height)
}

fn resize_axis_aligned(orig: &Rect, handle: ResizeHandle, p: Point, grid: f64, min_size: f64) -> Rect {
    let mut r = *orig;
    if handle.moves_right() {
        r.width = clamp_dimension(snap_value(p.x - orig.x, grid), min_size);
    } else if handle.moves_left() {
        let right = orig.right();
        r.width = clamp_dimension(snap_value(right - p.x, grid), min_size);
        r.x = right - r.width;
    }
    if handle.moves_bottom() {
        r.height = clamp_dimension(snap_value(p.y - orig.y, grid), min_size);
    } else if handle.moves_top() {
        let bottom = orig.bottom();
        r.height = clamp_dimension(snap_value(bottom - p.y, grid), min_size);
        r.y = bottom - r.height;
    }
    r
}

fn clamp_dimension(value: f64, min_size: f64) -> f64 {
    if value.is_finite() { value.max(min_size) } else { min_size }
}

// =============================================================
// Rotate
// =============================================================

/// Compass angle of `pointer` around `center`: 0° straight up, increasing clockwise.
///
/// Returns `None` when the pointer sits on the center.
#[must_use]
pub fn pointer_angle_deg(center: Point, pointer: Point) -> Option<f64> {
    let dx = pointer.x - center.x;
    let dy = pointer.y - center.y;
    if dx.abs() < f64::EPSILON && dy.abs() < f64::EPSILON {
        return None;
    }
    Some(normalize_degrees_360(dy.atan2(dx).to_degrees() + 90.0))
}

/// Quantize a raw orientation for the active rotation profile.
#[must_use]
pub fn quantize_rotation(degrees: f64, mode: RotationMode, constrain: bool) -> f64 {
    match mode {
        RotationMode::Discrete => normalize_degrees_360(snap_value(degrees, 90.0)),
        RotationMode::Continuous if constrain => normalize_degrees_360(snap_value(degrees, ROTATION_SNAP_STEP_DEG)),
        RotationMode::Continuous => normalize_degrees_360(degrees),
    }
}

// =============================================================
// Group transforms
// =============================================================

fn selected_rects(doc: &DocStore, coords: &CoordinateSystem, ids: &[EntityId]) -> Vec<(EntityId, Rect)> {
    ids.iter().filter_map(|id| doc.get(id).map(|p| (*id, p.rect(coords)))).collect()
}

fn differs(a: f64, b: f64) -> bool {
    (a - b).abs() > f64::EPSILON
}

/// Align the placements named by `ids`. Needs at least two placements.
///
/// Returns `true` if any placement moved.
pub fn align(doc: &mut DocStore, coords: &CoordinateSystem, ids: &[EntityId], alignment: Alignment) -> bool {
    let rects = selected_rects(doc, coords, ids);
    if rects.len() < 2 {
        return false;
    }
    let min_x = rects.iter().map(|(_, r)| r.x).fold(f64::INFINITY, f64::min);
    let max_right = rects.iter().map(|(_, r)| r.right()).fold(f64::NEG_INFINITY, f64::max);
    let min_y = rects.iter().map(|(_, r)| r.y).fold(f64::INFINITY, f64::min);
    let max_bottom = rects.iter().map(|(_, r)| r.bottom()).fold(f64::NEG_INFINITY, f64::max);

    let mut changed = false;
    for (id, r) in &rects {
        let target = match alignment {
            Alignment::Left => Point::new(min_x, r.y),
            Alignment::CenterV => Point::new((min_x + max_right) * 0.5 - r.width * 0.5, r.y),
            Alignment::Right => Point::new(max_right - r.width, r.y),
            Alignment::Top => Point::new(r.x, min_y),
            Alignment::CenterH => Point::new(r.x, (min_y + max_bottom) * 0.5 - r.height * 0.5),
            Alignment::Bottom => Point::new(r.x, max_bottom - r.height),
        };
        if !differs(target.x, r.x) && !differs(target.y, r.y) {
            continue;
        }
        if let Some(p) = doc.get_mut(id) {
            p.location.x = target.x;
            p.location.y = target.y;
            p.mark_modified();
            changed = true;
        }
    }
    changed
}

/// Space the placements named by `ids` evenly by center. Needs at least three.
///
/// The extreme placements along the axis stay put; interior centers land at
/// `first + spacing * index`. Returns `true` if any placement moved.
pub fn distribute(doc: &mut DocStore, coords: &CoordinateSystem, ids: &[EntityId], axis: DistributeAxis) -> bool {
    let mut rects = selected_rects(doc, coords, ids);
    if rects.len() < 3 {
        return false;
    }
    let center_of = |r: &Rect| match axis {
        DistributeAxis::Horizontal => r.center().x,
        DistributeAxis::Vertical => r.center().y,
    };
    rects.sort_by(|(_, a), (_, b)| center_of(a).total_cmp(&center_of(b)));

    let last_index = rects.len() - 1;
    let first = center_of(&rects[0].1);
    let last = center_of(&rects[last_index].1);
    #[allow(clippy::cast_precision_loss)]
    let spacing = (last - first) / last_index as f64;

    let mut changed = false;
    for (index, (id, r)) in rects.iter().enumerate().take(last_index).skip(1) {
        #[allow(clippy::cast_precision_loss)]
        let target_center = first + spacing * index as f64;
        let Some(p) = doc.get_mut(id) else {
            continue;
        };
        let moved = match axis {
            DistributeAxis::Horizontal => {
                let x = target_center - r.width * 0.5;
                let moved = differs(x, r.x);
                p.location.x = x;
                moved
            }
            DistributeAxis::Vertical => {
                let y = target_center - r.height * 0.5;
                let moved = differs(y, r.y);
                p.location.y = y;
                moved
            }
        };
        if moved {
            p.mark_modified();
            changed = true;
        }
    }
    changed
}

/// Move the placements named by `ids` by `delta`. Returns `true` if any moved.
pub fn translate(doc: &mut DocStore, ids: &[EntityId], delta: Point) -> bool {
    if delta.x.abs() <= COMMIT_EPSILON && delta.y.abs() <= COMMIT_EPSILON {
        return false;
    }
    let mut changed = false;
    for id in ids {
        if let Some(p) = doc.get_mut(id) {
            p.location.x += delta.x;
            p.location.y += delta.y;
            p.mark_modified();
            changed = true;
        }
    }
    changed
}

/// Rotate the placements named by `ids` by `degrees` about their own centers.
pub fn rotate_by(doc: &mut DocStore, ids: &[EntityId], degrees: f64, mode: RotationMode) -> bool {
    let mut changed = false;
    for id in ids {
        if let Some(p) = doc.get_mut(id) {
            let next = quantize_rotation(p.orientation + degrees, mode, false);
            if differs(next, p.orientation) {
                p.orientation = next;
                p.mark_modified();
                changed = true;
            }
        }
    }
    changed
}

/// Clones of `sources` with fresh ids, shifted by `offset` on both axes.
#[must_use]
pub fn duplicate_placements(sources: &[BackingPlacement], offset: f64) -> Vec<BackingPlacement> {
    sources
        .iter()
        .map(|p| {
            let mut copy = p.clone();
            copy.id = Uuid::new_v4();
            copy.location.x += offset;
            copy.location.y += offset;
            copy.mark_modified();
            copy
        })
        .collect()
}

/// Whether two rectangles differ by more than the commit threshold.
#[must_use]
pub fn geometry_changed(a: &Rect, b: &Rect) -> bool {
    (a.x - b.x).abs() > COMMIT_EPSILON
        || (a.y - b.y).abs() > COMMIT_EPSILON
        || (a.width - b.width).abs() > COMMIT_EPSILON
        || (a.height - b.height).abs() > COMMIT_EPSILON
}
