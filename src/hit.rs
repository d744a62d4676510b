//! Hit-testing against placements, their handles, and measurements.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{HANDLE_RADIUS_PX, ROTATE_HANDLE_OFFSET_PX};
use crate::coords::{CoordinateSystem, Point, Rect};
use crate::doc::{BackingPlacement, DocStore, EntityId};
use crate::selection::SelectionModel;
use crate::viewport::Viewport;

/// Which part of an entity was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeHandle),
    RotateHandle,
    Measurement,
}

/// The eight resize handles: four corners and four edge midpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    /// Dragging this handle moves the left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    /// Dragging this handle moves the right edge.
    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    /// Dragging this handle moves the top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    /// Dragging this handle moves the bottom edge.
    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }

    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(self, Self::Ne | Self::Se | Self::Sw | Self::Nw)
    }

    /// Handle position on the unrotated `rect`.
    #[must_use]
    pub fn position(self, rect: &Rect) -> Point {
        let cx = rect.x + rect.width * 0.5;
        let cy = rect.y + rect.height * 0.5;
        match self {
            Self::N => Point::new(cx, rect.y),
            Self::Ne => Point::new(rect.right(), rect.y),
            Self::E => Point::new(rect.right(), cy),
            Self::Se => Point::new(rect.right(), rect.bottom()),
            Self::S => Point::new(cx, rect.bottom()),
            Self::Sw => Point::new(rect.x, rect.bottom()),
            Self::W => Point::new(rect.x, cy),
            Self::Nw => Point::new(rect.x, rect.y),
        }
    }

    /// Point on the unrotated `rect` that stays fixed while this handle is dragged.
    #[must_use]
    pub fn fixed_anchor(self, rect: &Rect) -> Point {
        let x = if self.moves_left() { rect.right() } else { rect.x };
        let y = if self.moves_top() { rect.bottom() } else { rect.y };
        Point::new(x, y)
    }

    /// CSS cursor name for hovering this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Se | Self::Nw => "nwse-resize",
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub id: EntityId,
    pub part: HitPart,
}

/// Drawing-unit position of a placement's handle, after rotation.
#[must_use]
pub fn handle_point(placement: &BackingPlacement, handle: ResizeHandle, coords: &CoordinateSystem) -> Point {
    let rect = placement.rect(coords);
    handle.position(&rect).rotated_around(rect.center(), placement.orientation)
}

/// Drawing-unit position of a placement's rotate handle, after rotation.
#[must_use]
pub fn rotate_handle_point(placement: &BackingPlacement, offset: f64, coords: &CoordinateSystem) -> Point {
    let rect = placement.rect(coords);
    Point::new(rect.center().x, rect.y - offset).rotated_around(rect.center(), placement.orientation)
}

/// Test what is under `world_pt` (drawing units).
///
/// Handles of a single selected placement win over any body; bodies are
/// tested top-most first; measurements come last.
#[must_use]
pub fn hit_test(
    world_pt: Point,
    doc: &DocStore,
    coords: &CoordinateSystem,
    viewport: &Viewport,
    selection: &SelectionModel,
) -> Option<Hit> {
    let slop = coords.screen_len_to_drawing(viewport, HANDLE_RADIUS_PX);

    if let Some(selected) = selection.single().and_then(|id| doc.get(&id)) {
        let rotate_offset = coords.screen_len_to_drawing(viewport, ROTATE_HANDLE_OFFSET_PX);
        if rotate_handle_point(selected, rotate_offset, coords).distance_to(world_pt) <= slop {
            return Some(Hit { id: selected.id, part: HitPart::RotateHandle });
        }
        // Corners first so they win where a corner and an edge midpoint overlap on tiny shapes.
        let (corners, edges): (Vec<ResizeHandle>, Vec<ResizeHandle>) =
            ResizeHandle::ALL.into_iter().partition(|h| h.is_corner());
        let corners_first = corners.iter().chain(edges.iter());
        for handle in corners_first {
            if handle_point(selected, *handle, coords).distance_to(world_pt) <= slop {
                return Some(Hit { id: selected.id, part: HitPart::ResizeHandle(*handle) });
            }
        }
    }

    if let Some(body) = doc.placements().iter().rev().find(|p| p.contains_point(world_pt, 0.0, coords)) {
        return Some(Hit { id: body.id, part: HitPart::Body });
    }

    doc.measurements()
        .iter()
        .rev()
        .find(|m| distance_to_segment(world_pt, m.start(), m.end()) <= slop)
        .map(|m| Hit { id: m.id(), part: HitPart::Measurement })
}

/// Shortest distance from `p` to segment `a`-`b`.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return p.distance_to(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance_to(Point::new(a.x + t * dx, a.y + t * dy))
}
