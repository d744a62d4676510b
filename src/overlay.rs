//! Render-agnostic description of everything the engine draws over the drawing.
//!
//! Two layers are described. Shapes in the *drawing* layer (outlines, guides,
//! measurements) use drawing units and are meant to be drawn inside the zoomed
//! stage, so their stroke and font sizes are divided by the zoom to stay a
//! constant on-screen size. Handles live in the *screen* layer and carry screen
//! pixels directly.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use crate::consts::{HANDLE_RADIUS_PX, LABEL_FONT_PX, OUTLINE_WIDTH_PX, ROTATE_HANDLE_OFFSET_PX};
use crate::coords::{CoordinateSystem, Point};
use crate::doc::{DocStore, EntityId, PlacementStatus};
use crate::hit::{ResizeHandle, handle_point, rotate_handle_point};
use crate::measure::{MeasureLabel, label_for};
use crate::selection::SelectionModel;
use crate::snap::{GuideOrientation, SnapGuide};
use crate::viewport::Viewport;

/// Rotated outline of a placement, drawing units.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub id: EntityId,
    pub corners: [Point; 4],
    pub status: PlacementStatus,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Resize(ResizeHandle),
    Rotate,
}

/// Handle marker, screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleMarker {
    pub kind: HandleKind,
    pub center: Point,
    pub radius: f64,
}

/// Guide or measurement segment, drawing units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementShape {
    /// `None` for the live preview.
    pub id: Option<EntityId>,
    pub segment: Segment,
    pub label: MeasureLabel,
    pub selected: bool,
}

/// One frame of overlay geometry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overlay {
    pub outlines: Vec<Outline>,
    pub handles: Vec<HandleMarker>,
    pub guides: Vec<Segment>,
    pub measurements: Vec<MeasurementShape>,
    /// Stroke width in drawing units.
    pub line_width: f64,
    /// Label font size in drawing units.
    pub font_size: f64,
}

/// Inputs that are not part of the document.
#[derive(Debug, Clone, Copy)]
pub struct OverlayContext<'a> {
    pub coords: &'a CoordinateSystem,
    pub viewport: &'a Viewport,
    pub selection: &'a SelectionModel,
    pub guides: &'a [SnapGuide],
    pub preview: Option<(Point, Point)>,
}

/// Build the overlay for the current document and interaction state.
#[must_use]
pub fn build_overlay(doc: &DocStore, ctx: &OverlayContext<'_>) -> Overlay {
    let outlines = doc
        .placements()
        .iter()
        .map(|p| Outline {
            id: p.id,
            corners: p.corners(ctx.coords),
            status: p.status,
            selected: ctx.selection.contains(&p.id),
        })
        .collect();

    let mut handles = Vec::new();
    if let Some(selected) = ctx.selection.single().and_then(|id| doc.get(&id)) {
        let to_screen = |p: Point| ctx.coords.drawing_to_screen(ctx.viewport, p);
        for handle in ResizeHandle::ALL {
            handles.push(HandleMarker {
                kind: HandleKind::Resize(handle),
                center: to_screen(handle_point(selected, handle, ctx.coords)),
                radius: HANDLE_RADIUS_PX,
            });
        }
        let offset = ctx.coords.screen_len_to_drawing(ctx.viewport, ROTATE_HANDLE_OFFSET_PX);
        handles.push(HandleMarker {
            kind: HandleKind::Rotate,
            center: to_screen(rotate_handle_point(selected, offset, ctx.coords)),
            radius: HANDLE_RADIUS_PX,
        });
    }

    let guides = ctx.guides.iter().map(guide_segment).collect();

    let mut measurements: Vec<MeasurementShape> = doc
        .measurements()
        .iter()
        .map(|m| MeasurementShape {
            id: Some(m.id()),
            segment: Segment { from: m.start(), to: m.end() },
            label: label_for(ctx.coords, m.start(), m.end()),
            selected: ctx.selection.contains(&m.id()),
        })
        .collect();
    if let Some((start, end)) = ctx.preview {
        measurements.push(MeasurementShape {
            id: None,
            segment: Segment { from: start, to: end },
            label: label_for(ctx.coords, start, end),
            selected: false,
        });
    }

    Overlay {
        outlines,
        handles,
        guides,
        measurements,
        line_width: ctx.coords.scaled_line_width(ctx.viewport, OUTLINE_WIDTH_PX),
        font_size: ctx.coords.scaled_font_size(ctx.viewport, LABEL_FONT_PX),
    }
}

fn guide_segment(guide: &SnapGuide) -> Segment {
    match guide.orientation {
        GuideOrientation::Vertical => {
            Segment { from: Point::new(guide.position, guide.from), to: Point::new(guide.position, guide.to) }
        }
        GuideOrientation::Horizontal => {
            Segment { from: Point::new(guide.from, guide.position), to: Point::new(guide.to, guide.position) }
        }
    }
}
