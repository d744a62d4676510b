//! Two-click distance measurement and feet-and-inches labels.

#[cfg(test)]
#[path = "measure_test.rs"]
mod measure_test;

use serde::Serialize;

use crate::coords::{CoordinateSystem, Point};
use crate::doc::Measurement;

/// Progress of the two-click measuring protocol.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MeasurePhase {
    /// Waiting for the first click.
    #[default]
    StartPending,
    /// First point recorded; `cursor` tracks the live preview end.
    EndPending { start: Point, cursor: Point },
}

/// What a click did to the measuring protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureOutcome {
    Started,
    Committed(Measurement),
    /// Second click landed on the first point; nothing is recorded.
    Discarded,
}

impl MeasurePhase {
    /// Advance on a click at `point` (drawing units).
    #[must_use]
    pub fn click(self, point: Point) -> (MeasurePhase, MeasureOutcome) {
        match self {
            Self::StartPending => (Self::EndPending { start: point, cursor: point }, MeasureOutcome::Started),
            Self::EndPending { start, .. } => {
                if start.distance_to(point) <= f64::EPSILON {
                    (Self::StartPending, MeasureOutcome::Discarded)
                } else {
                    (Self::StartPending, MeasureOutcome::Committed(Measurement::new(start, point)))
                }
            }
        }
    }

    /// Move the preview end. Returns `true` if a preview is showing.
    pub fn hover(&mut self, point: Point) -> bool {
        match self {
            Self::StartPending => false,
            Self::EndPending { cursor, .. } => {
                *cursor = point;
                true
            }
        }
    }

    /// Segment of the live preview, if the first point is down.
    #[must_use]
    pub fn preview(&self) -> Option<(Point, Point)> {
        match *self {
            Self::StartPending => None,
            Self::EndPending { start, cursor } => Some((start, cursor)),
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::EndPending { .. })
    }
}

/// Placement of a measurement label along its segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureLabel {
    /// Segment midpoint, drawing units.
    pub position: Point,
    /// Text rotation in degrees, kept within `[-90, 90]` so it never reads upside down.
    pub angle_deg: f64,
    pub text: String,
}

/// Label for the segment `start`-`end`, with the distance converted to inches.
#[must_use]
pub fn label_for(coords: &CoordinateSystem, start: Point, end: Point) -> MeasureLabel {
    let inches = coords.drawing_units_to_inches(start.distance_to(end));
    MeasureLabel { position: start.midpoint(end), angle_deg: label_angle(start, end), text: format_feet_inches(inches) }
}

/// Segment angle flipped into the readable half-plane.
#[must_use]
pub fn label_angle(start: Point, end: Point) -> f64 {
    let raw = (end.y - start.y).atan2(end.x - start.x).to_degrees();
    if raw > 90.0 {
        raw - 180.0
    } else if raw < -90.0 {
        raw + 180.0
    } else {
        raw
    }
}

/// Format a length in inches as `F'-I"`, with inches rounded to a tenth.
///
/// A remainder that rounds up to 12" carries into the feet, so `143.96`
/// renders as `12'-0"`.
#[must_use]
pub fn format_feet_inches(inches: f64) -> String {
    if !inches.is_finite() {
        return "0'-0\"".to_owned();
    }
    #[allow(clippy::cast_possible_truncation)]
    let tenths = (inches.abs() * 10.0).round() as i64;
    let feet = tenths / 120;
    let rem_tenths = tenths % 120;
    let sign = if inches < 0.0 && tenths > 0 { "-" } else { "" };
    if rem_tenths % 10 == 0 {
        format!("{sign}{feet}'-{}\"", rem_tenths / 10)
    } else {
        format!("{sign}{feet}'-{}.{}\"", rem_tenths / 10, rem_tenths % 10)
    }
}
