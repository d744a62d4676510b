//! Shared numeric constants for the annotation engine.

// ── Placement geometry ──────────────────────────────────────────

/// Smallest width or height a backing may be resized to, in inches.
pub const MIN_DIMENSION_IN: f64 = 12.0;

/// Slack allowed when validating the minimum, absorbing unit-conversion rounding.
pub const DIMENSION_TOLERANCE_IN: f64 = 1e-6;

/// Default width of a freshly added backing, in inches.
pub const DEFAULT_BACKING_WIDTH_IN: f64 = 48.0;

/// Default height of a freshly added backing, in inches.
pub const DEFAULT_BACKING_HEIGHT_IN: f64 = 24.0;

/// Default mounting height (AFF) of a freshly added backing, in inches.
pub const DEFAULT_BACKING_Z_IN: f64 = 48.0;

/// Offset applied to duplicated and pasted placements, in drawing units.
pub const DUPLICATE_OFFSET: f64 = 24.0;

/// Geometry changes at or below this many drawing units are not committed.
pub const COMMIT_EPSILON: f64 = 0.01;

// ── Snapping ────────────────────────────────────────────────────

/// Default grid pitch, in inches.
pub const DEFAULT_GRID_SIZE_IN: f64 = 24.0;

/// Default pull-in distance for alignment guides, in inches.
pub const DEFAULT_SNAP_DISTANCE_IN: f64 = 12.0;

/// Spacing between sampled snap targets along a wall, in inches.
pub const WALL_SAMPLE_INTERVAL_IN: f64 = 24.0;

/// Upper bound on interior samples taken along a single wall.
pub const MAX_SAMPLES_PER_WALL: usize = 1024;

/// Angular step used by Shift-constrained continuous rotation, in degrees.
pub const ROTATION_SNAP_STEP_DEG: f64 = 15.0;

// ── Viewport ────────────────────────────────────────────────────

/// Lower zoom bound.
pub const MIN_ZOOM: f64 = 0.1;

/// Upper zoom bound.
pub const MAX_ZOOM: f64 = 5.0;

/// Multiplier used by the zoom-in / zoom-out commands.
pub const ZOOM_STEP: f64 = 1.2;

/// Base of the exponential wheel-zoom curve, applied per 100 px of wheel delta.
pub const WHEEL_ZOOM_BASE: f64 = 1.1;

/// Pixels of the drawing surface that must stay on screen while panning.
pub const MIN_VISIBLE_PX: f64 = 64.0;

/// Default margin around the drawing for fit-to-view, in screen pixels.
pub const FIT_MARGIN_PX: f64 = 20.0;

// ── History ─────────────────────────────────────────────────────

/// Number of undoable steps retained.
pub const HISTORY_CAPACITY: usize = 50;

// ── Hit-testing / overlay ───────────────────────────────────────

/// Screen-space hit slop in pixels for handles and measurement segments.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Distance from the top edge to the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;

/// Nominal stroke width of outlines and guides, in screen pixels.
pub const OUTLINE_WIDTH_PX: f64 = 1.5;

/// Nominal label font size, in screen pixels.
pub const LABEL_FONT_PX: f64 = 12.0;
