//! Viewport controller: zoom, pan and stage size.
//!
//! `pan` is in screen pixels and `zoom` is a scale factor (1.0 = no zoom). The
//! transform is `screen = stage * zoom + pan`. Zoom requests outside the
//! configured range clamp silently.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::consts::{MAX_ZOOM, MIN_VISIBLE_PX, MIN_ZOOM, ZOOM_STEP};
use crate::coords::{Point, Rect, Size};

/// Pan/zoom state for the drawing stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom: f64,
    pan: Point,
    stage: Size,
    min_zoom: f64,
    max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(MIN_ZOOM, MAX_ZOOM)
    }
}

impl Viewport {
    /// Identity viewport with the given zoom range.
    ///
    /// An empty or non-positive range falls back to [`MIN_ZOOM`]..=[`MAX_ZOOM`].
    #[must_use]
    pub fn new(min_zoom: f64, max_zoom: f64) -> Self {
        let (min_zoom, max_zoom) = if min_zoom > 0.0 && min_zoom <= max_zoom && max_zoom.is_finite() {
            (min_zoom, max_zoom)
        } else {
            (MIN_ZOOM, MAX_ZOOM)
        };
        let zoom = 1.0_f64.clamp(min_zoom, max_zoom);
        Self { zoom, pan: Point::default(), stage: Size::default(), min_zoom, max_zoom }
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn pan(&self) -> Point {
        self.pan
    }

    #[must_use]
    pub fn stage_size(&self) -> Size {
        self.stage
    }

    #[must_use]
    pub fn zoom_range(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    pub fn set_stage_size(&mut self, stage: Size) {
        self.stage = stage;
    }

    /// Set zoom directly, clamped to the configured range. Pan is unchanged.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
    }

    pub fn set_pan(&mut self, pan: Point) {
        self.pan = pan;
    }

    /// Back to zoom 1 with no pan.
    pub fn reset(&mut self) {
        self.zoom = 1.0_f64.clamp(self.min_zoom, self.max_zoom);
        self.pan = Point::default();
    }

    #[must_use]
    pub fn screen_to_stage(&self, screen: Point) -> Point {
        Point::new((screen.x - self.pan.x) / self.zoom, (screen.y - self.pan.y) / self.zoom)
    }

    #[must_use]
    pub fn stage_to_screen(&self, stage: Point) -> Point {
        Point::new(stage.x * self.zoom + self.pan.x, stage.y * self.zoom + self.pan.y)
    }

    /// Zoom by `factor` keeping the stage point under `screen` fixed.
    ///
    /// Returns `false` when the factor is unusable or the clamp leaves zoom unchanged.
    pub fn zoom_at(&mut self, screen: Point, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        let anchor = self.screen_to_stage(screen);
        self.zoom = new_zoom;
        self.pan = Point::new(screen.x - anchor.x * new_zoom, screen.y - anchor.y * new_zoom);
        true
    }

    /// Zoom in one step about the stage center.
    pub fn zoom_in(&mut self) -> bool {
        self.zoom_at(self.stage_center(), ZOOM_STEP)
    }

    /// Zoom out one step about the stage center.
    pub fn zoom_out(&mut self) -> bool {
        self.zoom_at(self.stage_center(), 1.0 / ZOOM_STEP)
    }

    /// Screen-space center of the stage.
    #[must_use]
    pub fn stage_center(&self) -> Point {
        Point::new(self.stage.width * 0.5, self.stage.height * 0.5)
    }

    /// Pan by `delta` screen pixels, keeping part of `content` (stage-space bounds) in view.
    pub fn pan_by(&mut self, delta: Point, content: &Rect) {
        let target = self.pan + delta;
        self.pan = self.constrain_position(target, content);
    }

    /// Clamp a candidate pan so `content` keeps overlapping the stage.
    ///
    /// The required overlap is [`MIN_VISIBLE_PX`], reduced to the content's
    /// on-screen extent when the content is smaller than that at this zoom.
    #[must_use]
    pub fn constrain_position(&self, pan: Point, content: &Rect) -> Point {
        if content.is_degenerate() || self.stage.is_degenerate() {
            return pan;
        }
        let z = self.zoom;
        let x = constrain_axis(pan.x, content.x * z, content.right() * z, self.stage.width);
        let y = constrain_axis(pan.y, content.y * z, content.bottom() * z, self.stage.height);
        Point::new(x, y)
    }

    /// Fit `content` (stage-space bounds) inside the stage minus `margin` on each side.
    ///
    /// Degenerate content or stage resets the viewport instead.
    pub fn fit_to_view(&mut self, content: &Rect, margin: f64) {
        if content.is_degenerate() || self.stage.is_degenerate() {
            self.reset();
            return;
        }
        let avail_w = (self.stage.width - 2.0 * margin).max(1.0);
        let avail_h = (self.stage.height - 2.0 * margin).max(1.0);
        let zoom = (avail_w / content.width).min(avail_h / content.height);
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        let center = content.center();
        let stage_center = self.stage_center();
        self.pan = Point::new(stage_center.x - center.x * self.zoom, stage_center.y - center.y * self.zoom);
    }

    /// Portion of stage space currently visible.
    #[must_use]
    pub fn visible_rect(&self) -> Rect {
        let top_left = self.screen_to_stage(Point::default());
        Rect::new(top_left.x, top_left.y, self.stage.width / self.zoom, self.stage.height / self.zoom)
    }
}

/// Clamp one pan axis so `[pan + start, pan + end]` overlaps `[0, stage]` enough.
fn constrain_axis(pan: f64, start: f64, end: f64, stage: f64) -> f64 {
    let visible = MIN_VISIBLE_PX.min(end - start).min(stage);
    let lo = visible - end;
    let hi = stage - visible - start;
    pan.clamp(lo, hi.max(lo))
}
