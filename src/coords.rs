//! Coordinate spaces and the conversions between them.
//!
//! Three spaces are in play:
//!
//! * **screen**: CSS pixels relative to the stage's top-left corner, as reported
//!   by pointer events;
//! * **stage**: screen space with the viewport pan and zoom removed (pixels at
//!   zoom 1);
//! * **drawing**: the native units of the scanned document, treated as inches at
//!   a fixed `inches_per_unit` scale.
//!
//! [`Viewport`] owns screen <-> stage. [`CoordinateSystem`] owns stage <->
//! drawing, driven by the on-stage bounds of the rendered drawing surface. Every
//! call uses only the parameters current at the time of the call.

#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::viewport::Viewport;

/// A point in screen, stage or drawing space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point halfway between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Rotate clockwise (screen convention, y down) by `degrees` around `pivot`.
    #[must_use]
    pub fn rotated_around(self, pivot: Point, degrees: f64) -> Point {
        if degrees == 0.0 {
            return self;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        let dx = self.x - pivot.x;
        let dy = self.y - pivot.y;
        Point::new(pivot.x + dx * cos - dy * sin, pivot.y + dx * sin + dy * cos)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either side is zero, negative or not finite.
    #[must_use]
    pub fn is_degenerate(self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

/// Axis-aligned rectangle: top-left origin plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Smallest rectangle containing both corners, in any order.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Union of `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(x, y, self.right().max(other.right()) - x, self.bottom().max(other.bottom()) - y)
    }

    /// Copy of `self` moved by `delta`.
    #[must_use]
    pub fn translated(&self, delta: Point) -> Rect {
        Rect::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Axis-aligned bounds of `self` rotated clockwise by `degrees` about its center.
    #[must_use]
    pub fn rotated_bounds(&self, degrees: f64) -> Rect {
        let c = self.center();
        let corners = [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
        .map(|p| p.rotated_around(c, degrees));
        let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// True when either side is zero, negative or not finite.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.size().is_degenerate() || !self.x.is_finite() || !self.y.is_finite()
    }
}

/// Mapping between stage pixels and drawing units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSystem {
    /// On-stage bounds of the rendered drawing surface, in pixels at zoom 1.
    surface: Rect,
    /// Extent of the drawing in drawing units.
    drawing_extent: Size,
    /// Physical inches represented by one drawing unit.
    inches_per_unit: f64,
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        Self { surface: Rect::default(), drawing_extent: Size::default(), inches_per_unit: 1.0 }
    }
}

impl CoordinateSystem {
    #[must_use]
    pub fn new(inches_per_unit: f64) -> Self {
        Self { inches_per_unit, ..Self::default() }
    }

    /// Record new drawing-surface bounds (page navigation, viewer zoom, window resize).
    pub fn set_surface(&mut self, surface: Rect, drawing_extent: Size) {
        self.surface = surface;
        self.drawing_extent = drawing_extent;
    }

    #[must_use]
    pub fn surface(&self) -> Rect {
        self.surface
    }

    #[must_use]
    pub fn drawing_extent(&self) -> Size {
        self.drawing_extent
    }

    #[must_use]
    pub fn inches_per_unit(&self) -> f64 {
        self.inches_per_unit
    }

    /// Stage pixels per drawing unit, or `None` while the surface is degenerate.
    #[must_use]
    pub fn pixels_per_unit(&self) -> Option<f64> {
        if self.surface.is_degenerate() || self.drawing_extent.is_degenerate() {
            return None;
        }
        Some(self.surface.width / self.drawing_extent.width)
    }

    /// Surface origin and scale; identity while the surface has not loaded.
    fn surface_mapping(&self) -> (Point, f64) {
        match self.pixels_per_unit() {
            Some(scale) => (Point::new(self.surface.x, self.surface.y), scale),
            None => (Point::default(), 1.0),
        }
    }

    /// Convert a pointer position to drawing units.
    #[must_use]
    pub fn screen_to_drawing(&self, viewport: &Viewport, screen: Point) -> Point {
        let stage = viewport.screen_to_stage(screen);
        let (origin, scale) = self.surface_mapping();
        Point::new((stage.x - origin.x) / scale, (stage.y - origin.y) / scale)
    }

    /// Convert a drawing-unit position to screen pixels.
    #[must_use]
    pub fn drawing_to_screen(&self, viewport: &Viewport, drawing: Point) -> Point {
        let (origin, scale) = self.surface_mapping();
        viewport.stage_to_screen(Point::new(drawing.x * scale + origin.x, drawing.y * scale + origin.y))
    }

    /// Convert a screen-space length to drawing units at the current zoom.
    #[must_use]
    pub fn screen_len_to_drawing(&self, viewport: &Viewport, pixels: f64) -> f64 {
        let (_, scale) = self.surface_mapping();
        pixels / (viewport.zoom() * scale)
    }

    /// Drawing-surface bounds in drawing units (origin at 0,0).
    #[must_use]
    pub fn drawing_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.drawing_extent.width, self.drawing_extent.height)
    }

    #[must_use]
    pub fn inches_to_drawing_units(&self, inches: f64) -> f64 {
        if self.inches_per_unit > 0.0 { inches / self.inches_per_unit } else { inches }
    }

    #[must_use]
    pub fn drawing_units_to_inches(&self, units: f64) -> f64 {
        if self.inches_per_unit > 0.0 { units * self.inches_per_unit } else { units }
    }

    /// Round each axis to the nearest multiple of `grid_inches`.
    ///
    /// A non-positive grid disables snapping and returns `point` unchanged.
    #[must_use]
    pub fn snap_to_grid(&self, point: Point, grid_inches: f64) -> Point {
        let grid = self.inches_to_drawing_units(grid_inches);
        Point::new(snap_value(point.x, grid), snap_value(point.y, grid))
    }

    /// Stroke width in drawing space that renders as `nominal` screen pixels.
    #[must_use]
    pub fn scaled_line_width(&self, viewport: &Viewport, nominal: f64) -> f64 {
        nominal / viewport.zoom()
    }

    /// Font size in drawing space that renders as `nominal` screen pixels.
    #[must_use]
    pub fn scaled_font_size(&self, viewport: &Viewport, nominal: f64) -> f64 {
        nominal / viewport.zoom()
    }
}

/// Round `value` to the nearest multiple of `step`; non-positive steps pass through.
#[must_use]
pub fn snap_value(value: f64, step: f64) -> f64 {
    if step > 0.0 && step.is_finite() {
        (value / step).round() * step
    } else {
        value
    }
}

/// Normalize degrees to `[0, 360)`.
#[must_use]
pub fn normalize_degrees_360(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
