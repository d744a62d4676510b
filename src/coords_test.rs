#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

/// 1000 x 500 drawing rendered at half scale, offset 40/30 on the stage.
fn half_scale() -> CoordinateSystem {
    let mut coords = CoordinateSystem::new(1.0);
    coords.set_surface(Rect::new(40.0, 30.0, 500.0, 250.0), Size::new(1000.0, 500.0));
    coords
}

// =============================================================
// Point
// =============================================================

#[test]
fn point_distance_is_euclidean() {
    assert!(approx_eq(Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0)), 5.0));
}

#[test]
fn point_midpoint() {
    assert_eq!(Point::new(0.0, 0.0).midpoint(Point::new(10.0, -4.0)), Point::new(5.0, -2.0));
}

#[test]
fn point_rotation_is_clockwise_in_screen_space() {
    // Up (negative y) rotated 90 degrees clockwise points right.
    let p = Point::new(0.0, -10.0).rotated_around(Point::default(), 90.0);
    assert!(point_approx_eq(p, Point::new(10.0, 0.0)));
}

#[test]
fn point_rotation_round_trips() {
    let pivot = Point::new(5.0, 7.0);
    let p = Point::new(12.0, -3.0);
    let back = p.rotated_around(pivot, 33.0).rotated_around(pivot, -33.0);
    assert!(point_approx_eq(back, p));
}

#[test]
fn point_add_sub() {
    let a = Point::new(1.0, 2.0);
    let b = Point::new(3.0, 5.0);
    assert_eq!(a + b, Point::new(4.0, 7.0));
    assert_eq!(b - a, Point::new(2.0, 3.0));
}

// =============================================================
// Rect
// =============================================================

#[test]
fn rect_from_corners_normalizes() {
    let r = Rect::from_corners(Point::new(10.0, 8.0), Point::new(2.0, 20.0));
    assert_eq!(r, Rect::new(2.0, 8.0, 8.0, 12.0));
}

#[test]
fn rect_edges_and_center() {
    let r = Rect::new(10.0, 20.0, 30.0, 40.0);
    assert_eq!(r.right(), 40.0);
    assert_eq!(r.bottom(), 60.0);
    assert_eq!(r.center(), Point::new(25.0, 40.0));
}

#[test]
fn rect_union_covers_both() {
    let u = Rect::new(0.0, 0.0, 10.0, 10.0).union(&Rect::new(20.0, -5.0, 5.0, 5.0));
    assert_eq!(u, Rect::new(0.0, -5.0, 25.0, 15.0));
}

#[test]
fn rect_degenerate_detection() {
    assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_degenerate());
    assert!(Rect::new(f64::NAN, 0.0, 10.0, 10.0).is_degenerate());
    assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_degenerate());
}

// =============================================================
// CoordinateSystem
// =============================================================

#[test]
fn degenerate_surface_is_identity() {
    let coords = CoordinateSystem::default();
    let viewport = Viewport::default();
    assert_eq!(coords.pixels_per_unit(), None);
    let p = Point::new(123.0, 45.0);
    assert_eq!(coords.screen_to_drawing(&viewport, p), p);
    assert_eq!(coords.drawing_to_screen(&viewport, p), p);
}

#[test]
fn screen_to_drawing_applies_surface_offset_and_scale() {
    let coords = half_scale();
    let viewport = Viewport::default();
    assert_eq!(coords.pixels_per_unit(), Some(0.5));
    let d = coords.screen_to_drawing(&viewport, Point::new(90.0, 80.0));
    assert!(point_approx_eq(d, Point::new(100.0, 100.0)));
}

#[test]
fn screen_to_drawing_applies_viewport() {
    let coords = half_scale();
    let mut viewport = Viewport::default();
    viewport.set_zoom(2.0);
    viewport.set_pan(Point::new(-20.0, 10.0));
    // stage = (screen - pan) / zoom = (160, 150) / 2 = (80, 75)
    let d = coords.screen_to_drawing(&viewport, Point::new(140.0, 160.0));
    assert!(point_approx_eq(d, Point::new(80.0, 90.0)));
}

#[test]
fn drawing_screen_round_trip() {
    let coords = half_scale();
    let mut viewport = Viewport::default();
    viewport.set_zoom(1.7);
    viewport.set_pan(Point::new(33.0, -12.5));
    for p in [Point::new(0.0, 0.0), Point::new(999.0, 1.0), Point::new(-50.0, 420.25)] {
        let back = coords.screen_to_drawing(&viewport, coords.drawing_to_screen(&viewport, p));
        assert!(point_approx_eq(back, p), "{p:?} -> {back:?}");
    }
}

#[test]
fn round_trip_uses_parameters_current_at_each_call() {
    let settings = [
        (Rect::new(40.0, 30.0, 500.0, 250.0), Size::new(1000.0, 500.0), 1.7, Point::new(33.0, -12.5)),
        (Rect::default(), Size::default(), 0.5, Point::new(-20.0, 8.0)),
        (Rect::new(0.0, 0.0, 2000.0, 1000.0), Size::new(100.0, 50.0), 3.0, Point::new(0.0, 0.0)),
        (Rect::new(10.0, 10.0, 300.0, 200.0), Size::new(0.0, 10.0), 1.0, Point::new(5.0, 5.0)),
        (Rect::new(-250.0, 75.0, 640.0, 480.0), Size::new(3200.0, 2400.0), 0.1, Point::new(400.0, -300.0)),
    ];
    let points = [Point::new(0.0, 0.0), Point::new(999.0, 1.0), Point::new(-50.0, 420.25)];
    let mut coords = CoordinateSystem::new(1.0);
    let mut viewport = Viewport::default();
    for (surface, extent, zoom, pan) in settings {
        coords.set_surface(surface, extent);
        viewport.set_zoom(zoom);
        viewport.set_pan(pan);
        for p in points {
            let screen = coords.drawing_to_screen(&viewport, p);
            let back = coords.screen_to_drawing(&viewport, screen);
            assert!((back.x - p.x).abs() < 1e-6 && (back.y - p.y).abs() < 1e-6, "{surface:?} {p:?} -> {back:?}");
        }
    }
}

#[test]
fn screen_len_to_drawing_accounts_for_zoom_and_scale() {
    let coords = half_scale();
    let mut viewport = Viewport::default();
    viewport.set_zoom(2.0);
    // one drawing unit = 0.5 stage px = 1 screen px
    assert!(approx_eq(coords.screen_len_to_drawing(&viewport, 8.0), 8.0));
}

#[test]
fn drawing_bounds_match_extent() {
    assert_eq!(half_scale().drawing_bounds(), Rect::new(0.0, 0.0, 1000.0, 500.0));
}

#[test]
fn inch_conversion_uses_scale() {
    let coords = CoordinateSystem::new(2.0);
    assert_eq!(coords.inches_to_drawing_units(24.0), 12.0);
    assert_eq!(coords.drawing_units_to_inches(12.0), 24.0);
}

#[test]
fn snap_to_grid_rounds_each_axis() {
    let coords = CoordinateSystem::default();
    assert_eq!(coords.snap_to_grid(Point::new(37.0, 11.0), 24.0), Point::new(48.0, 0.0));
}

#[test]
fn snap_to_grid_is_idempotent() {
    let coords = CoordinateSystem::default();
    for p in [Point::new(13.3, -40.1), Point::new(71.9, 0.2), Point::new(-11.99, 12.01)] {
        let once = coords.snap_to_grid(p, 24.0);
        assert_eq!(coords.snap_to_grid(once, 24.0), once);
    }
}

#[test]
fn snap_to_grid_zero_pitch_passes_through() {
    let coords = CoordinateSystem::default();
    let p = Point::new(13.3, 7.7);
    assert_eq!(coords.snap_to_grid(p, 0.0), p);
}

#[test]
fn scaled_sizes_shrink_with_zoom() {
    let coords = CoordinateSystem::default();
    let mut viewport = Viewport::default();
    viewport.set_zoom(4.0);
    assert_eq!(coords.scaled_line_width(&viewport, 2.0), 0.5);
    assert_eq!(coords.scaled_font_size(&viewport, 12.0), 3.0);
}

// =============================================================
// Free functions
// =============================================================

#[test]
fn snap_value_rounds_to_nearest_step() {
    assert_eq!(snap_value(70.0, 24.0), 72.0);
    assert_eq!(snap_value(50.0, 24.0), 48.0);
    assert_eq!(snap_value(5.0, -1.0), 5.0);
    assert_eq!(snap_value(5.0, f64::INFINITY), 5.0);
}

#[test]
fn normalize_degrees_wraps() {
    assert_eq!(normalize_degrees_360(-90.0), 270.0);
    assert_eq!(normalize_degrees_360(360.0), 0.0);
    assert_eq!(normalize_degrees_360(725.0), 5.0);
}
