#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{BackingType, Dimensions, Location, PlacementStatus};

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn sized(x: f64, y: f64, width: f64, height: f64) -> BackingPlacement {
    let mut p = BackingPlacement::with_defaults(BackingType::Lumber2x6, Point::new(x, y));
    p.set_rect(Rect::new(x, y, width, height), &unit());
    p
}

fn doc_of(placements: Vec<BackingPlacement>) -> (DocStore, Vec<EntityId>) {
    let ids = placements.iter().map(|p| p.id).collect();
    (DocStore::from_placements(placements), ids)
}

fn unit() -> CoordinateSystem {
    CoordinateSystem::default()
}

fn rect_of(doc: &DocStore, id: &EntityId) -> Rect {
    doc.get(id).map(|p| p.rect(&unit())).unwrap_or_default()
}

// =============================================================
// Parsing
// =============================================================

#[test]
fn alignment_parses_both_separators() {
    assert_eq!("center-v".parse::<Alignment>(), Ok(Alignment::CenterV));
    assert_eq!("CENTER_H".parse::<Alignment>(), Ok(Alignment::CenterH));
    assert_eq!(" left ".parse::<Alignment>(), Ok(Alignment::Left));
    assert_eq!("middle".parse::<Alignment>(), Err(ParseModeError::Alignment("middle".into())));
}

#[test]
fn axis_and_rotation_mode_parse() {
    assert_eq!("Vertical".parse::<DistributeAxis>(), Ok(DistributeAxis::Vertical));
    assert!("diagonal".parse::<DistributeAxis>().is_err());
    assert_eq!("discrete".parse::<RotationMode>(), Ok(RotationMode::Discrete));
    assert_eq!(RotationMode::default(), RotationMode::Continuous);
    assert!("snappy".parse::<RotationMode>().is_err());
}

// =============================================================
// Resize
// =============================================================

#[test]
fn corner_resize_snaps_to_grid() {
    let r = resize_rect(Rect::new(0.0, 0.0, 48.0, 24.0), 0.0, ResizeHandle::Se, Point::new(70.0, 50.0), 24.0, 12.0);
    assert_eq!(r, Rect::new(0.0, 0.0, 72.0, 48.0));
}

#[test]
fn edge_resize_leaves_other_axis_alone() {
    let r = resize_rect(Rect::new(0.0, 0.0, 48.0, 24.0), 0.0, ResizeHandle::E, Point::new(61.0, 300.0), 0.0, 12.0);
    assert_eq!(r, Rect::new(0.0, 0.0, 61.0, 24.0));
}

#[test]
fn dragging_past_fixed_side_clamps_instead_of_inverting() {
    let r = resize_rect(Rect::new(0.0, 0.0, 48.0, 24.0), 0.0, ResizeHandle::Nw, Point::new(100.0, 100.0), 0.0, 12.0);
    // Right and bottom edges stay at 48 and 24.
    assert_eq!(r, Rect::new(36.0, 12.0, 12.0, 12.0));
}

#[test]
fn top_left_handle_moves_origin() {
    let r = resize_rect(Rect::new(24.0, 24.0, 48.0, 24.0), 0.0, ResizeHandle::Nw, Point::new(0.0, 0.0), 24.0, 12.0);
    assert_eq!(r, Rect::new(0.0, 0.0, 72.0, 48.0));
}

#[test]
fn rotated_resize_keeps_fixed_anchor_in_place() {
    let orig = Rect::new(0.0, 0.0, 48.0, 24.0);
    let anchor_before = ResizeHandle::E.fixed_anchor(&orig).rotated_around(orig.center(), 90.0);
    // With a quarter turn the east handle points down the screen.
    let r = resize_rect(orig, 90.0, ResizeHandle::E, Point::new(24.0, 60.0), 24.0, 12.0);
    assert!(approx_eq(r.width, 72.0));
    assert!(approx_eq(r.height, 24.0));
    let anchor_after = ResizeHandle::E.fixed_anchor(&r).rotated_around(r.center(), 90.0);
    assert!(approx_eq(anchor_before.x, anchor_after.x));
    assert!(approx_eq(anchor_before.y, anchor_after.y));
}

// =============================================================
// Rotate
// =============================================================

#[test]
fn pointer_angle_is_compass_style() {
    let c = Point::new(0.0, 0.0);
    let angle = |x, y| pointer_angle_deg(c, Point::new(x, y)).unwrap_or(f64::NAN);
    assert!(approx_eq(angle(0.0, -10.0), 0.0));
    assert!(approx_eq(angle(10.0, 0.0), 90.0));
    assert!(approx_eq(angle(0.0, 10.0), 180.0));
    assert!(approx_eq(angle(-10.0, 0.0), 270.0));
    assert_eq!(pointer_angle_deg(c, c), None);
}

#[test]
fn quantize_rotation_profiles() {
    assert_eq!(quantize_rotation(44.0, RotationMode::Discrete, false), 0.0);
    assert_eq!(quantize_rotation(46.0, RotationMode::Discrete, false), 90.0);
    assert_eq!(quantize_rotation(359.0, RotationMode::Discrete, false), 0.0);
    assert_eq!(quantize_rotation(37.0, RotationMode::Continuous, true), 30.0);
    assert_eq!(quantize_rotation(37.0, RotationMode::Continuous, false), 37.0);
    assert_eq!(quantize_rotation(-30.0, RotationMode::Continuous, false), 330.0);
}

#[test]
fn rotate_by_wraps_and_marks_modified() {
    let mut p = sized(0.0, 0.0, 48.0, 24.0);
    p.orientation = 300.0;
    p.status = PlacementStatus::AiGenerated;
    let (mut doc, ids) = doc_of(vec![p]);
    assert!(rotate_by(&mut doc, &ids, 90.0, RotationMode::Continuous));
    let p = doc.get(&ids[0]).cloned();
    assert_eq!(p.as_ref().map(|p| p.orientation), Some(30.0));
    assert_eq!(p.map(|p| p.status), Some(PlacementStatus::UserModified));
}

#[test]
fn rotate_by_full_turn_is_no_op() {
    let (mut doc, ids) = doc_of(vec![sized(0.0, 0.0, 48.0, 24.0)]);
    assert!(!rotate_by(&mut doc, &ids, 360.0, RotationMode::Continuous));
}

// =============================================================
// Align
// =============================================================

fn three_scattered() -> (DocStore, Vec<EntityId>) {
    doc_of(vec![sized(10.0, 0.0, 48.0, 24.0), sized(50.0, 100.0, 24.0, 24.0), sized(0.0, 200.0, 96.0, 24.0)])
}

#[test]
fn align_left_shares_min_x() {
    let (mut doc, ids) = three_scattered();
    assert!(align(&mut doc, &unit(), &ids, Alignment::Left));
    for id in &ids {
        assert_eq!(rect_of(&doc, id).x, 0.0);
    }
    // y is untouched.
    assert_eq!(rect_of(&doc, &ids[1]).y, 100.0);
}

#[test]
fn align_right_shares_max_right() {
    let (mut doc, ids) = three_scattered();
    assert!(align(&mut doc, &unit(), &ids, Alignment::Right));
    for id in &ids {
        assert_eq!(rect_of(&doc, id).right(), 96.0);
    }
}

#[test]
fn align_center_v_uses_span_midpoint() {
    let (mut doc, ids) = three_scattered();
    assert!(align(&mut doc, &unit(), &ids, Alignment::CenterV));
    // Span is 0..96.
    for id in &ids {
        assert_eq!(rect_of(&doc, id).center().x, 48.0);
    }
}

#[test]
fn align_bottom_and_top() {
    let (mut doc, ids) = three_scattered();
    assert!(align(&mut doc, &unit(), &ids, Alignment::Bottom));
    for id in &ids {
        assert_eq!(rect_of(&doc, id).bottom(), 224.0);
    }
    assert!(align(&mut doc, &unit(), &ids, Alignment::Top));
    for id in &ids {
        assert_eq!(rect_of(&doc, id).y, 200.0);
    }
}

#[test]
fn align_is_idempotent_and_needs_two() {
    let (mut doc, ids) = three_scattered();
    assert!(align(&mut doc, &unit(), &ids, Alignment::Top));
    assert!(!align(&mut doc, &unit(), &ids, Alignment::Top));
    assert!(!align(&mut doc, &unit(), &ids[..1], Alignment::Left));
}

#[test]
fn align_only_marks_moved_placements() {
    let mut anchor = sized(0.0, 0.0, 48.0, 24.0);
    anchor.status = PlacementStatus::Approved;
    let (mut doc, ids) = doc_of(vec![anchor, sized(30.0, 50.0, 48.0, 24.0)]);
    assert!(align(&mut doc, &unit(), &ids, Alignment::Left));
    assert_eq!(doc.get(&ids[0]).map(|p| p.status), Some(PlacementStatus::Approved));
    assert_eq!(doc.get(&ids[1]).map(|p| p.status), Some(PlacementStatus::UserModified));
}

// =============================================================
// Distribute
// =============================================================

#[test]
fn distribute_spaces_interior_centers() {
    // Centers at 0, 90, 20, 300 (unsorted on purpose).
    let (mut doc, ids) = doc_of(vec![
        sized(-24.0, 0.0, 48.0, 24.0),
        sized(78.0, 0.0, 24.0, 24.0),
        sized(-4.0, 50.0, 48.0, 24.0),
        sized(276.0, 0.0, 48.0, 24.0),
    ]);
    assert!(distribute(&mut doc, &unit(), &ids, DistributeAxis::Horizontal));
    assert_eq!(rect_of(&doc, &ids[0]).center().x, 0.0);
    assert_eq!(rect_of(&doc, &ids[3]).center().x, 300.0);
    assert_eq!(rect_of(&doc, &ids[2]).center().x, 100.0);
    assert_eq!(rect_of(&doc, &ids[1]).center().x, 200.0);
    // Cross axis untouched.
    assert_eq!(rect_of(&doc, &ids[2]).y, 50.0);
}

#[test]
fn distribute_vertical() {
    let (mut doc, ids) =
        doc_of(vec![sized(0.0, 0.0, 48.0, 24.0), sized(0.0, 10.0, 48.0, 24.0), sized(0.0, 100.0, 48.0, 24.0)]);
    assert!(distribute(&mut doc, &unit(), &ids, DistributeAxis::Vertical));
    assert_eq!(rect_of(&doc, &ids[1]).center().y, 62.0);
}

#[test]
fn distribute_needs_three() {
    let (mut doc, ids) = doc_of(vec![sized(0.0, 0.0, 48.0, 24.0), sized(300.0, 0.0, 48.0, 24.0)]);
    assert!(!distribute(&mut doc, &unit(), &ids, DistributeAxis::Horizontal));
}

#[test]
fn distribute_already_even_reports_no_change() {
    let (mut doc, ids) =
        doc_of(vec![sized(0.0, 0.0, 48.0, 24.0), sized(100.0, 0.0, 48.0, 24.0), sized(200.0, 0.0, 48.0, 24.0)]);
    assert!(!distribute(&mut doc, &unit(), &ids, DistributeAxis::Horizontal));
}

// =============================================================
// Translate and duplicate
// =============================================================

#[test]
fn translate_moves_every_id() {
    let (mut doc, ids) = doc_of(vec![sized(0.0, 0.0, 48.0, 24.0), sized(100.0, 0.0, 48.0, 24.0)]);
    assert!(translate(&mut doc, &ids, Point::new(5.0, -3.0)));
    assert_eq!(rect_of(&doc, &ids[0]).x, 5.0);
    assert_eq!(rect_of(&doc, &ids[1]).y, -3.0);
}

#[test]
fn translate_ignores_sub_threshold_delta() {
    let (mut doc, ids) = doc_of(vec![sized(0.0, 0.0, 48.0, 24.0)]);
    assert!(!translate(&mut doc, &ids, Point::new(0.001, 0.0)));
    assert_eq!(rect_of(&doc, &ids[0]).x, 0.0);
}

#[test]
fn duplicates_get_fresh_ids_and_offset() {
    let source = BackingPlacement::detected(
        BackingType::Plywood,
        Dimensions { width: 48.0, height: 48.0, thickness: 0.75 },
        Location { x: 10.0, y: 20.0, z: 36.0 },
    )
    .unwrap();
    let copies = duplicate_placements(std::slice::from_ref(&source), 24.0);
    assert_eq!(copies.len(), 1);
    let copy = &copies[0];
    assert_ne!(copy.id, source.id);
    assert_eq!((copy.location.x, copy.location.y, copy.location.z), (34.0, 44.0, 36.0));
    assert_eq!(copy.dimensions, source.dimensions);
    assert_eq!(copy.status, PlacementStatus::UserModified);
    assert_eq!(source.status, PlacementStatus::AiGenerated);
}

#[test]
fn geometry_changed_threshold() {
    let a = Rect::new(0.0, 0.0, 48.0, 24.0);
    assert!(!geometry_changed(&a, &Rect::new(0.005, 0.0, 48.0, 24.0)));
    assert!(geometry_changed(&a, &Rect::new(0.0, 0.0, 48.5, 24.0)));
}
