use super::*;
use crate::coords::Point;
use crate::doc::{BackingType, PlacementStatus};

fn placement_json(id: &str, width: f64) -> String {
    format!(
        r#"{{"id":"{id}","backingType":"2x8","dimensions":{{"width":{width},"height":24,"thickness":1.5}},"location":{{"x":10,"y":20,"z":48}},"orientation":0,"status":"ai_generated"}}"#
    )
}

const ID_A: &str = "6f1c2f8e-3b9a-4c55-9d2e-1a2b3c4d5e6f";
const ID_B: &str = "0b7e1d2c-4a5f-4e6d-8c9b-a1b2c3d4e5f6";

// =============================================================
// Loading
// =============================================================

#[test]
fn loads_valid_project() {
    let text = format!(
        r#"{{"backings":[{},{}],"drawingUrl":"plans/level-2.pdf","timestamp":1700000000000,"version":"1.0"}}"#,
        placement_json(ID_A, 48.0),
        placement_json(ID_B, 96.0)
    );
    let project = ProjectFile::from_json(&text).unwrap();
    assert_eq!(project.backings.len(), 2);
    assert_eq!(project.backings[0].backing_type, BackingType::Lumber2x8);
    assert_eq!(project.backings[0].status, PlacementStatus::AiGenerated);
    assert_eq!(project.drawing_url.as_deref(), Some("plans/level-2.pdf"));
    assert_eq!(project.timestamp, 1_700_000_000_000);
}

#[test]
fn missing_optional_fields_default() {
    let text = format!(r#"{{"backings":[{}]}}"#, placement_json(ID_A, 48.0));
    let project = ProjectFile::from_json(&text).unwrap();
    assert_eq!(project.version, PROJECT_VERSION);
    assert_eq!(project.timestamp, 0);
    assert!(project.drawing_url.is_none());
}

#[test]
fn other_versions_still_load() {
    let text = format!(r#"{{"backings":[{}],"version":"0.9"}}"#, placement_json(ID_A, 48.0));
    assert_eq!(ProjectFile::from_json(&text).unwrap().version, "0.9");
}

// =============================================================
// Rejection
// =============================================================

#[test]
fn rejects_invalid_json() {
    assert!(matches!(ProjectFile::from_json("{not json"), Err(ProjectError::InvalidJson(_))));
}

#[test]
fn rejects_missing_or_non_array_backings() {
    assert!(matches!(ProjectFile::from_json(r#"{"version":"1.0"}"#), Err(ProjectError::MissingBackings)));
    assert!(matches!(ProjectFile::from_json(r#"{"backings":{}}"#), Err(ProjectError::MissingBackings)));
    assert!(matches!(ProjectFile::from_json("[]"), Err(ProjectError::MissingBackings)));
}

#[test]
fn rejects_malformed_placement() {
    let text = r#"{"backings":[{"id":"not-a-uuid"}]}"#;
    assert!(matches!(ProjectFile::from_json(text), Err(ProjectError::MalformedBackings(_))));
}

#[test]
fn rejects_placement_below_minimum() {
    let text = format!(r#"{{"backings":[{},{}]}}"#, placement_json(ID_A, 48.0), placement_json(ID_B, 6.0));
    match ProjectFile::from_json(&text) {
        Err(ProjectError::InvalidPlacement { index, .. }) => assert_eq!(index, 1),
        other => panic!("expected invalid placement, got {other:?}"),
    }
}

#[test]
fn rejects_duplicate_ids() {
    let text = format!(r#"{{"backings":[{},{}]}}"#, placement_json(ID_A, 48.0), placement_json(ID_A, 72.0));
    assert!(matches!(ProjectFile::from_json(&text), Err(ProjectError::DuplicateId(_))));
}

// =============================================================
// Saving
// =============================================================

#[test]
fn saved_project_reloads_identically() {
    let backings = vec![
        BackingPlacement::with_defaults(BackingType::Plywood, Point::new(0.0, 0.0)),
        BackingPlacement::with_defaults(BackingType::Blocking, Point::new(96.0, 48.0)),
    ];
    let project = ProjectFile::new(backings, Some("a.pdf".into()));
    assert!(project.timestamp > 0);
    assert_eq!(project.version, PROJECT_VERSION);
    let text = project.to_json().unwrap();
    assert!(text.contains("\"drawingUrl\""));
    assert_eq!(ProjectFile::from_json(&text).unwrap(), project);
}
