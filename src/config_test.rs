#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, ()> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key: &str| vars.get(key).cloned().ok_or(())
}

#[test]
fn empty_environment_uses_defaults() {
    let cfg = EngineConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg, EngineConfig::default());
    assert_eq!(cfg.grid_size_in, 24.0);
    assert_eq!(cfg.history_capacity, 50);
    assert_eq!(cfg.rotation_mode, RotationMode::Continuous);
}

#[test]
fn overrides_are_parsed() {
    let cfg = EngineConfig::from_lookup(lookup_from(&[
        ("BACKING_GRID_SIZE_IN", "16"),
        ("BACKING_SNAP_DISTANCE_IN", " 6.5 "),
        ("BACKING_HISTORY_CAPACITY", "10"),
        ("BACKING_ROTATION_MODE", "Discrete"),
        ("BACKING_INCHES_PER_UNIT", "0.5"),
        ("BACKING_MAX_ZOOM", "8"),
    ]))
    .unwrap();
    assert_eq!(cfg.grid_size_in, 16.0);
    assert_eq!(cfg.snap_distance_in, 6.5);
    assert_eq!(cfg.history_capacity, 10);
    assert_eq!(cfg.rotation_mode, RotationMode::Discrete);
    assert_eq!(cfg.inches_per_unit, 0.5);
    assert_eq!(cfg.max_zoom, 8.0);
}

#[test]
fn unparsable_numbers_fall_back() {
    let cfg = EngineConfig::from_lookup(lookup_from(&[
        ("BACKING_GRID_SIZE_IN", "two feet"),
        ("BACKING_HISTORY_CAPACITY", "-3"),
        ("BACKING_MIN_ZOOM", "NaN"),
    ]))
    .unwrap();
    assert_eq!(cfg.grid_size_in, DEFAULT_GRID_SIZE_IN);
    assert_eq!(cfg.history_capacity, HISTORY_CAPACITY);
    assert_eq!(cfg.min_zoom, MIN_ZOOM);
}

#[test]
fn unknown_rotation_mode_is_an_error() {
    let err = EngineConfig::from_lookup(lookup_from(&[("BACKING_ROTATION_MODE", "spin")])).unwrap_err();
    assert_eq!(err, ConfigError::RotationMode(ParseModeError::RotationMode("spin".into())));
}

#[test]
fn inverted_zoom_range_is_rejected() {
    let err =
        EngineConfig::from_lookup(lookup_from(&[("BACKING_MIN_ZOOM", "3"), ("BACKING_MAX_ZOOM", "2")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "BACKING_MIN_ZOOM", .. }));
}

#[test]
fn zero_capacity_and_negative_grid_are_rejected() {
    let err = EngineConfig::from_lookup(lookup_from(&[("BACKING_HISTORY_CAPACITY", "0")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "BACKING_HISTORY_CAPACITY", .. }));
    let err = EngineConfig::from_lookup(lookup_from(&[("BACKING_GRID_SIZE_IN", "-1")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "BACKING_GRID_SIZE_IN", .. }));
}

#[test]
fn minimum_dimension_cannot_drop_below_twelve_inches() {
    let err = EngineConfig::from_lookup(lookup_from(&[("BACKING_MIN_DIMENSION_IN", "6")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "BACKING_MIN_DIMENSION_IN", .. }));
    let cfg = EngineConfig::from_lookup(lookup_from(&[("BACKING_MIN_DIMENSION_IN", "18")])).unwrap();
    assert_eq!(cfg.min_dimension_in, 18.0);
}

#[test]
fn zero_grid_is_allowed() {
    let cfg = EngineConfig::from_lookup(lookup_from(&[("BACKING_GRID_SIZE_IN", "0")])).unwrap();
    assert_eq!(cfg.snap_config().grid_size, 0.0);
}

#[test]
fn snap_config_carries_lengths() {
    let cfg = EngineConfig { grid_size_in: 12.0, snap_distance_in: 4.0, ..EngineConfig::default() };
    let snap = cfg.snap_config();
    assert_eq!(snap.grid_size, 12.0);
    assert_eq!(snap.snap_distance, 4.0);
    assert!(snap.grid_enabled && snap.entity_enabled && snap.wall_enabled);
}

#[test]
fn config_deserializes_with_defaults() {
    let cfg: EngineConfig = serde_json::from_str(r#"{"grid_size_in": 6, "rotation_mode": "discrete"}"#).unwrap();
    assert_eq!(cfg.grid_size_in, 6.0);
    assert_eq!(cfg.rotation_mode, RotationMode::Discrete);
    assert_eq!(cfg.history_capacity, HISTORY_CAPACITY);
}
