//! Document model: backing placements, measurements, and the store that holds them.
//!
//! This module defines what is annotated on the drawing (`BackingPlacement`,
//! `Measurement`) and the host-owned `DocStore` that the engine edits through
//! `&mut` at each entry point. Placements keep their store order; that order is
//! also the draw order (later entries draw on top).
//!
//! Data flows into this layer from project files and the detection collaborator
//! (JSON deserialization) and from the manipulation engine (edits).
//!
//! Units: `location` x/y are drawing units, `dimensions` are inches. Geometry
//! accessors take the [`CoordinateSystem`] and return drawing units.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{
    DEFAULT_BACKING_HEIGHT_IN, DEFAULT_BACKING_WIDTH_IN, DEFAULT_BACKING_Z_IN, DIMENSION_TOLERANCE_IN, MIN_DIMENSION_IN,
};
use crate::coords::{CoordinateSystem, Point, Rect};

/// Unique identifier for a placement or measurement.
pub type EntityId = Uuid;

/// Error returned when a placement or condition set fails validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlacementError {
    /// A dimension is zero, negative or not finite.
    #[error("{field} must be a positive finite number, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    /// Width or height is below the minimum backing size.
    #[error("{field} {value} is below the {min} inch minimum")]
    BelowMinimum { field: &'static str, value: f64, min: f64 },
    /// A location coordinate is not finite.
    #[error("location {field} is not finite")]
    NonFiniteLocation { field: &'static str },
    /// A mounting-height range has `min > max` or a negative bound.
    #[error("invalid mounting height range {min}..{max}")]
    InvalidHeightRange { min: f64, max: f64 },
}

/// Material preset for a backing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BackingType {
    #[serde(rename = "2x4")]
    Lumber2x4,
    #[default]
    #[serde(rename = "2x6")]
    Lumber2x6,
    #[serde(rename = "2x8")]
    Lumber2x8,
    #[serde(rename = "2x10")]
    Lumber2x10,
    #[serde(rename = "3/4_plywood")]
    Plywood,
    #[serde(rename = "steel_plate")]
    SteelPlate,
    #[serde(rename = "blocking")]
    Blocking,
}

impl BackingType {
    /// Every preset, in menu order.
    pub const ALL: [BackingType; 7] = [
        Self::Lumber2x4,
        Self::Lumber2x6,
        Self::Lumber2x8,
        Self::Lumber2x10,
        Self::Plywood,
        Self::SteelPlate,
        Self::Blocking,
    ];

    /// Nominal material thickness in inches.
    #[must_use]
    pub fn thickness(self) -> f64 {
        match self {
            Self::Lumber2x4 | Self::Lumber2x6 | Self::Lumber2x8 | Self::Lumber2x10 | Self::Blocking => 1.5,
            Self::Plywood => 0.75,
            Self::SteelPlate => 0.25,
        }
    }

    /// Wire name of the preset.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Lumber2x4 => "2x4",
            Self::Lumber2x6 => "2x6",
            Self::Lumber2x8 => "2x8",
            Self::Lumber2x10 => "2x10",
            Self::Plywood => "3/4_plywood",
            Self::SteelPlate => "steel_plate",
            Self::Blocking => "blocking",
        }
    }

    /// Default dimensions for a newly placed backing of this type.
    #[must_use]
    pub fn default_dimensions(self) -> Dimensions {
        Dimensions { width: DEFAULT_BACKING_WIDTH_IN, height: DEFAULT_BACKING_HEIGHT_IN, thickness: self.thickness() }
    }
}

/// Provenance / workflow state of a placement.
///
/// `AiGenerated` is only assigned by the detection collaborator; direct edits
/// move a placement to `UserModified`, and review moves it to `Approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStatus {
    AiGenerated,
    #[default]
    UserModified,
    Approved,
}

/// Backing size in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub thickness: f64,
}

/// Backing position: `x`/`y` in drawing units (top-left), `z` in inches AFF.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Allowed mounting height band, in inches AFF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightRange {
    pub min: f64,
    pub max: f64,
}

/// Optional installation conditions attached to a placement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionSet {
    /// Free-form installer notes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Mounting height override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mounting_height: Option<HeightRange>,
}

impl ConditionSet {
    /// Build a validated condition set.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidHeightRange`] when the range is inverted or negative.
    pub fn new(notes: Vec<String>, mounting_height: Option<HeightRange>) -> Result<Self, PlacementError> {
        let set = Self { notes, mounting_height };
        set.validate()?;
        Ok(set)
    }

    /// Check the mounting range, if any.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidHeightRange`] when the range is inverted or negative.
    pub fn validate(&self) -> Result<(), PlacementError> {
        if let Some(range) = self.mounting_height {
            let finite = range.min.is_finite() && range.max.is_finite();
            if !finite || range.min < 0.0 || range.min > range.max {
                return Err(PlacementError::InvalidHeightRange { min: range.min, max: range.max });
            }
        }
        Ok(())
    }
}

/// A rectangular backing annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackingPlacement {
    pub id: EntityId,
    pub backing_type: BackingType,
    pub dimensions: Dimensions,
    pub location: Location,
    /// Clockwise rotation in degrees around the rectangle center.
    pub orientation: f64,
    pub status: PlacementStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<ConditionSet>,
}

impl BackingPlacement {
    /// Create a user-placed backing after validating its geometry.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError`] if any dimension is non-positive, width or
    /// height is below the 12 inch minimum, or the location is not finite.
    pub fn new(backing_type: BackingType, dimensions: Dimensions, location: Location) -> Result<Self, PlacementError> {
        validate_dimensions(&dimensions)?;
        validate_location(&location)?;
        Ok(Self {
            id: Uuid::new_v4(),
            backing_type,
            dimensions,
            location,
            orientation: 0.0,
            status: PlacementStatus::UserModified,
            conditions: None,
        })
    }

    /// Create a backing reported by the detection collaborator.
    ///
    /// # Errors
    ///
    /// Same validation as [`BackingPlacement::new`].
    pub fn detected(
        backing_type: BackingType,
        dimensions: Dimensions,
        location: Location,
    ) -> Result<Self, PlacementError> {
        let mut placement = Self::new(backing_type, dimensions, location)?;
        placement.status = PlacementStatus::AiGenerated;
        Ok(placement)
    }

    /// Default-sized backing with its top-left at `origin` (drawing units).
    #[must_use]
    pub fn with_defaults(backing_type: BackingType, origin: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            backing_type,
            dimensions: backing_type.default_dimensions(),
            location: Location { x: origin.x, y: origin.y, z: DEFAULT_BACKING_Z_IN },
            orientation: 0.0,
            status: PlacementStatus::UserModified,
            conditions: None,
        }
    }

    /// Attach validated conditions.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidHeightRange`] if the conditions are invalid.
    pub fn with_conditions(mut self, conditions: ConditionSet) -> Result<Self, PlacementError> {
        conditions.validate()?;
        self.conditions = Some(conditions);
        Ok(self)
    }

    /// Re-run construction-time validation, e.g. after deserialization.
    ///
    /// # Errors
    ///
    /// Returns the first [`PlacementError`] found.
    pub fn validate(&self) -> Result<(), PlacementError> {
        validate_dimensions(&self.dimensions)?;
        validate_location(&self.location)?;
        if let Some(conditions) = &self.conditions {
            conditions.validate()?;
        }
        Ok(())
    }

    /// Unrotated footprint in drawing units.
    #[must_use]
    pub fn rect(&self, coords: &CoordinateSystem) -> Rect {
        Rect::new(
            self.location.x,
            self.location.y,
            coords.inches_to_drawing_units(self.dimensions.width),
            coords.inches_to_drawing_units(self.dimensions.height),
        )
    }

    /// Overwrite position and size from a drawing-unit `rect`.
    pub fn set_rect(&mut self, rect: Rect, coords: &CoordinateSystem) {
        self.location.x = rect.x;
        self.location.y = rect.y;
        self.dimensions.width = coords.drawing_units_to_inches(rect.width);
        self.dimensions.height = coords.drawing_units_to_inches(rect.height);
    }

    #[must_use]
    pub fn center(&self, coords: &CoordinateSystem) -> Point {
        self.rect(coords).center()
    }

    /// Record a direct user edit.
    pub fn mark_modified(&mut self) {
        self.status = PlacementStatus::UserModified;
    }

    /// Record review approval.
    pub fn approve(&mut self) {
        self.status = PlacementStatus::Approved;
    }

    /// Corners after rotation: top-left, top-right, bottom-right, bottom-left.
    #[must_use]
    pub fn corners(&self, coords: &CoordinateSystem) -> [Point; 4] {
        let r = self.rect(coords);
        let c = r.center();
        [
            Point::new(r.x, r.y),
            Point::new(r.right(), r.y),
            Point::new(r.right(), r.bottom()),
            Point::new(r.x, r.bottom()),
        ]
        .map(|p| p.rotated_around(c, self.orientation))
    }

    /// Axis-aligned bounds of the rotated rectangle.
    #[must_use]
    pub fn bounds(&self, coords: &CoordinateSystem) -> Rect {
        self.rect(coords).rotated_bounds(self.orientation)
    }

    /// Map a drawing point into this placement's unrotated frame.
    #[must_use]
    pub fn to_local(&self, p: Point, coords: &CoordinateSystem) -> Point {
        p.rotated_around(self.center(coords), -self.orientation)
    }

    /// Whether `p` (drawing units) lies inside the rotated rectangle, with `slop` tolerance.
    #[must_use]
    pub fn contains_point(&self, p: Point, slop: f64, coords: &CoordinateSystem) -> bool {
        let local = self.to_local(p, coords);
        let r = self.rect(coords);
        local.x >= r.x - slop && local.x <= r.right() + slop && local.y >= r.y - slop && local.y <= r.bottom() + slop
    }
}

fn validate_dimensions(d: &Dimensions) -> Result<(), PlacementError> {
    for (field, value) in [("width", d.width), ("height", d.height), ("thickness", d.thickness)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(PlacementError::NonPositive { field, value });
        }
    }
    for (field, value) in [("width", d.width), ("height", d.height)] {
        if value < MIN_DIMENSION_IN - DIMENSION_TOLERANCE_IN {
            return Err(PlacementError::BelowMinimum { field, value, min: MIN_DIMENSION_IN });
        }
    }
    Ok(())
}

fn validate_location(l: &Location) -> Result<(), PlacementError> {
    for (field, value) in [("x", l.x), ("y", l.y), ("z", l.z)] {
        if !value.is_finite() {
            return Err(PlacementError::NonFiniteLocation { field });
        }
    }
    Ok(())
}

/// A completed two-point distance annotation. Immutable apart from deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    id: EntityId,
    start_point: Point,
    end_point: Point,
    distance: f64,
}

impl Measurement {
    /// Measure from `start` to `end` (drawing units).
    #[must_use]
    pub fn new(start: Point, end: Point) -> Self {
        Self { id: Uuid::new_v4(), start_point: start, end_point: end, distance: start.distance_to(end) }
    }

    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[must_use]
    pub fn start(&self) -> Point {
        self.start_point
    }

    #[must_use]
    pub fn end(&self) -> Point {
        self.end_point
    }

    /// Euclidean length in drawing units.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }
}

/// Host-owned store of placements and measurements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocStore {
    placements: Vec<BackingPlacement>,
    measurements: Vec<Measurement>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with placements (detection output or project load).
    #[must_use]
    pub fn from_placements(placements: Vec<BackingPlacement>) -> Self {
        Self { placements, measurements: Vec::new() }
    }

    #[must_use]
    pub fn placements(&self) -> &[BackingPlacement] {
        &self.placements
    }

    #[must_use]
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Return a placement by id.
    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<&BackingPlacement> {
        self.placements.iter().find(|p| p.id == *id)
    }

    /// Return a mutable placement by id.
    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut BackingPlacement> {
        self.placements.iter_mut().find(|p| p.id == *id)
    }

    /// Return a measurement by id.
    #[must_use]
    pub fn measurement(&self, id: &EntityId) -> Option<&Measurement> {
        self.measurements.iter().find(|m| m.id == *id)
    }

    /// Whether `id` names a placement or a measurement in this store.
    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.get(id).is_some() || self.measurement(id).is_some()
    }

    /// Append a placement. An existing placement with the same id is replaced in place.
    pub fn insert(&mut self, placement: BackingPlacement) {
        if let Some(existing) = self.get_mut(&placement.id) {
            *existing = placement;
        } else {
            self.placements.push(placement);
        }
    }

    /// Remove a placement by id, returning it if it was present.
    pub fn remove(&mut self, id: &EntityId) -> Option<BackingPlacement> {
        let index = self.placements.iter().position(|p| p.id == *id)?;
        Some(self.placements.remove(index))
    }

    pub fn add_measurement(&mut self, measurement: Measurement) {
        self.measurements.push(measurement);
    }

    /// Remove a measurement by id, returning it if it was present.
    pub fn remove_measurement(&mut self, id: &EntityId) -> Option<Measurement> {
        let index = self.measurements.iter().position(|m| m.id == *id)?;
        Some(self.measurements.remove(index))
    }

    /// Deep copy of the placement list.
    #[must_use]
    pub fn snapshot(&self) -> Vec<BackingPlacement> {
        self.placements.clone()
    }

    /// Replace all placements with a snapshot. Measurements are kept.
    pub fn load_snapshot(&mut self, placements: Vec<BackingPlacement>) {
        self.placements = placements;
    }

    /// Union of all placement bounds, or `None` when there are no placements.
    #[must_use]
    pub fn extent(&self, coords: &CoordinateSystem) -> Option<Rect> {
        self.placements.iter().map(|p| p.bounds(coords)).reduce(|a, b| a.union(&b))
    }

    /// Number of placements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Returns `true` if the store holds no placements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}
