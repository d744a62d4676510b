//! Snap engine: entity alignment guides, wall snap targets and grid snap.
//!
//! Layers are applied per axis in priority order:
//!
//! 1. **Entity alignment**: the dragged rectangle's center and edges are
//!    compared with the same feature of every other rectangle. The nearest
//!    match within the snap distance wins and emits a guide.
//! 2. **Wall snap**: walls are sampled at a fixed interval (see
//!    [`SnapEngine::wall_samples`], computed once per wall set); a sample close
//!    to one of the rectangle's nine feature points pulls that feature onto it.
//! 3. **Grid snap**: whatever axis is still free rounds to the grid.
//!
//! All distances in [`SnapConfig`] are inches and are converted to drawing
//! units through the [`CoordinateSystem`] at call time.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_GRID_SIZE_IN, DEFAULT_SNAP_DISTANCE_IN, MAX_SAMPLES_PER_WALL, WALL_SAMPLE_INTERVAL_IN};
use crate::coords::{CoordinateSystem, Point, Rect, snap_value};
use crate::doc::EntityId;
use crate::hit::ResizeHandle;

/// Snap tuning. Lengths are inches.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapConfig {
    pub grid_size: f64,
    pub snap_distance: f64,
    pub wall_sample_interval: f64,
    pub grid_enabled: bool,
    pub entity_enabled: bool,
    pub wall_enabled: bool,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE_IN,
            snap_distance: DEFAULT_SNAP_DISTANCE_IN,
            wall_sample_interval: WALL_SAMPLE_INTERVAL_IN,
            grid_enabled: true,
            entity_enabled: true,
            wall_enabled: true,
        }
    }
}

/// A straight wall, in drawing units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    pub start: Point,
    pub end: Point,
}

impl WallSegment {
    #[must_use]
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

/// A stationary rectangle the dragged entity may align with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    pub id: EntityId,
    pub rect: Rect,
}

/// Direction of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideOrientation {
    /// Line of constant y.
    Horizontal,
    /// Line of constant x.
    Vertical,
}

/// What produced a guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideSource {
    Entity(EntityId),
    Wall,
}

/// Transient alignment hint shown while dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapGuide {
    pub orientation: GuideOrientation,
    /// The constant coordinate of the line (y for horizontal, x for vertical).
    pub position: f64,
    /// Extent of the line along its own axis.
    pub from: f64,
    pub to: f64,
    pub source: GuideSource,
}

/// Corrected rectangle plus the guides that explain the correction.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    pub rect: Rect,
    pub guides: Vec<SnapGuide>,
}

/// Best alignment found on one axis.
struct AxisMatch {
    delta: f64,
    position: f64,
    other: Rect,
    id: EntityId,
}

/// Computes snapped positions and guides for drags and resizes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SnapEngine {
    config: SnapConfig,
}

impl SnapEngine {
    #[must_use]
    pub fn new(config: SnapConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SnapConfig) {
        self.config = config;
    }

    /// Grid pitch in drawing units, or 0 when grid snap is off.
    #[must_use]
    pub fn grid_units(&self, coords: &CoordinateSystem) -> f64 {
        if self.config.grid_enabled { coords.inches_to_drawing_units(self.config.grid_size) } else { 0.0 }
    }

    /// Snap a moved rectangle against other rectangles, wall samples and the grid.
    #[must_use]
    pub fn snap_move(
        &self,
        coords: &CoordinateSystem,
        candidate: Rect,
        others: &[SnapTarget],
        wall_samples: &[Point],
    ) -> SnapResult {
        let reach = coords.inches_to_drawing_units(self.config.snap_distance);
        let mut rect = candidate;
        let mut guides = Vec::new();
        let mut x_done = false;
        let mut y_done = false;

        if self.config.entity_enabled {
            if let Some(m) = best_axis_match(others, reach, x_features, &rect) {
                rect.x += m.delta;
                x_done = true;
                guides.push((GuideOrientation::Vertical, m));
            }
            if let Some(m) = best_axis_match(others, reach, y_features, &rect) {
                rect.y += m.delta;
                y_done = true;
                guides.push((GuideOrientation::Horizontal, m));
            }
        }

        let mut result_guides: Vec<SnapGuide> = guides
            .into_iter()
            .map(|(orientation, m)| entity_guide(orientation, &m, &rect))
            .collect();

        if self.config.wall_enabled && !(x_done && y_done) && !wall_samples.is_empty() {
            if let Some((feature, sample)) = nearest_feature_sample(&rect, wall_samples, reach) {
                if !x_done {
                    rect.x += sample.x - feature.x;
                    x_done = true;
                    result_guides.push(wall_guide(GuideOrientation::Vertical, sample, &rect));
                }
                if !y_done {
                    rect.y += sample.y - feature.y;
                    y_done = true;
                    result_guides.push(wall_guide(GuideOrientation::Horizontal, sample, &rect));
                }
            }
        }

        let grid = self.grid_units(coords);
        if !x_done {
            rect.x = snap_value(rect.x, grid);
        }
        if !y_done {
            rect.y = snap_value(rect.y, grid);
        }

        SnapResult { rect, guides: result_guides }
    }

    /// Pull the moving edges of a resized rectangle onto nearby edges of `others`.
    ///
    /// An edge only snaps when the resulting side stays at or above `min_size`
    /// (drawing units), so the clamp established by the resize is preserved.
    #[must_use]
    pub fn snap_resize(
        &self,
        coords: &CoordinateSystem,
        candidate: Rect,
        handle: ResizeHandle,
        min_size: f64,
        others: &[SnapTarget],
    ) -> SnapResult {
        let mut rect = candidate;
        let mut guides = Vec::new();
        if !self.config.entity_enabled || others.is_empty() {
            return SnapResult { rect, guides };
        }
        let reach = coords.inches_to_drawing_units(self.config.snap_distance);

        if handle.moves_right() {
            if let Some((edge, target)) = nearest_edge(rect.right(), others, reach, |r| [r.x, r.right()]) {
                if edge - rect.x >= min_size {
                    rect.width = edge - rect.x;
                    guides.push(edge_guide(GuideOrientation::Vertical, edge, &rect, target));
                }
            }
        } else if handle.moves_left() {
            if let Some((edge, target)) = nearest_edge(rect.x, others, reach, |r| [r.x, r.right()]) {
                if rect.right() - edge >= min_size {
                    rect.width = rect.right() - edge;
                    rect.x = edge;
                    guides.push(edge_guide(GuideOrientation::Vertical, edge, &rect, target));
                }
            }
        }

        if handle.moves_bottom() {
            if let Some((edge, target)) = nearest_edge(rect.bottom(), others, reach, |r| [r.y, r.bottom()]) {
                if edge - rect.y >= min_size {
                    rect.height = edge - rect.y;
                    guides.push(edge_guide(GuideOrientation::Horizontal, edge, &rect, target));
                }
            }
        } else if handle.moves_top() {
            if let Some((edge, target)) = nearest_edge(rect.y, others, reach, |r| [r.y, r.bottom()]) {
                if rect.bottom() - edge >= min_size {
                    rect.height = rect.bottom() - edge;
                    rect.y = edge;
                    guides.push(edge_guide(GuideOrientation::Horizontal, edge, &rect, target));
                }
            }
        }

        SnapResult { rect, guides }
    }

    /// Points sampled along every wall at the configured interval, endpoints included.
    ///
    /// A wall never yields more than [`MAX_SAMPLES_PER_WALL`] interior samples;
    /// the interval widens instead.
    #[must_use]
    pub fn wall_samples(&self, coords: &CoordinateSystem, walls: &[WallSegment]) -> Vec<Point> {
        let interval = coords.inches_to_drawing_units(self.config.wall_sample_interval);
        let mut samples = Vec::new();
        for wall in walls {
            let length = wall.start.distance_to(wall.end);
            if length <= f64::EPSILON || interval <= 0.0 {
                samples.push(wall.start);
                continue;
            }
            #[allow(clippy::cast_precision_loss)]
            let step = interval.max(length / MAX_SAMPLES_PER_WALL as f64);
            let dir = Point::new((wall.end.x - wall.start.x) / length, (wall.end.y - wall.start.y) / length);
            let mut along = 0.0;
            let mut taken = 0;
            while along < length && taken < MAX_SAMPLES_PER_WALL {
                samples.push(Point::new(wall.start.x + dir.x * along, wall.start.y + dir.y * along));
                along += step;
                taken += 1;
            }
            samples.push(wall.end);
        }
        samples
    }
}

/// Center first so ties between same-size rectangles report the center guide.
fn x_features(r: &Rect) -> [f64; 3] {
    [r.x + r.width * 0.5, r.x, r.right()]
}

fn y_features(r: &Rect) -> [f64; 3] {
    [r.y + r.height * 0.5, r.y, r.bottom()]
}

fn best_axis_match<F>(others: &[SnapTarget], reach: f64, features: F, rect: &Rect) -> Option<AxisMatch>
where
    F: Fn(&Rect) -> [f64; 3],
{
    let mine = features(rect);
    let mut best: Option<AxisMatch> = None;
    for target in others {
        let theirs = features(&target.rect);
        for (a, b) in mine.iter().zip(theirs.iter()) {
            let delta = b - a;
            if delta.abs() > reach {
                continue;
            }
            if best.as_ref().is_none_or(|m| delta.abs() < m.delta.abs()) {
                best = Some(AxisMatch { delta, position: *b, other: target.rect, id: target.id });
            }
        }
    }
    best
}

fn entity_guide(orientation: GuideOrientation, m: &AxisMatch, rect: &Rect) -> SnapGuide {
    let (from, to) = span(orientation, rect, &m.other);
    SnapGuide { orientation, position: m.position, from, to, source: GuideSource::Entity(m.id) }
}

fn edge_guide(orientation: GuideOrientation, position: f64, rect: &Rect, target: &SnapTarget) -> SnapGuide {
    let (from, to) = span(orientation, rect, &target.rect);
    SnapGuide { orientation, position, from, to, source: GuideSource::Entity(target.id) }
}

fn wall_guide(orientation: GuideOrientation, sample: Point, rect: &Rect) -> SnapGuide {
    let (position, from, to) = match orientation {
        GuideOrientation::Vertical => (sample.x, rect.y.min(sample.y), rect.bottom().max(sample.y)),
        GuideOrientation::Horizontal => (sample.y, rect.x.min(sample.x), rect.right().max(sample.x)),
    };
    SnapGuide { orientation, position, from, to, source: GuideSource::Wall }
}

/// Extent covering both rectangles along the guide's own axis.
fn span(orientation: GuideOrientation, a: &Rect, b: &Rect) -> (f64, f64) {
    match orientation {
        GuideOrientation::Vertical => (a.y.min(b.y), a.bottom().max(b.bottom())),
        GuideOrientation::Horizontal => (a.x.min(b.x), a.right().max(b.right())),
    }
}

fn nearest_edge<'a, F>(edge: f64, others: &'a [SnapTarget], reach: f64, edges: F) -> Option<(f64, &'a SnapTarget)>
where
    F: Fn(&Rect) -> [f64; 2],
{
    let mut best: Option<(f64, &SnapTarget)> = None;
    for target in others {
        for candidate in edges(&target.rect) {
            let d = (candidate - edge).abs();
            if d <= reach && best.is_none_or(|(b, _)| d < (b - edge).abs()) {
                best = Some((candidate, target));
            }
        }
    }
    best
}

/// Corners, edge midpoints and center of `rect`.
fn feature_points(rect: &Rect) -> [Point; 9] {
    let cx = rect.x + rect.width * 0.5;
    let cy = rect.y + rect.height * 0.5;
    [
        Point::new(cx, cy),
        Point::new(rect.x, rect.y),
        Point::new(cx, rect.y),
        Point::new(rect.right(), rect.y),
        Point::new(rect.right(), cy),
        Point::new(rect.right(), rect.bottom()),
        Point::new(cx, rect.bottom()),
        Point::new(rect.x, rect.bottom()),
        Point::new(rect.x, cy),
    ]
}

fn nearest_feature_sample(rect: &Rect, samples: &[Point], reach: f64) -> Option<(Point, Point)> {
    let mut best: Option<(f64, Point, Point)> = None;
    for feature in feature_points(rect) {
        for sample in samples {
            let d = feature.distance_to(*sample);
            if d <= reach && best.is_none_or(|(b, _, _)| d < b) {
                best = Some((d, feature, *sample));
            }
        }
    }
    best.map(|(_, feature, sample)| (feature, sample))
}
