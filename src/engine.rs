//! Interaction engine: routes pointer, wheel and keyboard input through the
//! gesture state machine and runs the editing commands.
//!
//! DESIGN
//! ======
//! The host owns the `DocStore` and hands it in at every entry point; the
//! engine keeps only interaction state (viewport, selection, history, the
//! in-progress gesture). During a drag the working geometry is written
//! straight into the store so the host can render it; the pre-gesture
//! snapshot rides along in `InputState` and becomes one history entry on
//! commit, or is restored on cancel. Every entry point returns the
//! `Action`s the host should react to.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::config::EngineConfig;
use crate::consts::{COMMIT_EPSILON, FIT_MARGIN_PX, WHEEL_ZOOM_BASE};
use crate::coords::{CoordinateSystem, Point, Rect, Size};
use crate::doc::{BackingPlacement, BackingType, DocStore, EntityId, PlacementStatus};
use crate::hit::{Hit, HitPart, ResizeHandle, hit_test};
use crate::history::{HistoryManager, Snapshot};
use crate::input::{Button, DragSeed, InputState, Key, Modifiers, PointerEvent, PointerKind, Tool, WheelDelta};
use crate::keys::{Shortcut, shortcut_for};
use crate::manipulate::{
    self, Alignment, DistributeAxis, duplicate_placements, geometry_changed, pointer_angle_deg, quantize_rotation,
    resize_rect,
};
use crate::measure::{MeasureOutcome, MeasurePhase};
use crate::overlay::{Overlay, OverlayContext, build_overlay};
use crate::project::{ProjectError, ProjectFile};
use crate::selection::SelectionModel;
use crate::snap::{SnapConfig, SnapEngine, SnapGuide, SnapTarget, WallSegment};
use crate::viewport::Viewport;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A new placement was added to the store.
    PlacementCreated(EntityId),
    /// Existing placements changed geometry, status or orientation.
    PlacementsUpdated(Vec<EntityId>),
    /// Placements and/or measurements were removed.
    EntitiesDeleted(Vec<EntityId>),
    /// The placement list was replaced wholesale (undo, redo, project load).
    DocumentReplaced,
    MeasurementCreated(EntityId),
    SelectionChanged,
    /// Ctrl/Cmd+S: the host should call [`EngineCore::save_project`] and persist the result.
    SaveRequested,
    /// Ctrl/Cmd+O: the host should pick a file and call [`EngineCore::load_project`].
    OpenRequested,
    SetCursor(String),
    RenderNeeded,
}

/// Interaction state and command surface for one open drawing.
#[derive(Debug, Clone)]
pub struct EngineCore {
    pub config: EngineConfig,
    pub coords: CoordinateSystem,
    pub viewport: Viewport,
    pub selection: SelectionModel,
    pub input: InputState,
    pub history: HistoryManager,
    pub snap: SnapEngine,
    tool: Tool,
    /// Backing type used by the Add tool.
    add_type: BackingType,
    clipboard: Vec<BackingPlacement>,
    paste_count: u32,
    walls: Vec<WallSegment>,
    /// Snap points sampled from `walls`, refreshed when walls or snap settings change.
    wall_samples: Vec<Point>,
    guides: Vec<SnapGuide>,
    drawing_url: Option<String>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            coords: CoordinateSystem::new(config.inches_per_unit),
            viewport: Viewport::new(config.min_zoom, config.max_zoom),
            selection: SelectionModel::new(),
            input: InputState::Idle,
            history: HistoryManager::new(config.history_capacity),
            snap: SnapEngine::new(config.snap_config()),
            tool: Tool::Select,
            add_type: BackingType::default(),
            clipboard: Vec::new(),
            paste_count: 0,
            walls: Vec::new(),
            wall_samples: Vec::new(),
            guides: Vec::new(),
            drawing_url: None,
            config,
        }
    }

    // --- Data inputs ---

    /// Record the on-stage bounds of the rendered drawing and its extent in drawing units.
    pub fn set_surface_bounds(&mut self, surface: Rect, drawing_extent: Size) {
        self.coords.set_surface(surface, drawing_extent);
    }

    pub fn set_stage_size(&mut self, stage: Size) {
        self.viewport.set_stage_size(stage);
    }

    /// Wall segments (drawing units) used by wall snapping.
    pub fn set_walls(&mut self, walls: Vec<WallSegment>) {
        self.walls = walls;
        self.refresh_wall_samples();
    }

    pub fn set_snap_config(&mut self, config: SnapConfig) {
        self.snap.set_config(config);
        self.refresh_wall_samples();
    }

    fn refresh_wall_samples(&mut self) {
        self.wall_samples = self.snap.wall_samples(&self.coords, &self.walls);
        tracing::debug!(walls = self.walls.len(), samples = self.wall_samples.len(), "wall samples refreshed");
    }

    /// Set the active tool. A gesture already in progress finishes under the old tool.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        if !self.input.is_dragging() {
            self.input = idle_state(tool);
        }
    }

    pub fn set_add_type(&mut self, backing_type: BackingType) {
        self.add_type = backing_type;
    }

    pub fn set_drawing_url(&mut self, url: Option<String>) {
        self.drawing_url = url;
    }

    // --- Queries ---

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Snap guides for the gesture in progress.
    #[must_use]
    pub fn guides(&self) -> &[SnapGuide] {
        &self.guides
    }

    #[must_use]
    pub fn clipboard(&self) -> &[BackingPlacement] {
        &self.clipboard
    }

    #[must_use]
    pub fn drawing_url(&self) -> Option<&str> {
        self.drawing_url.as_deref()
    }

    /// Overlay geometry for the current frame.
    #[must_use]
    pub fn overlay(&self, doc: &DocStore) -> Overlay {
        let preview = match &self.input {
            InputState::Measuring(phase) => phase.preview(),
            _ => None,
        };
        let ctx = OverlayContext {
            coords: &self.coords,
            viewport: &self.viewport,
            selection: &self.selection,
            guides: &self.guides,
            preview,
        };
        build_overlay(doc, &ctx)
    }

    // --- Input events ---

    /// Dispatch an adapter-layer pointer event.
    pub fn handle_pointer(&mut self, doc: &mut DocStore, event: PointerEvent) -> Vec<Action> {
        match event.kind {
            PointerKind::Down => self.on_pointer_down(doc, event.screen, event.button, event.modifiers),
            PointerKind::Move => self.on_pointer_move(doc, event.screen, event.modifiers),
            PointerKind::Up => self.on_pointer_up(doc, event.screen, event.button, event.modifiers),
        }
    }

    pub fn on_pointer_down(
        &mut self,
        doc: &mut DocStore,
        screen_pt: Point,
        button: Button,
        modifiers: Modifiers,
    ) -> Vec<Action> {
        if self.input.is_dragging() {
            return Vec::new();
        }
        if button == Button::Middle || self.tool == Tool::Pan {
            let resume = match &self.input {
                InputState::Measuring(phase) => Some(*phase),
                _ => None,
            };
            self.input = InputState::Panning { last_screen: screen_pt, resume };
            return vec![Action::SetCursor("grabbing".into())];
        }
        if button != Button::Primary {
            return Vec::new();
        }

        let world = self.coords.screen_to_drawing(&self.viewport, screen_pt);
        match self.tool {
            Tool::Measure => self.measure_click(doc, world),
            Tool::Select | Tool::Add | Tool::Pan => {
                match hit_test(world, doc, &self.coords, &self.viewport, &self.selection) {
                    Some(Hit { id, part: HitPart::RotateHandle }) => self.begin_rotate(doc, id, world),
                    Some(Hit { id, part: HitPart::ResizeHandle(handle) }) => self.begin_resize(doc, id, handle),
                    Some(Hit { id, part: HitPart::Body }) => self.press_body(doc, id, world, modifiers),
                    Some(Hit { id, part: HitPart::Measurement }) => self.press_measurement(id, modifiers),
                    None if self.tool == Tool::Add => self.add_at(doc, world),
                    None => {
                        let mut actions = Vec::new();
                        if !modifiers.shift && self.selection.clear() {
                            actions.push(Action::SelectionChanged);
                            actions.push(Action::RenderNeeded);
                        }
                        self.input = InputState::Panning { last_screen: screen_pt, resume: None };
                        actions
                    }
                }
            }
        }
    }

    pub fn on_pointer_move(&mut self, doc: &mut DocStore, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let world = self.coords.screen_to_drawing(&self.viewport, screen_pt);
        let mut input = std::mem::take(&mut self.input);
        let actions = match &mut input {
            InputState::Idle => vec![Action::SetCursor(self.hover_cursor(doc, world).into())],
            InputState::Panning { last_screen, .. } => {
                let delta = screen_pt - *last_screen;
                *last_screen = screen_pt;
                self.viewport.pan_by(delta, &self.coords.surface());
                vec![Action::RenderNeeded]
            }
            InputState::DraggingMove { anchor, origin, seeds, .. } => {
                self.apply_move(doc, *anchor, *origin, seeds, world);
                vec![Action::RenderNeeded]
            }
            InputState::DraggingResize { handle, seed, .. } => {
                self.apply_resize(doc, *handle, seed, world);
                vec![Action::RenderNeeded]
            }
            InputState::DraggingRotate { seed, center, start_angle, .. } => {
                self.apply_rotate(doc, seed, *center, *start_angle, world, modifiers);
                vec![Action::RenderNeeded]
            }
            InputState::Measuring(phase) => {
                if phase.hover(world) {
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
        };
        self.input = input;
        actions
    }

    /// Finish the current gesture. Releasing anywhere commits the last candidate.
    pub fn on_pointer_up(
        &mut self,
        doc: &mut DocStore,
        _screen_pt: Point,
        _button: Button,
        _modifiers: Modifiers,
    ) -> Vec<Action> {
        let input = std::mem::take(&mut self.input);
        let actions = match input {
            InputState::Idle => Vec::new(),
            InputState::Measuring(phase) => {
                self.input = InputState::Measuring(phase);
                return Vec::new();
            }
            InputState::Panning { resume: Some(phase), .. } => {
                self.input = InputState::Measuring(phase);
                return vec![Action::SetCursor("default".into())];
            }
            InputState::Panning { resume: None, .. } => vec![Action::SetCursor("default".into())],
            InputState::DraggingMove { seeds, before, .. } => self.commit_gesture(doc, &seeds, before, "move"),
            InputState::DraggingResize { seed, before, .. } => self.commit_gesture(doc, &[seed], before, "resize"),
            InputState::DraggingRotate { seed, before, .. } => self.commit_gesture(doc, &[seed], before, "rotate"),
        };
        self.input = idle_state(self.tool);
        actions
    }

    /// Ctrl/Cmd + wheel zooms at the cursor; a plain wheel pans.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.command() {
            let factor = WHEEL_ZOOM_BASE.powf(-delta.dy / 100.0);
            if self.viewport.zoom_at(screen_pt, factor) {
                return vec![Action::RenderNeeded];
            }
            return Vec::new();
        }
        self.viewport.pan_by(Point::new(-delta.dx, -delta.dy), &self.coords.surface());
        vec![Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, doc: &mut DocStore, key: Key, modifiers: Modifiers) -> Vec<Action> {
        let Some(shortcut) = shortcut_for(&key, modifiers) else {
            return Vec::new();
        };
        if self.input.is_dragging() && shortcut != Shortcut::Cancel {
            return Vec::new();
        }
        match shortcut {
            Shortcut::Undo => self.undo(doc),
            Shortcut::Redo => self.redo(doc),
            Shortcut::Copy => self.copy(doc),
            Shortcut::Paste => self.paste(doc),
            Shortcut::Duplicate => self.duplicate(doc),
            Shortcut::Delete => self.delete_selected(doc),
            Shortcut::Save => vec![Action::SaveRequested],
            Shortcut::Open => vec![Action::OpenRequested],
            Shortcut::Cancel => self.cancel(doc),
            Shortcut::SelectAll => self.select_all(doc),
            Shortcut::Nudge { dx, dy } => {
                let grid = self.snap.grid_units(&self.coords);
                let step = if modifiers.shift && grid > 0.0 { grid } else { 1.0 };
                self.nudge(doc, Point::new(f64::from(dx) * step, f64::from(dy) * step))
            }
        }
    }

    /// Escape: abandon any gesture, restoring seeded geometry, and clear the selection.
    pub fn cancel(&mut self, doc: &mut DocStore) -> Vec<Action> {
        let input = std::mem::take(&mut self.input);
        if input.is_dragging() {
            restore_seeds(doc, input.seeds(), &self.coords);
            tracing::debug!(state = input.name(), "gesture cancelled");
        }
        self.guides.clear();
        self.input = idle_state(self.tool);
        self.selection.clear();
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    // --- Gestures ---

    fn press_body(&mut self, doc: &DocStore, id: EntityId, world: Point, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.shift {
            self.selection.toggle(id);
            return vec![Action::SelectionChanged, Action::RenderNeeded];
        }
        let mut actions = Vec::new();
        if !self.selection.contains(&id) {
            self.selection.select_only(id);
            actions.push(Action::SelectionChanged);
        }
        let seeds: Vec<DragSeed> = self
            .selection
            .placement_ids(doc)
            .iter()
            .filter_map(|sid| doc.get(sid))
            .map(|p| DragSeed::of(p, &self.coords))
            .collect();
        self.input = InputState::DraggingMove { anchor: id, origin: world, seeds, before: doc.snapshot() };
        tracing::debug!(state = self.input.name(), %id, "gesture started");
        actions.push(Action::SetCursor("move".into()));
        actions.push(Action::RenderNeeded);
        actions
    }

    fn press_measurement(&mut self, id: EntityId, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.shift {
            self.selection.toggle(id);
        } else {
            self.selection.select_only(id);
        }
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    fn begin_resize(&mut self, doc: &DocStore, id: EntityId, handle: ResizeHandle) -> Vec<Action> {
        let Some(placement) = doc.get(&id) else {
            return Vec::new();
        };
        let seed = DragSeed::of(placement, &self.coords);
        self.input = InputState::DraggingResize { handle, seed, before: doc.snapshot() };
        tracing::debug!(state = self.input.name(), %id, ?handle, "gesture started");
        vec![Action::SetCursor(handle.cursor().into())]
    }

    fn begin_rotate(&mut self, doc: &DocStore, id: EntityId, world: Point) -> Vec<Action> {
        let Some(placement) = doc.get(&id) else {
            return Vec::new();
        };
        let seed = DragSeed::of(placement, &self.coords);
        let center = seed.rect.center();
        let start_angle = pointer_angle_deg(center, world).unwrap_or(placement.orientation);
        self.input = InputState::DraggingRotate { seed, center, start_angle, before: doc.snapshot() };
        tracing::debug!(state = self.input.name(), %id, "gesture started");
        vec![Action::SetCursor("grabbing".into())]
    }

    fn apply_move(&mut self, doc: &mut DocStore, anchor: EntityId, origin: Point, seeds: &[DragSeed], world: Point) {
        let Some(anchor_seed) = seeds.iter().find(|s| s.id == anchor) else {
            return;
        };
        // Snap what is drawn: the rotated footprint, not the unrotated rectangle.
        let visual = anchor_seed.bounds();
        let candidate = visual.translated(world - origin);
        let targets = snap_targets(doc, seeds, &self.coords);
        let snapped = self.snap.snap_move(&self.coords, candidate, &targets, &self.wall_samples);
        let delta = Point::new(snapped.rect.x - visual.x, snapped.rect.y - visual.y);
        for seed in seeds {
            if let Some(p) = doc.get_mut(&seed.id) {
                p.set_rect(seed.rect.translated(delta), &self.coords);
            }
        }
        self.guides = snapped.guides;
    }

    fn apply_resize(&mut self, doc: &mut DocStore, handle: ResizeHandle, seed: &DragSeed, world: Point) {
        let grid = self.snap.grid_units(&self.coords);
        let min_size = self.coords.inches_to_drawing_units(self.config.min_dimension_in);
        let mut rect = resize_rect(seed.rect, seed.orientation, handle, world, grid, min_size);
        self.guides.clear();
        if seed.orientation == 0.0 {
            let targets = snap_targets(doc, std::slice::from_ref(seed), &self.coords);
            let snapped = self.snap.snap_resize(&self.coords, rect, handle, min_size, &targets);
            rect = snapped.rect;
            self.guides = snapped.guides;
        }
        if let Some(p) = doc.get_mut(&seed.id) {
            p.set_rect(rect, &self.coords);
        }
    }

    fn apply_rotate(
        &self,
        doc: &mut DocStore,
        seed: &DragSeed,
        center: Point,
        start_angle: f64,
        world: Point,
        modifiers: Modifiers,
    ) {
        let Some(angle) = pointer_angle_deg(center, world) else {
            return;
        };
        let raw = seed.orientation + angle - start_angle;
        let next = quantize_rotation(raw, self.config.rotation_mode, modifiers.shift);
        if let Some(p) = doc.get_mut(&seed.id) {
            p.orientation = next;
        }
    }

    /// Keep the gesture only if something moved more than the commit threshold.
    fn commit_gesture(
        &mut self,
        doc: &mut DocStore,
        seeds: &[DragSeed],
        before: Vec<BackingPlacement>,
        label: &str,
    ) -> Vec<Action> {
        self.guides.clear();
        let changed: Vec<EntityId> = seeds
            .iter()
            .filter(|seed| {
                doc.get(&seed.id).is_some_and(|p| {
                    geometry_changed(&p.rect(&self.coords), &seed.rect)
                        || (p.orientation - seed.orientation).abs() > COMMIT_EPSILON
                })
            })
            .map(|seed| seed.id)
            .collect();

        if changed.is_empty() {
            restore_seeds(doc, seeds, &self.coords);
            return vec![Action::SetCursor("default".into()), Action::RenderNeeded];
        }
        for id in &changed {
            if let Some(p) = doc.get_mut(id) {
                p.mark_modified();
            }
        }
        self.history.push(Snapshot::new(before, label));
        tracing::debug!(label, count = changed.len(), "gesture committed");
        vec![Action::PlacementsUpdated(changed), Action::SetCursor("default".into()), Action::RenderNeeded]
    }

    fn measure_click(&mut self, doc: &mut DocStore, world: Point) -> Vec<Action> {
        let phase = match &self.input {
            InputState::Measuring(phase) => *phase,
            _ => MeasurePhase::StartPending,
        };
        let (next, outcome) = phase.click(world);
        self.input = InputState::Measuring(next);
        match outcome {
            MeasureOutcome::Started | MeasureOutcome::Discarded => vec![Action::RenderNeeded],
            MeasureOutcome::Committed(measurement) => {
                let id = measurement.id();
                tracing::debug!(%id, distance = measurement.distance(), "measurement committed");
                doc.add_measurement(measurement);
                vec![Action::MeasurementCreated(id), Action::RenderNeeded]
            }
        }
    }

    fn add_at(&mut self, doc: &mut DocStore, world: Point) -> Vec<Action> {
        let grid_in = if self.snap.config().grid_enabled { self.snap.config().grid_size } else { 0.0 };
        let origin = self.coords.snap_to_grid(world, grid_in);
        let placement = BackingPlacement::with_defaults(self.add_type, origin);
        let id = placement.id;
        let before = doc.snapshot();
        doc.insert(placement);
        self.history.push(Snapshot::new(before, "add"));
        self.selection.select_only(id);
        tracing::debug!(%id, x = origin.x, y = origin.y, "placement added");
        vec![Action::PlacementCreated(id), Action::SelectionChanged, Action::RenderNeeded]
    }

    fn hover_cursor(&self, doc: &DocStore, world: Point) -> &'static str {
        if self.tool == Tool::Pan {
            return "grab";
        }
        if self.tool == Tool::Measure {
            return "crosshair";
        }
        match hit_test(world, doc, &self.coords, &self.viewport, &self.selection) {
            Some(Hit { part: HitPart::ResizeHandle(handle), .. }) => handle.cursor(),
            Some(Hit { part: HitPart::RotateHandle, .. }) => "grab",
            Some(Hit { part: HitPart::Body, .. }) => "move",
            Some(Hit { part: HitPart::Measurement, .. }) => "pointer",
            None if self.tool == Tool::Add => "copy",
            None => "default",
        }
    }

    // --- Commands ---

    pub fn undo(&mut self, doc: &mut DocStore) -> Vec<Action> {
        let Some(snapshot) = self.history.undo(doc.placements()) else {
            return Vec::new();
        };
        tracing::debug!(label = %snapshot.label, "undo");
        self.replace_placements(doc, snapshot.placements)
    }

    pub fn redo(&mut self, doc: &mut DocStore) -> Vec<Action> {
        let Some(snapshot) = self.history.redo() else {
            return Vec::new();
        };
        tracing::debug!(label = %snapshot.label, "redo");
        self.replace_placements(doc, snapshot.placements)
    }

    fn replace_placements(&mut self, doc: &mut DocStore, placements: Vec<BackingPlacement>) -> Vec<Action> {
        doc.load_snapshot(placements);
        self.selection.retain_existing(doc);
        vec![Action::DocumentReplaced, Action::SelectionChanged, Action::RenderNeeded]
    }

    /// Align the selected placements. Needs at least two.
    pub fn align(&mut self, doc: &mut DocStore, alignment: Alignment) -> Vec<Action> {
        let ids = self.selection.placement_ids(doc);
        if ids.len() < 2 {
            return Vec::new();
        }
        let before = doc.snapshot();
        if !manipulate::align(doc, &self.coords, &ids, alignment) {
            return Vec::new();
        }
        self.history.push(Snapshot::new(before, "align"));
        tracing::debug!(?alignment, count = ids.len(), "aligned");
        vec![Action::PlacementsUpdated(ids), Action::RenderNeeded]
    }

    /// Distribute the selected placements evenly. Needs at least three.
    pub fn distribute(&mut self, doc: &mut DocStore, axis: DistributeAxis) -> Vec<Action> {
        let ids = self.selection.placement_ids(doc);
        if ids.len() < 3 {
            return Vec::new();
        }
        let before = doc.snapshot();
        if !manipulate::distribute(doc, &self.coords, &ids, axis) {
            return Vec::new();
        }
        self.history.push(Snapshot::new(before, "distribute"));
        tracing::debug!(?axis, count = ids.len(), "distributed");
        vec![Action::PlacementsUpdated(ids), Action::RenderNeeded]
    }

    /// Clone the selected placements in place, offset by the duplicate offset.
    pub fn duplicate(&mut self, doc: &mut DocStore) -> Vec<Action> {
        let sources = self.selected_placements(doc);
        let copies = duplicate_placements(&sources, self.config.duplicate_offset);
        self.insert_copies(doc, copies, "duplicate")
    }

    /// Put clones of the selected placements on the clipboard.
    pub fn copy(&mut self, doc: &DocStore) -> Vec<Action> {
        let sources = self.selected_placements(doc);
        if sources.is_empty() {
            return Vec::new();
        }
        tracing::debug!(count = sources.len(), "copied to clipboard");
        self.clipboard = sources;
        self.paste_count = 0;
        Vec::new()
    }

    /// Insert the clipboard. Each paste lands one offset further than the last.
    pub fn paste(&mut self, doc: &mut DocStore) -> Vec<Action> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        self.paste_count += 1;
        let offset = self.config.duplicate_offset * f64::from(self.paste_count);
        let copies = duplicate_placements(&self.clipboard, offset);
        self.insert_copies(doc, copies, "paste")
    }

    fn insert_copies(&mut self, doc: &mut DocStore, copies: Vec<BackingPlacement>, label: &str) -> Vec<Action> {
        if copies.is_empty() {
            return Vec::new();
        }
        let before = doc.snapshot();
        let ids: Vec<EntityId> = copies.iter().map(|p| p.id).collect();
        for copy in copies {
            doc.insert(copy);
        }
        self.history.push(Snapshot::new(before, label));
        self.selection.replace(ids.iter().copied());
        tracing::debug!(label, count = ids.len(), "placements inserted");
        let mut actions: Vec<Action> = ids.into_iter().map(Action::PlacementCreated).collect();
        actions.push(Action::SelectionChanged);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Remove the selected placements and measurements.
    pub fn delete_selected(&mut self, doc: &mut DocStore) -> Vec<Action> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        let before = doc.snapshot();
        let mut removed = Vec::new();
        let mut removed_placement = false;
        for id in self.selection.ids() {
            if doc.remove(id).is_some() {
                removed_placement = true;
                removed.push(*id);
            } else if doc.remove_measurement(id).is_some() {
                removed.push(*id);
            }
        }
        if removed_placement {
            self.history.push(Snapshot::new(before, "delete"));
        }
        self.selection.clear();
        tracing::debug!(count = removed.len(), "entities deleted");
        vec![Action::EntitiesDeleted(removed), Action::SelectionChanged, Action::RenderNeeded]
    }

    pub fn select_all(&mut self, doc: &DocStore) -> Vec<Action> {
        self.selection.select_all(doc);
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    pub fn clear_selection(&mut self) -> Vec<Action> {
        if self.selection.clear() {
            return vec![Action::SelectionChanged, Action::RenderNeeded];
        }
        Vec::new()
    }

    /// Move the selected placements by `delta` drawing units.
    pub fn nudge(&mut self, doc: &mut DocStore, delta: Point) -> Vec<Action> {
        let ids = self.selection.placement_ids(doc);
        let before = doc.snapshot();
        if !manipulate::translate(doc, &ids, delta) {
            return Vec::new();
        }
        self.history.push(Snapshot::new(before, "nudge"));
        vec![Action::PlacementsUpdated(ids), Action::RenderNeeded]
    }

    /// Set the orientation of every selected placement, quantized for the rotation profile.
    pub fn set_orientation(&mut self, doc: &mut DocStore, degrees: f64) -> Vec<Action> {
        let ids = self.selection.placement_ids(doc);
        let target = quantize_rotation(degrees, self.config.rotation_mode, false);
        let before = doc.snapshot();
        let mut changed = Vec::new();
        for id in &ids {
            if let Some(p) = doc.get_mut(id) {
                if (p.orientation - target).abs() > f64::EPSILON {
                    p.orientation = target;
                    p.mark_modified();
                    changed.push(*id);
                }
            }
        }
        if changed.is_empty() {
            return Vec::new();
        }
        self.history.push(Snapshot::new(before, "rotate"));
        vec![Action::PlacementsUpdated(changed), Action::RenderNeeded]
    }

    /// Rotate every selected placement a quarter turn clockwise.
    pub fn rotate_selection_90(&mut self, doc: &mut DocStore) -> Vec<Action> {
        let ids = self.selection.placement_ids(doc);
        let before = doc.snapshot();
        if !manipulate::rotate_by(doc, &ids, 90.0, self.config.rotation_mode) {
            return Vec::new();
        }
        self.history.push(Snapshot::new(before, "rotate"));
        vec![Action::PlacementsUpdated(ids), Action::RenderNeeded]
    }

    /// Mark the selected placements as reviewed.
    pub fn approve_selection(&mut self, doc: &mut DocStore) -> Vec<Action> {
        let ids = self.selection.placement_ids(doc);
        let before = doc.snapshot();
        let mut changed = Vec::new();
        for id in &ids {
            if let Some(p) = doc.get_mut(id) {
                if p.status != PlacementStatus::Approved {
                    p.approve();
                    changed.push(*id);
                }
            }
        }
        if changed.is_empty() {
            return Vec::new();
        }
        self.history.push(Snapshot::new(before, "approve"));
        vec![Action::PlacementsUpdated(changed), Action::RenderNeeded]
    }

    fn selected_placements(&self, doc: &DocStore) -> Vec<BackingPlacement> {
        self.selection.placement_ids(doc).iter().filter_map(|id| doc.get(id)).cloned().collect()
    }

    // --- Project ---

    /// Replace the document with a parsed project file.
    ///
    /// Nothing is mutated unless the whole file is accepted. On success the
    /// selection and history are cleared.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError`] when the file is not valid JSON, has no
    /// `backings` array, or contains an invalid placement.
    pub fn load_project(&mut self, doc: &mut DocStore, text: &str) -> Result<Vec<Action>, ProjectError> {
        let project = ProjectFile::from_json(text).inspect_err(|e| tracing::warn!(error = %e, "project rejected"))?;
        let count = project.backings.len();
        restore_seeds(doc, self.input.seeds(), &self.coords);
        doc.load_snapshot(project.backings);
        self.drawing_url = project.drawing_url;
        self.selection.clear();
        self.history.clear();
        self.guides.clear();
        self.input = idle_state(self.tool);
        tracing::info!(count, version = %project.version, "project loaded");
        Ok(vec![Action::DocumentReplaced, Action::SelectionChanged, Action::RenderNeeded])
    }

    /// Serialize the current placements as a project file.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Serialize`] if serialization fails.
    pub fn save_project(&self, doc: &DocStore) -> Result<String, ProjectError> {
        let json = ProjectFile::new(doc.snapshot(), self.drawing_url.clone()).to_json()?;
        tracing::info!(count = doc.len(), bytes = json.len(), "project saved");
        Ok(json)
    }

    // --- Viewport ---

    /// Fit the drawing surface (or, before it loads, the placements) in the stage.
    pub fn fit_to_view(&mut self, doc: &DocStore) -> Vec<Action> {
        let surface = self.coords.surface();
        let content = if surface.is_degenerate() { doc.extent(&self.coords).unwrap_or_default() } else { surface };
        self.viewport.fit_to_view(&content, FIT_MARGIN_PX);
        vec![Action::RenderNeeded]
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        if self.viewport.zoom_in() { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        if self.viewport.zoom_out() { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    pub fn reset_view(&mut self) -> Vec<Action> {
        self.viewport.reset();
        vec![Action::RenderNeeded]
    }
}

fn idle_state(tool: Tool) -> InputState {
    if tool == Tool::Measure { InputState::Measuring(MeasurePhase::StartPending) } else { InputState::Idle }
}

/// Every placement not being dragged, as snap targets.
fn snap_targets(doc: &DocStore, dragged: &[DragSeed], coords: &CoordinateSystem) -> Vec<SnapTarget> {
    doc.placements()
        .iter()
        .filter(|p| !dragged.iter().any(|s| s.id == p.id))
        .map(|p| SnapTarget { id: p.id, rect: p.bounds(coords) })
        .collect()
}

fn restore_seeds(doc: &mut DocStore, seeds: &[DragSeed], coords: &CoordinateSystem) {
    for seed in seeds {
        if let Some(p) = doc.get_mut(&seed.id) {
            p.set_rect(seed.rect, coords);
            p.orientation = seed.orientation;
        }
    }
}
