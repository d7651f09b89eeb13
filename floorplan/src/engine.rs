use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adjacency::{self, Adjacency};
use crate::geometry::bounds_of;
use crate::hit::{Hit, hit_room, hit_test};
use crate::input::{Button, InputState, Key, Modifiers, SessionState, Tool, UiState, WheelDelta};
use crate::layout;
use crate::model::{Annotation, AnnotationId, Placement, Position, Room, RoomId, RoomStore};
use crate::scene::{self, PlanView, Scene};
use crate::settings::PlanSettings;
use crate::viewport::{Point, Viewport};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Placement changed and should be persisted. Emitted once per drag and on auto-arrange.
    PlacementCommitted(Placement),
    AnnotationCreated(Annotation),
    AnnotationUpdated(Annotation),
    AnnotationDeleted { id: AnnotationId },
    /// A room's width and depth were swapped.
    RoomRotated { id: RoomId, width: f64, depth: f64 },
    SetCursor(String),
    RenderNeeded,
}

/// Which projection `scene()` emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Plan,
    Isometric,
}

/// One plan session: rooms, positions, viewport and the gesture state machine.
///
/// Every mutation that moves or reshapes a room re-runs adjacency detection
/// before returning, so `adjacency()` and `scene()` always reflect the current
/// placement. Intermediate drag positions are visible locally; the placement
/// is published through `Action::PlacementCommitted` only on release.
pub struct EngineCore {
    pub rooms: RoomStore,
    pub placement: Placement,
    pub viewport: Viewport,
    pub ui: UiState,
    pub input: InputState,
    pub annotations: Vec<Annotation>,
    pub settings: PlanSettings,
    pub view_mode: ViewMode,
    pub viewport_width: f64,
    pub viewport_height: f64,
    adjacency: Adjacency,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_settings(PlanSettings::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty session using `settings`. The snap grid starts at `settings.grid_size`.
    #[must_use]
    pub fn with_settings(settings: PlanSettings) -> Self {
        Self {
            rooms: RoomStore::new(),
            placement: Placement::new(),
            viewport: Viewport::with_grid(settings.grid_size),
            ui: UiState::default(),
            input: InputState::default(),
            annotations: Vec::new(),
            settings,
            view_mode: ViewMode::default(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            adjacency: Adjacency::default(),
        }
    }

    // --- Data inputs ---

    /// Replace the room list and lay out every room without a cached position.
    ///
    /// Emits `PlacementCommitted` when any position had to be computed.
    pub fn load(&mut self, rooms: Vec<Room>, cached: Option<&Placement>) -> Vec<Action> {
        self.input = InputState::Idle;
        self.rooms.load(rooms);
        self.placement = layout::plan(self.rooms.rooms(), cached, &self.settings);
        if self.ui.selected_room.is_some_and(|id| self.rooms.get(&id).is_none()) {
            self.ui.selected_room = None;
        }
        self.recompute_adjacency();

        let computed = self.rooms.rooms().iter().any(|room| !cached.is_some_and(|c| c.contains(&room.id)));
        info!(rooms = self.rooms.len(), computed, "plan loaded");
        if computed {
            vec![Action::PlacementCommitted(self.placement.clone()), Action::RenderNeeded]
        } else {
            vec![Action::RenderNeeded]
        }
    }

    /// Replace all annotations.
    pub fn load_annotations(&mut self, annotations: Vec<Annotation>) {
        self.annotations = annotations;
        self.ui.selected_annotation = None;
    }

    /// Discard every position and lay the whole plan out again.
    pub fn auto_arrange(&mut self) -> Vec<Action> {
        self.input = InputState::Idle;
        self.placement = layout::arrange(self.rooms.rooms(), &self.settings);
        self.recompute_adjacency();
        info!(rooms = self.rooms.len(), edges = self.adjacency.len(), "auto-arranged plan");
        vec![Action::PlacementCommitted(self.placement.clone()), Action::RenderNeeded]
    }

    /// Swap a room's width and depth in place. Its position does not change.
    pub fn rotate_room(&mut self, id: &RoomId) -> Vec<Action> {
        let Some(room) = self.rooms.get_mut(id) else {
            return vec![];
        };
        room.rotate();
        let (width, depth) = (room.width, room.depth);
        self.recompute_adjacency();
        info!(room = %id, width, depth, "room rotated");
        vec![Action::RoomRotated { id: *id, width, depth }, Action::RenderNeeded]
    }

    // --- Annotations ---

    /// Pin a new note at a scene position.
    pub fn add_annotation(&mut self, position: Point, text: impl Into<String>) -> Vec<Action> {
        let annotation = Annotation::new(position, text);
        self.ui.selected_annotation = Some(annotation.id);
        self.annotations.push(annotation.clone());
        vec![Action::AnnotationCreated(annotation), Action::RenderNeeded]
    }

    /// Change a note's text and/or color. Unknown ids are ignored.
    pub fn update_annotation(&mut self, id: &AnnotationId, text: Option<String>, color: Option<String>) -> Vec<Action> {
        let Some(annotation) = self.annotations.iter_mut().find(|a| a.id == *id) else {
            return vec![];
        };
        if let Some(text) = text {
            annotation.text = text;
        }
        if let Some(color) = color {
            annotation.color = color;
        }
        vec![Action::AnnotationUpdated(annotation.clone()), Action::RenderNeeded]
    }

    /// Remove a note. Unknown ids are ignored.
    pub fn delete_annotation(&mut self, id: &AnnotationId) -> Vec<Action> {
        let before = self.annotations.len();
        self.annotations.retain(|a| a.id != *id);
        if self.annotations.len() == before {
            return vec![];
        }
        if self.ui.selected_annotation == Some(*id) {
            self.ui.selected_annotation = None;
        }
        vec![Action::AnnotationDeleted { id: *id }, Action::RenderNeeded]
    }

    // --- Tool / view settings ---

    /// Set the active tool. Leaving measure mode clears the measurement.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let mut actions = self.finish_gesture();
        if self.ui.tool == Tool::Measure && tool != Tool::Measure {
            self.ui.measurement.clear();
        }
        self.ui.tool = tool;
        actions.push(Action::SetCursor(cursor_for(tool).to_owned()));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Switch `tool` on, or back to `Pan` if it is already on.
    pub fn toggle_tool(&mut self, tool: Tool) -> Vec<Action> {
        let next = if self.ui.tool == tool { Tool::Pan } else { tool };
        self.set_tool(next)
    }

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.viewport.snap_to_grid = enabled;
    }

    pub fn set_grid_size(&mut self, grid_size: f64) {
        self.viewport.set_grid_size(grid_size);
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) -> Vec<Action> {
        self.view_mode = mode;
        vec![Action::RenderNeeded]
    }

    /// Update the host surface size in CSS pixels. Used as the centering anchor.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Zoom 1, pan zero. Placement is untouched.
    pub fn reset_view(&mut self) -> Vec<Action> {
        self.viewport.reset();
        vec![Action::RenderNeeded]
    }

    /// Zoom 1 with the plan's bounding box centered on the canvas anchor.
    pub fn center_view(&mut self) -> Vec<Action> {
        let bounds = bounds_of(self.rooms.rooms(), &self.placement, self.settings.scale);
        self.viewport.center_on(&bounds, self.anchor());
        vec![Action::RenderNeeded]
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let mut actions = self.finish_gesture();
        match button {
            Button::Secondary => {}
            Button::Middle => actions.extend(self.begin_pan(screen_pt)),
            Button::Primary => {
                let scene_pt = self.viewport.screen_to_scene(screen_pt);
                match self.ui.tool {
                    Tool::Pan => {
                        self.select(self.hit(scene_pt));
                        actions.extend(self.begin_pan(screen_pt));
                    }
                    Tool::Edit => actions.extend(self.begin_edit(scene_pt)),
                    Tool::Measure => {
                        if self.ui.measurement.len() >= 2 {
                            self.ui.measurement.clear();
                        }
                        self.ui.measurement.push(scene_pt);
                        actions.push(Action::RenderNeeded);
                    }
                    Tool::Annotate => {
                        actions.extend(self.add_annotation(scene_pt, String::new()));
                        self.ui.tool = Tool::Pan;
                        actions.push(Action::SetCursor(cursor_for(Tool::Pan).to_owned()));
                    }
                }
            }
        }
        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        match self.input {
            InputState::Panning { last_screen } => {
                self.viewport.pan_by(screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                self.input = InputState::Panning { last_screen: screen_pt };
                vec![Action::RenderNeeded]
            }
            InputState::DraggingRoom { id, grab_offset, origin, .. } => {
                let scene_pt = self.viewport.screen_to_scene(screen_pt);
                let snapped = self.viewport.snap_point(Point::new(scene_pt.x - grab_offset.x, scene_pt.y - grab_offset.y));
                let candidate = Position::new(snapped.x.max(0.0), snapped.y.max(0.0));
                self.input = InputState::DraggingRoom { id, grab_offset, origin, last_valid: Some(candidate) };
                if self.placement.get(&id) == Some(candidate) {
                    return vec![];
                }
                self.placement.set(id, candidate);
                self.recompute_adjacency();
                vec![Action::RenderNeeded]
            }
            InputState::Idle => {
                if self.ui.tool != Tool::Edit {
                    return vec![];
                }
                let scene_pt = self.viewport.screen_to_scene(screen_pt);
                let over_room =
                    hit_room(scene_pt, self.rooms.rooms(), &self.placement, self.settings.scale).is_some();
                vec![Action::SetCursor(if over_room { "grab" } else { "default" }.to_owned())]
            }
        }
    }

    pub fn on_pointer_up(&mut self, _screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        self.finish_gesture()
    }

    /// The pointer left the surface mid-gesture. Same outcome as a release.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.finish_gesture()
    }

    /// Return to `Idle` from any state, committing a drag that reached a valid position.
    pub fn force_reset(&mut self) -> Vec<Action> {
        self.finish_gesture()
    }

    pub fn on_wheel(&mut self, _screen_pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        if self.ui.tool == Tool::Edit {
            return vec![];
        }
        if self.viewport.apply_wheel(delta.dy) { vec![Action::RenderNeeded] } else { vec![] }
    }

    pub fn on_key_down(&mut self, key: Key, _modifiers: Modifiers) -> Vec<Action> {
        match key.0.as_str() {
            "Escape" => {
                let mut actions = self.finish_gesture();
                self.ui.measurement.clear();
                actions.push(Action::RenderNeeded);
                actions
            }
            "Delete" | "Backspace" => match self.ui.selected_annotation {
                Some(id) => self.delete_annotation(&id),
                None => vec![],
            },
            "r" | "R" => match self.ui.selected_room {
                Some(id) if matches!(self.input, InputState::Idle) => self.rotate_room(&id),
                _ => vec![],
            },
            _ => vec![],
        }
    }

    // --- Queries ---

    /// Shared walls for the current placement.
    #[must_use]
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    #[must_use]
    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    #[must_use]
    pub fn selection(&self) -> Option<RoomId> {
        self.ui.selected_room
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        match self.input {
            InputState::Panning { .. } => SessionState::Panning,
            InputState::DraggingRoom { id, .. } => SessionState::DraggingRoom { room: id },
            InputState::Idle => match self.ui.tool {
                Tool::Measure => SessionState::Measuring { points: self.ui.measurement.len() },
                Tool::Annotate => SessionState::Annotating,
                Tool::Pan | Tool::Edit => SessionState::Idle,
            },
        }
    }

    /// Everything the scene emitter reads, borrowed from this session.
    #[must_use]
    pub fn plan_view(&self) -> PlanView<'_> {
        PlanView {
            rooms: self.rooms.rooms(),
            placement: &self.placement,
            adjacency: &self.adjacency,
            annotations: &self.annotations,
            selected_room: self.ui.selected_room,
            measurement: &self.ui.measurement,
            settings: &self.settings,
        }
    }

    /// Drawable primitives for the current view mode.
    #[must_use]
    pub fn scene(&self) -> Scene {
        match self.view_mode {
            ViewMode::Plan => scene::emit_plan(&self.plan_view()),
            ViewMode::Isometric => scene::emit_isometric(&self.plan_view()),
        }
    }

    // --- Internals ---

    fn hit(&self, scene_pt: Point) -> Option<Hit> {
        hit_test(scene_pt, self.rooms.rooms(), &self.placement, &self.annotations, self.settings.scale)
    }

    fn select(&mut self, hit: Option<Hit>) {
        self.ui.selected_room = None;
        self.ui.selected_annotation = None;
        match hit {
            Some(Hit::Room(id)) => self.ui.selected_room = Some(id),
            Some(Hit::Annotation(id)) => self.ui.selected_annotation = Some(id),
            None => {}
        }
    }

    fn begin_pan(&mut self, screen_pt: Point) -> Vec<Action> {
        self.input = InputState::Panning { last_screen: screen_pt };
        vec![Action::SetCursor("grabbing".to_owned())]
    }

    /// Edit mode: grab the room under the pointer. Empty canvas only clears the selection.
    fn begin_edit(&mut self, scene_pt: Point) -> Vec<Action> {
        let hit = self.hit(scene_pt);
        self.select(hit);
        let Some(Hit::Room(id)) = hit else {
            return vec![Action::RenderNeeded];
        };
        let Some(origin) = self.placement.get(&id) else {
            return vec![Action::RenderNeeded];
        };
        let grab_offset = Point::new(scene_pt.x - origin.x, scene_pt.y - origin.y);
        self.input = InputState::DraggingRoom { id, grab_offset, origin, last_valid: None };
        debug!(room = %id, "drag started");
        vec![Action::SetCursor("grabbing".to_owned()), Action::RenderNeeded]
    }

    /// End the active gesture and return to `Idle`.
    ///
    /// A drag that moved commits its last valid position. A drag that never
    /// produced a position is discarded and the room stays at its origin.
    fn finish_gesture(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle => vec![],
            InputState::Panning { .. } => vec![Action::SetCursor(cursor_for(self.ui.tool).to_owned())],
            InputState::DraggingRoom { id, origin, last_valid, .. } => {
                let mut actions = vec![Action::SetCursor(cursor_for(self.ui.tool).to_owned())];
                match last_valid {
                    Some(pos) if pos != origin => {
                        self.placement.set(id, pos);
                        self.recompute_adjacency();
                        info!(room = %id, x = pos.x, y = pos.y, "room placement committed");
                        actions.push(Action::PlacementCommitted(self.placement.clone()));
                    }
                    Some(_) => {}
                    None => {
                        self.placement.set(id, origin);
                        debug!(room = %id, "drag discarded without movement");
                    }
                }
                actions.push(Action::RenderNeeded);
                actions
            }
        }
    }

    fn recompute_adjacency(&mut self) {
        self.adjacency = adjacency::detect(self.rooms.rooms(), &self.placement, &self.settings);
    }

    fn anchor(&self) -> Point {
        if self.viewport_width > 0.0 && self.viewport_height > 0.0 {
            Point::new(self.viewport_width / 2.0, self.viewport_height / 2.0)
        } else {
            self.settings.canvas_anchor
        }
    }
}

fn cursor_for(tool: Tool) -> &'static str {
    match tool {
        Tool::Pan => "grab",
        Tool::Edit => "default",
        Tool::Measure | Tool::Annotate => "crosshair",
    }
}
