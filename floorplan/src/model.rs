//! Plan model: rooms, fixtures, placements, annotations, and the room store.
//!
//! This module defines the data supplied by the form-editing layer (`Room`,
//! `Fixture`) and the mutable scene state owned by the engine (`Placement`,
//! `Annotation`). `RoomStore` is the data-model boundary: rooms pass through
//! `Room::normalized` on the way in, so every consumer downstream can rely on
//! clamped fixtures and adjacency sets without self-references.
//!
//! Rooms whose width or depth is missing or non-positive are kept (they still
//! get a placement and a label) but are "unmeasured": geometry consumers skip them.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::consts::{DEFAULT_ANNOTATION_COLOR, DEFAULT_CEILING_HEIGHT_M, DOOR_SIZE_M, WINDOW_SIZE_M};
use crate::viewport::Point;

/// Unique identifier for a room.
pub type RoomId = Uuid;

/// Unique identifier for an annotation.
pub type AnnotationId = Uuid;

/// Scene-space position of a room's top-left corner, in pixels.
pub type Position = Point;

/// Room category. Drives default styling only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomCategory {
    Living,
    Bedroom,
    Kitchen,
    Bathroom,
    Hallway,
    #[default]
    Other,
}

/// A wall side in a room's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wall {
    Top,
    Bottom,
    Left,
    Right,
}

impl Wall {
    /// The facing wall of a neighbor across this wall.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Whether the wall runs along the x axis.
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// Door or window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureKind {
    Door,
    Window,
}

impl FixtureKind {
    /// Default (width, height) in meters.
    #[must_use]
    pub fn default_size(self) -> (f64, f64) {
        match self {
            Self::Door => DOOR_SIZE_M,
            Self::Window => WINDOW_SIZE_M,
        }
    }
}

/// A door or window attached to one wall of a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: Uuid,
    pub kind: FixtureKind,
    pub wall: Wall,
    /// Position of the fixture center along the wall, 0–100. 50 is centered.
    #[serde(default = "default_offset_percent")]
    pub offset_percent: f64,
    /// Width in meters; the kind's default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Height in meters; the kind's default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

fn default_offset_percent() -> f64 {
    50.0
}

impl Fixture {
    /// A centered fixture with default dimensions.
    #[must_use]
    pub fn new(kind: FixtureKind, wall: Wall) -> Self {
        Self { id: Uuid::new_v4(), kind, wall, offset_percent: 50.0, width: None, height: None }
    }

    /// Width in meters, falling back to the kind default.
    #[must_use]
    pub fn width_m(&self) -> f64 {
        self.width
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(self.kind.default_size().0)
    }

    /// Height in meters, falling back to the kind default.
    #[must_use]
    pub fn height_m(&self) -> f64 {
        self.height
            .filter(|h| h.is_finite() && *h > 0.0)
            .unwrap_or(self.kind.default_size().1)
    }

    /// Offset along the wall as a 0–1 fraction.
    #[must_use]
    pub fn offset_fraction(&self) -> f64 {
        clamp_percent(self.offset_percent) / 100.0
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_finite() { value.clamp(0.0, 100.0) } else { 50.0 }
}

/// A rectangular room as supplied by the form-editing layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    #[serde(default)]
    pub category: RoomCategory,
    /// Extent along x, in meters. Zero when unknown.
    #[serde(default)]
    pub width: f64,
    /// Extent along y, in meters. Zero when unknown.
    #[serde(default)]
    pub depth: f64,
    #[serde(default = "default_ceiling_height")]
    pub ceiling_height: f64,
    /// Floor area in square meters, used only when width/depth are unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    /// Rooms the author says share a wall with this one. A layout hint only.
    #[serde(default)]
    pub declared_adjacency: Vec<RoomId>,
    #[serde(default)]
    pub fixtures: Vec<Fixture>,
}

fn default_ceiling_height() -> f64 {
    DEFAULT_CEILING_HEIGHT_M
}

impl Room {
    /// A room with the given footprint and no fixtures or declared neighbors.
    #[must_use]
    pub fn new(name: impl Into<String>, category: RoomCategory, width: f64, depth: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            width,
            depth,
            ceiling_height: DEFAULT_CEILING_HEIGHT_M,
            area: None,
            declared_adjacency: Vec::new(),
            fixtures: Vec::new(),
        }
    }

    /// Whether width and depth are both positive finite numbers.
    #[must_use]
    pub fn is_measured(&self) -> bool {
        is_positive(self.width) && is_positive(self.depth)
    }

    /// Length of a wall in meters.
    #[must_use]
    pub fn wall_length(&self, wall: Wall) -> f64 {
        if wall.is_horizontal() { self.width } else { self.depth }
    }

    /// Swap width and depth. Applying twice restores the original footprint.
    ///
    /// Fixtures are re-clamped to their walls' new lengths, so a fixture that
    /// had to shrink stays shrunk after rotating back.
    pub fn rotate(&mut self) {
        std::mem::swap(&mut self.width, &mut self.depth);
        self.clamp_fixtures();
    }

    /// Clamp fixture offsets to 0–100 and, on measured rooms, fixture widths to their wall.
    pub fn clamp_fixtures(&mut self) {
        let measured = self.is_measured();
        let (width, depth) = (self.width, self.depth);
        for fixture in &mut self.fixtures {
            fixture.offset_percent = clamp_percent(fixture.offset_percent);
            if measured {
                let wall_len = if fixture.wall.is_horizontal() { width } else { depth };
                let clamped = fixture.width_m().min(wall_len);
                if fixture.width.is_some() || clamped < fixture.width_m() {
                    fixture.width = Some(clamped);
                }
            }
        }
    }

    /// Enforce model invariants.
    ///
    /// - drops self-references and duplicates from `declared_adjacency`
    /// - clamps fixture offsets to 0–100 and fixture widths to the wall length
    /// - replaces an invalid ceiling height with the default
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let own_id = self.id;
        let before = self.declared_adjacency.len();
        let mut seen = Vec::with_capacity(before);
        self.declared_adjacency.retain(|other| {
            if *other == own_id || seen.contains(other) {
                return false;
            }
            seen.push(*other);
            true
        });
        if self.declared_adjacency.len() != before {
            warn!(room = %own_id, dropped = before - self.declared_adjacency.len(), "dropped self or duplicate adjacency");
        }

        if !is_positive(self.ceiling_height) {
            self.ceiling_height = DEFAULT_CEILING_HEIGHT_M;
        }

        self.clamp_fixtures();
        self
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Room id → scene position. Mutable scene state persisted by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Placement {
    positions: HashMap<RoomId, Position>,
}

impl Placement {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of a room, if placed.
    #[must_use]
    pub fn get(&self, id: &RoomId) -> Option<Position> {
        self.positions.get(id).copied()
    }

    /// Place or move a room.
    pub fn set(&mut self, id: RoomId, position: Position) {
        self.positions.insert(id, position);
    }

    /// Forget a room's position, returning it if it was placed.
    pub fn remove(&mut self, id: &RoomId) -> Option<Position> {
        self.positions.remove(id)
    }

    /// Whether the room has a position.
    #[must_use]
    pub fn contains(&self, id: &RoomId) -> bool {
        self.positions.contains_key(id)
    }

    /// Iterate `(id, position)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&RoomId, &Position)> {
        self.positions.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl FromIterator<(RoomId, Position)> for Placement {
    fn from_iter<I: IntoIterator<Item = (RoomId, Position)>>(iter: I) -> Self {
        Self { positions: iter.into_iter().collect() }
    }
}

/// A free-form note pinned to a scene coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub position: Point,
    pub text: String,
    pub color: String,
}

impl Annotation {
    /// An annotation with a fresh id and the default color.
    #[must_use]
    pub fn new(position: Point, text: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), position, text: text.into(), color: DEFAULT_ANNOTATION_COLOR.to_owned() }
    }
}

/// Ordered, indexed collection of rooms. Input order is draw order.
#[derive(Debug, Clone, Default)]
pub struct RoomStore {
    rooms: Vec<Room>,
    index: HashMap<RoomId, usize>,
}

impl RoomStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all rooms. Later duplicates of an id replace earlier ones in place.
    pub fn load(&mut self, rooms: Vec<Room>) {
        self.rooms.clear();
        self.index.clear();
        for room in rooms {
            self.insert(room);
        }
    }

    /// Insert or replace a room, normalizing it first.
    pub fn insert(&mut self, room: Room) {
        let room = room.normalized();
        if !room.is_measured() {
            warn!(room = %room.id, name = %room.name, "room has no usable width/depth; excluded from geometry");
        }
        if let Some(&slot) = self.index.get(&room.id) {
            self.rooms[slot] = room;
        } else {
            self.index.insert(room.id, self.rooms.len());
            self.rooms.push(room);
        }
    }

    /// Remove a room by id, returning it if it was present.
    pub fn remove(&mut self, id: &RoomId) -> Option<Room> {
        let slot = self.index.remove(id)?;
        let room = self.rooms.remove(slot);
        for i in self.index.values_mut() {
            if *i > slot {
                *i -= 1;
            }
        }
        Some(room)
    }

    /// Return a reference to a room by id.
    #[must_use]
    pub fn get(&self, id: &RoomId) -> Option<&Room> {
        self.index.get(id).map(|&slot| &self.rooms[slot])
    }

    /// Mutable access for in-place edits such as rotation.
    pub fn get_mut(&mut self, id: &RoomId) -> Option<&mut Room> {
        self.index.get(id).map(|&slot| &mut self.rooms[slot])
    }

    /// All rooms in input order.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Number of rooms in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns `true` if the store contains no rooms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
