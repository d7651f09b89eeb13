//! Input model: tool modes, modifier keys, mouse buttons, and the gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `InputState` is the gesture tracked between pointer-down and
//! pointer-up, carrying what the engine needs to move a room live and commit
//! it once on release. `SessionState` is the read-only summary exposed to hosts.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::model::{AnnotationId, Position, RoomId};
use crate::viewport::Point;

/// Which interaction mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Drag anywhere to pan; the wheel zooms (default).
    #[default]
    Pan,
    /// Drag rooms to reposition them. Wheel zoom is off.
    Edit,
    /// Click two points to measure the distance between them.
    Measure,
    /// Click once to pin a note, then fall back to `Pan`.
    Annotate,
}

/// Modifier keys held when the event fired. Carried for hosts; no gesture reads them yet.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left button or touch. Its effect depends on the active tool.
    Primary,
    /// Middle mouse button. Always pans.
    Middle,
    /// Right mouse button. Ignored.
    Secondary,
}

/// A keyboard key name as reported by the host (e.g. `"Escape"`, `"Delete"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self(name.to_owned())
    }
}

/// Scroll amount in pixels. Only the sign of `dy` matters: negative zooms in.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    pub dy: f64,
}

/// Persistent UI state visible to the scene emitter.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub tool: Tool,
    pub selected_room: Option<RoomId>,
    pub selected_annotation: Option<AnnotationId>,
    /// Scene-space measurement points; at most two.
    pub measurement: Vec<Point>,
}

/// Gesture in progress between pointer-down and pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Dragging the canvas. Pan deltas are raw screen pixels.
    Panning {
        /// Screen-space position of the previous pointer event.
        last_screen: Point,
    },
    /// Moving a room across the plan.
    DraggingRoom {
        id: RoomId,
        /// Scene-space offset from the room origin to the grab point.
        grab_offset: Point,
        /// Position at pointer-down.
        origin: Position,
        /// Last candidate written to the placement; `None` until the first move.
        last_valid: Option<Position>,
    },
}

/// Session state reported to hosts.
///
/// `Measuring { points }` counts the points held, 0 to 2. Both points stay
/// after the second click so the overlay can draw them; the next click
/// starts over at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Panning,
    DraggingRoom { room: RoomId },
    Measuring { points: usize },
    Annotating,
}
