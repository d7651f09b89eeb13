//! Floor-plan layout and visualization engine.
//!
//! Given a list of rooms (dimensions, category, door/window fixtures and
//! optional declared neighbors) the engine computes a 2D arrangement, lets a
//! user reposition rooms under pan/zoom/snap, infers shared walls from
//! geometry alone, and projects the same model into an isometric view. The
//! host supplies rooms and cached positions, feeds input events to
//! [`engine::EngineCore`], persists the [`engine::Action`]s it returns, and
//! draws the [`scene::Scene`] primitives on whatever surface it owns.
//!
//! Everything is synchronous and single-threaded. Only [`export`] can fail.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Interaction session: [`engine::EngineCore`] and its actions |
//! | [`model`] | Rooms, fixtures, placements, annotations, and the room store |
//! | [`geometry`] | Rectangles, bounds, perimeter, fixture-on-wall mapping |
//! | [`adjacency`] | Shared-wall detection |
//! | [`layout`] | Auto-layout from declared adjacency |
//! | [`viewport`] | Pan/zoom/snap state and screen↔scene conversion |
//! | [`input`] | Tools, input event types, and the gesture state machine |
//! | [`hit`] | Hit-testing rooms and annotations |
//! | [`iso`] | Isometric projection |
//! | [`scene`] | Drawing primitives and the 2D / isometric emitters |
//! | [`export`] | SVG serialization and PNG rasterization |
//! | [`settings`] | Engine-wide tunables |
//! | [`consts`] | Shared numeric constants (scale, zoom limits, fixture sizes, etc.) |

pub mod adjacency;
pub mod consts;
pub mod engine;
pub mod export;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod iso;
pub mod layout;
pub mod model;
pub mod scene;
pub mod settings;
pub mod viewport;
