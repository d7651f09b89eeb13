#![allow(clippy::float_cmp)]

use super::*;
use crate::input::{Button, Key, Modifiers, Tool, WheelDelta};
use crate::model::{Fixture, FixtureKind, RoomCategory, Wall};

// =============================================================
// Helpers
// =============================================================

fn room(name: &str, width: f64, depth: f64) -> Room {
    Room::new(name, RoomCategory::Living, width, depth)
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn no_modifiers() -> Modifiers {
    Modifiers::default()
}

/// Engine holding `rooms` at the given positions.
fn engine_with(rooms: &[(&Room, f64, f64)]) -> EngineCore {
    let mut engine = EngineCore::new();
    let cached: Placement = rooms.iter().map(|(r, x, y)| (r.id, pt(*x, *y))).collect();
    engine.load(rooms.iter().map(|(r, _, _)| (*r).clone()).collect(), Some(&cached));
    engine
}

fn down(engine: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    engine.on_pointer_down(pt(x, y), Button::Primary, no_modifiers())
}

fn move_to(engine: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    engine.on_pointer_move(pt(x, y), no_modifiers())
}

fn up(engine: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    engine.on_pointer_up(pt(x, y), Button::Primary, no_modifiers())
}

fn wheel(engine: &mut EngineCore, dy: f64) -> Vec<Action> {
    engine.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy }, no_modifiers())
}

fn key(engine: &mut EngineCore, name: &str) -> Vec<Action> {
    engine.on_key_down(Key::named(name), no_modifiers())
}

fn committed(actions: &[Action]) -> Option<&Placement> {
    actions.iter().find_map(|a| match a {
        Action::PlacementCommitted(p) => Some(p),
        _ => None,
    })
}

// =============================================================
// Loading
// =============================================================

#[test]
fn load_without_cache_lays_out_and_commits() {
    let mut engine = EngineCore::new();
    let mut a = room("A", 4.0, 4.0);
    let b = room("B", 3.0, 4.0);
    a.declared_adjacency.push(b.id);
    let actions = engine.load(vec![a.clone(), b.clone()], None);
    let placement = committed(&actions).unwrap();
    assert_eq!(placement.get(&b.id), Some(pt(208.0, 0.0)));
    assert_eq!(engine.adjacency().len(), 1);
    assert_eq!(engine.adjacency().between(&a.id, &b.id).unwrap().shared_wall, Wall::Right);
}

#[test]
fn load_with_full_cache_only_renders() {
    let a = room("A", 2.0, 2.0);
    let mut engine = EngineCore::new();
    let cached: Placement = [(a.id, pt(30.0, 40.0))].into_iter().collect();
    let actions = engine.load(vec![a.clone()], Some(&cached));
    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert_eq!(engine.placement.get(&a.id), Some(pt(30.0, 40.0)));
}

#[test]
fn load_drops_self_adjacency() {
    let mut a = room("A", 2.0, 2.0);
    a.declared_adjacency.push(a.id);
    let mut engine = EngineCore::new();
    engine.load(vec![a.clone()], None);
    assert!(engine.room(&a.id).unwrap().declared_adjacency.is_empty());
    assert!(engine.adjacency().is_empty());
}

#[test]
fn auto_arrange_replaces_positions() {
    let a = room("A", 2.0, 2.0);
    let b = room("B", 2.0, 2.0);
    let mut engine = engine_with(&[(&a, 500.0, 500.0), (&b, 900.0, 20.0)]);
    let actions = engine.auto_arrange();
    let placement = committed(&actions).unwrap();
    assert_eq!(placement.get(&a.id), Some(pt(0.0, 0.0)));
    assert_eq!(placement.get(&b.id), Some(pt(140.0, 0.0)));
}

// =============================================================
// Panning
// =============================================================

#[test]
fn pan_mode_drag_moves_viewport() {
    let mut engine = EngineCore::new();
    down(&mut engine, 100.0, 100.0);
    assert_eq!(engine.session_state(), SessionState::Panning);
    move_to(&mut engine, 110.0, 105.0);
    move_to(&mut engine, 130.0, 95.0);
    assert_eq!(engine.viewport().pan, pt(30.0, -5.0));
    up(&mut engine, 130.0, 95.0);
    assert_eq!(engine.session_state(), SessionState::Idle);
}

#[test]
fn pan_delta_ignores_zoom() {
    let mut engine = EngineCore::new();
    engine.viewport.set_zoom(2.0);
    down(&mut engine, 0.0, 0.0);
    move_to(&mut engine, 10.0, 10.0);
    assert_eq!(engine.viewport().pan, pt(10.0, 10.0));
}

#[test]
fn pan_mode_press_on_room_selects_and_pans() {
    let a = room("A", 2.0, 2.0);
    let mut engine = engine_with(&[(&a, 0.0, 0.0)]);
    down(&mut engine, 50.0, 50.0);
    assert_eq!(engine.selection(), Some(a.id));
    move_to(&mut engine, 60.0, 50.0);
    assert_eq!(engine.placement.get(&a.id), Some(pt(0.0, 0.0)));
    assert_eq!(engine.viewport().pan, pt(10.0, 0.0));
}

#[test]
fn edit_mode_empty_press_does_not_pan() {
    let mut engine = EngineCore::new();
    engine.set_tool(Tool::Edit);
    down(&mut engine, 10.0, 10.0);
    move_to(&mut engine, 50.0, 50.0);
    assert_eq!(engine.session_state(), SessionState::Idle);
    assert_eq!(engine.viewport().pan, pt(0.0, 0.0));
}

#[test]
fn middle_button_pans_in_edit_mode() {
    let mut engine = EngineCore::new();
    engine.set_tool(Tool::Edit);
    engine.on_pointer_down(pt(0.0, 0.0), Button::Middle, no_modifiers());
    move_to(&mut engine, 5.0, 7.0);
    assert_eq!(engine.viewport().pan, pt(5.0, 7.0));
}

// =============================================================
// Dragging rooms
// =============================================================

#[test]
fn drag_snaps_to_grid_and_commits_once() {
    let a = room("A", 2.0, 2.0);
    let mut engine = engine_with(&[(&a, 200.0, 200.0)]);
    engine.set_tool(Tool::Edit);
    engine.set_snap_to_grid(true);
    engine.set_grid_size(25.0);

    down(&mut engine, 210.0, 210.0);
    assert_eq!(engine.session_state(), SessionState::DraggingRoom { room: a.id });
    let mid = move_to(&mut engine, 230.0, 230.0);
    assert!(committed(&mid).is_none());
    move_to(&mut engine, 247.0, 258.0);
    let actions = up(&mut engine, 247.0, 258.0);

    let placement = committed(&actions).unwrap();
    assert_eq!(placement.get(&a.id), Some(pt(225.0, 250.0)));
    assert_eq!(actions.iter().filter(|a| matches!(a, Action::PlacementCommitted(_))).count(), 1);
    assert_eq!(engine.session_state(), SessionState::Idle);
}

#[test]
fn drag_accounts_for_zoom_and_pan() {
    let a = room("A", 2.0, 2.0);
    let mut engine = engine_with(&[(&a, 0.0, 0.0)]);
    engine.set_tool(Tool::Edit);
    engine.viewport.set_zoom(2.0);
    engine.viewport.pan = pt(100.0, 100.0);

    down(&mut engine, 120.0, 120.0);
    move_to(&mut engine, 220.0, 160.0);
    assert_eq!(engine.placement.get(&a.id), Some(pt(50.0, 20.0)));
}

#[test]
fn drag_candidate_is_floored_at_zero() {
    let a = room("A", 2.0, 2.0);
    let mut engine = engine_with(&[(&a, 100.0, 100.0)]);
    engine.set_tool(Tool::Edit);
    down(&mut engine, 110.0, 110.0);
    move_to(&mut engine, 0.0, 50.0);
    let actions = up(&mut engine, 0.0, 50.0);
    assert_eq!(committed(&actions).unwrap().get(&a.id), Some(pt(0.0, 40.0)));
}

#[test]
fn press_and_release_without_move_is_discarded() {
    let a = room("A", 2.0, 2.0);
    let mut engine = engine_with(&[(&a, 100.0, 100.0)]);
    engine.set_tool(Tool::Edit);
    down(&mut engine, 110.0, 110.0);
    let actions = up(&mut engine, 110.0, 110.0);
    assert!(committed(&actions).is_none());
    assert_eq!(engine.placement.get(&a.id), Some(pt(100.0, 100.0)));
}

#[test]
fn pointer_leave_commits_last_valid_position() {
    let a = room("A", 2.0, 2.0);
    let mut engine = engine_with(&[(&a, 100.0, 100.0)]);
    engine.set_tool(Tool::Edit);
    down(&mut engine, 110.0, 110.0);
    move_to(&mut engine, 160.0, 110.0);
    let actions = engine.on_pointer_leave();
    assert_eq!(committed(&actions).unwrap().get(&a.id), Some(pt(150.0, 100.0)));
    assert_eq!(engine.session_state(), SessionState::Idle);
}

#[test]
fn force_reset_without_move_discards_drag() {
    let a = room("A", 2.0, 2.0);
    let mut engine = engine_with(&[(&a, 100.0, 100.0)]);
    engine.set_tool(Tool::Edit);
    down(&mut engine, 110.0, 110.0);
    let actions = engine.force_reset();
    assert!(committed(&actions).is_none());
    assert_eq!(engine.session_state(), SessionState::Idle);
}

#[test]
fn adjacency_tracks_live_drag() {
    let a = room("A", 2.0, 2.0);
    let b = room("B", 2.0, 2.0);
    let mut engine = engine_with(&[(&a, 0.0, 0.0), (&b, 400.0, 0.0)]);
    engine.set_tool(Tool::Edit);
    assert!(engine.adjacency().is_empty());
    down(&mut engine, 410.0, 10.0);
    move_to(&mut engine, 114.0, 10.0);
    assert_eq!(engine.adjacency().len(), 1);
    assert_eq!(engine.adjacency().between(&b.id, &a.id).unwrap().shared_wall, Wall::Left);
}

#[test]
fn edit_hover_sets_grab_cursor() {
    let a = room("A", 2.0, 2.0);
    let mut engine = engine_with(&[(&a, 0.0, 0.0)]);
    engine.set_tool(Tool::Edit);
    assert_eq!(move_to(&mut engine, 10.0, 10.0), vec![Action::SetCursor("grab".to_owned())]);
    assert_eq!(move_to(&mut engine, 500.0, 10.0), vec![Action::SetCursor("default".to_owned())]);
}

// =============================================================
// Zoom / view
// =============================================================

#[test]
fn three_wheel_ups_zoom_to_1_331() {
    let mut engine = EngineCore::new();
    for _ in 0..3 {
        wheel(&mut engine, -100.0);
    }
    assert!((engine.viewport().zoom - 1.331).abs() < 1e-9);
}

#[test]
fn wheel_zoom_is_clamped() {
    let mut engine = EngineCore::new();
    for _ in 0..40 {
        wheel(&mut engine, -1.0);
    }
    assert_eq!(engine.viewport().zoom, 3.0);
    assert!(wheel(&mut engine, -1.0).is_empty());
    for _ in 0..40 {
        wheel(&mut engine, 1.0);
    }
    assert_eq!(engine.viewport().zoom, 0.3);
}

#[test]
fn wheel_is_ignored_in_edit_mode() {
    let mut engine = EngineCore::new();
    engine.set_tool(Tool::Edit);
    assert!(wheel(&mut engine, -1.0).is_empty());
    assert_eq!(engine.viewport().zoom, 1.0);
}

#[test]
fn reset_view_restores_defaults() {
    let mut engine = EngineCore::new();
    wheel(&mut engine, -1.0);
    engine.viewport.pan_by(33.0, -12.0);
    engine.reset_view();
    assert_eq!(engine.viewport().zoom, 1.0);
    assert_eq!(engine.viewport().pan, pt(0.0, 0.0));
}

#[test]
fn center_view_aligns_bounds_with_anchor() {
    let a = room("A", 4.0, 4.0);
    let mut engine = engine_with(&[(&a, 0.0, 0.0)]);
    wheel(&mut engine, -1.0);
    engine.center_view();
    assert_eq!(engine.viewport().zoom, 1.0);
    assert_eq!(engine.viewport().pan, pt(300.0, 200.0));

    engine.set_viewport(1000.0, 800.0);
    engine.center_view();
    assert_eq!(engine.viewport().pan, pt(400.0, 300.0));
}

// =============================================================
// Measure / annotate
// =============================================================

#[test]
fn measure_collects_two_points_then_restarts() {
    let mut engine = EngineCore::new();
    engine.set_tool(Tool::Measure);
    assert_eq!(engine.session_state(), SessionState::Measuring { points: 0 });
    down(&mut engine, 0.0, 0.0);
    assert_eq!(engine.session_state(), SessionState::Measuring { points: 1 });
    down(&mut engine, 30.0, 40.0);
    assert_eq!(engine.session_state(), SessionState::Measuring { points: 2 });
    assert_eq!(engine.ui.measurement[0].distance(engine.ui.measurement[1]), 50.0);
    down(&mut engine, 5.0, 5.0);
    assert_eq!(engine.ui.measurement, vec![pt(5.0, 5.0)]);
    assert_eq!(engine.session_state(), SessionState::Measuring { points: 1 });
}

#[test]
fn measure_points_are_in_scene_space() {
    let mut engine = EngineCore::new();
    engine.viewport.set_zoom(2.0);
    engine.set_tool(Tool::Measure);
    down(&mut engine, 100.0, 60.0);
    assert_eq!(engine.ui.measurement, vec![pt(50.0, 30.0)]);
}

#[test]
fn leaving_measure_mode_clears_points() {
    let mut engine = EngineCore::new();
    engine.set_tool(Tool::Measure);
    down(&mut engine, 0.0, 0.0);
    engine.set_tool(Tool::Pan);
    assert!(engine.ui.measurement.is_empty());
}

#[test]
fn escape_clears_measurement() {
    let mut engine = EngineCore::new();
    engine.set_tool(Tool::Measure);
    down(&mut engine, 0.0, 0.0);
    key(&mut engine, "Escape");
    assert!(engine.ui.measurement.is_empty());
}

#[test]
fn annotate_places_note_and_returns_to_pan() {
    let mut engine = EngineCore::new();
    engine.set_tool(Tool::Annotate);
    assert_eq!(engine.session_state(), SessionState::Annotating);
    let actions = down(&mut engine, 70.0, 80.0);
    let created = actions.iter().find_map(|a| match a {
        Action::AnnotationCreated(note) => Some(note.clone()),
        _ => None,
    });
    assert_eq!(created.unwrap().position, pt(70.0, 80.0));
    assert_eq!(engine.annotations.len(), 1);
    assert_eq!(engine.ui.tool, Tool::Pan);
    assert_eq!(engine.session_state(), SessionState::Idle);
}

#[test]
fn delete_key_removes_selected_annotation() {
    let mut engine = EngineCore::new();
    engine.add_annotation(pt(0.0, 0.0), "note");
    let id = engine.annotations[0].id;
    let actions = key(&mut engine, "Delete");
    assert!(actions.contains(&Action::AnnotationDeleted { id }));
    assert!(engine.annotations.is_empty());
    assert!(key(&mut engine, "Delete").is_empty());
}

#[test]
fn press_on_annotation_selects_it() {
    let mut engine = EngineCore::new();
    engine.add_annotation(pt(0.0, 0.0), "note");
    let id = engine.annotations[0].id;
    engine.ui.selected_annotation = None;
    down(&mut engine, 10.0, 10.0);
    assert_eq!(engine.ui.selected_annotation, Some(id));
}

#[test]
fn update_annotation_changes_fields() {
    let mut engine = EngineCore::new();
    engine.add_annotation(pt(0.0, 0.0), "old");
    let id = engine.annotations[0].id;
    engine.update_annotation(&id, Some("new".to_owned()), None);
    assert_eq!(engine.annotations[0].text, "new");
    assert!(engine.update_annotation(&uuid::Uuid::new_v4(), None, None).is_empty());
}

#[test]
fn toggle_tool_returns_to_pan() {
    let mut engine = EngineCore::new();
    engine.toggle_tool(Tool::Measure);
    assert_eq!(engine.ui.tool, Tool::Measure);
    engine.toggle_tool(Tool::Measure);
    assert_eq!(engine.ui.tool, Tool::Pan);
}

// =============================================================
// Rotation
// =============================================================

#[test]
fn rotate_swaps_dimensions_and_keeps_position() {
    let a = room("A", 4.0, 2.0);
    let mut engine = engine_with(&[(&a, 10.0, 20.0)]);
    let actions = engine.rotate_room(&a.id);
    assert!(actions.contains(&Action::RoomRotated { id: a.id, width: 2.0, depth: 4.0 }));
    assert_eq!(engine.placement.get(&a.id), Some(pt(10.0, 20.0)));
    engine.rotate_room(&a.id);
    let r = engine.room(&a.id).unwrap();
    assert_eq!((r.width, r.depth), (4.0, 2.0));
}

#[test]
fn rotation_reruns_adjacency() {
    let a = room("A", 2.0, 4.0);
    let b = room("B", 2.0, 2.0);
    // b touches a's right wall. Rotated to 4×2, a ends 20px above b.
    let mut engine = engine_with(&[(&a, 0.0, 0.0), (&b, 100.0, 120.0)]);
    assert_eq!(engine.adjacency().len(), 1);
    engine.rotate_room(&a.id);
    assert!(engine.adjacency().is_empty());
}

#[test]
fn rotation_clamps_fixtures_to_the_shorter_wall() {
    let mut a = room("A", 4.0, 1.0);
    let mut window = Fixture::new(FixtureKind::Window, Wall::Top);
    window.width = Some(3.0);
    a.fixtures.push(window);
    let mut engine = engine_with(&[(&a, 0.0, 0.0)]);
    assert_eq!(engine.room(&a.id).unwrap().fixtures[0].width, Some(3.0));

    engine.rotate_room(&a.id);
    let r = engine.room(&a.id).unwrap();
    assert_eq!(r.width, 1.0);
    assert_eq!(r.fixtures[0].width, Some(1.0));
    assert!(r.fixtures[0].width_m() <= r.wall_length(Wall::Top));

    engine.rotate_room(&a.id);
    assert_eq!(engine.room(&a.id).unwrap().fixtures[0].width, Some(1.0));
}

#[test]
fn r_key_rotates_selected_room() {
    let a = room("A", 3.0, 1.0);
    let mut engine = engine_with(&[(&a, 0.0, 0.0)]);
    down(&mut engine, 10.0, 10.0);
    up(&mut engine, 10.0, 10.0);
    key(&mut engine, "r");
    assert_eq!(engine.room(&a.id).unwrap().width, 1.0);
}

#[test]
fn rotate_unknown_room_is_noop() {
    let mut engine = EngineCore::new();
    assert!(engine.rotate_room(&uuid::Uuid::new_v4()).is_empty());
}

// =============================================================
// Scene
// =============================================================

#[test]
fn view_mode_switches_scene() {
    let a = room("A", 2.0, 2.0);
    let mut engine = engine_with(&[(&a, 0.0, 0.0)]);
    let plan = engine.scene();
    engine.set_view_mode(ViewMode::Isometric);
    let iso = engine.scene();
    assert!(!plan.primitives.is_empty());
    assert_ne!(plan, iso);
}
