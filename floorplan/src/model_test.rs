#![allow(clippy::float_cmp)]

use super::*;

fn room(width: f64, depth: f64) -> Room {
    Room::new("Room", RoomCategory::Bedroom, width, depth)
}

// =============================================================
// Wall
// =============================================================

#[test]
fn wall_opposite_pairs() {
    assert_eq!(Wall::Top.opposite(), Wall::Bottom);
    assert_eq!(Wall::Bottom.opposite(), Wall::Top);
    assert_eq!(Wall::Left.opposite(), Wall::Right);
    assert_eq!(Wall::Right.opposite(), Wall::Left);
}

#[test]
fn wall_orientation() {
    assert!(Wall::Top.is_horizontal());
    assert!(Wall::Bottom.is_horizontal());
    assert!(!Wall::Left.is_horizontal());
    assert!(!Wall::Right.is_horizontal());
}

#[test]
fn wall_serde_is_lowercase() {
    assert_eq!(serde_json::to_string(&Wall::Right).unwrap(), "\"right\"");
}

// =============================================================
// Fixture
// =============================================================

#[test]
fn door_defaults() {
    let f = Fixture::new(FixtureKind::Door, Wall::Bottom);
    assert_eq!(f.width_m(), 0.9);
    assert_eq!(f.height_m(), 2.1);
    assert_eq!(f.offset_fraction(), 0.5);
}

#[test]
fn window_defaults() {
    let f = Fixture::new(FixtureKind::Window, Wall::Top);
    assert_eq!(f.width_m(), 1.2);
    assert_eq!(f.height_m(), 1.5);
}

#[test]
fn fixture_invalid_width_falls_back_to_default() {
    let f = Fixture { width: Some(-1.0), ..Fixture::new(FixtureKind::Door, Wall::Left) };
    assert_eq!(f.width_m(), 0.9);
}

#[test]
fn fixture_offset_fraction_clamps() {
    let f = Fixture { offset_percent: 140.0, ..Fixture::new(FixtureKind::Door, Wall::Left) };
    assert_eq!(f.offset_fraction(), 1.0);
    let f = Fixture { offset_percent: -5.0, ..Fixture::new(FixtureKind::Door, Wall::Left) };
    assert_eq!(f.offset_fraction(), 0.0);
}

#[test]
fn fixture_deserializes_with_defaults() {
    let f: Fixture = serde_json::from_value(serde_json::json!({
        "id": Uuid::new_v4(),
        "kind": "window",
        "wall": "left",
    }))
    .unwrap();
    assert_eq!(f.offset_percent, 50.0);
    assert!(f.width.is_none());
}

// =============================================================
// Room
// =============================================================

#[test]
fn room_measured() {
    assert!(room(4.0, 3.0).is_measured());
    assert!(!room(0.0, 3.0).is_measured());
    assert!(!room(4.0, -1.0).is_measured());
    assert!(!room(f64::INFINITY, 3.0).is_measured());
}

#[test]
fn room_wall_length() {
    let r = room(4.0, 3.0);
    assert_eq!(r.wall_length(Wall::Top), 4.0);
    assert_eq!(r.wall_length(Wall::Left), 3.0);
}

#[test]
fn rotate_swaps_width_and_depth() {
    let mut r = room(4.0, 3.0);
    r.rotate();
    assert_eq!((r.width, r.depth), (3.0, 4.0));
    r.rotate();
    assert_eq!((r.width, r.depth), (4.0, 3.0));
}

#[test]
fn rotate_reclamps_fixture_width() {
    let mut r = room(4.0, 1.0);
    let mut door = Fixture::new(FixtureKind::Door, Wall::Bottom);
    door.width = Some(2.5);
    r.fixtures.push(door);
    r.rotate();
    assert_eq!(r.fixtures[0].width, Some(1.0));
}

#[test]
fn normalized_drops_self_adjacency() {
    let mut r = room(4.0, 3.0);
    let other = Uuid::new_v4();
    r.declared_adjacency = vec![r.id, other, other];
    let r = r.normalized();
    assert_eq!(r.declared_adjacency, vec![other]);
}

#[test]
fn normalized_clamps_fixture_offset() {
    let mut r = room(4.0, 3.0);
    r.fixtures.push(Fixture { offset_percent: 250.0, ..Fixture::new(FixtureKind::Door, Wall::Top) });
    let r = r.normalized();
    assert_eq!(r.fixtures[0].offset_percent, 100.0);
}

#[test]
fn normalized_clamps_wide_fixture_to_wall() {
    let mut r = room(4.0, 1.0);
    r.fixtures.push(Fixture { width: Some(6.0), ..Fixture::new(FixtureKind::Window, Wall::Top) });
    r.fixtures.push(Fixture::new(FixtureKind::Window, Wall::Left));
    let r = r.normalized();
    assert_eq!(r.fixtures[0].width_m(), 4.0);
    // Default 1.2 m window does not fit a 1 m wall.
    assert_eq!(r.fixtures[1].width_m(), 1.0);
}

#[test]
fn normalized_keeps_fitting_default_fixture_unset() {
    let mut r = room(4.0, 3.0);
    r.fixtures.push(Fixture::new(FixtureKind::Door, Wall::Bottom));
    let r = r.normalized();
    assert!(r.fixtures[0].width.is_none());
}

#[test]
fn normalized_repairs_ceiling_height() {
    let mut r = room(4.0, 3.0);
    r.ceiling_height = 0.0;
    assert_eq!(r.normalized().ceiling_height, DEFAULT_CEILING_HEIGHT_M);
}

#[test]
fn room_deserializes_missing_dimensions_as_unmeasured() {
    let r: Room = serde_json::from_value(serde_json::json!({
        "id": Uuid::new_v4(),
        "name": "Closet",
        "area": 4.0,
    }))
    .unwrap();
    assert!(!r.is_measured());
    assert_eq!(r.category, RoomCategory::Other);
    assert_eq!(r.ceiling_height, DEFAULT_CEILING_HEIGHT_M);
}

// =============================================================
// Placement
// =============================================================

#[test]
fn placement_set_get_remove() {
    let mut p = Placement::new();
    let id = Uuid::new_v4();
    assert!(p.is_empty());
    p.set(id, Point::new(10.0, 20.0));
    assert!(p.contains(&id));
    assert_eq!(p.get(&id), Some(Point::new(10.0, 20.0)));
    assert_eq!(p.remove(&id), Some(Point::new(10.0, 20.0)));
    assert!(p.get(&id).is_none());
}

#[test]
fn placement_serializes_as_map() {
    let id = Uuid::new_v4();
    let p: Placement = [(id, Point::new(1.0, 2.0))].into_iter().collect();
    let value = serde_json::to_value(&p).unwrap();
    assert_eq!(value[id.to_string()]["x"], 1.0);
    let back: Placement = serde_json::from_value(value).unwrap();
    assert_eq!(back, p);
}

// =============================================================
// Annotation
// =============================================================

#[test]
fn annotation_new_uses_default_color() {
    let a = Annotation::new(Point::new(5.0, 5.0), "check outlet");
    assert_eq!(a.color, DEFAULT_ANNOTATION_COLOR);
    assert_eq!(a.text, "check outlet");
}

// =============================================================
// RoomStore
// =============================================================

#[test]
fn store_preserves_input_order() {
    let a = room(1.0, 1.0);
    let b = room(2.0, 2.0);
    let (ida, idb) = (a.id, b.id);
    let mut store = RoomStore::new();
    store.load(vec![a, b]);
    let ids: Vec<_> = store.rooms().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![ida, idb]);
}

#[test]
fn store_insert_replaces_in_place() {
    let a = room(1.0, 1.0);
    let b = room(2.0, 2.0);
    let id = a.id;
    let mut store = RoomStore::new();
    store.load(vec![a.clone(), b]);
    store.insert(Room { width: 9.0, ..a });
    assert_eq!(store.len(), 2);
    assert_eq!(store.rooms()[0].width, 9.0);
    assert_eq!(store.get(&id).unwrap().width, 9.0);
}

#[test]
fn store_insert_normalizes() {
    let mut r = room(1.0, 1.0);
    r.declared_adjacency.push(r.id);
    let id = r.id;
    let mut store = RoomStore::new();
    store.insert(r);
    assert!(store.get(&id).unwrap().declared_adjacency.is_empty());
}

#[test]
fn store_remove_reindexes() {
    let a = room(1.0, 1.0);
    let b = room(2.0, 2.0);
    let c = room(3.0, 3.0);
    let (ida, idc) = (a.id, c.id);
    let mut store = RoomStore::new();
    store.load(vec![a, b.clone(), c]);
    assert!(store.remove(&b.id).is_some());
    assert!(store.remove(&b.id).is_none());
    assert_eq!(store.get(&idc).unwrap().width, 3.0);
    assert_eq!(store.get(&ida).unwrap().width, 1.0);
    assert_eq!(store.len(), 2);
}

#[test]
fn store_get_mut_allows_rotation() {
    let r = room(4.0, 2.0);
    let id = r.id;
    let mut store = RoomStore::new();
    store.insert(r);
    store.get_mut(&id).unwrap().rotate();
    assert_eq!(store.get(&id).unwrap().width, 2.0);
}
