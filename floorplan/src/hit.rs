#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{ANNOTATION_H_PX, ANNOTATION_W_PX};
use crate::geometry::{Rect, rectangle_of};
use crate::model::{Annotation, AnnotationId, Placement, Room, RoomId};
use crate::viewport::Point;

/// What lies under a scene point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Room(RoomId),
    Annotation(AnnotationId),
}

/// Box an annotation occupies, anchored at its top-left corner.
#[must_use]
pub fn annotation_rect(annotation: &Annotation) -> Rect {
    Rect::new(annotation.position.x, annotation.position.y, ANNOTATION_W_PX, ANNOTATION_H_PX)
}

/// Topmost placed, measured room containing `scene_pt`. Later rooms draw on top.
#[must_use]
pub fn hit_room(scene_pt: Point, rooms: &[Room], placement: &Placement, scale: f64) -> Option<RoomId> {
    rooms
        .iter()
        .rev()
        .filter(|room| room.is_measured())
        .find(|room| {
            placement
                .get(&room.id)
                .is_some_and(|pos| rectangle_of(room, pos, scale).contains(scene_pt))
        })
        .map(|room| room.id)
}

/// Topmost annotation containing `scene_pt`.
#[must_use]
pub fn hit_annotation(scene_pt: Point, annotations: &[Annotation]) -> Option<AnnotationId> {
    annotations
        .iter()
        .rev()
        .find(|a| annotation_rect(a).contains(scene_pt))
        .map(|a| a.id)
}

/// Test annotations first (they draw above rooms), then rooms.
#[must_use]
pub fn hit_test(
    scene_pt: Point,
    rooms: &[Room],
    placement: &Placement,
    annotations: &[Annotation],
    scale: f64,
) -> Option<Hit> {
    hit_annotation(scene_pt, annotations)
        .map(Hit::Annotation)
        .or_else(|| hit_room(scene_pt, rooms, placement, scale).map(Hit::Room))
}
