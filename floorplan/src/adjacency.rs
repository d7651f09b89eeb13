//! Shared-wall inference from room geometry.
//!
//! Two placed rooms share a wall when a wall of one faces a wall of the other
//! across a perpendicular gap smaller than the adjacency tolerance and the two
//! walls overlap along their common axis. Declared adjacency does not create
//! edges; it only marks them, and declared pairs with no geometric boundary
//! are reported separately so the host can flag rooms that drifted apart.
//!
//! Results are derived state. They are recomputed from scratch after every
//! placement or footprint change; O(n²) over rooms is fine at plan sizes.

#[cfg(test)]
#[path = "adjacency_test.rs"]
mod adjacency_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{Rect, rectangle_of};
use crate::model::{Placement, Room, RoomId, Wall};
use crate::settings::PlanSettings;
use crate::viewport::Point;

/// A shared boundary between two rooms.
///
/// `shared_wall` is the wall of `room_a`; `room_b` touches it with the opposite wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjacencyEdge {
    pub room_a: RoomId,
    pub room_b: RoomId,
    pub shared_wall: Wall,
    pub segment_start: Point,
    pub segment_end: Point,
    /// Whether either room declared the other as a neighbor.
    pub declared: bool,
}

impl AdjacencyEdge {
    /// The same boundary seen from `room_b`.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self { room_a: self.room_b, room_b: self.room_a, shared_wall: self.shared_wall.opposite(), ..*self }
    }

    /// Length of the shared segment in scene pixels.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.segment_start.distance(self.segment_end)
    }

    fn involves(&self, id: &RoomId) -> bool {
        self.room_a == *id || self.room_b == *id
    }
}

/// Output of one detector run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Adjacency {
    edges: Vec<AdjacencyEdge>,
    unmatched: Vec<(RoomId, RoomId)>,
}

impl Adjacency {
    /// One edge per adjacent pair; `room_a` is the pair member that comes first in input order.
    #[must_use]
    pub fn edges(&self) -> &[AdjacencyEdge] {
        &self.edges
    }

    /// The edge between two rooms, oriented so that `room_a == a`.
    #[must_use]
    pub fn between(&self, a: &RoomId, b: &RoomId) -> Option<AdjacencyEdge> {
        self.edges.iter().find_map(|edge| {
            if edge.room_a == *a && edge.room_b == *b {
                Some(*edge)
            } else if edge.room_a == *b && edge.room_b == *a {
                Some(edge.reversed())
            } else {
                None
            }
        })
    }

    /// Every edge touching `id`, oriented from `id`.
    pub fn edges_of<'a>(&'a self, id: &'a RoomId) -> impl Iterator<Item = AdjacencyEdge> + 'a {
        self.edges
            .iter()
            .filter(move |edge| edge.involves(id))
            .map(move |edge| if edge.room_a == *id { *edge } else { edge.reversed() })
    }

    /// Declared pairs (declarer first) whose rooms are placed but no longer share a wall.
    #[must_use]
    pub fn unmatched_declarations(&self) -> &[(RoomId, RoomId)] {
        &self.unmatched
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Find the wall of `a` shared with `b`, if any.
///
/// Returns the wall side of `a` and the shared segment. When more than one
/// side qualifies the one with the longest overlap wins.
#[must_use]
pub fn shared_boundary(a: &Rect, b: &Rect, tolerance: f64) -> Option<(Wall, Point, Point)> {
    let y_lo = a.y.max(b.y);
    let y_hi = a.bottom().min(b.bottom());
    let x_lo = a.x.max(b.x);
    let x_hi = a.right().min(b.right());

    let candidates = [
        (Wall::Right, b.x - a.right(), y_hi - y_lo),
        (Wall::Left, a.x - b.right(), y_hi - y_lo),
        (Wall::Bottom, b.y - a.bottom(), x_hi - x_lo),
        (Wall::Top, a.y - b.bottom(), x_hi - x_lo),
    ];

    let (wall, _, _) = candidates
        .into_iter()
        .filter(|(_, gap, span)| gap.abs() < tolerance && *span > 0.0)
        .fold(None, |best: Option<(Wall, f64, f64)>, cand| match best {
            Some(b) if b.2 >= cand.2 => Some(b),
            _ => Some(cand),
        })?;

    let segment = match wall {
        Wall::Right => {
            let x = (a.right() + b.x) / 2.0;
            (Point::new(x, y_lo), Point::new(x, y_hi))
        }
        Wall::Left => {
            let x = (a.x + b.right()) / 2.0;
            (Point::new(x, y_lo), Point::new(x, y_hi))
        }
        Wall::Bottom => {
            let y = (a.bottom() + b.y) / 2.0;
            (Point::new(x_lo, y), Point::new(x_hi, y))
        }
        Wall::Top => {
            let y = (a.y + b.bottom()) / 2.0;
            (Point::new(x_lo, y), Point::new(x_hi, y))
        }
    };
    Some((wall, segment.0, segment.1))
}

/// Run the detector over the current plan.
///
/// Unmeasured or unplaced rooms are skipped without producing edges.
#[must_use]
pub fn detect(rooms: &[Room], placement: &Placement, settings: &PlanSettings) -> Adjacency {
    let placed: Vec<(&Room, Rect)> = rooms
        .iter()
        .filter(|room| room.is_measured())
        .filter_map(|room| placement.get(&room.id).map(|pos| (room, rectangle_of(room, pos, settings.scale))))
        .collect();
    let skipped = rooms.len() - placed.len();

    let declared: HashSet<(RoomId, RoomId)> = rooms
        .iter()
        .flat_map(|room| room.declared_adjacency.iter().map(move |other| pair_key(room.id, *other)))
        .collect();

    let tolerance = settings.adjacency_tolerance();
    let mut edges = Vec::new();
    for (i, (room_a, rect_a)) in placed.iter().enumerate() {
        for (room_b, rect_b) in &placed[i + 1..] {
            if room_a.id == room_b.id {
                continue;
            }
            if let Some((wall, start, end)) = shared_boundary(rect_a, rect_b, tolerance) {
                edges.push(AdjacencyEdge {
                    room_a: room_a.id,
                    room_b: room_b.id,
                    shared_wall: wall,
                    segment_start: start,
                    segment_end: end,
                    declared: declared.contains(&pair_key(room_a.id, room_b.id)),
                });
            }
        }
    }

    let placed_ids: HashSet<RoomId> = placed.iter().map(|(room, _)| room.id).collect();
    let matched: HashSet<(RoomId, RoomId)> = edges.iter().map(|e| pair_key(e.room_a, e.room_b)).collect();
    let mut reported = HashSet::new();
    let mut unmatched = Vec::new();
    for room in rooms {
        for other in &room.declared_adjacency {
            let key = pair_key(room.id, *other);
            if *other == room.id || !placed_ids.contains(&room.id) || !placed_ids.contains(other) {
                continue;
            }
            if !matched.contains(&key) && reported.insert(key) {
                unmatched.push((room.id, *other));
            }
        }
    }

    debug!(rooms = rooms.len(), skipped, edges = edges.len(), unmatched = unmatched.len(), "adjacency recomputed");
    Adjacency { edges, unmatched }
}

fn pair_key(a: RoomId, b: RoomId) -> (RoomId, RoomId) {
    if a <= b { (a, b) } else { (b, a) }
}
