//! Auto-layout: initial positions from declared adjacency.
//!
//! Rooms are visited in input order. Each unvisited room starts a chain at
//! the flow cursor, and a depth-first walk of the hint graph lines its
//! declared neighbors up to the right, one wall thickness apart. Chains flow
//! left to right and wrap to a new row past `max_row_width`.
//!
//! Rooms inside one chain never overlap: every room is placed right of
//! everything already in its chain. Separate chains are only kept apart along
//! the flow; nothing here stops a user from dragging one room onto another.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::model::{Placement, Position, Room, RoomId};
use crate::settings::PlanSettings;

/// Lay out every room from scratch.
#[must_use]
pub fn arrange(rooms: &[Room], settings: &PlanSettings) -> Placement {
    plan(rooms, None, settings)
}

/// Keep cached positions and lay out only the rooms that lack one.
///
/// New rooms flow in below the cached content. Cached entries for ids that are
/// not in `rooms` are dropped.
#[must_use]
pub fn plan(rooms: &[Room], cached: Option<&Placement>, settings: &PlanSettings) -> Placement {
    let mut placement: Placement = rooms
        .iter()
        .filter_map(|room| cached.and_then(|c| c.get(&room.id)).map(|pos| (room.id, pos)))
        .collect();

    let pending: Vec<&Room> = rooms.iter().filter(|room| !placement.contains(&room.id)).collect();
    if pending.is_empty() {
        return placement;
    }

    let start_y = rooms
        .iter()
        .filter(|room| room.is_measured())
        .filter_map(|room| placement.get(&room.id).map(|pos| pos.y + settings.px(room.depth)))
        .fold(None, |acc: Option<f64>, bottom| Some(acc.map_or(bottom, |a| a.max(bottom))))
        .map_or(0.0, |bottom| bottom + settings.layout_gap);

    let planner = Planner::new(&pending, settings);
    let mut visited = HashSet::new();
    let mut cursor_x = 0.0;
    let mut row_y = start_y;
    let mut row_height: f64 = 0.0;
    let mut rows = 1;

    for room in &pending {
        if visited.contains(&room.id) {
            continue;
        }
        let mut chain = Chain::default();
        planner.walk(room.id, 0.0, &mut chain, &mut visited);

        if cursor_x > 0.0 && cursor_x + chain.width > settings.max_row_width {
            row_y += row_height + settings.layout_gap;
            cursor_x = 0.0;
            row_height = 0.0;
            rows += 1;
        }
        for (id, offset_x) in chain.members {
            placement.set(id, Position::new(cursor_x + offset_x, row_y));
        }
        cursor_x += chain.width + settings.layout_gap;
        row_height = row_height.max(chain.height);
    }

    debug!(placed = pending.len(), cached = rooms.len() - pending.len(), rows, "auto-layout complete");
    placement
}

/// Rooms placed by one depth-first walk, with x offsets relative to the chain start.
#[derive(Debug, Default)]
struct Chain {
    members: Vec<(RoomId, f64)>,
    width: f64,
    height: f64,
}

struct Planner<'a> {
    rooms: HashMap<RoomId, &'a Room>,
    hints: HashMap<RoomId, Vec<RoomId>>,
    settings: &'a PlanSettings,
}

impl<'a> Planner<'a> {
    /// Build the hint graph over `rooms`.
    ///
    /// A room's own declarations come first, followed by rooms that declared
    /// it, so a neighbor named only by the later room is still pulled in.
    fn new(rooms: &[&'a Room], settings: &'a PlanSettings) -> Self {
        let by_id: HashMap<RoomId, &Room> = rooms.iter().map(|room| (room.id, *room)).collect();
        let mut hints: HashMap<RoomId, Vec<RoomId>> = HashMap::new();
        let mut link = |from: RoomId, to: RoomId| {
            let list = hints.entry(from).or_default();
            if from != to && !list.contains(&to) {
                list.push(to);
            }
        };
        for room in rooms {
            for other in room.declared_adjacency.iter().filter(|id| by_id.contains_key(*id)) {
                link(room.id, *other);
            }
        }
        for room in rooms {
            for other in room.declared_adjacency.iter().filter(|id| by_id.contains_key(*id)) {
                link(*other, room.id);
            }
        }
        Self { rooms: by_id, hints, settings }
    }

    fn footprint(&self, room: &Room) -> (f64, f64) {
        if room.is_measured() {
            (self.settings.px(room.width), self.settings.px(room.depth))
        } else {
            (0.0, 0.0)
        }
    }

    /// Place `id` at `offset_x` within `chain`, then each unvisited neighbor
    /// right of everything placed so far.
    fn walk(&self, id: RoomId, offset_x: f64, chain: &mut Chain, visited: &mut HashSet<RoomId>) {
        if !visited.insert(id) {
            return;
        }
        let Some(room) = self.rooms.get(&id) else {
            return;
        };
        let (width, height) = self.footprint(room);
        chain.members.push((id, offset_x));
        chain.width = chain.width.max(offset_x + width);
        chain.height = chain.height.max(height);

        // Unmeasured rooms hold a slot but pull in no neighbors.
        if !room.is_measured() {
            return;
        }
        let Some(neighbors) = self.hints.get(&id) else {
            return;
        };
        for next in neighbors {
            let measured = self.rooms.get(next).is_some_and(|r| r.is_measured());
            if visited.contains(next) || !measured {
                continue;
            }
            let next_x = chain.width + self.settings.wall_thickness;
            self.walk(*next, next_x, chain, visited);
        }
    }
}
