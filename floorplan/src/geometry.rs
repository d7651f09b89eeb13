//! Pure geometric helpers over rooms and placements.
//!
//! Everything here is stateless and infallible. Inputs are assumed to have
//! passed through [`crate::model::Room::normalized`].

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::consts::BOUNDS_PADDING_PX;
use crate::model::{Fixture, Placement, Position, Room, Wall};
use crate::viewport::Point;

/// Axis-aligned rectangle in scene pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether `p` lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Area of the intersection with `other`; zero when they only touch.
    #[must_use]
    pub fn overlap_area(&self, other: &Rect) -> f64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w > 0.0 && h > 0.0 { w * h } else { 0.0 }
    }

    /// Endpoints of one wall, ordered left-to-right or top-to-bottom.
    #[must_use]
    pub fn wall_segment(&self, wall: Wall) -> (Point, Point) {
        match wall {
            Wall::Top => (Point::new(self.x, self.y), Point::new(self.right(), self.y)),
            Wall::Bottom => (Point::new(self.x, self.bottom()), Point::new(self.right(), self.bottom())),
            Wall::Left => (Point::new(self.x, self.y), Point::new(self.x, self.bottom())),
            Wall::Right => (Point::new(self.right(), self.y), Point::new(self.right(), self.bottom())),
        }
    }
}

/// Scene extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Bounds enclosing a set of points, or `None` for an empty set.
    #[must_use]
    pub fn around(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        points.into_iter().fold(None, |acc: Option<Bounds>, p| {
            Some(match acc {
                None => Bounds { min_x: p.x, min_y: p.y, max_x: p.x, max_y: p.y },
                Some(b) => Bounds {
                    min_x: b.min_x.min(p.x),
                    min_y: b.min_y.min(p.y),
                    max_x: b.max_x.max(p.x),
                    max_y: b.max_y.max(p.y),
                },
            })
        })
    }

    /// Grow on every side by `margin`.
    #[must_use]
    pub fn padded(self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }
}

/// Room footprint in scene pixels at `position`.
#[must_use]
pub fn rectangle_of(room: &Room, position: Position, scale: f64) -> Rect {
    Rect::new(position.x, position.y, room.width * scale, room.depth * scale)
}

/// Perimeter in meters.
///
/// With both dimensions known this is exact: `2 × (width + depth)`.
/// Otherwise it falls back to a square room of the declared area
/// (`4 × √area`). The fallback is an estimate, not a measurement. With neither
/// available the perimeter is zero.
#[must_use]
pub fn perimeter(room: &Room) -> f64 {
    if room.is_measured() {
        return 2.0 * (room.width + room.depth);
    }
    match room.area {
        Some(area) if area.is_finite() && area > 0.0 => 4.0 * area.sqrt(),
        _ => 0.0,
    }
}

/// Padded extents of every measured, placed room.
///
/// An empty plan yields a padded box around the origin.
#[must_use]
pub fn bounds_of(rooms: &[Room], placement: &Placement, scale: f64) -> Bounds {
    let corners = rooms
        .iter()
        .filter(|room| room.is_measured())
        .filter_map(|room| placement.get(&room.id).map(|pos| rectangle_of(room, pos, scale)))
        .flat_map(|rect| [Point::new(rect.x, rect.y), Point::new(rect.right(), rect.bottom())]);
    Bounds::around(corners)
        .unwrap_or(Bounds { min_x: 0.0, min_y: 0.0, max_x: 0.0, max_y: 0.0 })
        .padded(BOUNDS_PADDING_PX)
}

/// Where a fixture sits on its wall, in scene pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixtureSpan {
    pub start: Point,
    pub end: Point,
    pub center: Point,
    /// Width along the wall, never more than the wall length.
    pub width: f64,
}

/// Map a fixture's wall + offset onto a room rectangle.
///
/// The center sits at `offset_percent` of the wall length, then slides inward
/// as needed so the whole fixture stays on the wall.
#[must_use]
pub fn fixture_span(rect: &Rect, fixture: &Fixture, scale: f64) -> FixtureSpan {
    let (start, end) = rect.wall_segment(fixture.wall);
    let wall_len = start.distance(end);
    let width = (fixture.width_m() * scale).min(wall_len);
    let half = width / 2.0;
    let along = (fixture.offset_fraction() * wall_len).clamp(half, (wall_len - half).max(half));

    let at = |t: f64| {
        if fixture.wall.is_horizontal() { Point::new(start.x + t, start.y) } else { Point::new(start.x, start.y + t) }
    };
    FixtureSpan { start: at(along - half), end: at(along + half), center: at(along), width }
}
