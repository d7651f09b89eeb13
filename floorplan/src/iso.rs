//! Isometric projection of plan rectangles.
//!
//! Scene x runs down-right and scene y runs down-left on screen. Heights are
//! drawn straight up, so the two faces a viewer sees are the room's bottom
//! wall (front-left) and right wall (front-right).

#[cfg(test)]
#[path = "iso_test.rs"]
mod iso_test;

use serde::{Deserialize, Serialize};

use crate::consts::{ISO_SKEW_X, ISO_SKEW_Y, WINDOW_SILL_M};
use crate::geometry::{Rect, fixture_span};
use crate::model::{Fixture, FixtureKind, Room, Wall};
use crate::settings::PlanSettings;
use crate::viewport::Point;

/// Gap between the roof centroid and the label anchor.
const LABEL_LIFT_PX: f64 = 14.0;

/// Polygons for one room in the isometric view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsoRoom {
    pub floor: [Point; 4],
    /// Face above the bottom wall.
    pub left_wall: [Point; 4],
    /// Face above the right wall.
    pub right_wall: [Point; 4],
    pub roof: [Point; 4],
    pub label_anchor: Point,
}

/// Project a scene point onto the isometric plane.
#[must_use]
pub fn project(p: Point) -> Point {
    Point::new((p.x - p.y) * ISO_SKEW_X, (p.x + p.y) * ISO_SKEW_Y)
}

fn lift(p: Point, height: f64) -> Point {
    Point::new(p.x, p.y - height)
}

/// Drawn wall height for a room, in pixels.
#[must_use]
pub fn wall_height(room: &Room, settings: &PlanSettings) -> f64 {
    settings.px(room.ceiling_height) * settings.iso_height_ratio
}

/// Painter's order key: larger values are nearer the viewer and draw later.
#[must_use]
pub fn depth_key(rect: &Rect) -> f64 {
    rect.center().x + rect.center().y
}

/// Floor, front faces and roof of a plan rectangle raised by `height`.
#[must_use]
pub fn project_room(rect: &Rect, height: f64) -> IsoRoom {
    let floor = [
        project(Point::new(rect.x, rect.y)),
        project(Point::new(rect.right(), rect.y)),
        project(Point::new(rect.right(), rect.bottom())),
        project(Point::new(rect.x, rect.bottom())),
    ];
    let roof = floor.map(|p| lift(p, height));
    let [_, right, front, left] = floor;
    let face = |a: Point, b: Point| [a, b, lift(b, height), lift(a, height)];

    let centroid = Point::new(
        roof.iter().map(|p| p.x).sum::<f64>() / 4.0,
        roof.iter().map(|p| p.y).sum::<f64>() / 4.0,
    );
    IsoRoom {
        floor,
        left_wall: face(left, front),
        right_wall: face(front, right),
        roof,
        label_anchor: lift(centroid, LABEL_LIFT_PX),
    }
}

/// Quad for a fixture on one of the two visible faces.
///
/// Doors stand on the floor; windows start at sill height. Both are cut off at
/// the drawn wall height. Fixtures on the hidden top and left walls yield `None`.
#[must_use]
pub fn project_fixture(rect: &Rect, fixture: &Fixture, settings: &PlanSettings, wall_height: f64) -> Option<[Point; 4]> {
    if !matches!(fixture.wall, Wall::Bottom | Wall::Right) {
        return None;
    }
    let span = fixture_span(rect, fixture, settings.scale);
    let to_px = |meters: f64| settings.px(meters) * settings.iso_height_ratio;
    let base = match fixture.kind {
        FixtureKind::Door => 0.0,
        FixtureKind::Window => to_px(WINDOW_SILL_M),
    };
    let bottom = base.min(wall_height);
    let top = (base + to_px(fixture.height_m())).min(wall_height);

    let (a, b) = (project(span.start), project(span.end));
    Some([lift(a, bottom), lift(b, bottom), lift(b, top), lift(a, top)])
}
