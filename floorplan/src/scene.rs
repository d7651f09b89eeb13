//! Scene emitter: turns the plan into renderer-agnostic drawing primitives.
//!
//! Primitives are listed back to front. Everything is in scene pixels; the
//! host applies the viewport transform when drawing. The emitted list is the
//! only thing a rendering surface needs: it carries no input or animation state.
//!
//! Layers in the 2D plan, bottom first:
//!
//! 1. room floors, tinted by category
//! 2. outer walls, then shared walls (dashed) on top
//! 3. doors and windows
//! 4. room name and dimension labels
//! 5. selection outline
//! 6. measurement overlay
//! 7. annotations
//!
//! The isometric view draws rooms back to front (see [`iso::depth_key`]) with
//! each room's floor, front faces, fixtures, roof outline and label together.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use serde::{Deserialize, Serialize};

use crate::adjacency::Adjacency;
use crate::consts::{ANNOTATION_H_PX, ANNOTATION_W_PX, BOUNDS_PADDING_PX};
use crate::geometry::{Bounds, Rect, bounds_of, fixture_span, rectangle_of};
use crate::hit::annotation_rect;
use crate::iso::{self, depth_key, project_fixture, project_room, wall_height};
use crate::model::{Annotation, Fixture, FixtureKind, Placement, Room, RoomCategory, RoomId};
use crate::settings::PlanSettings;
use crate::viewport::Point;

const WALL_COLOR: &str = "#1F2937";
const SHARED_WALL_COLOR: &str = "#9CA3AF";
const SHARED_WALL_DASH: [f64; 2] = [6.0, 4.0];
const DOOR_COLOR: &str = "#92400E";
const WINDOW_FILL: &str = "#E0F2FE";
const WINDOW_STROKE: &str = "#1D4ED8";
const LABEL_COLOR: &str = "#111827";
const DIMENSION_COLOR: &str = "#4B5563";
const SELECTION_COLOR: &str = "#2563EB";
const MEASURE_COLOR: &str = "#DC2626";
const ANNOTATION_STROKE: &str = "#CA8A04";

const NAME_SIZE: f64 = 14.0;
const DIMENSION_SIZE: f64 = 11.0;
const NOTE_SIZE: f64 = 12.0;

/// Fill, stroke and dash attributes shared by every primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: f64,
    /// Dash pattern, alternating on/off lengths. Empty for a solid stroke.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dash: Vec<f64>,
    #[serde(default = "opaque")]
    pub opacity: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Default for Style {
    fn default() -> Self {
        Self { fill: None, stroke: None, stroke_width: 0.0, dash: Vec::new(), opacity: 1.0 }
    }
}

impl Style {
    #[must_use]
    pub fn filled(color: &str) -> Self {
        Self { fill: Some(color.to_owned()), ..Self::default() }
    }

    #[must_use]
    pub fn stroked(color: &str, width: f64) -> Self {
        Self { stroke: Some(color.to_owned()), stroke_width: width, ..Self::default() }
    }

    #[must_use]
    pub fn with_stroke(mut self, color: &str, width: f64) -> Self {
        self.stroke = Some(color.to_owned());
        self.stroke_width = width;
        self
    }

    #[must_use]
    pub fn dashed(mut self, pattern: &[f64]) -> Self {
        self.dash = pattern.to_vec();
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }
}

/// One drawable unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Rect { x: f64, y: f64, width: f64, height: f64, style: Style },
    Line { from: Point, to: Point, style: Style },
    Polygon { points: Vec<Point>, style: Style },
    /// Text centered horizontally on `at`, baseline at `at.y`.
    Label { at: Point, text: String, size: f64, style: Style },
}

impl Primitive {
    fn rect(rect: &Rect, style: Style) -> Self {
        Self::Rect { x: rect.x, y: rect.y, width: rect.width, height: rect.height, style }
    }

    fn label(at: Point, text: impl Into<String>, size: f64, color: &str) -> Self {
        Self::Label { at, text: text.into(), size, style: Style::filled(color) }
    }

    /// Geometric points this primitive touches. Labels contribute their anchor only.
    #[must_use]
    pub fn points(&self) -> Vec<Point> {
        match self {
            Self::Rect { x, y, width, height, .. } => vec![Point::new(*x, *y), Point::new(x + width, y + height)],
            Self::Line { from, to, .. } => vec![*from, *to],
            Self::Polygon { points, .. } => points.clone(),
            Self::Label { at, .. } => vec![*at],
        }
    }
}

/// Drawable primitives plus the canvas area they occupy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub primitives: Vec<Primitive>,
    pub bounds: Bounds,
}

/// Read-only view of everything the emitter draws.
#[derive(Debug, Clone, Copy)]
pub struct PlanView<'a> {
    pub rooms: &'a [Room],
    pub placement: &'a Placement,
    pub adjacency: &'a Adjacency,
    pub annotations: &'a [Annotation],
    pub selected_room: Option<RoomId>,
    pub measurement: &'a [Point],
    pub settings: &'a PlanSettings,
}

impl<'a> PlanView<'a> {
    /// Measured, placed rooms with their rectangles, in draw order.
    fn placed(&self) -> impl Iterator<Item = (&'a Room, Rect)> + 'a {
        let placement = self.placement;
        let scale = self.settings.scale;
        self.rooms
            .iter()
            .filter(|room| room.is_measured())
            .filter_map(move |room| placement.get(&room.id).map(|pos| (room, rectangle_of(room, pos, scale))))
    }
}

/// Colors for one room category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub floor: &'static str,
    /// Face above the bottom wall in the isometric view.
    pub face_left: &'static str,
    /// Face above the right wall in the isometric view.
    pub face_right: &'static str,
}

#[must_use]
pub fn palette(category: RoomCategory) -> Palette {
    match category {
        RoomCategory::Living => Palette { floor: "#FEF3C7", face_left: "#FCD34D", face_right: "#F59E0B" },
        RoomCategory::Bedroom => Palette { floor: "#DBEAFE", face_left: "#93C5FD", face_right: "#3B82F6" },
        RoomCategory::Kitchen => Palette { floor: "#FEE2E2", face_left: "#FCA5A5", face_right: "#EF4444" },
        RoomCategory::Bathroom => Palette { floor: "#D1FAE5", face_left: "#6EE7B7", face_right: "#10B981" },
        RoomCategory::Hallway => Palette { floor: "#F3F4F6", face_left: "#D1D5DB", face_right: "#9CA3AF" },
        RoomCategory::Other => Palette { floor: "#F5F5F4", face_left: "#D6D3D1", face_right: "#A8A29E" },
    }
}

/// Distance label text, in meters.
#[must_use]
pub fn format_meters(pixels: f64, scale: f64) -> String {
    if scale > 0.0 { format!("{:.2} m", pixels / scale) } else { "0.00 m".to_owned() }
}

fn dimension_text(room: &Room) -> String {
    format!("{:.1} × {:.1} m", room.width, room.depth)
}

// =============================================================================
// 2D plan
// =============================================================================

/// Emit the top-down plan.
#[must_use]
pub fn emit_plan(view: &PlanView<'_>) -> Scene {
    let settings = view.settings;
    let placed: Vec<(&Room, Rect)> = view.placed().collect();
    let mut out = Vec::new();

    for (room, rect) in &placed {
        out.push(Primitive::rect(rect, Style::filled(palette(room.category).floor)));
    }

    for (_, rect) in &placed {
        for (from, to) in outline(rect) {
            out.push(Primitive::Line { from, to, style: Style::stroked(WALL_COLOR, settings.wall_thickness / 2.0) });
        }
    }
    for edge in view.adjacency.edges() {
        out.push(Primitive::Line {
            from: edge.segment_start,
            to: edge.segment_end,
            style: Style::stroked(SHARED_WALL_COLOR, settings.wall_thickness / 2.0).dashed(&SHARED_WALL_DASH),
        });
    }

    for (room, rect) in &placed {
        for fixture in &room.fixtures {
            out.push(fixture_marker(rect, fixture, settings));
        }
    }

    for (room, rect) in &placed {
        let center = rect.center();
        out.push(Primitive::label(center, room.name.clone(), NAME_SIZE, LABEL_COLOR));
        out.push(Primitive::label(
            Point::new(center.x, center.y + NAME_SIZE + 2.0),
            dimension_text(room),
            DIMENSION_SIZE,
            DIMENSION_COLOR,
        ));
    }

    if let Some((_, rect)) = placed.iter().find(|(room, _)| Some(room.id) == view.selected_room) {
        out.push(Primitive::rect(rect, Style::stroked(SELECTION_COLOR, 2.0).dashed(&[4.0, 4.0])));
    }

    out.extend(measurement_overlay(view.measurement, settings.scale, |p| p));
    for annotation in view.annotations {
        out.extend(annotation_box(annotation, annotation.position));
    }

    let bounds = plan_bounds(view);
    Scene { primitives: out, bounds }
}

fn outline(rect: &Rect) -> [(Point, Point); 4] {
    let tl = Point::new(rect.x, rect.y);
    let tr = Point::new(rect.right(), rect.y);
    let br = Point::new(rect.right(), rect.bottom());
    let bl = Point::new(rect.x, rect.bottom());
    [(tl, tr), (tr, br), (br, bl), (bl, tl)]
}

/// Small rectangle straddling the wall at the fixture's span.
fn fixture_marker(rect: &Rect, fixture: &Fixture, settings: &PlanSettings) -> Primitive {
    let span = fixture_span(rect, fixture, settings.scale);
    let t = settings.wall_thickness;
    let marker = if fixture.wall.is_horizontal() {
        Rect::new(span.start.x, span.center.y - t / 2.0, span.width, t)
    } else {
        Rect::new(span.center.x - t / 2.0, span.start.y, t, span.width)
    };
    let style = match fixture.kind {
        FixtureKind::Door => Style::filled(DOOR_COLOR),
        FixtureKind::Window => Style::filled(WINDOW_FILL).with_stroke(WINDOW_STROKE, 1.0),
    };
    Primitive::rect(&marker, style)
}

/// Line and distance label. Nothing until both points exist.
fn measurement_overlay(points: &[Point], scale: f64, to_view: impl Fn(Point) -> Point) -> Vec<Primitive> {
    let [a, b] = points else {
        return Vec::new();
    };
    let (from, to) = (to_view(*a), to_view(*b));
    let mid = Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0 - 6.0);
    vec![
        Primitive::Line { from, to, style: Style::stroked(MEASURE_COLOR, 2.0).dashed(&[8.0, 4.0]) },
        Primitive::label(mid, format_meters(a.distance(*b), scale), DIMENSION_SIZE, MEASURE_COLOR),
    ]
}

fn annotation_box(annotation: &Annotation, at: Point) -> [Primitive; 2] {
    let rect = Rect::new(at.x, at.y, ANNOTATION_W_PX, ANNOTATION_H_PX);
    [
        Primitive::rect(&rect, Style::filled(&annotation.color).with_stroke(ANNOTATION_STROKE, 1.0)),
        Primitive::label(
            Point::new(rect.center().x, rect.center().y + NOTE_SIZE / 3.0),
            annotation.text.clone(),
            NOTE_SIZE,
            LABEL_COLOR,
        ),
    ]
}

/// Room bounds grown to cover annotations and the measurement.
fn plan_bounds(view: &PlanView<'_>) -> Bounds {
    let rooms = bounds_of(view.rooms, view.placement, view.settings.scale);
    let extras = view
        .annotations
        .iter()
        .map(annotation_rect)
        .flat_map(|r| [Point::new(r.x, r.y), Point::new(r.right(), r.bottom())])
        .chain(view.measurement.iter().copied());
    let corners = [Point::new(rooms.min_x, rooms.min_y), Point::new(rooms.max_x, rooms.max_y)];
    Bounds::around(corners.into_iter().chain(extras)).unwrap_or(rooms)
}

// =============================================================================
// Isometric
// =============================================================================

/// Emit the isometric view.
#[must_use]
pub fn emit_isometric(view: &PlanView<'_>) -> Scene {
    let settings = view.settings;
    let mut placed: Vec<(&Room, Rect)> = view.placed().collect();
    placed.sort_by(|a, b| depth_key(&a.1).total_cmp(&depth_key(&b.1)));
    let mut out = Vec::new();

    for (room, rect) in &placed {
        let colors = palette(room.category);
        let height = wall_height(room, settings);
        let projected = project_room(rect, height);
        let edge = Style::stroked(WALL_COLOR, 1.0);

        out.push(Primitive::Polygon { points: projected.floor.to_vec(), style: Style::filled(colors.floor) });
        for seg in view.adjacency.edges().iter().filter(|e| e.room_a == room.id) {
            out.push(Primitive::Line {
                from: iso::project(seg.segment_start),
                to: iso::project(seg.segment_end),
                style: Style::stroked(SHARED_WALL_COLOR, 2.0).dashed(&SHARED_WALL_DASH).with_opacity(0.8),
            });
        }
        out.push(Primitive::Polygon {
            points: projected.left_wall.to_vec(),
            style: Style::filled(colors.face_left).with_stroke(WALL_COLOR, 1.0),
        });
        out.push(Primitive::Polygon {
            points: projected.right_wall.to_vec(),
            style: Style::filled(colors.face_right).with_stroke(WALL_COLOR, 1.0),
        });
        for fixture in &room.fixtures {
            if let Some(quad) = project_fixture(rect, fixture, settings, height) {
                let style = match fixture.kind {
                    FixtureKind::Door => Style::filled(DOOR_COLOR),
                    FixtureKind::Window => Style::filled(WINDOW_FILL).with_stroke(WINDOW_STROKE, 1.0),
                };
                out.push(Primitive::Polygon { points: quad.to_vec(), style });
            }
        }
        let roof = if Some(room.id) == view.selected_room { Style::stroked(SELECTION_COLOR, 2.0) } else { edge };
        out.push(Primitive::Polygon { points: projected.roof.to_vec(), style: roof });
        out.push(Primitive::label(projected.label_anchor, room.name.clone(), NAME_SIZE, LABEL_COLOR));
    }

    out.extend(measurement_overlay(view.measurement, settings.scale, iso::project));
    for annotation in view.annotations {
        out.extend(annotation_box(annotation, iso::project(annotation.position)));
    }

    let bounds = Bounds::around(out.iter().flat_map(Primitive::points))
        .unwrap_or(Bounds { min_x: 0.0, min_y: 0.0, max_x: 0.0, max_y: 0.0 })
        .padded(BOUNDS_PADDING_PX);
    Scene { primitives: out, bounds }
}
