#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ZOOM, MIN_ZOOM, SCALE_PX_PER_M, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};
use crate::geometry::Bounds;

/// A point in either screen or scene space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Pan/zoom/snap state of a plan session.
///
/// `pan` is in screen pixels, `zoom` is a scale factor (1.0 = no zoom),
/// `grid_size` is in scene pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: f64,
    pub pan: Point,
    pub snap_to_grid: bool,
    pub grid_size: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { zoom: 1.0, pan: Point::default(), snap_to_grid: false, grid_size: SCALE_PX_PER_M }
    }
}

impl Viewport {
    /// Viewport with the default zoom/pan and the given grid cell size.
    #[must_use]
    pub fn with_grid(grid_size: f64) -> Self {
        let mut viewport = Self::default();
        viewport.set_grid_size(grid_size);
        viewport
    }

    /// Convert a screen-space point to scene coordinates.
    #[must_use]
    pub fn screen_to_scene(&self, screen: Point) -> Point {
        Point { x: (screen.x - self.pan.x) / self.zoom, y: (screen.y - self.pan.y) / self.zoom }
    }

    /// Convert a scene-space point to screen coordinates.
    #[must_use]
    pub fn scene_to_screen(&self, scene: Point) -> Point {
        Point { x: scene.x * self.zoom + self.pan.x, y: scene.y * self.zoom + self.pan.y }
    }

    /// Shift the pan by a raw screen-pixel delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan.x += dx;
        self.pan.y += dy;
    }

    /// Apply one wheel notch: positive `dy` (scroll down) zooms out, negative zooms in.
    ///
    /// Returns `true` if the zoom changed.
    pub fn apply_wheel(&mut self, dy: f64) -> bool {
        let factor = if dy > 0.0 {
            ZOOM_OUT_FACTOR
        } else if dy < 0.0 {
            ZOOM_IN_FACTOR
        } else {
            return false;
        };
        let before = self.zoom;
        self.set_zoom(self.zoom * factor);
        (self.zoom - before).abs() > f64::EPSILON
    }

    /// Set zoom, clamped to the supported range. Non-finite input resets to 1.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = if zoom.is_finite() { zoom.clamp(MIN_ZOOM, MAX_ZOOM) } else { 1.0 };
    }

    /// Set the grid cell size. Non-positive sizes are ignored.
    pub fn set_grid_size(&mut self, grid_size: f64) {
        if grid_size.is_finite() && grid_size > 0.0 {
            self.grid_size = grid_size;
        }
    }

    /// Restore zoom 1 and zero pan. Snap settings are left alone.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan = Point::default();
    }

    /// Reset zoom and pan so the center of `bounds` lands on `anchor` (screen space).
    pub fn center_on(&mut self, bounds: &Bounds, anchor: Point) {
        self.zoom = 1.0;
        let center = bounds.center();
        self.pan = Point::new(anchor.x - center.x, anchor.y - center.y);
    }

    /// Round a scene coordinate to the grid when snapping is on.
    #[must_use]
    pub fn snap(&self, value: f64) -> f64 {
        if self.snap_to_grid && self.grid_size > 0.0 {
            (value / self.grid_size).round() * self.grid_size
        } else {
            value
        }
    }

    /// Snap both axes of a point.
    #[must_use]
    pub fn snap_point(&self, p: Point) -> Point {
        Point::new(self.snap(p.x), self.snap(p.y))
    }
}
