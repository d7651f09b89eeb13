//! Engine-wide tunables.

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_CANVAS_ANCHOR, ISO_HEIGHT_RATIO, LAYOUT_GAP_PX, MAX_ROW_WIDTH_PX, SCALE_PX_PER_M, WALL_THICKNESS_PX,
};
use crate::viewport::Point;

/// Geometry and layout settings shared by every engine component.
///
/// All lengths except `scale` are in scene pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanSettings {
    /// Meters → pixels.
    pub scale: f64,
    /// Drawn wall thickness; twice this is the adjacency tolerance.
    pub wall_thickness: f64,
    /// Gap between unrelated rooms and between flow rows.
    pub layout_gap: f64,
    /// Row width at which the layout flow wraps.
    pub max_row_width: f64,
    /// Snap grid cell size. One meter by default.
    pub grid_size: f64,
    /// Screen point the plan center is aligned with by `center_view`.
    pub canvas_anchor: Point,
    /// Fraction of ceiling height drawn in the isometric view.
    pub iso_height_ratio: f64,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            scale: SCALE_PX_PER_M,
            wall_thickness: WALL_THICKNESS_PX,
            layout_gap: LAYOUT_GAP_PX,
            max_row_width: MAX_ROW_WIDTH_PX,
            grid_size: SCALE_PX_PER_M,
            canvas_anchor: Point::new(DEFAULT_CANVAS_ANCHOR.0, DEFAULT_CANVAS_ANCHOR.1),
            iso_height_ratio: ISO_HEIGHT_RATIO,
        }
    }
}

impl PlanSettings {
    /// Maximum perpendicular gap between two facing walls that still counts as shared.
    #[must_use]
    pub fn adjacency_tolerance(&self) -> f64 {
        self.wall_thickness * 2.0
    }

    /// Convert meters to scene pixels.
    #[must_use]
    pub fn px(&self, meters: f64) -> f64 {
        meters * self.scale
    }
}
