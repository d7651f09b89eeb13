//! Shared numeric constants for the floor-plan engine.

// ── Scale ───────────────────────────────────────────────────────

/// Meters → scene pixels conversion shared engine-wide.
pub const SCALE_PX_PER_M: f64 = 50.0;

/// Drawn wall thickness in scene pixels. Twice this is the adjacency tolerance.
pub const WALL_THICKNESS_PX: f64 = 8.0;

// ── Layout ──────────────────────────────────────────────────────

/// Gap between unrelated rooms (and between rows) in the auto-layout flow.
/// Kept above the adjacency tolerance so flow neighbors never read as shared walls.
pub const LAYOUT_GAP_PX: f64 = 40.0;

/// Running row width past which the flow cursor wraps to a new row.
pub const MAX_ROW_WIDTH_PX: f64 = 1200.0;

/// Padding added around room bounds when sizing the scene canvas.
pub const BOUNDS_PADDING_PX: f64 = 50.0;

// ── Viewport ────────────────────────────────────────────────────

/// Lower zoom bound.
pub const MIN_ZOOM: f64 = 0.3;

/// Upper zoom bound.
pub const MAX_ZOOM: f64 = 3.0;

/// Zoom multiplier applied per wheel-up notch.
pub const ZOOM_IN_FACTOR: f64 = 1.1;

/// Zoom multiplier applied per wheel-down notch.
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

/// Screen point that `center_view` aligns the plan center with when no
/// viewport size has been reported.
pub const DEFAULT_CANVAS_ANCHOR: (f64, f64) = (400.0, 300.0);

// ── Room defaults ───────────────────────────────────────────────

/// Ceiling height used when a room declares none (or an invalid one).
pub const DEFAULT_CEILING_HEIGHT_M: f64 = 2.5;

/// Default door size, width × height in meters.
pub const DOOR_SIZE_M: (f64, f64) = (0.9, 2.1);

/// Default window size, width × height in meters.
pub const WINDOW_SIZE_M: (f64, f64) = (1.2, 1.5);

/// Window sill height above the floor, in meters (isometric view only).
pub const WINDOW_SILL_M: f64 = 0.9;

// ── Annotations ─────────────────────────────────────────────────

/// Annotation box width in scene pixels.
pub const ANNOTATION_W_PX: f64 = 120.0;

/// Annotation box height in scene pixels.
pub const ANNOTATION_H_PX: f64 = 32.0;

/// Annotation color when none is given.
pub const DEFAULT_ANNOTATION_COLOR: &str = "#FFF3B0";

// ── Isometric projection ────────────────────────────────────────

/// Horizontal skew: cos(30°).
pub const ISO_SKEW_X: f64 = 0.866_025_403_784_438_6;

/// Vertical skew: sin(30°).
pub const ISO_SKEW_Y: f64 = 0.5;

/// Fraction of the true ceiling height drawn as wall height, so tall rooms do
/// not dwarf their footprint.
pub const ISO_HEIGHT_RATIO: f64 = 0.6;

// ── Export ──────────────────────────────────────────────────────

/// Raster export resolution relative to scene pixels.
pub const EXPORT_PIXEL_RATIO: f32 = 2.0;

/// Largest raster side accepted by export, in device pixels.
pub const MAX_RASTER_SIDE_PX: u32 = 16_384;
