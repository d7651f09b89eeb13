//! Flatten a scene to SVG text or a PNG bitmap.
//!
//! This is the only fallible part of the crate. A failed export returns an
//! [`ExportError`] and leaves every engine state it was given untouched: it
//! only ever reads a [`Scene`].

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use std::fmt::{self, Write};
use std::str::FromStr;

use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{EXPORT_PIXEL_RATIO, MAX_RASTER_SIDE_PX};
use crate::scene::{Primitive, Scene, Style};

/// Output encodings supported by [`export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Svg,
    Png,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Svg => "svg",
            Self::Png => "png",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            other => Err(ExportError::UnsupportedFormat(other.to_owned())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error("scene has no drawable area ({width}x{height})")]
    EmptyCanvas { width: f64, height: f64 },
    #[error("cannot allocate a {width}x{height} raster")]
    Allocation { width: u32, height: u32 },
    #[error("generated SVG did not parse: {0}")]
    Svg(#[from] usvg::Error),
    #[error("PNG encoding failed: {0}")]
    Encode(String),
    #[error("SVG serialization failed: {0}")]
    Format(#[from] fmt::Error),
}

/// Encode `scene` in `format`.
///
/// # Errors
///
/// Returns an error if the scene cannot be serialized or rasterized.
pub fn export(scene: &Scene, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    let bytes = match format {
        ExportFormat::Svg => to_svg(scene)?.into_bytes(),
        ExportFormat::Png => {
            let pixmap = rasterize(scene)?;
            pixmap.encode_png().map_err(|e| ExportError::Encode(e.to_string()))?
        }
    };
    debug!(%format, bytes = bytes.len(), primitives = scene.primitives.len(), "scene exported");
    Ok(bytes)
}

/// Serialize `scene` as a standalone SVG document sized to its bounds.
///
/// # Errors
///
/// Returns [`ExportError::Format`] if writing to the buffer fails.
pub fn to_svg(scene: &Scene) -> Result<String, ExportError> {
    let b = &scene.bounds;
    let (width, height) = (b.width().max(0.0), b.height().max(0.0));
    let mut svg = String::new();
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.2}" height="{height:.2}" viewBox="{:.2} {:.2} {width:.2} {height:.2}" font-family="sans-serif">"#,
        b.min_x, b.min_y,
    )?;
    for primitive in &scene.primitives {
        write_primitive(&mut svg, primitive)?;
    }
    svg.push_str("</svg>\n");
    Ok(svg)
}

fn write_primitive(out: &mut String, primitive: &Primitive) -> fmt::Result {
    match primitive {
        Primitive::Rect { x, y, width, height, style } => {
            writeln!(out, r#"  <rect x="{x:.2}" y="{y:.2}" width="{width:.2}" height="{height:.2}"{}/>"#, attrs(style))
        }
        Primitive::Line { from, to, style } => writeln!(
            out,
            r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}"{}/>"#,
            from.x,
            from.y,
            to.x,
            to.y,
            attrs(style)
        ),
        Primitive::Polygon { points, style } => {
            let list: Vec<String> = points.iter().map(|p| format!("{:.2},{:.2}", p.x, p.y)).collect();
            writeln!(out, r#"  <polygon points="{}"{}/>"#, list.join(" "), attrs(style))
        }
        Primitive::Label { at, text, size, style } => writeln!(
            out,
            r#"  <text x="{:.2}" y="{:.2}" font-size="{size:.1}" text-anchor="middle"{}>{}</text>"#,
            at.x,
            at.y,
            attrs(style),
            escape(text)
        ),
    }
}

fn attrs(style: &Style) -> String {
    let mut out = format!(r#" fill="{}""#, escape(style.fill.as_deref().unwrap_or("none")));
    if let Some(stroke) = &style.stroke {
        out.push_str(&format!(r#" stroke="{}" stroke-width="{:.2}""#, escape(stroke), style.stroke_width));
    }
    if !style.dash.is_empty() {
        let dash: Vec<String> = style.dash.iter().map(|d| format!("{d:.2}")).collect();
        out.push_str(&format!(r#" stroke-dasharray="{}""#, dash.join(" ")));
    }
    if style.opacity < 1.0 {
        out.push_str(&format!(r#" opacity="{:.2}""#, style.opacity));
    }
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render `scene` at twice its bounds over a white background.
///
/// # Errors
///
/// Returns an error if the bounds are empty, the raster is too large, or the
/// generated SVG does not parse.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rasterize(scene: &Scene) -> Result<Pixmap, ExportError> {
    let (width, height) = (scene.bounds.width(), scene.bounds.height());
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(ExportError::EmptyCanvas { width, height });
    }
    let ratio = f64::from(EXPORT_PIXEL_RATIO);
    let (px_w, px_h) = ((width * ratio).ceil(), (height * ratio).ceil());
    let limit = f64::from(MAX_RASTER_SIDE_PX);
    if px_w > limit || px_h > limit {
        return Err(ExportError::Allocation { width: px_w.min(limit) as u32, height: px_h.min(limit) as u32 });
    }
    let (px_w, px_h) = (px_w as u32, px_h as u32);

    let svg = to_svg(scene)?;
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(&svg, &options)?;

    let mut pixmap = Pixmap::new(px_w, px_h).ok_or(ExportError::Allocation { width: px_w, height: px_h })?;
    pixmap.fill(Color::WHITE);
    resvg::render(&tree, Transform::from_scale(EXPORT_PIXEL_RATIO, EXPORT_PIXEL_RATIO), &mut pixmap.as_mut());
    Ok(pixmap)
}
