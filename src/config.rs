//! Plan settings parsed from environment variables.

use floorplan::settings::PlanSettings;

pub const SCALE_VAR: &str = "FLOORPLAN_SCALE";
pub const WALL_THICKNESS_VAR: &str = "FLOORPLAN_WALL_THICKNESS";
pub const LAYOUT_GAP_VAR: &str = "FLOORPLAN_LAYOUT_GAP";
pub const MAX_ROW_WIDTH_VAR: &str = "FLOORPLAN_MAX_ROW_WIDTH";
pub const GRID_SIZE_VAR: &str = "FLOORPLAN_GRID_SIZE";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a number: {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("{var} must be positive, got {value}")]
    NonPositive { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanConfig {
    pub settings: PlanSettings,
}

impl PlanConfig {
    /// Build plan settings from the process environment.
    ///
    /// Every variable is optional; absent ones keep the engine default.
    /// - `FLOORPLAN_SCALE`: pixels per meter
    /// - `FLOORPLAN_WALL_THICKNESS`: wall thickness in pixels
    /// - `FLOORPLAN_LAYOUT_GAP`: gap between unrelated rooms in pixels
    /// - `FLOORPLAN_MAX_ROW_WIDTH`: layout row wrap width in pixels
    /// - `FLOORPLAN_GRID_SIZE`: snap grid cell in pixels (defaults to one meter)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PlanConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut settings = PlanSettings::default();
        if let Some(scale) = parse_positive(&lookup, SCALE_VAR)? {
            settings.scale = scale;
            settings.grid_size = scale;
        }
        if let Some(thickness) = parse_positive(&lookup, WALL_THICKNESS_VAR)? {
            settings.wall_thickness = thickness;
        }
        if let Some(gap) = parse_positive(&lookup, LAYOUT_GAP_VAR)? {
            settings.layout_gap = gap;
        }
        if let Some(width) = parse_positive(&lookup, MAX_ROW_WIDTH_VAR)? {
            settings.max_row_width = width;
        }
        if let Some(grid) = parse_positive(&lookup, GRID_SIZE_VAR)? {
            settings.grid_size = grid;
        }
        Ok(Self { settings })
    }
}

fn parse_positive(lookup: &impl Fn(&str) -> Option<String>, var: &'static str) -> Result<Option<f64>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| ConfigError::Invalid { var, value: raw.clone() })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::NonPositive { var, value: raw });
    }
    Ok(Some(value))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
