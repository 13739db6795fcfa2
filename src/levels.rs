//! Level configuration
//!
//! Static per-level parameters. Immutable once loaded; the shipped table lives
//! in [`builtin_levels`], custom tables load from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-level course parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Display label only
    pub name: String,
    /// Desired number of bars (signed so bad data degenerates instead of failing)
    pub bar_count: i32,
    /// Fraction of viewport width left open in every bar
    pub gap_fraction: f32,
    /// Scroll speed in pixels per second
    pub bar_speed: f32,
}

impl LevelConfig {
    pub fn new(name: impl Into<String>, bar_count: i32, gap_fraction: f32, bar_speed: f32) -> Self {
        Self {
            name: name.into(),
            bar_count,
            gap_fraction,
            bar_speed,
        }
    }

    /// Whether this configuration can produce a non-empty course
    pub fn is_playable(&self) -> bool {
        self.bar_count > 0
            && self.gap_fraction.is_finite()
            && self.gap_fraction > 0.0
            && self.gap_fraction < 1.0
            && self.bar_speed.is_finite()
            && self.bar_speed > 0.0
    }
}

/// The ten shipped levels, easiest first
pub fn builtin_levels() -> Vec<LevelConfig> {
    const TABLE: [(i32, f32, f32); 10] = [
        (6, 0.35, 250.0),
        (7, 0.32, 280.0),
        (8, 0.30, 320.0),
        (9, 0.28, 360.0),
        (10, 0.26, 400.0),
        (12, 0.25, 440.0),
        (14, 0.24, 500.0),
        (16, 0.23, 560.0),
        (18, 0.22, 620.0),
        (20, 0.21, 700.0),
    ];

    TABLE
        .iter()
        .enumerate()
        .map(|(i, &(bars, gap, speed))| LevelConfig::new(format!("Level {}", i + 1), bars, gap, speed))
        .collect()
}

/// Errors loading a level table
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("invalid level JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level table is empty")]
    Empty,
}

/// Parse a JSON array of levels
///
/// Unplayable entries are kept (they degenerate to an immediate win) but logged.
pub fn levels_from_json(json: &str) -> Result<Vec<LevelConfig>, LevelError> {
    let levels: Vec<LevelConfig> = serde_json::from_str(json)?;
    if levels.is_empty() {
        return Err(LevelError::Empty);
    }

    for level in levels.iter().filter(|l| !l.is_playable()) {
        log::warn!(
            "Level '{}' is not playable (bars={}, gap={}, speed={}); it will finish immediately",
            level.name,
            level.bar_count,
            level.gap_fraction,
            level.bar_speed
        );
    }

    log::info!("Loaded {} levels", levels.len());
    Ok(levels)
}
