//! Driver settings
//!
//! Tuning for the real-time tick driver. Gameplay parameters live in
//! [`crate::levels`]; these only control pacing and shutdown.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_TICK_DT, TICK_RATE_HZ};

/// Tick driver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Target ticks per second (the driver sleeps when running faster)
    pub tick_rate_hz: u32,
    /// Upper bound on a single tick's integration step, in seconds
    pub max_step_secs: f32,
    /// How long `stop()` waits for the in-flight tick before detaching
    pub stop_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate_hz: TICK_RATE_HZ,
            max_step_secs: MAX_TICK_DT,
            stop_timeout_ms: 1000,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, falling back to defaults for missing fields
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Self = serde_json::from_str(json)?;
        log::info!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    /// Frame interval the driver paces itself to
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_rate_hz.max(1)))
    }

    /// Effective max step (never above the global ceiling, never negative)
    pub fn max_step(&self) -> f32 {
        if self.max_step_secs.is_finite() {
            self.max_step_secs.clamp(0.0, MAX_TICK_DT)
        } else {
            MAX_TICK_DT
        }
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }
}
