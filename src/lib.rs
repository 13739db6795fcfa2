//! Gap Runner - a scrolling-barrier obstacle course
//!
//! Core modules:
//! - `sim`: Deterministic simulation (course generation, physics, collisions, game state)
//! - `platform`: Real-time driver thread, command queue and snapshot hand-off
//! - `levels`: Level configuration table and loading
//! - `settings`: Driver tuning

pub mod levels;
pub mod platform;
pub mod settings;
pub mod sim;

pub use levels::{LevelConfig, LevelError, builtin_levels, levels_from_json};
pub use platform::Simulation;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Largest step a single tick may integrate (50 ms), bounds error after stalls
    pub const MAX_TICK_DT: f32 = 0.05;
    /// Default driver tick rate
    pub const TICK_RATE_HZ: u32 = 120;

    /// Minimum scroll-axis spacing between bars, in avatar radii
    pub const MIN_SPACING_RADII: f32 = 4.0;
    /// Slack on the avatar's reachable drift between consecutive gaps
    pub const REACH_SLACK: f32 = 1.25;
    /// Fraction of the reachable drift treated as "no movement"
    pub const MIN_DRIFT_FACTOR: f32 = 0.35;
    /// Scroll-axis length of a course, in viewport heights
    pub const COURSE_SCREENS: f32 = 2.0;

    /// Avatar defaults (fractions of the viewport)
    pub const AVATAR_RADIUS_FRACTION: f32 = 0.04;
    pub const MIN_AVATAR_RADIUS: f32 = 24.0;
    /// Cross-axis speed in viewport widths per second
    pub const AVATAR_SPEED_FRACTION: f32 = 0.75;
    /// Lane position as a fraction of viewport height (scroll axis grows downward)
    pub const LANE_FRACTION: f32 = 0.8;

    /// Bar defaults - a thin horizontal band
    pub const BAR_THICKNESS_FRACTION: f32 = 0.03;
    pub const MIN_BAR_THICKNESS: f32 = 24.0;
}
