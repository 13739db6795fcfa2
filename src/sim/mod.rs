//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clamped timestep supplied by the caller
//! - Seeded RNG only
//! - Stable iteration order (bars nearest first)
//! - No threading or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod generator;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use autopilot::{play_out, wants_toggle};
pub use collision::{collides, first_collision, overlaps_lane};
pub use generator::{CourseLayout, PlacementRules, course_layout, generate_bars, generate_bars_with};
pub use snapshot::Snapshot;
pub use state::{Avatar, Bar, Direction, GameEvent, GamePhase, GameState, RngState, Viewport};
pub use tick::{Command, TickInput, apply_command, clamp_dt, tick};
