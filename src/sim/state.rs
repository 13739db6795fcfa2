//! Game state and core simulation types
//!
//! Everything the driver owns for one run lives in [`GameState`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::generator::generate_bars;
use crate::consts::*;
use crate::levels::LevelConfig;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Course laid out, waiting for the start signal
    NotStarted,
    /// Active gameplay
    Playing,
    /// Hit a bar
    GameOver,
    /// Every bar cleared (terminal for this run)
    Win,
}

/// Notifications emitted by a tick, for the presentation side to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    LevelFailed,
    LevelComplete,
    /// Course regenerated after a retry
    RunReset,
}

/// Screen dimensions the course is laid out for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn avatar_radius(&self) -> f32 {
        (self.width * AVATAR_RADIUS_FRACTION).max(MIN_AVATAR_RADIUS)
    }

    #[inline]
    pub fn avatar_speed(&self) -> f32 {
        (self.width * AVATAR_SPEED_FRACTION).max(0.0)
    }

    /// Scroll-axis position of the avatar's lane
    #[inline]
    pub fn lane(&self) -> f32 {
        self.height * LANE_FRACTION
    }

    #[inline]
    pub fn bar_thickness(&self) -> f32 {
        (self.height * BAR_THICKNESS_FRACTION).max(MIN_BAR_THICKNESS)
    }

    /// Scroll-axis space the whole course is spread over
    #[inline]
    pub fn course_length(&self) -> f32 {
        self.height * COURSE_SCREENS
    }
}

/// Cross-axis heading of the avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// The player's avatar: a circle sliding along a fixed lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    pub cross_position: f32,
    /// Never changes during a run
    pub lane_position: f32,
    pub radius: f32,
    pub direction: Direction,
    pub speed: f32,
    /// Cross-axis extent the avatar bounces inside
    pub track_width: f32,
}

impl Avatar {
    /// Avatar centred on its lane, heading right
    pub fn new(viewport: Viewport) -> Self {
        Self {
            cross_position: viewport.width / 2.0,
            lane_position: viewport.lane(),
            radius: viewport.avatar_radius(),
            direction: Direction::Right,
            speed: viewport.avatar_speed(),
            track_width: viewport.width,
        }
    }

    /// Allowed range for `cross_position`
    #[inline]
    pub fn bounds(&self) -> (f32, f32) {
        (self.radius, self.track_width - self.radius)
    }

    /// Move along the cross axis, bouncing off either edge
    pub fn advance(&mut self, dt: f32) {
        let (min_x, max_x) = self.bounds();
        if min_x > max_x {
            // Track narrower than the avatar: pin to the middle
            self.cross_position = self.track_width / 2.0;
            return;
        }

        self.cross_position += self.direction.sign() * self.speed * dt;

        if self.cross_position <= min_x {
            self.cross_position = min_x;
            self.direction = Direction::Right;
        } else if self.cross_position >= max_x {
            self.cross_position = max_x;
            self.direction = Direction::Left;
        }
    }

    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.flipped();
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.cross_position - self.radius
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.cross_position + self.radius
    }

    /// Centre in screen space (x = cross axis, y = scroll axis)
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.cross_position, self.lane_position)
    }
}

/// A scrolling barrier spanning the track except for one gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Index in the course, nearest first
    pub id: u32,
    /// Leading edge on the scroll axis; grows as the bar approaches the lane
    pub position: f32,
    pub gap_start: f32,
    pub gap_width: f32,
    pub thickness: f32,
}

impl Bar {
    #[inline]
    pub fn gap_end(&self) -> f32 {
        self.gap_start + self.gap_width
    }

    #[inline]
    pub fn gap_center(&self) -> f32 {
        self.gap_start + self.gap_width / 2.0
    }

    /// Scroll toward the lane
    pub fn advance(&mut self, speed: f32, dt: f32) {
        self.position += speed * dt;
    }

    /// True once the bar can no longer touch the avatar
    pub fn is_past(&self, avatar: &Avatar) -> bool {
        self.position > avatar.lane_position + self.thickness.max(avatar.radius)
    }
}

/// RNG seed bookkeeping so every course in a run is reproducible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    /// Courses generated so far (bumped on every retry)
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed ^ self.stream.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

/// Complete state of one level run
#[derive(Debug, Clone)]
pub struct GameState {
    pub level: LevelConfig,
    pub viewport: Viewport,
    pub rng_state: RngState,
    pub phase: GamePhase,
    pub avatar: Avatar,
    /// Active bars, nearest first
    pub bars: Vec<Bar>,
    /// Seconds spent Playing this run
    pub elapsed: f32,
    pub bars_passed: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Lay out a fresh course for `level`
    pub fn new(level: LevelConfig, viewport: Viewport, seed: u64) -> Self {
        let mut state = Self {
            avatar: Avatar::new(viewport),
            level,
            viewport,
            rng_state: RngState::new(seed),
            phase: GamePhase::NotStarted,
            bars: Vec::new(),
            elapsed: 0.0,
            bars_passed: 0,
            time_ticks: 0,
            events: Vec::new(),
        };
        state.build_course();

        log::info!(
            "Run ready: '{}' with {} bars on {}x{} (seed {})",
            state.level.name,
            state.bars.len(),
            viewport.width,
            viewport.height,
            seed
        );
        state
    }

    /// Retry: new course from the same level, avatar back at the centre
    pub fn reset(&mut self) {
        self.rng_state.stream += 1;
        self.avatar = Avatar::new(self.viewport);
        self.bars.clear();
        self.elapsed = 0.0;
        self.bars_passed = 0;
        self.build_course();
        self.set_phase(GamePhase::NotStarted);
    }

    fn build_course(&mut self) {
        let mut rng = self.rng_state.to_rng();
        self.bars = generate_bars(
            &self.level,
            self.viewport,
            self.avatar.radius,
            self.avatar.speed,
            &mut rng,
        );
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?} after {:.2}s", self.phase, phase, self.elapsed);
            self.phase = phase;
        }
    }
}
