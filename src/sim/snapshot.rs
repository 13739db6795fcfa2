//! Read-only view of a run for the presentation side
//!
//! Captured once per tick after all updates, so a reader never sees a
//! half-applied tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Avatar, Bar, GamePhase, GameState, Viewport};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub level_name: String,
    pub viewport: Viewport,
    pub avatar: Avatar,
    /// Nearest first
    pub bars: Vec<Bar>,
    pub elapsed: f32,
    pub bars_passed: u32,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            time_ticks: state.time_ticks,
            phase: state.phase,
            level_name: state.level.name.clone(),
            viewport: state.viewport,
            avatar: state.avatar.clone(),
            bars: state.bars.clone(),
            elapsed: state.elapsed,
            bars_passed: state.bars_passed,
        }
    }

    pub fn avatar_center(&self) -> Vec2 {
        self.avatar.center()
    }

    /// Solid spans of a bar on the cross axis, for drawing
    pub fn solid_spans(&self, bar: &Bar) -> [(f32, f32); 2] {
        [(0.0, bar.gap_start), (bar.gap_end(), self.viewport.width)]
    }
}

impl From<&GameState> for Snapshot {
    fn from(state: &GameState) -> Self {
        Self::capture(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelConfig;

    #[test]
    fn test_capture_matches_state() {
        let state = GameState::new(
            LevelConfig::new("Snap", 4, 0.3, 300.0),
            Viewport::new(1000.0, 2000.0),
            11,
        );
        let snapshot = Snapshot::from(&state);

        assert_eq!(snapshot.phase, GamePhase::NotStarted);
        assert_eq!(snapshot.level_name, "Snap");
        assert_eq!(snapshot.bars, state.bars);
        assert_eq!(snapshot.avatar_center(), Vec2::new(500.0, 1600.0));

        let spans = snapshot.solid_spans(&snapshot.bars[0]);
        assert_eq!(spans[0].0, 0.0);
        assert_eq!(spans[1].1, 1000.0);
        assert!((spans[1].0 - spans[0].1 - 300.0).abs() < 0.001);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(
            LevelConfig::new("Json", 2, 0.3, 300.0),
            Viewport::new(800.0, 1200.0),
            5,
        );
        let json = serde_json::to_string(&Snapshot::capture(&state)).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.bars.len(), 2);
        assert_eq!(back.phase, GamePhase::NotStarted);
    }
}
