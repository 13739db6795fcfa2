//! Simulation step and run state machine
//!
//! Advances the run by one clamped timestep. Commands are applied first, then
//! motion, then collisions, then the win check, so a tick that both hits a bar
//! and clears the course ends in `GameOver`.

use serde::{Deserialize, Serialize};

use super::collision::first_collision;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::MAX_TICK_DT;

/// Discrete player commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// NotStarted -> Playing
    Start,
    /// Flip the avatar's heading (Playing only)
    ToggleDirection,
    /// GameOver -> NotStarted with a fresh course
    Restart,
}

/// Commands queued for a single tick, applied in order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub commands: Vec<Command>,
}

impl TickInput {
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }
}

/// Clamp a raw frame delta into `[0, max_step]`; garbage becomes zero
#[inline]
pub fn clamp_dt(dt: f32, max_step: f32) -> f32 {
    if dt.is_finite() { dt.clamp(0.0, max_step) } else { 0.0 }
}

/// Apply one command. Returns false when the current phase ignores it.
pub fn apply_command(state: &mut GameState, command: Command) -> bool {
    match (command, state.phase) {
        (Command::Start, GamePhase::NotStarted) => {
            state.set_phase(GamePhase::Playing);
            state.events.push(GameEvent::RunStarted);
            true
        }
        (Command::ToggleDirection, GamePhase::Playing) => {
            state.avatar.toggle_direction();
            true
        }
        (Command::Restart, GamePhase::GameOver) => {
            state.reset();
            state.events.push(GameEvent::RunReset);
            true
        }
        (command, phase) => {
            log::debug!("Ignoring {:?} while {:?}", command, phase);
            false
        }
    }
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    state.time_ticks += 1;

    for &command in &input.commands {
        apply_command(state, command);
    }

    // Nothing moves outside Playing; the caller keeps ticking for rendering
    if state.phase != GamePhase::Playing {
        return;
    }

    let dt = clamp_dt(dt, MAX_TICK_DT);
    state.elapsed += dt;

    state.avatar.advance(dt);

    let bar_speed = state.level.bar_speed;
    for bar in &mut state.bars {
        bar.advance(bar_speed, dt);
    }

    let before = state.bars.len();
    let avatar = &state.avatar;
    state.bars.retain(|bar| !bar.is_past(avatar));
    state.bars_passed += (before - state.bars.len()) as u32;

    if let Some(bar) = first_collision(&state.avatar, &state.bars) {
        log::info!(
            "Hit bar {} at x={:.1} (gap {:.1}..{:.1})",
            bar.id,
            state.avatar.cross_position,
            bar.gap_start,
            bar.gap_end()
        );
        state.set_phase(GamePhase::GameOver);
        state.events.push(GameEvent::LevelFailed);
        return;
    }

    if state.bars.is_empty() {
        state.set_phase(GamePhase::Win);
        state.events.push(GameEvent::LevelComplete);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelConfig;
    use crate::sim::state::{Bar, Direction, Viewport};

    const DT: f32 = 1.0 / 120.0;

    fn new_state(bar_count: i32) -> GameState {
        GameState::new(
            LevelConfig::new("Test", bar_count, 0.3, 300.0),
            Viewport::new(1000.0, 2000.0),
            12345,
        )
    }

    fn input(commands: &[Command]) -> TickInput {
        TickInput {
            commands: commands.to_vec(),
        }
    }

    /// A single bar whose band reaches the lane on the next tick
    fn single_bar(state: &mut GameState, gap_start: f32) {
        let lane = state.avatar.lane_position;
        state.bars = vec![Bar {
            id: 0,
            position: lane - state.avatar.radius - 60.0 - 1.0,
            gap_start,
            gap_width: 300.0,
            thickness: 60.0,
        }];
    }

    #[test]
    fn test_clamp_dt() {
        assert_eq!(clamp_dt(0.01, MAX_TICK_DT), 0.01);
        assert_eq!(clamp_dt(3.0, MAX_TICK_DT), MAX_TICK_DT);
        assert_eq!(clamp_dt(-1.0, MAX_TICK_DT), 0.0);
        assert_eq!(clamp_dt(f32::NAN, MAX_TICK_DT), 0.0);
        assert_eq!(clamp_dt(f32::INFINITY, MAX_TICK_DT), 0.0);
    }

    #[test]
    fn test_not_started_to_playing() {
        let mut state = new_state(3);
        let bars = state.bars.clone();

        // Ticks keep coming but nothing moves
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert_eq!(state.bars, bars);
        assert_eq!(state.avatar.cross_position, 500.0);

        tick(&mut state, &input(&[Command::Start]), DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.events, vec![GameEvent::RunStarted]);
        assert!(state.bars[0].position > bars[0].position);
        assert!(state.avatar.cross_position > 500.0);
    }

    #[test]
    fn test_invalid_commands_are_ignored() {
        let mut state = new_state(3);

        // Toggle and restart before starting
        tick(&mut state, &input(&[Command::ToggleDirection, Command::Restart]), DT);
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert_eq!(state.avatar.direction, Direction::Right);

        // Start twice, restart while playing
        tick(&mut state, &input(&[Command::Start, Command::Start, Command::Restart]), DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.events, vec![GameEvent::RunStarted]);

        tick(&mut state, &input(&[Command::ToggleDirection]), DT);
        assert_eq!(state.avatar.direction, Direction::Left);
    }

    #[test]
    fn test_large_delta_is_clamped() {
        let mut state = new_state(3);
        tick(&mut state, &input(&[Command::Start]), 0.0);
        let before = state.bars[0].position;

        tick(&mut state, &TickInput::default(), 5.0);
        let moved = state.bars[0].position - before;
        assert!((moved - 300.0 * MAX_TICK_DT).abs() < 0.001);
        assert!((state.elapsed - MAX_TICK_DT).abs() < 0.0001);
    }

    #[test]
    fn test_collision_ends_run() {
        let mut state = new_state(3);
        tick(&mut state, &input(&[Command::Start]), 0.0);

        // Gap far to the left of the centred avatar
        single_bar(&mut state, 0.0);
        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.events, vec![GameEvent::LevelFailed]);

        // Frozen afterwards
        let position = state.bars[0].position;
        tick(&mut state, &input(&[Command::ToggleDirection, Command::Start]), DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.bars[0].position, position);
    }

    #[test]
    fn test_passing_last_bar_wins() {
        let mut state = new_state(3);
        tick(&mut state, &input(&[Command::Start]), 0.0);

        single_bar(&mut state, 350.0);
        let mut ticks = 0;
        while state.phase == GamePhase::Playing && ticks < 10_000 {
            // Hold the avatar in the gap
            state.avatar.cross_position = 500.0;
            tick(&mut state, &TickInput::default(), DT);
            ticks += 1;
        }

        assert_eq!(state.phase, GamePhase::Win);
        assert_eq!(state.events, vec![GameEvent::LevelComplete]);
        assert_eq!(state.bars_passed, 1);
        assert!(state.bars.is_empty());
    }

    #[test]
    fn test_loss_takes_precedence_over_win() {
        let mut state = new_state(3);
        tick(&mut state, &input(&[Command::Start]), 0.0);

        // One bar about to leave, one the avatar is about to hit
        single_bar(&mut state, 0.0);
        let lane = state.avatar.lane_position;
        state.bars.insert(
            0,
            Bar {
                id: 9,
                position: lane + 60.0,
                gap_start: 0.0,
                gap_width: 300.0,
                thickness: 60.0,
            },
        );
        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.bars_passed, 1);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.events.contains(&GameEvent::LevelComplete));
    }

    #[test]
    fn test_empty_course_wins_immediately() {
        let mut state = new_state(0);
        assert!(state.bars.is_empty());

        tick(&mut state, &input(&[Command::Start]), DT);
        assert_eq!(state.phase, GamePhase::Win);
        assert_eq!(state.events, vec![GameEvent::RunStarted, GameEvent::LevelComplete]);

        // Win is terminal for the run
        tick(&mut state, &input(&[Command::Restart, Command::Start]), DT);
        assert_eq!(state.phase, GamePhase::Win);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = new_state(5);
        tick(&mut state, &input(&[Command::Start]), 0.0);
        single_bar(&mut state, 0.0);
        tick(&mut state, &input(&[Command::ToggleDirection]), DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        tick(&mut state, &input(&[Command::Restart]), DT);
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert_eq!(state.events, vec![GameEvent::RunReset]);
        assert_eq!(state.bars.len(), 5);
        assert_eq!(state.avatar.cross_position, 500.0);
        assert_eq!(state.avatar.direction, Direction::Right);
        assert_eq!(state.elapsed, 0.0);

        // Restart then start in the same tick plays straight away
        let mut state = new_state(5);
        state.phase = GamePhase::GameOver;
        tick(&mut state, &input(&[Command::Restart, Command::Start]), DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = new_state(8);
        let mut state2 = new_state(8);

        let inputs = [
            input(&[Command::Start]),
            TickInput::default(),
            input(&[Command::ToggleDirection]),
            TickInput::default(),
        ];

        for step in 0..400 {
            let input = &inputs[step % inputs.len()];
            tick(&mut state1, input, DT);
            tick(&mut state2, input, DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.bars, state2.bars);
        assert_eq!(state1.avatar, state2.avatar);
    }
}
