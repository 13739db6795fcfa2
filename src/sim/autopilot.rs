//! Idle/demo autopilot
//!
//! Steers toward the next gap using only what the presentation side can see
//! (a [`Snapshot`]) and the one input it has (toggle direction). Used by the
//! headless runner and for attract-mode demos.

use super::snapshot::Snapshot;
use super::state::{Avatar, Bar, GamePhase, GameState};
use super::tick::{Command, TickInput, tick};

/// The bar the avatar has to get through next
pub fn next_bar<'a>(avatar: &Avatar, bars: &'a [Bar]) -> Option<&'a Bar> {
    bars.iter()
        .find(|bar| bar.position <= avatar.lane_position + avatar.radius)
}

/// Decide whether toggling now points the avatar at the next gap
pub fn wants_toggle(snapshot: &Snapshot) -> bool {
    if snapshot.phase != GamePhase::Playing {
        return false;
    }

    let avatar = &snapshot.avatar;
    let Some(bar) = next_bar(avatar, &snapshot.bars) else {
        return false;
    };

    let offset = bar.gap_center() - avatar.cross_position;
    // Wander inside the middle half of the slack before correcting
    let slack = (bar.gap_width / 2.0 - avatar.radius).max(0.0);
    let dead_zone = (slack * 0.5).max(1.0);
    if offset.abs() <= dead_zone {
        return false;
    }

    let heading_toward = offset.signum() == avatar.direction.sign();
    !heading_toward
}

/// Play a run to completion at a fixed step, steering with [`wants_toggle`]
///
/// Returns the final phase; `Playing` if `max_ticks` ran out first.
pub fn play_out(state: &mut GameState, dt: f32, max_ticks: u64) -> GamePhase {
    let mut input = TickInput::default();
    if state.phase == GamePhase::NotStarted {
        input.push(Command::Start);
    }

    for _ in 0..max_ticks {
        tick(state, &input, dt);
        input.commands.clear();

        match state.phase {
            GamePhase::Playing => {
                if wants_toggle(&Snapshot::capture(state)) {
                    input.push(Command::ToggleDirection);
                }
            }
            GamePhase::NotStarted => input.push(Command::Start),
            phase @ (GamePhase::GameOver | GamePhase::Win) => return phase,
        }
    }

    state.phase
}
