//! Gap Runner entry point
//!
//! Headless runner: plays every level under the autopilot and logs the
//! outcome. Pass a JSON level table path to override the built-in levels and
//! `--realtime` to drive the first level through the threaded driver instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use gap_runner::levels::{builtin_levels, levels_from_json};

    env_logger::init();
    log::info!("Gap Runner (headless) starting...");

    let mut realtime = false;
    let mut level_path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--realtime" => realtime = true,
            _ => level_path = Some(arg),
        }
    }

    let levels = match level_path {
        Some(path) => levels_from_json(&std::fs::read_to_string(path)?)?,
        None => builtin_levels(),
    };

    if realtime {
        if let Some(level) = levels.into_iter().next() {
            run_realtime(level)?;
        }
        return Ok(());
    }

    for (i, level) in levels.iter().enumerate() {
        run_headless(i as u64, level);
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on the web; the host page owns the loop
}

/// Portrait phone-sized viewport
#[cfg(not(target_arch = "wasm32"))]
const VIEWPORT: (f32, f32) = (1080.0, 2340.0);

#[cfg(not(target_arch = "wasm32"))]
fn run_headless(seed: u64, level: &gap_runner::LevelConfig) {
    use gap_runner::sim::{GameState, Viewport, play_out};

    let mut state = GameState::new(level.clone(), Viewport::new(VIEWPORT.0, VIEWPORT.1), seed);
    let bars = state.bars.len();
    let phase = play_out(&mut state, 1.0 / 120.0, 120 * 300);

    println!(
        "{:<10} bars={:>2} result={:?} passed={} time={:.1}s",
        level.name, bars, phase, state.bars_passed, state.elapsed
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn run_realtime(level: gap_runner::LevelConfig) -> Result<(), Box<dyn std::error::Error>> {
    use std::time::Duration;

    use gap_runner::Simulation;
    use gap_runner::sim::{GameEvent, wants_toggle};

    let name = level.name.clone();
    let mut sim = Simulation::start_run(level, VIEWPORT.0, VIEWPORT.1)?;
    sim.on_start_signal();

    // Presentation-side loop at ~60 Hz: read snapshot, maybe toggle, watch events
    loop {
        if wants_toggle(&sim.current_snapshot()) {
            sim.on_toggle_signal();
        }

        match sim.events().try_recv() {
            Ok(GameEvent::LevelComplete) => {
                println!("{name}: complete");
                break;
            }
            Ok(GameEvent::LevelFailed) => {
                println!("{name}: failed");
                break;
            }
            _ => {}
        }
        std::thread::sleep(Duration::from_millis(16));
    }

    let snapshot = sim.current_snapshot();
    println!("passed={} time={:.1}s", snapshot.bars_passed, snapshot.elapsed);
    sim.stop();
    Ok(())
}
