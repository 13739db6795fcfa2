//! Real-time simulation driver
//!
//! A worker thread owns the [`GameState`]. The input side only enqueues
//! commands and the presentation side only reads the latest [`Snapshot`];
//! neither touches simulation fields. Commands are drained at the start of a
//! tick, and the snapshot is swapped in once the tick has finished.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded, unbounded};
use parking_lot::RwLock;
use thiserror::Error;

use crate::levels::LevelConfig;
use crate::settings::Settings;
use crate::sim::{Command, GameEvent, GamePhase, GameState, Snapshot, TickInput, Viewport, clamp_dt, tick};

/// Errors starting the driver
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to spawn simulation thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Messages from the handle to the worker
#[derive(Debug)]
enum Message {
    Command(Command),
    LoadLevel { level: LevelConfig, viewport: Viewport, seed: u64 },
}

/// Handle to a running simulation
pub struct Simulation {
    messages: Sender<Message>,
    events: Receiver<GameEvent>,
    snapshot: Arc<RwLock<Snapshot>>,
    running: Arc<AtomicBool>,
    finished: Receiver<()>,
    handle: Option<JoinHandle<()>>,
    settings: Settings,
}

impl Simulation {
    /// Lay out `level` and start ticking; the run waits in `NotStarted`
    pub fn start_run(level: LevelConfig, width: f32, height: f32) -> Result<Self, DriverError> {
        Self::start_run_with(level, width, height, Settings::default(), rand::random())
    }

    /// Like [`Simulation::start_run`] with explicit settings and course seed
    pub fn start_run_with(
        level: LevelConfig,
        width: f32,
        height: f32,
        settings: Settings,
        seed: u64,
    ) -> Result<Self, DriverError> {
        let state = GameState::new(level, Viewport::new(width, height), seed);
        let snapshot = Arc::new(RwLock::new(Snapshot::capture(&state)));
        let running = Arc::new(AtomicBool::new(true));

        let (message_tx, message_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();
        let (finished_tx, finished_rx) = bounded(1);

        let worker = Worker {
            state,
            messages: message_rx,
            events: event_tx,
            snapshot: Arc::clone(&snapshot),
            running: Arc::clone(&running),
            settings: settings.clone(),
        };

        let handle = thread::Builder::new()
            .name("gap-runner-sim".into())
            .spawn(move || {
                worker.run();
                let _ = finished_tx.send(());
            })?;

        Ok(Self {
            messages: message_tx,
            events: event_rx,
            snapshot,
            running,
            finished: finished_rx,
            handle: Some(handle),
            settings,
        })
    }

    /// Replace the current run with a new level (level selection)
    pub fn load_level(&self, level: LevelConfig, width: f32, height: f32) {
        self.send(Message::LoadLevel {
            level,
            viewport: Viewport::new(width, height),
            seed: rand::random(),
        });
    }

    pub fn on_start_signal(&self) {
        self.send(Message::Command(Command::Start));
    }

    pub fn on_toggle_signal(&self) {
        self.send(Message::Command(Command::ToggleDirection));
    }

    pub fn on_restart_signal(&self) {
        self.send(Message::Command(Command::Restart));
    }

    /// Latest fully-applied tick
    pub fn current_snapshot(&self) -> Snapshot {
        self.snapshot.read().clone()
    }

    pub fn phase(&self) -> GamePhase {
        self.snapshot.read().phase
    }

    /// Run notifications (`LevelComplete`, `LevelFailed`, ...) in tick order
    pub fn events(&self) -> &Receiver<GameEvent> {
        &self.events
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    fn send(&self, message: Message) {
        if self.messages.send(message).is_err() {
            log::debug!("Simulation stopped, dropping input");
        }
    }

    /// Ask the worker to stop after its current tick and wait for it
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        self.running.store(false, Ordering::Release);
        match self.finished.recv_timeout(self.settings.stop_timeout()) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if handle.join().is_err() {
                    log::error!("Simulation thread panicked");
                }
                log::info!("Simulation stopped");
            }
            Err(RecvTimeoutError::Timeout) => {
                log::warn!(
                    "Simulation thread did not stop within {:?}, detaching",
                    self.settings.stop_timeout()
                );
            }
        }
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Thread-side owner of the simulation state
struct Worker {
    state: GameState,
    messages: Receiver<Message>,
    events: Sender<GameEvent>,
    snapshot: Arc<RwLock<Snapshot>>,
    running: Arc<AtomicBool>,
    settings: Settings,
}

impl Worker {
    fn run(mut self) {
        let interval = self.settings.tick_interval();
        let max_step = self.settings.max_step();
        log::info!("Simulation thread started ({:?} per tick)", interval);

        let mut last = Instant::now();
        while self.running.load(Ordering::Acquire) {
            let frame_start = Instant::now();
            let dt = clamp_dt(frame_start.duration_since(last).as_secs_f32(), max_step);
            last = frame_start;

            let input = self.drain_messages();
            tick(&mut self.state, &input, dt);
            self.publish();

            let spent = frame_start.elapsed();
            if spent < interval {
                thread::sleep(interval - spent);
            }
        }
    }

    /// Collect queued commands for this tick; a level load discards the old run
    fn drain_messages(&mut self) -> TickInput {
        let mut input = TickInput::default();
        let messages: Vec<Message> = self.messages.try_iter().collect();

        for message in messages {
            match message {
                Message::Command(command) => input.push(command),
                Message::LoadLevel {
                    level,
                    viewport,
                    seed,
                } => {
                    log::info!("Loading level '{}'", level.name);
                    self.state = GameState::new(level, viewport, seed);
                    input.commands.clear();
                }
            }
        }
        input
    }

    fn publish(&mut self) {
        let snapshot = Snapshot::capture(&self.state);
        *self.snapshot.write() = snapshot;

        for event in self.state.events.drain(..) {
            // Nobody listening is fine
            let _ = self.events.send(event);
        }
    }
}
