//! Platform layer
//!
//! Runs the simulation in real time on its own thread:
//! - Monotonic clock and tick pacing
//! - Command queue from the input side
//! - Snapshot hand-off to the presentation side
//! - Cooperative shutdown

pub mod driver;

pub use driver::{DriverError, Simulation};
