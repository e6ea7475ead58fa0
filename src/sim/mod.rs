//! Deterministic round engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Simulated clock only (advanced by `tick`)
//! - Seeded RNG only
//! - No rendering, audio or storage dependencies

pub mod grid;
pub mod schedule;
pub mod sequence;
pub mod state;
pub mod tick;

pub use grid::{Grid, sample_grid};
pub use schedule::{Scheduler, TaskHandle};
pub use sequence::generate_sequence;
pub use state::{EndReason, GameEvent, GamePhase, GameState};
pub use tick::{TapOutcome, begin_round, pause, quit, resume, start, tap, tick, use_hint};
