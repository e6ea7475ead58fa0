//! Emoji Memory Rush - watch the sequence, tap it back, go faster
//!
//! Core modules:
//! - `catalog`: The emoji pool the game draws from
//! - `sim`: Deterministic round engine (grid, sequence, timers, state machine)
//! - `session`: Screen controller and command dispatch
//! - `stats`: Persisted high score and play counters
//! - `platform`: Storage, presentation and input abstractions
//! - `tuning`: Data-driven pacing

pub mod catalog;
pub mod error;
pub mod platform;
pub mod session;
pub mod sim;
pub mod stats;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod audio;

pub use catalog::{Catalog, Category, Symbol};
pub use error::{GameError, Result};
pub use session::{Command, Screen, Session};
pub use stats::PlayerStats;
pub use tuning::{GameTuning, Pace};

/// Game configuration constants
pub mod consts {
    /// How long the first round's sequence stays on screen
    pub const START_DISPLAY_MS: u32 = 2000;
    /// Display time lost per cleared round
    pub const DISPLAY_DECREASE_MS: u32 = 90;
    /// Display time never drops below this
    pub const MIN_DISPLAY_MS: u32 = 500;
    /// Extra time after the display before input opens (lets the fade finish)
    pub const DISPLAY_BUFFER_MS: u32 = 80;

    /// Hints per session
    pub const MAX_HINTS: u8 = 3;
    /// Hint replay runs this much longer than the normal display
    pub const HINT_BONUS_MS: u32 = 900;
    /// Upper bound on the hint replay
    pub const HINT_CAP_MS: u32 = 3500;
    /// How long the next expected symbol stays highlighted after a hint
    pub const HINT_HIGHLIGHT_MS: u32 = 900;

    /// Delay between pressing start and the first round
    pub const START_DELAY_MS: u32 = 300;
    /// Pause between a cleared round and the next one
    pub const ROUND_CLEAR_DELAY_MS: u32 = 700;
    /// Time the wrong tap stays visible before the game-over screen
    pub const FAIL_DELAY_MS: u32 = 450;

    /// Tappable symbols per round
    pub const GRID_SIZE: usize = 30;
    /// Resamples spent avoiding an immediate repeat in a sequence
    pub const MAX_RESAMPLE_ATTEMPTS: u32 = 5;
}
