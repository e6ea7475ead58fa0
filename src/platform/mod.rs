//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, JSON file natively)
//! - Presentation (DOM on web, logging natively)
//! - Input (keyboard shortcuts)

pub mod input;
pub mod storage;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::command_for_key;
pub use storage::{KeyValueStore, MemoryStore};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;

use crate::catalog::Symbol;
use crate::session::Screen;

/// Feedback sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Correct tap
    Click,
    /// Round cleared
    Success,
    /// Wrong tap
    Error,
    /// Hint used
    Hint,
}

/// Text fields the presentation keeps up to date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Round,
    HighScore,
    Hints,
    FinalScore,
    GamesPlayed,
    PlayTime,
    Sound,
}

/// How a tapped grid button should be marked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapMark {
    Correct,
    Wrong,
}

/// Everything the core asks of the presentation layer.
///
/// Calls are fire-and-forget: implementations swallow their own failures and
/// the core never waits on them. Timing is owned by the round engine.
pub trait Presenter {
    fn show_screen(&mut self, screen: Screen);
    /// Replace the grid buttons (clears any marks)
    fn render_grid(&mut self, symbols: &[Symbol]);
    fn set_grid_enabled(&mut self, enabled: bool);
    /// Show the whole sequence for `duration_ms`
    fn show_sequence(&mut self, symbols: &[Symbol], duration_ms: u32);
    fn hide_sequence(&mut self);
    fn mark_tap(&mut self, symbol: &Symbol, mark: TapMark);
    fn highlight(&mut self, symbol: &Symbol, on: bool);
    fn play_cue(&mut self, cue: Cue);
    fn update_stat(&mut self, stat: Stat, text: &str);
}
