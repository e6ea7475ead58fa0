//! Error types for the game core.

use thiserror::Error;

/// Errors surfaced by the core. Invalid-state commands are not errors; they
/// are ignored by the engine and never reach this type.
#[derive(Error, Debug)]
pub enum GameError {
    /// A round tried to build its sequence from a grid with no symbols.
    #[error("cannot generate a sequence from an empty grid")]
    EmptyGrid,

    /// Tuning values that cannot produce a playable game.
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    /// The key-value store rejected a read or write.
    #[error("storage unavailable: {0}")]
    Storage(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, GameError>;
