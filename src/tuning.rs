//! Data-driven game pacing
//!
//! Every delay and limit the round engine uses lives here so a run can be
//! re-tuned from JSON without touching the state machine.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, Result};

/// Pacing presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Pace {
    Relaxed,
    #[default]
    Classic,
    Rush,
}

impl Pace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pace::Relaxed => "Relaxed",
            Pace::Classic => "Classic",
            Pace::Rush => "Rush",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relaxed" | "easy" => Some(Pace::Relaxed),
            "classic" | "normal" => Some(Pace::Classic),
            "rush" | "hard" => Some(Pace::Rush),
            _ => None,
        }
    }
}

/// Timing and size knobs for a game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    /// Display duration of round 1
    pub start_display_ms: u32,
    /// Display duration lost per round
    pub display_decrease_ms: u32,
    /// Display duration floor
    pub min_display_ms: u32,
    /// Slack after each display before input opens
    pub display_buffer_ms: u32,

    pub max_hints: u8,
    pub hint_bonus_ms: u32,
    pub hint_cap_ms: u32,
    pub hint_highlight_ms: u32,

    pub start_delay_ms: u32,
    pub round_clear_delay_ms: u32,
    pub fail_delay_ms: u32,

    /// Symbols on the board each round
    pub grid_size: usize,
    /// Resamples spent avoiding back-to-back repeats
    pub max_resample_attempts: u32,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            start_display_ms: START_DISPLAY_MS,
            display_decrease_ms: DISPLAY_DECREASE_MS,
            min_display_ms: MIN_DISPLAY_MS,
            display_buffer_ms: DISPLAY_BUFFER_MS,

            max_hints: MAX_HINTS,
            hint_bonus_ms: HINT_BONUS_MS,
            hint_cap_ms: HINT_CAP_MS,
            hint_highlight_ms: HINT_HIGHLIGHT_MS,

            start_delay_ms: START_DELAY_MS,
            round_clear_delay_ms: ROUND_CLEAR_DELAY_MS,
            fail_delay_ms: FAIL_DELAY_MS,

            grid_size: GRID_SIZE,
            max_resample_attempts: MAX_RESAMPLE_ATTEMPTS,
        }
    }
}

impl GameTuning {
    /// Tuning for a preset (Classic == defaults)
    pub fn from_pace(pace: Pace) -> Self {
        let base = Self::default();
        match pace {
            Pace::Relaxed => Self {
                start_display_ms: 2600,
                display_decrease_ms: 70,
                min_display_ms: 800,
                max_hints: 5,
                ..base
            },
            Pace::Classic => base,
            Pace::Rush => Self {
                start_display_ms: 1500,
                display_decrease_ms: 120,
                min_display_ms: 350,
                max_hints: 1,
                round_clear_delay_ms: 450,
                ..base
            },
        }
    }

    /// Parse tuning from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that cannot produce a playable game
    pub fn validate(&self) -> Result<()> {
        if self.start_display_ms == 0 {
            return Err(GameError::InvalidTuning(
                "start_display_ms must be positive".to_string(),
            ));
        }
        if self.min_display_ms > self.start_display_ms {
            return Err(GameError::InvalidTuning(format!(
                "min_display_ms ({}) exceeds start_display_ms ({})",
                self.min_display_ms, self.start_display_ms
            )));
        }
        if self.grid_size == 0 {
            return Err(GameError::InvalidTuning(
                "grid_size must be positive".to_string(),
            ));
        }
        if self.hint_cap_ms < self.min_display_ms {
            return Err(GameError::InvalidTuning(format!(
                "hint_cap_ms ({}) is shorter than min_display_ms ({})",
                self.hint_cap_ms, self.min_display_ms
            )));
        }
        Ok(())
    }

    /// Display duration of the round after one shown for `current_ms`
    pub fn next_display_ms(&self, current_ms: u32) -> u32 {
        current_ms
            .saturating_sub(self.display_decrease_ms)
            .max(self.min_display_ms)
    }

    /// Replay duration of a hint given the current display duration
    pub fn hint_display_ms(&self, current_ms: u32) -> u32 {
        current_ms
            .saturating_add(self.hint_bonus_ms)
            .min(self.hint_cap_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_consts() {
        let t = GameTuning::default();
        assert_eq!(t.start_display_ms, 2000);
        assert_eq!(t.max_hints, 3);
        assert_eq!(t.grid_size, 30);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_display_schedule_floors() {
        let t = GameTuning::default();
        assert_eq!(t.next_display_ms(2000), 1910);
        assert_eq!(t.next_display_ms(550), 500);
        assert_eq!(t.next_display_ms(500), 500);
        assert_eq!(t.next_display_ms(20), 500);
    }

    #[test]
    fn test_hint_duration_capped() {
        let t = GameTuning::default();
        assert_eq!(t.hint_display_ms(2000), 2900);
        assert_eq!(t.hint_display_ms(3000), 3500);
    }

    #[test]
    fn test_from_json_partial() {
        let t = GameTuning::from_json(r#"{"max_hints": 7, "grid_size": 12}"#).unwrap();
        assert_eq!(t.max_hints, 7);
        assert_eq!(t.grid_size, 12);
        assert_eq!(t.start_display_ms, START_DISPLAY_MS);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        let err = GameTuning::from_json(r#"{"min_display_ms": 5000}"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidTuning(_)));
        assert!(matches!(
            GameTuning::from_json("{not json"),
            Err(GameError::Serialization(_))
        ));
    }

    #[test]
    fn test_pace_presets() {
        assert_eq!(Pace::from_str("RUSH"), Some(Pace::Rush));
        assert_eq!(Pace::from_str("bogus"), None);
        assert_eq!(GameTuning::from_pace(Pace::Classic), GameTuning::default());
        for pace in [Pace::Relaxed, Pace::Classic, Pace::Rush] {
            assert!(GameTuning::from_pace(pace).validate().is_ok(), "{}", pace.as_str());
        }
    }
}
