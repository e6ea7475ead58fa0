//! Round engine state and the events it emits
//!
//! Everything the state machine mutates lives in `GameState`. The presentation
//! layer never reads it mid-transition; it consumes the `GameEvent` queue.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, sample_grid};
use super::schedule::{Scheduler, TaskHandle};
use crate::catalog::{Catalog, Symbol};
use crate::tuning::GameTuning;

/// Current phase of the round cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No session running
    Idle,
    /// Board shown, first round about to begin
    Starting,
    /// Sequence on screen, input closed
    Displaying,
    /// Player reproducing the sequence
    AwaitingInput,
    /// Sequence replayed by a hint, input closed
    HintReplay,
    /// Whole sequence matched, next round pending
    RoundCleared,
    /// Wrong tap, game over pending
    Failed,
    /// Run ended
    GameOver,
}

impl GamePhase {
    /// Phases in which the player can pause
    pub fn is_pausable(&self) -> bool {
        matches!(
            self,
            GamePhase::Displaying | GamePhase::AwaitingInput | GamePhase::HintReplay
        )
    }

    /// Phases in which the sequence is on screen
    pub fn is_showing_sequence(&self) -> bool {
        matches!(self, GamePhase::Displaying | GamePhase::HintReplay)
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Wrong tap
    Mistake,
    /// Player quit
    Quit,
    /// A round could not be generated
    Aborted,
}

/// Outbound notifications for the presentation and stats layers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    SessionStarted { hints: u8 },
    GridRefreshed { symbols: Vec<Symbol> },
    RoundStarted { round: u32, display_ms: u32 },
    ShowSequence { symbols: Vec<Symbol>, duration_ms: u32 },
    SequenceHidden,
    InputOpened,
    TapCorrect { symbol: Symbol, index: usize },
    TapWrong { symbol: Symbol, expected: Symbol },
    /// `round` is also the new high-score candidate
    RoundCleared { round: u32 },
    HintUsed { remaining: u8 },
    Highlight { symbol: Symbol, duration_ms: u32 },
    HighlightCleared { symbol: Symbol },
    Paused,
    Resumed,
    RoundAborted { round: u32 },
    GameOver { score: u32, reason: EndReason },
}

/// Work deferred to a later tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Task {
    BeginRound,
    EndDisplay,
    EndHintReplay,
    ClearHighlight,
    FinishGame,
}

/// A task stamped with the session it belongs to
#[derive(Debug, Clone, Copy)]
pub(crate) struct Timed {
    pub epoch: u32,
    pub task: Task,
}

/// Complete round engine state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: GameTuning,
    pub catalog: Catalog,
    /// Symbols tappable this round
    pub grid: Grid,
    pub phase: GamePhase,
    /// Round in progress (1-based, 0 before the first round)
    pub round: u32,
    /// Rounds fully matched; the score of the run
    pub rounds_cleared: u32,
    /// Target for the current round
    pub sequence: Vec<Symbol>,
    /// Next index of `sequence` the player must hit
    pub player_index: usize,
    /// Display duration of the current round
    pub display_ms: u32,
    pub hints_remaining: u8,
    pub accepting_input: bool,
    pub paused: bool,
    pub active: bool,
    /// Symbol highlighted by the last hint, if still lit
    pub highlighted: Option<Symbol>,
    /// Unpaused time spent in the current session
    pub play_time_ms: u64,
    /// Cancellation token; bumped whenever a session starts or ends
    pub epoch: u32,
    pub(crate) input_before_pause: bool,
    pub(crate) input_before_hint: bool,
    pub(crate) round_timer: Option<TaskHandle>,
    pub(crate) highlight_timer: Option<TaskHandle>,
    pub(crate) scheduler: Scheduler<Timed>,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle engine with the given seed
    pub fn new(seed: u64, tuning: GameTuning, catalog: Catalog) -> Self {
        Self {
            display_ms: tuning.start_display_ms,
            hints_remaining: tuning.max_hints,
            tuning,
            catalog,
            grid: Grid::default(),
            phase: GamePhase::Idle,
            round: 0,
            rounds_cleared: 0,
            sequence: Vec::new(),
            player_index: 0,
            accepting_input: false,
            paused: false,
            active: false,
            highlighted: None,
            play_time_ms: 0,
            epoch: 0,
            input_before_pause: false,
            input_before_hint: false,
            round_timer: None,
            highlight_timer: None,
            scheduler: Scheduler::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Score of the run so far
    pub fn score(&self) -> u32 {
        self.rounds_cleared
    }

    /// Symbol the player must tap next
    pub fn expected(&self) -> Option<&Symbol> {
        self.sequence.get(self.player_index)
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events in emission order
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Cancel every pending task and invalidate any copy still in flight
    pub(crate) fn cancel_timers(&mut self) {
        if !self.scheduler.is_empty() {
            log::debug!("Cancelling {} pending tasks", self.scheduler.len());
        }
        self.scheduler.cancel_all();
        self.round_timer = None;
        self.highlight_timer = None;
        self.epoch = self.epoch.wrapping_add(1);
    }

    pub(crate) fn schedule(&mut self, delay_ms: u32, task: Task) -> TaskHandle {
        let timed = Timed {
            epoch: self.epoch,
            task,
        };
        self.scheduler.schedule(delay_ms, timed)
    }

    /// Clear all per-session state for a new run
    pub(crate) fn reset_session(&mut self) {
        self.cancel_timers();
        self.phase = GamePhase::Idle;
        self.round = 0;
        self.rounds_cleared = 0;
        self.sequence.clear();
        self.player_index = 0;
        self.display_ms = self.tuning.start_display_ms;
        self.hints_remaining = self.tuning.max_hints;
        self.accepting_input = false;
        self.paused = false;
        self.active = false;
        self.highlighted = None;
        self.play_time_ms = 0;
        self.input_before_pause = false;
        self.input_before_hint = false;
    }

    /// Reshuffle the board and announce it
    pub(crate) fn refresh_grid(&mut self) {
        self.grid = sample_grid(&self.catalog, self.tuning.grid_size, &mut self.rng);
        let symbols = self.grid.symbols().to_vec();
        self.push_event(GameEvent::GridRefreshed { symbols });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = GameState::new(1, GameTuning::default(), Catalog::classic());
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(!state.active);
        assert_eq!(state.hints_remaining, 3);
        assert_eq!(state.display_ms, 2000);
        assert_eq!(state.score(), 0);
        assert!(state.expected().is_none());
    }

    #[test]
    fn test_refresh_grid_emits_event() {
        let mut state = GameState::new(1, GameTuning::default(), Catalog::classic());
        state.refresh_grid();
        assert_eq!(state.grid.len(), 30);
        let events = state.drain_events();
        assert!(matches!(&events[..], [GameEvent::GridRefreshed { symbols }] if symbols.len() == 30));
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_cancel_timers_bumps_epoch() {
        let mut state = GameState::new(1, GameTuning::default(), Catalog::classic());
        let handle = state.schedule(100, Task::BeginRound);
        let epoch = state.epoch;
        state.cancel_timers();
        assert_ne!(state.epoch, epoch);
        assert_eq!(state.scheduler.remaining_ms(handle), None);
        assert!(state.scheduler.is_empty());
    }

    #[test]
    fn test_pausable_phases() {
        assert!(GamePhase::Displaying.is_pausable());
        assert!(GamePhase::AwaitingInput.is_pausable());
        assert!(!GamePhase::RoundCleared.is_pausable());
        assert!(!GamePhase::GameOver.is_pausable());
    }
}
