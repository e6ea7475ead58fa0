//! Round engine transitions
//!
//! Commands (`start`, `tap`, `use_hint`, `pause`, `resume`, `quit`) mutate the
//! state immediately; everything that must wait is scheduled and played out by
//! `tick`. Commands that make no sense in the current phase are ignored.

use super::sequence::generate_sequence;
use super::state::{EndReason, GameEvent, GamePhase, GameState, Task, Timed};
use crate::catalog::Symbol;

/// Result of a single tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Input closed, paused, or no session
    Ignored,
    /// Right symbol, more to go
    Correct { index: usize },
    /// Right symbol, sequence complete
    RoundCleared,
    /// Wrong symbol, run is over
    Mistake,
}

/// Begin a new session, discarding any previous one
pub fn start(state: &mut GameState) {
    state.reset_session();
    state.active = true;
    state.phase = GamePhase::Starting;
    state.refresh_grid();
    let hints = state.hints_remaining;
    state.push_event(GameEvent::SessionStarted { hints });
    let delay = state.tuning.start_delay_ms;
    state.round_timer = Some(state.schedule(delay, Task::BeginRound));
    log::info!("Session started (epoch {})", state.epoch);
}

/// Advance simulated time by `dt_ms`, running every task that falls due.
/// Paused and finished sessions do not advance.
pub fn tick(state: &mut GameState, dt_ms: u32) {
    if !state.active || state.paused {
        return;
    }
    state.play_time_ms += u64::from(dt_ms);

    let until = state.scheduler.now_ms() + u64::from(dt_ms);
    while let Some(timed) = state.scheduler.pop_due(until) {
        run_task(state, timed);
    }
    state.scheduler.settle(until);
}

fn run_task(state: &mut GameState, timed: Timed) {
    if timed.epoch != state.epoch || !state.active || state.paused {
        log::debug!("Dropping stale task {:?}", timed.task);
        return;
    }
    match timed.task {
        Task::BeginRound => begin_round(state),
        Task::EndDisplay => end_display(state),
        Task::EndHintReplay => end_hint_replay(state),
        Task::ClearHighlight => clear_highlight(state),
        Task::FinishGame => finish(state, EndReason::Mistake),
    }
}

/// Start the next round: new grid, one more symbol, shorter display
pub fn begin_round(state: &mut GameState) {
    state.round_timer = None;
    if let Some(handle) = state.highlight_timer.take() {
        state.scheduler.cancel(handle);
    }
    clear_highlight(state);

    state.round += 1;
    if state.round > 1 {
        state.display_ms = state.tuning.next_display_ms(state.display_ms);
    }

    state.refresh_grid();
    let len = state.round as usize;
    let attempts = state.tuning.max_resample_attempts;
    match generate_sequence(&state.grid, len, attempts, &mut state.rng) {
        Ok(sequence) => state.sequence = sequence,
        Err(err) => {
            log::error!("Aborting round {}: {}", state.round, err);
            state.sequence.clear();
            let round = state.round;
            state.push_event(GameEvent::RoundAborted { round });
            finish(state, EndReason::Aborted);
            return;
        }
    }

    state.player_index = 0;
    state.accepting_input = false;
    state.phase = GamePhase::Displaying;

    let (round, display_ms) = (state.round, state.display_ms);
    log::debug!("Round {} ({} ms display)", round, display_ms);
    state.push_event(GameEvent::RoundStarted { round, display_ms });
    state.push_event(GameEvent::ShowSequence {
        symbols: state.sequence.clone(),
        duration_ms: display_ms,
    });
    let delay = display_ms + state.tuning.display_buffer_ms;
    state.round_timer = Some(state.schedule(delay, Task::EndDisplay));
}

fn end_display(state: &mut GameState) {
    state.round_timer = None;
    state.phase = GamePhase::AwaitingInput;
    state.accepting_input = true;
    state.push_event(GameEvent::SequenceHidden);
    state.push_event(GameEvent::InputOpened);
}

/// Evaluate a tap against the next expected symbol
pub fn tap(state: &mut GameState, symbol: &Symbol) -> TapOutcome {
    if !state.active
        || state.paused
        || !state.accepting_input
        || state.phase != GamePhase::AwaitingInput
    {
        return TapOutcome::Ignored;
    }
    let Some(expected) = state.sequence.get(state.player_index).cloned() else {
        return TapOutcome::Ignored;
    };

    if *symbol != expected {
        state.accepting_input = false;
        state.phase = GamePhase::Failed;
        log::info!(
            "Wrong tap in round {} at {}: {} (expected {})",
            state.round,
            state.player_index,
            symbol,
            expected
        );
        state.push_event(GameEvent::TapWrong {
            symbol: symbol.clone(),
            expected,
        });
        let delay = state.tuning.fail_delay_ms;
        state.round_timer = Some(state.schedule(delay, Task::FinishGame));
        return TapOutcome::Mistake;
    }

    let index = state.player_index;
    state.player_index += 1;
    state.push_event(GameEvent::TapCorrect {
        symbol: symbol.clone(),
        index,
    });

    if state.player_index < state.sequence.len() {
        return TapOutcome::Correct { index };
    }

    state.accepting_input = false;
    state.phase = GamePhase::RoundCleared;
    state.rounds_cleared += 1;
    let round = state.round;
    state.push_event(GameEvent::RoundCleared { round });
    let delay = state.tuning.round_clear_delay_ms;
    state.round_timer = Some(state.schedule(delay, Task::BeginRound));
    TapOutcome::RoundCleared
}

/// Replay the sequence and highlight the next symbol. Returns false (and
/// changes nothing) unless a hint is available and input is pending.
pub fn use_hint(state: &mut GameState) -> bool {
    if state.hints_remaining == 0
        || state.sequence.is_empty()
        || !state.active
        || state.paused
        || state.phase != GamePhase::AwaitingInput
    {
        return false;
    }

    // A highlight left over from an earlier hint must not outlive this one
    if let Some(handle) = state.highlight_timer.take() {
        state.scheduler.cancel(handle);
    }
    clear_highlight(state);

    state.hints_remaining -= 1;
    state.input_before_hint = state.accepting_input;
    state.accepting_input = false;
    state.phase = GamePhase::HintReplay;

    let duration_ms = state.tuning.hint_display_ms(state.display_ms);
    let remaining = state.hints_remaining;
    state.push_event(GameEvent::HintUsed { remaining });
    state.push_event(GameEvent::ShowSequence {
        symbols: state.sequence.clone(),
        duration_ms,
    });
    let delay = duration_ms + state.tuning.display_buffer_ms;
    state.round_timer = Some(state.schedule(delay, Task::EndHintReplay));
    true
}

fn end_hint_replay(state: &mut GameState) {
    state.round_timer = None;
    state.phase = GamePhase::AwaitingInput;
    state.accepting_input = state.input_before_hint;
    state.push_event(GameEvent::SequenceHidden);
    if state.accepting_input {
        state.push_event(GameEvent::InputOpened);
    }

    if let Some(symbol) = state.expected().cloned() {
        let duration_ms = state.tuning.hint_highlight_ms;
        state.highlighted = Some(symbol.clone());
        state.push_event(GameEvent::Highlight {
            symbol,
            duration_ms,
        });
        state.highlight_timer = Some(state.schedule(duration_ms, Task::ClearHighlight));
    }
}

fn clear_highlight(state: &mut GameState) {
    state.highlight_timer = None;
    if let Some(symbol) = state.highlighted.take() {
        state.push_event(GameEvent::HighlightCleared { symbol });
    }
}

/// Freeze the round mid-display or mid-input
pub fn pause(state: &mut GameState) -> bool {
    if !state.active || state.paused || !state.phase.is_pausable() {
        return false;
    }
    state.paused = true;
    state.input_before_pause = state.accepting_input;
    state.accepting_input = false;
    state.push_event(GameEvent::Paused);
    true
}

/// Unfreeze; a display that was cut short is shown again for its remaining time
pub fn resume(state: &mut GameState) -> bool {
    if !state.active || !state.paused {
        return false;
    }
    state.paused = false;
    state.accepting_input = state.input_before_pause;
    state.push_event(GameEvent::Resumed);

    if state.phase.is_showing_sequence() {
        let remaining = state
            .round_timer
            .and_then(|h| state.scheduler.remaining_ms(h))
            .unwrap_or(0);
        let duration_ms = u32::try_from(remaining)
            .unwrap_or(u32::MAX)
            .saturating_sub(state.tuning.display_buffer_ms);
        state.push_event(GameEvent::ShowSequence {
            symbols: state.sequence.clone(),
            duration_ms,
        });
    }
    true
}

/// End the run voluntarily. Returns the final score, or None if no session.
pub fn quit(state: &mut GameState) -> Option<u32> {
    if !state.active {
        return None;
    }
    finish(state, EndReason::Quit);
    Some(state.score())
}

fn finish(state: &mut GameState, reason: EndReason) {
    state.cancel_timers();
    state.active = false;
    state.paused = false;
    state.accepting_input = false;
    state.phase = GamePhase::GameOver;
    clear_highlight(state);
    let score = state.score();
    log::info!(
        "Game over ({:?}) after round {}: score {}",
        reason,
        state.round,
        score
    );
    state.push_event(GameEvent::GameOver { score, reason });
}
