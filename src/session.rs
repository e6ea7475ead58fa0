//! Screen controller
//!
//! Owns the round engine, the persisted stats and the store. Input arrives as
//! `Command`s through a single dispatch table; engine events are routed to the
//! presenter and the stats layer. No game rules live here.

use crate::catalog::{Catalog, Symbol};
use crate::platform::{Cue, KeyValueStore, Presenter, Stat, TapMark};
use crate::sim::{self, EndReason, GameEvent, GameState, TapOutcome};
use crate::stats::{PlayerStats, format_play_time};
use crate::tuning::GameTuning;

/// Mutually exclusive screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Loading,
    Start,
    Instructions,
    Playing,
    Paused,
    GameOver,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Loading => "loading",
            Screen::Start => "start",
            Screen::Instructions => "instructions",
            Screen::Playing => "playing",
            Screen::Paused => "paused",
            Screen::GameOver => "gameover",
        }
    }
}

/// Abstract player actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Replay,
    Home,
    ShowInstructions,
    Pause,
    Resume,
    TogglePause,
    Quit,
    UseHint,
    TapSymbol(Symbol),
    /// Tap whatever symbol sits in this grid slot
    TapSlot(usize),
    ToggleSound,
}

pub struct Session<S: KeyValueStore> {
    state: GameState,
    stats: PlayerStats,
    store: S,
    screen: Screen,
    last_result: Option<(u32, EndReason)>,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(store: S, tuning: GameTuning, catalog: Catalog, seed: u64) -> Self {
        let stats = PlayerStats::load(&store);
        Self {
            state: GameState::new(seed, tuning, catalog),
            stats,
            store,
            screen: Screen::Loading,
            last_result: None,
        }
    }

    /// Leave the loading screen
    pub fn boot(&mut self, presenter: &mut impl Presenter) {
        self.enter(Screen::Start, presenter);
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Score and end reason of the last finished run
    pub fn last_result(&self) -> Option<(u32, EndReason)> {
        self.last_result
    }

    /// Apply a command. Returns false when it was ignored on this screen.
    pub fn dispatch(&mut self, command: Command, presenter: &mut impl Presenter) -> bool {
        let handled = match (self.screen, command) {
            (
                Screen::Start | Screen::Instructions | Screen::GameOver,
                Command::Start,
            )
            | (Screen::GameOver, Command::Replay) => {
                self.start_game(presenter);
                true
            }
            (Screen::Start, Command::ShowInstructions) => {
                self.enter(Screen::Instructions, presenter);
                true
            }
            (Screen::Instructions | Screen::GameOver, Command::Home) => {
                self.enter(Screen::Start, presenter);
                true
            }
            (Screen::Playing, Command::Pause | Command::TogglePause) => sim::pause(&mut self.state),
            (Screen::Paused, Command::Resume | Command::TogglePause) => {
                sim::resume(&mut self.state)
            }
            (Screen::Playing | Screen::Paused, Command::Quit) => sim::quit(&mut self.state).is_some(),
            (Screen::Playing, Command::UseHint) => sim::use_hint(&mut self.state),
            (Screen::Playing, Command::TapSymbol(symbol)) => self.tap(&symbol),
            (Screen::Playing, Command::TapSlot(slot)) => match self.state.grid.get(slot).cloned() {
                Some(symbol) => self.tap(&symbol),
                None => false,
            },
            (_, Command::ToggleSound) => {
                self.toggle_sound(presenter);
                true
            }
            (screen, command) => {
                log::debug!("Ignoring {:?} on {} screen", command, screen.as_str());
                false
            }
        };
        self.flush(presenter);
        handled
    }

    /// Advance the engine clock and route whatever it produced
    pub fn tick(&mut self, dt_ms: u32, presenter: &mut impl Presenter) {
        sim::tick(&mut self.state, dt_ms);
        self.flush(presenter);
    }

    fn tap(&mut self, symbol: &Symbol) -> bool {
        sim::tap(&mut self.state, symbol) != TapOutcome::Ignored
    }

    fn start_game(&mut self, presenter: &mut impl Presenter) {
        sim::start(&mut self.state);
        self.last_result = None;
        self.enter(Screen::Playing, presenter);
    }

    fn toggle_sound(&mut self, presenter: &mut impl Presenter) {
        let enabled = self.stats.toggle_sound(&mut self.store);
        log::info!("Sound {}", if enabled { "on" } else { "off" });
        presenter.update_stat(Stat::Sound, sound_label(enabled));
        self.cue(Cue::Click, presenter);
    }

    fn enter(&mut self, screen: Screen, presenter: &mut impl Presenter) {
        if self.screen != screen {
            log::debug!("Screen {} -> {}", self.screen.as_str(), screen.as_str());
        }
        self.screen = screen;
        presenter.show_screen(screen);
        self.refresh_stats(presenter);
    }

    fn refresh_stats(&self, presenter: &mut impl Presenter) {
        presenter.update_stat(Stat::HighScore, &self.stats.high_score.to_string());
        presenter.update_stat(Stat::GamesPlayed, &self.stats.games_played.to_string());
        presenter.update_stat(
            Stat::PlayTime,
            &format_play_time(self.stats.total_play_time_secs),
        );
        presenter.update_stat(Stat::Sound, sound_label(self.stats.sound_enabled));
        presenter.update_stat(Stat::Hints, &self.state.hints_remaining.to_string());
        presenter.update_stat(Stat::Round, &self.state.round.to_string());
    }

    fn cue(&self, cue: Cue, presenter: &mut impl Presenter) {
        if self.stats.sound_enabled {
            presenter.play_cue(cue);
        }
    }

    fn flush(&mut self, presenter: &mut impl Presenter) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::SessionStarted { hints } => {
                    presenter.update_stat(Stat::Hints, &hints.to_string());
                    presenter.update_stat(Stat::Round, "0");
                }
                GameEvent::GridRefreshed { symbols } => {
                    presenter.render_grid(&symbols);
                    presenter.set_grid_enabled(false);
                }
                GameEvent::RoundStarted { round, .. } => {
                    presenter.update_stat(Stat::Round, &round.to_string());
                }
                GameEvent::ShowSequence {
                    symbols,
                    duration_ms,
                } => {
                    presenter.set_grid_enabled(false);
                    presenter.show_sequence(&symbols, duration_ms);
                }
                GameEvent::SequenceHidden => presenter.hide_sequence(),
                GameEvent::InputOpened => presenter.set_grid_enabled(true),
                GameEvent::TapCorrect { symbol, .. } => {
                    presenter.mark_tap(&symbol, TapMark::Correct);
                    self.cue(Cue::Click, presenter);
                }
                GameEvent::TapWrong { symbol, .. } => {
                    presenter.set_grid_enabled(false);
                    presenter.mark_tap(&symbol, TapMark::Wrong);
                    self.cue(Cue::Error, presenter);
                }
                GameEvent::RoundCleared { round } => {
                    presenter.set_grid_enabled(false);
                    self.cue(Cue::Success, presenter);
                    if self.stats.submit_score(round, &mut self.store) {
                        presenter.update_stat(Stat::HighScore, &self.stats.high_score.to_string());
                    }
                }
                GameEvent::HintUsed { remaining } => {
                    presenter.update_stat(Stat::Hints, &remaining.to_string());
                    self.cue(Cue::Hint, presenter);
                }
                GameEvent::Highlight { symbol, .. } => presenter.highlight(&symbol, true),
                GameEvent::HighlightCleared { symbol } => presenter.highlight(&symbol, false),
                GameEvent::Paused => {
                    presenter.set_grid_enabled(false);
                    self.enter(Screen::Paused, presenter);
                }
                GameEvent::Resumed => {
                    self.enter(Screen::Playing, presenter);
                    presenter.set_grid_enabled(self.state.accepting_input);
                }
                GameEvent::RoundAborted { round } => {
                    log::warn!("Round {} could not be generated; ending run", round);
                }
                GameEvent::GameOver { score, reason } => {
                    presenter.set_grid_enabled(false);
                    let play_secs = self.state.play_time_ms / 1000;
                    self.stats.record_game(score, play_secs, &mut self.store);
                    self.last_result = Some((score, reason));
                    presenter.update_stat(Stat::FinalScore, &score.to_string());
                    self.enter(Screen::GameOver, presenter);
                }
            }
        }
    }
}

fn sound_label(enabled: bool) -> &'static str {
    if enabled { "On" } else { "Off" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;
    use crate::sim::GamePhase;
    use crate::stats::HIGH_SCORE_KEY;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Screen(Screen),
        Grid(usize),
        GridEnabled(bool),
        Sequence(usize, u32),
        HideSequence,
        Mark(Symbol, TapMark),
        Highlight(Symbol, bool),
        Cue(Cue),
        Stat(Stat, String),
    }

    #[derive(Default)]
    struct RecordingPresenter {
        calls: Vec<Call>,
    }

    impl RecordingPresenter {
        fn take(&mut self) -> Vec<Call> {
            std::mem::take(&mut self.calls)
        }

        fn last_stat(&self, stat: Stat) -> Option<&str> {
            self.calls.iter().rev().find_map(|c| match c {
                Call::Stat(s, text) if *s == stat => Some(text.as_str()),
                _ => None,
            })
        }
    }

    impl Presenter for RecordingPresenter {
        fn show_screen(&mut self, screen: Screen) {
            self.calls.push(Call::Screen(screen));
        }
        fn render_grid(&mut self, symbols: &[Symbol]) {
            self.calls.push(Call::Grid(symbols.len()));
        }
        fn set_grid_enabled(&mut self, enabled: bool) {
            self.calls.push(Call::GridEnabled(enabled));
        }
        fn show_sequence(&mut self, symbols: &[Symbol], duration_ms: u32) {
            self.calls.push(Call::Sequence(symbols.len(), duration_ms));
        }
        fn hide_sequence(&mut self) {
            self.calls.push(Call::HideSequence);
        }
        fn mark_tap(&mut self, symbol: &Symbol, mark: TapMark) {
            self.calls.push(Call::Mark(symbol.clone(), mark));
        }
        fn highlight(&mut self, symbol: &Symbol, on: bool) {
            self.calls.push(Call::Highlight(symbol.clone(), on));
        }
        fn play_cue(&mut self, cue: Cue) {
            self.calls.push(Call::Cue(cue));
        }
        fn update_stat(&mut self, stat: Stat, text: &str) {
            self.calls.push(Call::Stat(stat, text.to_string()));
        }
    }

    fn booted(seed: u64) -> (Session<MemoryStore>, RecordingPresenter) {
        booted_with(MemoryStore::new(), seed)
    }

    fn booted_with(store: MemoryStore, seed: u64) -> (Session<MemoryStore>, RecordingPresenter) {
        let mut presenter = RecordingPresenter::default();
        let mut session = Session::new(store, GameTuning::default(), Catalog::classic(), seed);
        session.boot(&mut presenter);
        (session, presenter)
    }

    fn run_until_input(session: &mut Session<MemoryStore>, p: &mut RecordingPresenter) {
        for _ in 0..1000 {
            if session.state().accepting_input {
                return;
            }
            session.tick(20, p);
        }
        panic!("input never opened");
    }

    fn tap_expected(session: &mut Session<MemoryStore>, p: &mut RecordingPresenter) -> bool {
        let symbol = session.state().expected().cloned().unwrap();
        session.dispatch(Command::TapSymbol(symbol), p)
    }

    fn tap_wrong(session: &mut Session<MemoryStore>, p: &mut RecordingPresenter) -> bool {
        let state = session.state();
        let expected = state.expected().unwrap();
        let wrong = state.grid.symbols().iter().find(|s| *s != expected).cloned().unwrap();
        session.dispatch(Command::TapSymbol(wrong), p)
    }

    /// Clear rounds until `round` is waiting for input
    fn play_to_round(session: &mut Session<MemoryStore>, p: &mut RecordingPresenter, round: u32) {
        loop {
            run_until_input(session, p);
            if session.state().round >= round {
                return;
            }
            while session.state().accepting_input {
                tap_expected(session, p);
            }
            session.tick(700, p);
        }
    }

    #[test]
    fn test_boot_shows_start_with_stats() {
        let (session, p) = booted(1);
        assert_eq!(session.screen(), Screen::Start);
        assert_eq!(p.calls.first(), Some(&Call::Screen(Screen::Start)));
        assert_eq!(p.last_stat(Stat::HighScore), Some("0"));
        assert_eq!(p.last_stat(Stat::Sound), Some("On"));
    }

    #[test]
    fn test_start_renders_board_and_sequence() {
        let (mut session, mut p) = booted(2);
        p.take();
        assert!(session.dispatch(Command::Start, &mut p));
        assert_eq!(session.screen(), Screen::Playing);
        let calls = p.take();
        assert!(calls.contains(&Call::Screen(Screen::Playing)));
        assert!(calls.contains(&Call::Grid(30)));

        session.tick(300, &mut p);
        let calls = p.take();
        assert!(calls.contains(&Call::Sequence(1, 2000)));
        assert!(calls.contains(&Call::Stat(Stat::Round, "1".to_string())));

        session.tick(2080, &mut p);
        let calls = p.take();
        assert!(calls.contains(&Call::HideSequence));
        assert_eq!(calls.last(), Some(&Call::GridEnabled(true)));
    }

    #[test]
    fn test_clearing_rounds_updates_high_score() {
        let (mut session, mut p) = booted(3);
        session.dispatch(Command::Start, &mut p);
        play_to_round(&mut session, &mut p, 3);
        assert_eq!(session.stats().high_score, 2);
        assert_eq!(session.store().get(HIGH_SCORE_KEY).unwrap().as_deref(), Some("2"));
        assert!(p.calls.contains(&Call::Cue(Cue::Success)));
    }

    #[test]
    fn test_wrong_tap_leads_to_game_over_screen() {
        let (mut session, mut p) = booted(4);
        session.dispatch(Command::Start, &mut p);
        play_to_round(&mut session, &mut p, 3);
        tap_expected(&mut session, &mut p);
        tap_expected(&mut session, &mut p);
        assert!(tap_wrong(&mut session, &mut p));
        assert!(p.calls.contains(&Call::Cue(Cue::Error)));
        assert_eq!(session.screen(), Screen::Playing);

        // Taps during the failure delay are ignored
        assert!(!tap_expected(&mut session, &mut p));

        session.tick(450, &mut p);
        assert_eq!(session.screen(), Screen::GameOver);
        assert_eq!(session.last_result(), Some((2, EndReason::Mistake)));
        assert_eq!(p.last_stat(Stat::FinalScore), Some("2"));
        assert_eq!(session.stats().games_played, 1);
    }

    #[test]
    fn test_high_score_survives_worse_game() {
        let (mut session, mut p) = booted(5);
        session.dispatch(Command::Start, &mut p);
        play_to_round(&mut session, &mut p, 3);
        session.dispatch(Command::Quit, &mut p);
        assert_eq!(session.last_result(), Some((2, EndReason::Quit)));

        assert!(session.dispatch(Command::Replay, &mut p));
        run_until_input(&mut session, &mut p);
        tap_wrong(&mut session, &mut p);
        session.tick(450, &mut p);
        assert_eq!(session.last_result(), Some((0, EndReason::Mistake)));

        let store = session.store().clone();
        assert_eq!(store.get(HIGH_SCORE_KEY).unwrap().as_deref(), Some("2"));
        let (reloaded, _) = booted_with(store, 6);
        assert_eq!(reloaded.stats().high_score, 2);
        assert_eq!(reloaded.stats().games_played, 2);
    }

    #[test]
    fn test_quit_mid_round_four_scores_three() {
        let (mut session, mut p) = booted(7);
        session.dispatch(Command::Start, &mut p);
        play_to_round(&mut session, &mut p, 4);
        assert!(session.dispatch(Command::Quit, &mut p));
        assert_eq!(session.screen(), Screen::GameOver);
        assert_eq!(session.last_result(), Some((3, EndReason::Quit)));
    }

    #[test]
    fn test_pause_and_resume_switch_screens() {
        let (mut session, mut p) = booted(8);
        session.dispatch(Command::Start, &mut p);
        assert!(!session.dispatch(Command::Pause, &mut p)); // still Starting
        run_until_input(&mut session, &mut p);

        assert!(session.dispatch(Command::TogglePause, &mut p));
        assert_eq!(session.screen(), Screen::Paused);
        assert!(!tap_expected(&mut session, &mut p));
        assert!(!session.dispatch(Command::UseHint, &mut p));

        assert!(session.dispatch(Command::TogglePause, &mut p));
        assert_eq!(session.screen(), Screen::Playing);
        assert!(tap_expected(&mut session, &mut p));
    }

    #[test]
    fn test_quit_from_pause() {
        let (mut session, mut p) = booted(9);
        session.dispatch(Command::Start, &mut p);
        play_to_round(&mut session, &mut p, 2);
        session.dispatch(Command::Pause, &mut p);
        assert!(session.dispatch(Command::Quit, &mut p));
        assert_eq!(session.screen(), Screen::GameOver);
        assert_eq!(session.last_result(), Some((1, EndReason::Quit)));
    }

    #[test]
    fn test_hints_reset_on_replay() {
        let (mut session, mut p) = booted(10);
        session.dispatch(Command::Start, &mut p);
        run_until_input(&mut session, &mut p);
        assert!(session.dispatch(Command::UseHint, &mut p));
        assert_eq!(p.last_stat(Stat::Hints), Some("2"));
        assert!(p.calls.contains(&Call::Cue(Cue::Hint)));
        run_until_input(&mut session, &mut p);
        let next = session.state().expected().cloned().unwrap();
        assert!(p.calls.contains(&Call::Highlight(next, true)));

        session.dispatch(Command::Quit, &mut p);
        session.dispatch(Command::Replay, &mut p);
        assert_eq!(session.state().hints_remaining, 3);
        assert_eq!(p.last_stat(Stat::Hints), Some("3"));
    }

    #[test]
    fn test_tap_slot_uses_grid_position() {
        let (mut session, mut p) = booted(11);
        session.dispatch(Command::Start, &mut p);
        run_until_input(&mut session, &mut p);
        let expected = session.state().expected().cloned().unwrap();
        let slot = session.state().grid.slot_of(&expected).unwrap();
        assert!(session.dispatch(Command::TapSlot(slot), &mut p));
        assert_eq!(session.state().phase, GamePhase::RoundCleared);
        assert!(!session.dispatch(Command::TapSlot(999), &mut p));
    }

    #[test]
    fn test_sound_toggle_silences_cues() {
        let (mut session, mut p) = booted(12);
        assert!(session.dispatch(Command::ToggleSound, &mut p));
        assert!(!session.stats().sound_enabled);
        assert_eq!(p.last_stat(Stat::Sound), Some("Off"));
        p.take();

        session.dispatch(Command::Start, &mut p);
        run_until_input(&mut session, &mut p);
        tap_expected(&mut session, &mut p);
        assert!(!p.calls.iter().any(|c| matches!(c, Call::Cue(_))));
    }

    #[test]
    fn test_screen_table_ignores_out_of_place_commands() {
        let (mut session, mut p) = booted(13);
        assert!(!session.dispatch(Command::UseHint, &mut p));
        assert!(!session.dispatch(Command::Quit, &mut p));
        assert!(!session.dispatch(Command::Replay, &mut p));
        assert!(!session.dispatch(Command::Resume, &mut p));
        assert!(!session.dispatch(Command::Home, &mut p));
        assert_eq!(session.screen(), Screen::Start);

        assert!(session.dispatch(Command::ShowInstructions, &mut p));
        assert_eq!(session.screen(), Screen::Instructions);
        assert!(session.dispatch(Command::Home, &mut p));
        assert_eq!(session.screen(), Screen::Start);

        session.dispatch(Command::Start, &mut p);
        assert!(!session.dispatch(Command::Start, &mut p));
        assert!(!session.dispatch(Command::ShowInstructions, &mut p));
    }

    #[test]
    fn test_home_after_game_over() {
        let (mut session, mut p) = booted(14);
        session.dispatch(Command::Start, &mut p);
        session.dispatch(Command::Quit, &mut p);
        assert!(session.dispatch(Command::Home, &mut p));
        assert_eq!(session.screen(), Screen::Start);
    }

    #[test]
    fn test_empty_catalog_ends_run() {
        let mut p = RecordingPresenter::default();
        let mut session = Session::new(
            MemoryStore::new(),
            GameTuning::default(),
            Catalog::flat(&[]),
            15,
        );
        session.boot(&mut p);
        session.dispatch(Command::Start, &mut p);
        session.tick(300, &mut p);
        assert_eq!(session.screen(), Screen::GameOver);
        assert_eq!(session.last_result(), Some((0, EndReason::Aborted)));
    }
}
