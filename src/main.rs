//! Emoji Memory Rush entry point
//!
//! On the web: wires DOM buttons, grid taps, keyboard shortcuts and auto-pause
//! to the session and drives its clock from requestAnimationFrame.
//! Natively: plays a headless autoplay run and logs it.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::MouseEvent;

    use emoji_memory_rush::platform::web::DomPresenter;
    use emoji_memory_rush::platform::{LocalStore, command_for_key};
    use emoji_memory_rush::{Catalog, Command, GameTuning, Screen, Session, Symbol};

    /// Longest frame step fed to the engine (tab switches produce huge gaps)
    const MAX_FRAME_MS: f64 = 100.0;

    /// Game instance holding all state
    struct Game {
        session: Session<LocalStore>,
        presenter: DomPresenter,
        last_time: f64,
    }

    impl Game {
        fn dispatch(&mut self, command: Command) {
            // Any user action counts as the gesture browsers need for audio
            self.presenter.audio().resume();
            self.session.dispatch(command, &mut self.presenter);
        }

        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time).clamp(0.0, MAX_FRAME_MS)
            } else {
                0.0
            };
            self.last_time = time;
            self.session.tick(dt as u32, &mut self.presenter);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger already set: {e}").into());
        }

        log::info!("Emoji Memory Rush starting...");

        let Some(mut presenter) = DomPresenter::new() else {
            log::error!("No document available");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let catalog = Catalog::themed();
        let mut session = Session::new(LocalStore::new(), GameTuning::default(), catalog, seed);
        session.boot(&mut presenter);
        log::info!("Session ready with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            session,
            presenter,
            last_time: 0.0,
        }));

        setup_buttons(game.clone());
        setup_grid(game.clone());
        setup_keyboard(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Emoji Memory Rush running!");
    }

    fn on_click(id: &str, game: Rc<RefCell<Game>>, command: Command) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing button #{}", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            game.borrow_mut().dispatch(command.clone());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        on_click("start-btn", game.clone(), Command::Start);
        on_click("instructions-btn", game.clone(), Command::ShowInstructions);
        on_click("instructions-back-btn", game.clone(), Command::Home);
        on_click("quit-btn", game.clone(), Command::Quit);
        on_click("hint-btn", game.clone(), Command::UseHint);
        on_click("pause-btn", game.clone(), Command::Pause);
        on_click("resume-btn", game.clone(), Command::Resume);
        on_click("pause-quit-btn", game.clone(), Command::Quit);
        on_click("replay-btn", game.clone(), Command::Replay);
        on_click("home-btn", game.clone(), Command::Home);
        on_click("sound-btn", game, Command::ToggleSound);
    }

    /// One delegated listener for every grid button
    fn setup_grid(game: Rc<RefCell<Game>>) {
        let Some(grid) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("grid"))
        else {
            log::warn!("Missing #grid");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let emoji = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                .and_then(|el| el.closest(".emoji-btn").ok().flatten())
                .and_then(|btn| btn.get_attribute("data-emoji"));
            if let Some(emoji) = emoji {
                game.borrow_mut().dispatch(Command::TapSymbol(Symbol::new(emoji)));
            }
        });
        let _ = grid.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            if event.repeat() {
                return;
            }
            if let Some(command) = command_for_key(&event.key()) {
                event.prevent_default();
                game.borrow_mut().dispatch(command);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().update(time);
        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.session.screen() == Screen::Playing {
                        g.dispatch(Command::Pause);
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.session.screen() == Screen::Playing {
                    g.dispatch(Command::Pause);
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use emoji_memory_rush::platform::{Cue, KeyValueStore, Presenter, Stat, TapMark};
    use emoji_memory_rush::{Catalog, Command, GameTuning, Screen, Session, Symbol};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    /// Simulated frame length
    const FRAME_MS: u32 = 16;
    /// Time the bot "thinks" between taps
    const TAP_INTERVAL_MS: u32 = 240;
    /// Chance of a slip per tap, grows with the round
    const SLIP_PER_ROUND: f64 = 0.015;
    /// Hard stop for runaway runs
    const MAX_FRAMES: u32 = 500_000;

    /// Presenter that narrates to the log
    struct LogPresenter;

    impl Presenter for LogPresenter {
        fn show_screen(&mut self, screen: Screen) {
            log::debug!("[screen] {}", screen.as_str());
        }
        fn render_grid(&mut self, symbols: &[Symbol]) {
            let row: String = symbols.iter().map(|s| s.as_str()).collect();
            log::debug!("[grid] {}", row);
        }
        fn set_grid_enabled(&mut self, enabled: bool) {
            log::trace!("[grid] enabled={}", enabled);
        }
        fn show_sequence(&mut self, symbols: &[Symbol], duration_ms: u32) {
            let seq: Vec<&str> = symbols.iter().map(|s| s.as_str()).collect();
            log::info!("[show] {} for {} ms", seq.join(" "), duration_ms);
        }
        fn hide_sequence(&mut self) {
            log::trace!("[show] hidden");
        }
        fn mark_tap(&mut self, symbol: &Symbol, mark: TapMark) {
            log::debug!("[tap] {} {:?}", symbol, mark);
        }
        fn highlight(&mut self, symbol: &Symbol, on: bool) {
            log::debug!("[hint] {} highlighted={}", symbol, on);
        }
        fn play_cue(&mut self, cue: Cue) {
            log::trace!("[cue] {:?}", cue);
        }
        fn update_stat(&mut self, stat: Stat, text: &str) {
            log::trace!("[stat] {:?} = {}", stat, text);
        }
    }

    /// Play one game with a fallible bot; returns the final score
    pub fn run<S: KeyValueStore>(store: S, tuning: GameTuning, seed: u64) -> u32 {
        let mut presenter = LogPresenter;
        let mut session = Session::new(store, tuning, Catalog::themed(), seed);
        let mut bot = Pcg32::seed_from_u64(seed ^ 0x5eed);
        session.boot(&mut presenter);
        session.dispatch(Command::Start, &mut presenter);

        let mut since_tap = 0;
        let mut frames = 0;
        while session.screen() == Screen::Playing && frames < MAX_FRAMES {
            frames += 1;
            session.tick(FRAME_MS, &mut presenter);
            since_tap += FRAME_MS;

            let state = session.state();
            if !state.accepting_input || state.grid.is_empty() || since_tap < TAP_INTERVAL_MS {
                continue;
            }
            since_tap = 0;

            // Lean on a hint when a long sequence starts
            if state.player_index == 0 && state.round >= 6 && state.hints_remaining > 0 {
                session.dispatch(Command::UseHint, &mut presenter);
                continue;
            }

            let slip = bot.random_bool((SLIP_PER_ROUND * f64::from(state.round)).min(1.0));
            let target = match (slip, state.expected()) {
                (false, Some(expected)) => expected.clone(),
                _ => {
                    let slot = bot.random_range(0..state.grid.len());
                    state.grid.symbols()[slot].clone()
                }
            };
            session.dispatch(Command::TapSymbol(target), &mut presenter);
        }

        if frames >= MAX_FRAMES {
            log::warn!("Autoplay hit the frame limit; quitting");
            session.dispatch(Command::Quit, &mut presenter);
        }

        let stats = session.stats();
        let score = session.last_result().map(|(score, _)| score).unwrap_or(0);
        log::info!(
            "Final score {} | high score {} | games played {}",
            score,
            stats.high_score,
            stats.games_played
        );
        score
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use emoji_memory_rush::platform::{FileStore, MemoryStore};
    use emoji_memory_rush::{GameTuning, Pace};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Emoji Memory Rush (native autoplay) starting...");
    log::info!("Usage: emoji-memory-rush [seed] [pace] [stats.json]");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    let pace = args
        .next()
        .and_then(|s| Pace::from_str(&s))
        .unwrap_or_default();
    log::info!("Seed {} | pace {}", seed, pace.as_str());
    let tuning = GameTuning::from_pace(pace);

    let score = match args.next() {
        Some(path) => match FileStore::open(&path) {
            Ok(store) => {
                log::info!("Persisting stats to {}", store.path().display());
                autoplay::run(store, tuning, seed)
            }
            Err(e) => {
                log::error!("Cannot open stats file {}: {}", path, e);
                autoplay::run(MemoryStore::new(), tuning, seed)
            }
        },
        None => autoplay::run(MemoryStore::new(), tuning, seed),
    };
    println!("Score: {}", score);
}
