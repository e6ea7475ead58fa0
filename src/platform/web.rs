//! DOM presenter
//!
//! Drives the static markup in `index.html`: screen panels toggled with the
//! `hidden` class, grid buttons carrying `data-emoji`, and any element with a
//! `data-stat` attribute receiving text updates.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use super::{Cue, Presenter, Stat, TapMark};
use crate::audio::AudioManager;
use crate::catalog::Symbol;
use crate::session::Screen;

/// Screen panel element ids
const PANELS: [(Screen, &str); 6] = [
    (Screen::Loading, "loading"),
    (Screen::Start, "start-screen"),
    (Screen::Instructions, "instructions-screen"),
    (Screen::Playing, "game-screen"),
    (Screen::Paused, "pause-screen"),
    (Screen::GameOver, "gameover-screen"),
];

fn stat_key(stat: Stat) -> &'static str {
    match stat {
        Stat::Round => "round",
        Stat::HighScore => "highscore",
        Stat::Hints => "hints",
        Stat::FinalScore => "final-score",
        Stat::GamesPlayed => "games-played",
        Stat::PlayTime => "play-time",
        Stat::Sound => "sound",
    }
}

fn set_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

pub struct DomPresenter {
    document: Document,
    audio: AudioManager,
}

impl DomPresenter {
    /// None outside a browser window
    pub fn new() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self {
            document,
            audio: AudioManager::new(),
        })
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn select_all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn button_for(&self, symbol: &Symbol) -> Option<Element> {
        self.select_all("#grid .emoji-btn")
            .into_iter()
            .find(|b| b.get_attribute("data-emoji").as_deref() == Some(symbol.as_str()))
    }

    fn make_element(&self, tag: &str, class: &str, text: &str) -> Option<Element> {
        let el = self.document.create_element(tag).ok()?;
        el.set_attribute("class", class).ok()?;
        el.set_text_content(Some(text));
        Some(el)
    }
}

impl Presenter for DomPresenter {
    fn show_screen(&mut self, screen: Screen) {
        for (panel, id) in PANELS {
            if let Some(el) = self.by_id(id) {
                set_class(&el, "hidden", panel != screen);
            }
        }
    }

    fn render_grid(&mut self, symbols: &[Symbol]) {
        let Some(grid) = self.by_id("grid") else {
            log::warn!("No #grid element");
            return;
        };
        grid.set_inner_html("");
        for (idx, symbol) in symbols.iter().enumerate() {
            let Some(btn) = self.make_element("button", "emoji-btn", symbol.as_str()) else {
                continue;
            };
            let _ = btn.set_attribute("type", "button");
            let _ = btn.set_attribute("data-emoji", symbol.as_str());
            let _ = btn.set_attribute("data-index", &idx.to_string());
            // Digit shortcut label for the first ten slots
            if idx < 10 {
                let _ = btn.set_attribute("data-key", &((idx + 1) % 10).to_string());
            }
            let _ = grid.append_child(&btn);
        }
    }

    fn set_grid_enabled(&mut self, enabled: bool) {
        if let Some(grid) = self.by_id("grid") {
            set_class(&grid, "locked", !enabled);
        }
    }

    fn show_sequence(&mut self, symbols: &[Symbol], duration_ms: u32) {
        let Some(display) = self.by_id("sequence-display") else {
            return;
        };
        display.set_inner_html("");
        let style = format!("animation: fadeHold {}ms ease-in-out forwards", duration_ms);
        for symbol in symbols {
            if let Some(el) = self.make_element("div", "sequence-emoji", symbol.as_str()) {
                let _ = el.set_attribute("style", &style);
                let _ = display.append_child(&el);
            }
        }
    }

    fn hide_sequence(&mut self) {
        if let Some(display) = self.by_id("sequence-display") {
            display.set_inner_html("");
        }
    }

    fn mark_tap(&mut self, symbol: &Symbol, mark: TapMark) {
        if let Some(btn) = self.button_for(symbol) {
            let class = match mark {
                TapMark::Correct => "correct",
                TapMark::Wrong => "wrong",
            };
            set_class(&btn, class, true);
        }
    }

    fn highlight(&mut self, symbol: &Symbol, on: bool) {
        if let Some(btn) = self.button_for(symbol) {
            set_class(&btn, "hint", on);
        }
    }

    fn play_cue(&mut self, cue: Cue) {
        self.audio.play(cue);
    }

    fn update_stat(&mut self, stat: Stat, text: &str) {
        let selector = format!("[data-stat=\"{}\"]", stat_key(stat));
        for el in self.select_all(&selector) {
            el.set_text_content(Some(text));
        }

        match stat {
            Stat::Hints => {
                if let Some(btn) = self.by_id("hint-btn") {
                    let empty = text == "0";
                    set_class(&btn, "disabled", empty);
                    let _ = if empty {
                        btn.set_attribute("disabled", "")
                    } else {
                        btn.remove_attribute("disabled")
                    };
                }
            }
            Stat::Sound => {
                if let Some(btn) = self.by_id("sound-btn") {
                    set_class(&btn, "muted", text == "Off");
                }
            }
            _ => {}
        }
    }
}
