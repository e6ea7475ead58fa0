//! Persisted player stats
//!
//! High score, games played, total play time and the sound preference, each
//! under its own key so the store stays a flat key-value map. Storage is best
//! effort: failures are logged and the game carries on.

use crate::platform::KeyValueStore;

pub const HIGH_SCORE_KEY: &str = "emr_highscore";
pub const GAMES_PLAYED_KEY: &str = "emr_games_played";
pub const PLAY_TIME_KEY: &str = "emr_total_play_time";
pub const SOUND_KEY: &str = "emr_sound_enabled";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStats {
    /// Best score ever (only increases)
    pub high_score: u32,
    pub games_played: u32,
    pub total_play_time_secs: u64,
    pub sound_enabled: bool,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            high_score: 0,
            games_played: 0,
            total_play_time_secs: 0,
            sound_enabled: true,
        }
    }
}

/// Read a value, falling back to `default` when missing, unreadable or malformed
fn read_or<T: std::str::FromStr>(store: &impl KeyValueStore, key: &str, default: T) -> T {
    match store.get(key) {
        Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring malformed value for {}: {:?}", key, raw);
            default
        }),
        Ok(None) => default,
        Err(e) => {
            log::warn!("Could not read {}: {}", key, e);
            default
        }
    }
}

fn write(store: &mut impl KeyValueStore, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        log::warn!("Could not write {}: {}", key, e);
    }
}

impl PlayerStats {
    /// Load stats, using defaults for anything absent
    pub fn load(store: &impl KeyValueStore) -> Self {
        let defaults = Self::default();
        let stats = Self {
            high_score: read_or(store, HIGH_SCORE_KEY, defaults.high_score),
            games_played: read_or(store, GAMES_PLAYED_KEY, defaults.games_played),
            total_play_time_secs: read_or(store, PLAY_TIME_KEY, defaults.total_play_time_secs),
            sound_enabled: read_or(store, SOUND_KEY, defaults.sound_enabled),
        };
        log::info!(
            "Loaded stats: high score {}, {} games",
            stats.high_score,
            stats.games_played
        );
        stats
    }

    /// Record a score candidate. Returns true if it set a new high score.
    ///
    /// The stored value is re-read first so a higher score written elsewhere
    /// (another tab) is never overwritten.
    pub fn submit_score(&mut self, score: u32, store: &mut impl KeyValueStore) -> bool {
        let stored = read_or(&*store, HIGH_SCORE_KEY, 0u32);
        self.high_score = self.high_score.max(stored);
        if score <= self.high_score {
            return false;
        }
        self.high_score = score;
        write(store, HIGH_SCORE_KEY, &score.to_string());
        log::info!("New high score: {}", score);
        true
    }

    /// Count a finished game. Returns true if its score set a new high score.
    pub fn record_game(
        &mut self,
        score: u32,
        play_time_secs: u64,
        store: &mut impl KeyValueStore,
    ) -> bool {
        self.games_played += 1;
        self.total_play_time_secs += play_time_secs;
        write(store, GAMES_PLAYED_KEY, &self.games_played.to_string());
        write(store, PLAY_TIME_KEY, &self.total_play_time_secs.to_string());
        self.submit_score(score, store)
    }

    /// Flip the sound preference and persist it
    pub fn toggle_sound(&mut self, store: &mut impl KeyValueStore) -> bool {
        self.sound_enabled = !self.sound_enabled;
        write(store, SOUND_KEY, &self.sound_enabled.to_string());
        self.sound_enabled
    }
}

/// Format seconds as "mm:ss", or "1h 05m" past an hour
pub fn format_play_time(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    if hours > 0 {
        format!("{}h {:02}m", hours, mins)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}
