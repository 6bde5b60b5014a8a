//! Per-mode high score leaderboards
//!
//! The session only sees the `Scoreboard` trait. `HighScores` is the plain
//! in-memory implementation; `PersistentScoreboard` wraps it with a
//! `KeyValueStore` and saves after every update.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StoreError, load_json, save_json};
use crate::sim::GameMode;

/// Maximum number of high scores kept per mode
pub const MAX_HIGH_SCORES: usize = 10;

/// Score persistence as seen from the simulation
pub trait Scoreboard: Send {
    /// Record a finished run. Returns true if it beat the previous best.
    fn update_score(&mut self, mode: GameMode, score: u32) -> bool;
    /// Best score for the mode (0 when none recorded)
    fn high_score(&self, mode: GameMode) -> u32;
}

/// One mode's top scores, sorted descending
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub scores: Vec<u32>,
}

impl Leaderboard {
    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.scores.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.scores.last().map(|&s| score > s).unwrap_or(true)
    }

    /// Add a score (if it qualifies). Returns the 1-indexed rank achieved.
    pub fn add_score(&mut self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = match self.scores.iter().position(|&s| score > s) {
            Some(i) => {
                self.scores.insert(i, score);
                i + 1
            }
            None => {
                self.scores.push(score);
                self.scores.len()
            }
        };
        self.scores.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn top_score(&self) -> Option<u32> {
        self.scores.first().copied()
    }
}

/// Leaderboards for both modes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighScores {
    pub reaction: Leaderboard,
    pub capture: Leaderboard,
}

impl HighScores {
    const STORAGE_KEY: &'static str = "chain_reaction_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self, mode: GameMode) -> &Leaderboard {
        match mode {
            GameMode::Reaction => &self.reaction,
            GameMode::Capture => &self.capture,
        }
    }

    pub fn board_mut(&mut self, mode: GameMode) -> &mut Leaderboard {
        match mode {
            GameMode::Reaction => &mut self.reaction,
            GameMode::Capture => &mut self.capture,
        }
    }

    /// Load from a store, starting fresh if nothing (valid) is there
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<HighScores>(store, Self::STORAGE_KEY) {
            Ok(Some(scores)) => {
                log::info!(
                    "Loaded high scores ({} reaction, {} capture)",
                    scores.reaction.scores.len(),
                    scores.capture.scores.len()
                );
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Could not read high scores ({}), starting fresh", e);
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        save_json(store, Self::STORAGE_KEY, self)
    }
}

impl Scoreboard for HighScores {
    fn update_score(&mut self, mode: GameMode, score: u32) -> bool {
        let board = self.board_mut(mode);
        let is_best = score > board.top_score().unwrap_or(0);
        board.add_score(score);
        is_best
    }

    fn high_score(&self, mode: GameMode) -> u32 {
        self.board(mode).top_score().unwrap_or(0)
    }
}

/// `HighScores` saved to a store after every update. Save failures are
/// logged and never reach the simulation.
pub struct PersistentScoreboard {
    scores: HighScores,
    store: Box<dyn KeyValueStore>,
}

impl PersistentScoreboard {
    pub fn open(store: Box<dyn KeyValueStore>) -> Self {
        let scores = HighScores::load(store.as_ref());
        Self { scores, store }
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }
}

impl Scoreboard for PersistentScoreboard {
    fn update_score(&mut self, mode: GameMode, score: u32) -> bool {
        let is_best = self.scores.update_score(mode, score);
        match self.scores.save(self.store.as_mut()) {
            Ok(()) => log::debug!("High scores saved"),
            Err(e) => log::warn!("Failed to save high scores: {}", e),
        }
        is_best
    }

    fn high_score(&self, mode: GameMode) -> u32 {
        self.scores.high_score(mode)
    }
}
