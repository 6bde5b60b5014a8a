//! Game modes and the Reaction level table

use serde::{Deserialize, Serialize};

/// Which rule set drives the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Set off a chain reaction and infect enough balls to clear the level
    #[default]
    Reaction,
    /// Steer your ball, swallow smaller ones, avoid bigger ones
    Capture,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Reaction => "Reaction",
            GameMode::Capture => "Capture",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reaction" | "chain" => Some(GameMode::Reaction),
            "capture" => Some(GameMode::Capture),
            _ => None,
        }
    }
}

/// One Reaction level: how many balls spawn and how many must be infected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub count: u32,
    pub goal: u32,
}

impl Level {
    pub const fn new(count: u32, goal: u32) -> Self {
        Self { count, goal }
    }
}

/// Levels in order of difficulty
pub const LEVELS: [Level; 12] = [
    Level::new(5, 1),
    Level::new(10, 2),
    Level::new(15, 3),
    Level::new(20, 5),
    Level::new(25, 7),
    Level::new(30, 10),
    Level::new(35, 15),
    Level::new(40, 21),
    Level::new(45, 27),
    Level::new(50, 33),
    Level::new(55, 44),
    Level::new(60, 55),
];
