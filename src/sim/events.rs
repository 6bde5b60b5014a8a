//! Fire-and-forget signals emitted by the simulation
//!
//! The session collects these during a tick; the platform drains them and
//! hands them to `audio::dispatch`. Nothing in the core waits on them.

use serde::{Deserialize, Serialize};

/// Number of distinct collision tones
pub const COLLISION_TONES: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// At least one infection or capture happened this tick
    Collision { tone: u8 },
    /// Cut whatever is playing (precedes win/lose stings)
    StopSounds,
    Win,
    Lose,
    /// Controller's ball destroyed in Capture mode
    Explosion,
    Vibrate { duration_ms: u64 },
}
