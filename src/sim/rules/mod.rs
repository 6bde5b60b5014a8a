//! Per-mode arena behaviour
//!
//! Each game mode is one implementation of `ArenaRules`. The session picks
//! the implementation once while loading and keeps it for the whole level,
//! so the tick never branches on the mode.

use rand::Rng;
use rand_pcg::Pcg32;

use super::arena::Arena;
use super::collision::Viewport;
use super::events::{COLLISION_TONES, GameEvent};
use super::input::InputEvent;
use super::levels::{GameMode, Level};
use super::player::Player;
use crate::tuning::Tuning;

mod capture;
mod reaction;

pub use capture::CaptureRules;
pub use reaction::ReactionRules;

/// Everything a rule set may read or emit during one tick
pub struct TickContext<'a> {
    /// Clock time for this tick (ms)
    pub now: u64,
    pub tuning: &'a Tuning,
    pub rng: &'a mut Pcg32,
    pub events: &'a mut Vec<GameEvent>,
}

impl<'a> TickContext<'a> {
    pub fn new(
        now: u64,
        tuning: &'a Tuning,
        rng: &'a mut Pcg32,
        events: &'a mut Vec<GameEvent>,
    ) -> Self {
        Self {
            now,
            tuning,
            rng,
            events,
        }
    }

    /// Queue a collision sound with a random tone
    pub fn collision_sound(&mut self) {
        let tone = self.rng.random_range(0..COLLISION_TONES);
        self.events.push(GameEvent::Collision { tone });
    }
}

/// Mode-specific simulation rules
pub trait ArenaRules: Send + std::fmt::Debug {
    fn mode(&self) -> GameMode;

    /// Lay out the arena and controller for a fresh level
    fn start_level(&mut self, arena: &mut Arena, player: &mut Player, level: Level, ctx: &mut TickContext);

    /// Apply one pointer event to the controller
    fn handle_input(&mut self, player: &mut Player, event: InputEvent, viewport: &Viewport, now: u64);

    /// Advance every arena ball one tick and resolve collisions
    fn update(&mut self, arena: &mut Arena, player: &mut Player, ctx: &mut TickContext);

    /// Whether the level has ended and the session should score it
    fn is_terminal(&self, arena: &Arena, player: &Player) -> bool;
}

/// Construct the rule set for a mode
pub fn rules_for(mode: GameMode) -> Box<dyn ArenaRules> {
    match mode {
        GameMode::Reaction => Box::new(ReactionRules::default()),
        GameMode::Capture => Box::new(CaptureRules::default()),
    }
}
