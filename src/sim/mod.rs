//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One update per tick, time read only through the injected `Clock`
//! - Seeded RNG only (owned by the `Session`)
//! - Stable iteration order (insertion order of the arena collection)
//! - No rendering, audio or platform dependencies

pub mod arena;
pub mod ball;
pub mod clock;
pub mod collision;
pub mod events;
pub mod input;
pub mod levels;
pub mod player;
pub mod rules;
pub mod session;

pub use arena::Arena;
pub use ball::{Ball, BallColor, BallState};
pub use clock::{Clock, ManualClock};
pub use collision::{Viewport, circles_overlap, overlaps};
pub use events::GameEvent;
pub use input::{InputEvent, InputKind};
pub use levels::{GameMode, LEVELS, Level};
pub use player::Player;
pub use rules::{ArenaRules, CaptureRules, ReactionRules, TickContext, rules_for};
pub use session::{BallView, GameOverReport, Hud, Outcome, RenderView, Session, SessionState};
