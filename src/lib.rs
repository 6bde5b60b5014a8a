//! Chain Reaction - an arcade simulation of expanding, colliding balls
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, arena rules, session)
//! - `platform`: Clock, input handoff and logging setup per target
//! - `persistence`: Key/value storage backends
//! - `highscores`: Per-mode leaderboard behind the `Scoreboard` trait
//! - `settings`: Player options (mode, vibration)
//! - `audio`: Sound/haptic feedback dispatch
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScores, PersistentScoreboard, Scoreboard};
pub use settings::{Options, OptionsSource};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Simulation rate; one `Session::update` per frame
    pub const TICKS_PER_SECOND: u64 = 60;
    /// Milliseconds per tick (rounded down)
    pub const TICK_MS: u64 = 1000 / TICKS_PER_SECOND;

    /// Viewport dimensions (pixels)
    pub const VIEWPORT_WIDTH: f32 = 480.0;
    pub const VIEWPORT_HEIGHT: f32 = 800.0;

    /// Wandering ball speed per axis (pixels/tick)
    pub const BALL_VELOCITY: f32 = 3.0;
    /// Starting diameter for population and controller balls
    pub const START_DIAMETER: f32 = 24.0;

    /// Diameter growth per tick while expanding (shrink is twice this)
    pub const EXPAND_RATE: f32 = 5.0;
    /// Diameter at which expansion stops and the ball pauses
    pub const EXPAND_LIMIT: f32 = 96.0;
    /// How long a fully expanded ball holds before shrinking
    pub const PAUSE_DURATION_MS: u64 = 1100;
    /// Below this diameter a shrinking ball is dead
    pub const MIN_DIAMETER: f32 = 2.0;

    /// Capture mode: diameter gained per absorbed ball
    pub const CAPTURE_INCREASE: f32 = 2.0;
    /// Capture mode: spawned diameter is controller diameter +/- this
    pub const SPAWN_RANGE: i32 = 20;
    /// Capture mode: time between timed spawns
    pub const SPAWN_DELAY_MS: u64 = 3500;

    /// Controller explosion: 9 frames at 75 ms
    pub const EXPLOSION_FRAMES: u64 = 9;
    pub const EXPLOSION_FRAME_MS: u64 = 75;

    /// Haptic pulse on a loss
    pub const VIBRATION_MS: u64 = 500;

    /// Hint overlay fade-out after the first action
    pub const HINT_FADE_MS: u64 = 3750;

    /// Placement retries before accepting an overlapping spot
    pub const SPAWN_ATTEMPTS: u32 = 1000;
}
