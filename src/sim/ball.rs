//! The ball entity and its expand/pause/shrink/die life cycle

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Viewport;
use crate::tuning::Tuning;

/// Life-cycle state. Transitions only move forward:
/// Idle -> Expanding -> Paused -> Shrinking -> Dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Wandering (or parked, for the controller's ball)
    Idle,
    Expanding,
    /// Fully expanded, holding for the pause duration
    Paused,
    Shrinking,
    /// Inert; removed once its exit visual has played
    Dead,
}

/// Ball colour, as a cell on the ball sprite sheet. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallColor {
    Blue1,
    Blue2,
    Blue3,
    Blue4,
    Yellow1,
    Yellow2,
    Yellow3,
    Green1,
    Green2,
    Green3,
    Green4,
    Purple1,
    Purple2,
    Purple3,
    Orange1,
    Orange2,
    Red1,
    Red2,
    Other1,
    /// Reserved for the controller's ball
    White,
}

impl BallColor {
    /// Colours handed out to the wandering population
    pub const POPULATION: [BallColor; 19] = [
        BallColor::Blue1,
        BallColor::Blue2,
        BallColor::Blue3,
        BallColor::Blue4,
        BallColor::Yellow1,
        BallColor::Yellow2,
        BallColor::Yellow3,
        BallColor::Green1,
        BallColor::Green2,
        BallColor::Green3,
        BallColor::Green4,
        BallColor::Purple1,
        BallColor::Purple2,
        BallColor::Purple3,
        BallColor::Orange1,
        BallColor::Orange2,
        BallColor::Red1,
        BallColor::Red2,
        BallColor::Other1,
    ];

    /// (column, row) on the sprite sheet
    pub fn sprite_cell(self) -> (u32, u32) {
        match self {
            BallColor::Blue1 => (0, 0),
            BallColor::Blue2 => (0, 3),
            BallColor::Blue3 => (2, 3),
            BallColor::Blue4 => (1, 4),
            BallColor::Yellow1 => (1, 0),
            BallColor::Yellow2 => (3, 0),
            BallColor::Yellow3 => (2, 4),
            BallColor::Green1 => (3, 1),
            BallColor::Green2 => (4, 1),
            BallColor::Green3 => (0, 2),
            BallColor::Green4 => (0, 4),
            BallColor::Purple1 => (1, 1),
            BallColor::Purple2 => (4, 3),
            BallColor::Purple3 => (3, 4),
            BallColor::Orange1 => (1, 2),
            BallColor::Orange2 => (4, 2),
            BallColor::Red1 => (2, 2),
            BallColor::Red2 => (3, 2),
            BallColor::Other1 => (3, 3),
            BallColor::White => (4, 0),
        }
    }
}

/// A circular entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    /// Center position (pixels)
    pub pos: Vec2,
    /// Velocity (pixels/tick)
    pub vel: Vec2,
    pub diameter: f32,
    pub state: BallState,
    /// Clock time (ms) the current state was entered
    pub state_entered_at: u64,
    pub color: BallColor,
}

impl Ball {
    pub fn new(id: u32, color: BallColor, diameter: f32) -> Self {
        Self {
            id,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            diameter: diameter.max(0.0),
            state: BallState::Idle,
            state_entered_at: 0,
            color,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        (self.diameter / 2.0).max(0.0)
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.state == BallState::Dead
    }

    /// Expanding or holding at full size; these states infect neighbours
    #[inline]
    pub fn is_reacting(&self) -> bool {
        matches!(self.state, BallState::Expanding | BallState::Paused)
    }

    /// Anywhere between the start of expansion and death
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(
            self.state,
            BallState::Expanding | BallState::Paused | BallState::Shrinking
        )
    }

    /// Begin expanding. Only an idle ball can start; returns whether it did.
    pub fn start_expand(&mut self, now: u64) -> bool {
        if self.state != BallState::Idle {
            return false;
        }
        self.enter(BallState::Expanding, now);
        true
    }

    /// Kill the ball outright (captured-by-larger in Capture mode)
    pub fn kill(&mut self, now: u64) {
        if self.state != BallState::Dead {
            self.enter(BallState::Dead, now);
        }
    }

    /// Whether the exit visual (of the given length) has finished playing
    pub fn exit_finished(&self, now: u64, exit_duration_ms: u64) -> bool {
        self.is_dead() && now.saturating_sub(self.state_entered_at) >= exit_duration_ms
    }

    /// Advance one tick. `walls` makes idle movement bounce inside the
    /// viewport; `None` lets the ball fly straight.
    pub fn update(&mut self, now: u64, tuning: &Tuning, walls: Option<&Viewport>) {
        match self.state {
            BallState::Idle => {
                self.pos += self.vel;
                if let Some(viewport) = walls {
                    self.vel = viewport.reflect(self.pos, self.vel, self.radius());
                }
            }
            BallState::Expanding => {
                self.diameter += tuning.expand_rate;
                if self.diameter > tuning.expand_limit {
                    self.diameter = tuning.expand_limit;
                    self.enter(BallState::Paused, now);
                }
            }
            BallState::Paused => {
                if now.saturating_sub(self.state_entered_at) >= tuning.pause_duration_ms {
                    self.enter(BallState::Shrinking, now);
                }
            }
            BallState::Shrinking => {
                self.diameter = (self.diameter - tuning.expand_rate * 2.0).max(0.0);
                if self.diameter < tuning.min_diameter {
                    self.enter(BallState::Dead, now);
                }
            }
            BallState::Dead => {}
        }
    }

    fn enter(&mut self, state: BallState, now: u64) {
        self.state = state;
        self.state_entered_at = now;
    }
}
