//! The human-controlled ball plus turn, score and life bookkeeping

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallColor};
use super::collision::Viewport;
use crate::tuning::Tuning;

/// Starting lives (informational; neither mode ends on lives)
pub const START_LIVES: u32 = 3;

/// ID reserved for the controller's ball; arena IDs start at 1
pub const PLAYER_BALL_ID: u32 = 0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub ball: Ball,
    /// Whether the player may still act this level
    pub has_turn: bool,
    pub score: u32,
    pub lives: u32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let mut player = Self {
            ball: Ball::new(PLAYER_BALL_ID, BallColor::White, tuning.start_diameter),
            has_turn: true,
            score: 0,
            lives: START_LIVES,
        };
        player.reset(tuning);
        player
    }

    /// Park a fresh ball off screen and hand the turn back. Score and lives carry over.
    pub fn reset(&mut self, tuning: &Tuning) {
        let diameter = tuning.start_diameter;
        self.ball = Ball::new(PLAYER_BALL_ID, BallColor::White, diameter);
        self.ball.pos = Vec2::new(-diameter, -diameter);
        self.has_turn = true;
    }

    /// Advance the controller's ball. It never moves on its own, so no walls.
    pub fn update(&mut self, now: u64, tuning: &Tuning) {
        if self.ball.is_dead() {
            return;
        }
        self.ball.update(now, tuning, None);
        if self.ball.is_dead() {
            self.lose_life();
        }
    }

    /// Reaction mode: drop the ball at the touch point and set it off.
    /// Consumes the turn; ignored when the turn is already spent.
    pub fn detonate_at(&mut self, pos: Vec2, now: u64) -> bool {
        if !self.has_turn {
            return false;
        }
        self.ball.pos = pos;
        self.ball.start_expand(now);
        self.has_turn = false;
        true
    }

    /// Capture mode: shift the ball by a pointer delta, kept fully on screen
    pub fn nudge(&mut self, delta: Vec2, viewport: &Viewport) {
        if !self.has_turn {
            return;
        }
        let target = self.ball.pos + delta;
        self.ball.pos = viewport.clamp_center(target, self.ball.radius());
    }

    /// Capture mode: swallow a smaller ball. The bigger ball is pulled
    /// back on screen if it now pokes past an edge.
    pub fn absorb(&mut self, increase: f32, viewport: &Viewport) {
        self.ball.diameter += increase;
        self.ball.pos = viewport.clamp_center(self.ball.pos, self.ball.radius());
        self.score += 1;
    }

    /// Capture mode: hit something as big or bigger. Ends the turn.
    pub fn destroy(&mut self, now: u64) {
        self.has_turn = false;
        if !self.ball.is_dead() {
            self.ball.kill(now);
            self.lose_life();
        }
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        log::debug!("Controller ball died, {} lives left", self.lives);
    }
}
