//! Data-driven game balance
//!
//! Every number the arena rules depend on lives here so a build can ship a
//! JSON override without touching code. Missing fields fall back to `consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Viewport;

/// Tunable simulation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Wandering ball speed per axis (pixels/tick)
    pub ball_velocity: f32,
    pub start_diameter: f32,
    pub expand_rate: f32,
    pub expand_limit: f32,
    pub pause_duration_ms: u64,
    pub min_diameter: f32,
    pub capture_increase: f32,
    pub spawn_range: i32,
    pub spawn_delay_ms: u64,
    /// How long a dead population ball lingers before removal
    pub exit_visual_ms: u64,
    /// Controller explosion length
    pub player_exit_visual_ms: u64,
    pub vibration_ms: u64,
    pub spawn_attempts: u32,
    /// How long the hint overlay takes to fade once dismissed
    pub hint_fade_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            ball_velocity: BALL_VELOCITY,
            start_diameter: START_DIAMETER,
            expand_rate: EXPAND_RATE,
            expand_limit: EXPAND_LIMIT,
            pause_duration_ms: PAUSE_DURATION_MS,
            min_diameter: MIN_DIAMETER,
            capture_increase: CAPTURE_INCREASE,
            spawn_range: SPAWN_RANGE,
            spawn_delay_ms: SPAWN_DELAY_MS,
            exit_visual_ms: 0,
            player_exit_visual_ms: EXPLOSION_FRAMES * EXPLOSION_FRAME_MS,
            vibration_ms: VIBRATION_MS,
            spawn_attempts: SPAWN_ATTEMPTS,
            hint_fade_ms: HINT_FADE_MS,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        tuning.sanitize();
        Ok(tuning)
    }

    /// The arena rectangle these numbers describe
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }

    /// Clamp values that would break the life cycle (negative rates, zero-size arena)
    fn sanitize(&mut self) {
        let defaults = Tuning::default();
        if !(self.viewport_width > 0.0) {
            self.viewport_width = defaults.viewport_width;
        }
        if !(self.viewport_height > 0.0) {
            self.viewport_height = defaults.viewport_height;
        }
        if !(self.expand_rate > 0.0) {
            log::warn!("expand_rate {} is not positive, using default", self.expand_rate);
            self.expand_rate = defaults.expand_rate;
        }
        self.start_diameter = self.start_diameter.max(0.0);
        // Shrinking stops at zero, so death needs a positive threshold
        if !(self.min_diameter > 0.0) {
            log::warn!("min_diameter {} is not positive, using default", self.min_diameter);
            self.min_diameter = defaults.min_diameter;
        }
        self.expand_limit = self.expand_limit.max(self.start_diameter);
        self.spawn_range = self.spawn_range.max(1);
        self.spawn_attempts = self.spawn_attempts.max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "spawn_delay_ms": 1000, "expand_rate": 8.0 }"#).unwrap();
        assert_eq!(tuning.spawn_delay_ms, 1000);
        assert_eq!(tuning.expand_rate, 8.0);
        assert_eq!(tuning.pause_duration_ms, PAUSE_DURATION_MS);
        assert_eq!(tuning.viewport_width, VIEWPORT_WIDTH);
    }

    #[test]
    fn test_bad_values_are_corrected() {
        let tuning = Tuning::from_json(r#"{ "expand_rate": -3.0, "viewport_width": 0.0 }"#).unwrap();
        assert_eq!(tuning.expand_rate, EXPAND_RATE);
        assert_eq!(tuning.viewport_width, VIEWPORT_WIDTH);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }

    #[test]
    fn test_zero_min_diameter_still_dies() {
        use crate::sim::{Ball, BallColor, BallState};

        let tuning = Tuning::from_json(r#"{ "min_diameter": 0.0 }"#).unwrap();
        assert!(tuning.min_diameter > 0.0);
        assert_eq!(Tuning::from_json(r#"{ "min_diameter": -4.0 }"#).unwrap().min_diameter, MIN_DIAMETER);

        let mut ball = Ball::new(1, BallColor::Blue2, START_DIAMETER);
        ball.start_expand(0);
        let mut now = 0;
        for _ in 0..10_000 {
            if ball.is_dead() {
                break;
            }
            now += TICK_MS;
            ball.update(now, &tuning, None);
        }
        assert_eq!(ball.state, BallState::Dead);
    }

    #[test]
    fn test_explosion_length() {
        assert_eq!(Tuning::default().player_exit_visual_ms, 675);
    }
}
