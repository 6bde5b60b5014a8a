//! The live ball collection and the placement routines that fill it
//!
//! `Arena` is mode-agnostic storage: the per-mode behaviour lives in
//! `sim::rules`. Removal is always two-phase (mark during the pass, then
//! `compact`), so a pass never skips or revisits a ball.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallColor};
use super::collision::{Viewport, circles_overlap};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    /// Live balls in insertion order
    pub balls: Vec<Ball>,
    /// Reaction mode: first-time infections still needed
    pub goal_remaining: u32,
    /// Capture mode: clock time of the last timed spawn
    pub last_spawn_at: u64,
    pub viewport: Viewport,
    next_id: u32,
    /// Colours not yet handed out this round
    color_bag: Vec<BallColor>,
}

impl Arena {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            balls: Vec::new(),
            goal_remaining: 0,
            last_spawn_at: 0,
            viewport,
            next_id: 1,
            color_bag: Vec::new(),
        }
    }

    /// Drop every ball and reset bookkeeping for a new level
    pub fn clear(&mut self, goal: u32, now: u64) {
        self.balls.clear();
        self.goal_remaining = goal;
        self.last_spawn_at = now;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Count one first-time infection against the goal (never below zero)
    pub fn decrement_goal(&mut self) {
        self.goal_remaining = self.goal_remaining.saturating_sub(1);
    }

    /// Balls still expanding, paused or shrinking
    pub fn active_count(&self) -> usize {
        self.balls.iter().filter(|b| b.is_active()).count()
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    /// Remove every ball whose flag is set. `doomed` is indexed like
    /// `balls`; missing trailing flags mean "keep". Returns the number removed.
    pub fn compact(&mut self, doomed: &[bool]) -> usize {
        let before = self.balls.len();
        let mut flags = doomed.iter();
        self.balls.retain(|_| !flags.next().copied().unwrap_or(false));
        before - self.balls.len()
    }

    /// Scatter `count` idle balls so that none overlap, each moving
    /// diagonally at the configured speed
    pub fn populate(&mut self, count: u32, tuning: &Tuning, rng: &mut Pcg32) {
        let diameter = tuning.start_diameter;
        let radius = diameter / 2.0;
        let speed = tuning.ball_velocity;

        for _ in 0..count {
            let id = self.next_entity_id();
            let color = self.draw_color(rng);
            let mut ball = Ball::new(id, color, diameter);

            let mut placed = false;
            for _ in 0..tuning.spawn_attempts {
                ball.pos = Vec2::new(
                    random_axis(rng, radius, self.viewport.width),
                    random_axis(rng, radius, self.viewport.height),
                );
                let occupied = self
                    .balls
                    .iter()
                    .filter(|b| !b.is_dead())
                    .any(|b| circles_overlap(b.pos, b.radius(), ball.pos, radius));
                if !occupied {
                    placed = true;
                    break;
                }
            }
            if !placed {
                log::warn!(
                    "No free spot for ball {} after {} attempts, placing it overlapping",
                    id,
                    tuning.spawn_attempts
                );
            }

            ball.vel = Vec2::new(random_sign(rng) * speed, random_sign(rng) * speed);
            self.balls.push(ball);
        }

        log::debug!("Populated arena with {} balls", count);
    }

    /// Spawn one ball just outside a random viewport edge, heading inward.
    /// Its size is the controller's diameter plus a random offset, but never
    /// less than half of it. Returns the new ball's ID.
    pub fn spawn_from_edge(&mut self, player_diameter: f32, tuning: &Tuning, rng: &mut Pcg32) -> u32 {
        let range = tuning.spawn_range.max(1);
        let offset = rng.random_range(-range..range) as f32;
        let diameter = (player_diameter + offset).max(player_diameter / 2.0);

        let speed = tuning.ball_velocity;
        let inward = speed + rng.random::<f32>() * speed;
        let drift = random_sign(rng) * (speed + rng.random::<f32>() * speed);
        let Viewport { width, height } = self.viewport;

        let (pos, vel) = match rng.random_range(0..4u8) {
            // West
            0 => (
                Vec2::new(-diameter, random_axis(rng, 0.0, height)),
                Vec2::new(inward, drift),
            ),
            // East
            1 => (
                Vec2::new(width + diameter, random_axis(rng, 0.0, height)),
                Vec2::new(-inward, drift),
            ),
            // North
            2 => (
                Vec2::new(random_axis(rng, 0.0, width), -diameter),
                Vec2::new(drift, inward),
            ),
            // South
            _ => (
                Vec2::new(random_axis(rng, 0.0, width), height + diameter),
                Vec2::new(drift, -inward),
            ),
        };

        let id = self.next_entity_id();
        let color = BallColor::POPULATION[rng.random_range(0..BallColor::POPULATION.len())];
        let mut ball = Ball::new(id, color, diameter);
        ball.pos = pos;
        ball.vel = vel;
        self.balls.push(ball);

        log::debug!("Spawned ball {} (d={:.0}) at ({:.0}, {:.0})", id, diameter, pos.x, pos.y);
        id
    }

    /// Draw a colour without replacement, refilling once every colour is used
    fn draw_color(&mut self, rng: &mut Pcg32) -> BallColor {
        if self.color_bag.is_empty() {
            self.color_bag.extend_from_slice(&BallColor::POPULATION);
        }
        let index = rng.random_range(0..self.color_bag.len());
        self.color_bag.swap_remove(index)
    }
}

/// Uniform coordinate in `[margin, extent - margin)`, centered when the span is empty
fn random_axis(rng: &mut Pcg32, margin: f32, extent: f32) -> f32 {
    let low = margin;
    let high = extent - margin;
    if high > low {
        rng.random_range(low..high)
    } else {
        extent / 2.0
    }
}

fn random_sign(rng: &mut Pcg32) -> f32 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ball::BallState;
    use crate::sim::collision::overlaps;
    use rand::SeedableRng;

    fn arena() -> Arena {
        Arena::new(Tuning::default().viewport())
    }

    #[test]
    fn test_populate_without_overlap() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut arena = arena();
        arena.populate(60, &tuning, &mut rng);

        assert_eq!(arena.len(), 60);
        for (i, a) in arena.balls.iter().enumerate() {
            assert_eq!(a.state, BallState::Idle);
            assert_eq!(a.diameter, tuning.start_diameter);
            assert_eq!(a.vel.x.abs(), tuning.ball_velocity);
            assert_eq!(a.vel.y.abs(), tuning.ball_velocity);
            assert!(a.pos.x >= a.radius() && a.pos.x <= arena.viewport.width - a.radius());
            for b in &arena.balls[i + 1..] {
                assert!(!overlaps(a, b), "balls {} and {} overlap", a.id, b.id);
            }
        }
    }

    #[test]
    fn test_populate_gives_up_gracefully() {
        // Room for roughly one ball: the rest must still be placed
        let tuning = Tuning {
            viewport_width: 30.0,
            viewport_height: 30.0,
            spawn_attempts: 5,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let mut arena = Arena::new(tuning.viewport());
        arena.populate(4, &tuning, &mut rng);
        assert_eq!(arena.len(), 4);
    }

    #[test]
    fn test_colors_cycle_through_palette() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut arena = arena();
        arena.populate(BallColor::POPULATION.len() as u32, &tuning, &mut rng);

        let mut colors: Vec<_> = arena.balls.iter().map(|b| b.color).collect();
        colors.sort_by_key(|c| c.sprite_cell());
        colors.dedup();
        assert_eq!(colors.len(), BallColor::POPULATION.len());
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut arena = arena();
        arena.populate(10, &tuning, &mut rng);
        arena.spawn_from_edge(24.0, &tuning, &mut rng);
        let ids: Vec<_> = arena.balls.iter().map(|b| b.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_edge_spawn_enters_viewport() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(99);
        let mut arena = arena();
        let viewport = arena.viewport;

        for _ in 0..200 {
            arena.spawn_from_edge(24.0, &tuning, &mut rng);
            let ball = arena.balls.last().unwrap();

            assert!(ball.diameter >= 12.0);
            assert!(ball.diameter < 24.0 + tuning.spawn_range as f32);

            let speed = tuning.ball_velocity;
            let outside_x = ball.pos.x < 0.0 || ball.pos.x > viewport.width;
            let outside_y = ball.pos.y < 0.0 || ball.pos.y > viewport.height;
            assert!(outside_x || outside_y);
            if ball.pos.x < 0.0 {
                assert!(ball.vel.x >= speed);
            } else if ball.pos.x > viewport.width {
                assert!(ball.vel.x <= -speed);
            } else if ball.pos.y < 0.0 {
                assert!(ball.vel.y >= speed);
            } else {
                assert!(ball.vel.y <= -speed);
            }
            assert!(!viewport.has_escaped(ball.pos, ball.vel, ball.radius()));
        }
    }

    #[test]
    fn test_edge_spawn_minimum_size() {
        // Tiny controller: half its diameter is the floor
        let tuning = Tuning { spawn_range: 50, ..Tuning::default() };
        let mut rng = Pcg32::seed_from_u64(5);
        let mut arena = arena();
        for _ in 0..100 {
            arena.spawn_from_edge(10.0, &tuning, &mut rng);
        }
        assert!(arena.balls.iter().all(|b| b.diameter >= 5.0));
    }

    #[test]
    fn test_compact_removes_marked() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut arena = arena();
        arena.populate(6, &tuning, &mut rng);
        let ids: Vec<_> = arena.balls.iter().map(|b| b.id).collect();

        let removed = arena.compact(&[true, false, true, false, false]);
        assert_eq!(removed, 2);
        let left: Vec<_> = arena.balls.iter().map(|b| b.id).collect();
        assert_eq!(left, vec![ids[1], ids[3], ids[4], ids[5]]);
    }

    #[test]
    fn test_goal_never_negative() {
        let mut arena = arena();
        arena.clear(1, 0);
        arena.decrement_goal();
        arena.decrement_goal();
        assert_eq!(arena.goal_remaining, 0);
    }
}
