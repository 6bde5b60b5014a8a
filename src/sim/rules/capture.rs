//! Capture mode: steer the controller's ball through a stream of strangers
//!
//! Balls drift in from the edges and fly straight across. Touching a smaller
//! one swallows it (the controller grows, scores, and a replacement spawns);
//! touching one at least as big ends the run. A timed spawner keeps adding
//! balls while the controller still has its turn.

use glam::Vec2;

use super::{ArenaRules, TickContext};
use crate::sim::arena::Arena;
use crate::sim::collision::{Viewport, overlaps};
use crate::sim::input::{InputEvent, InputKind};
use crate::sim::levels::{GameMode, Level};
use crate::sim::player::Player;

#[derive(Debug, Default)]
pub struct CaptureRules {
    /// Last pointer position of the current drag
    drag_origin: Option<Vec2>,
}

impl ArenaRules for CaptureRules {
    fn mode(&self) -> GameMode {
        GameMode::Capture
    }

    fn start_level(&mut self, arena: &mut Arena, player: &mut Player, _level: Level, ctx: &mut TickContext) {
        player.reset(ctx.tuning);
        player.ball.pos = arena.viewport.center();
        arena.clear(0, ctx.now);
        self.drag_origin = None;
    }

    fn handle_input(&mut self, player: &mut Player, event: InputEvent, viewport: &Viewport, _now: u64) {
        if !player.has_turn {
            return;
        }
        let point = Vec2::new(event.x, event.y);
        match event.kind {
            InputKind::Down => self.drag_origin = Some(point),
            InputKind::Move => {
                // A move without a press starts the drag here
                if let Some(origin) = self.drag_origin {
                    player.nudge(point - origin, viewport);
                }
                self.drag_origin = Some(point);
            }
            InputKind::Up => self.drag_origin = None,
        }
    }

    fn update(&mut self, arena: &mut Arena, player: &mut Player, ctx: &mut TickContext) {
        let viewport = arena.viewport;
        let count = arena.balls.len();
        let mut doomed = vec![false; count];
        let mut captured = false;

        // Replacement spawns are appended past `count`, so this pass never visits them
        for i in 0..count {
            let ball = &mut arena.balls[i];
            ball.update(ctx.now, ctx.tuning, None);

            if viewport.has_escaped(ball.pos, ball.vel, ball.radius()) {
                doomed[i] = true;
                continue;
            }
            if player.ball.is_dead() || !overlaps(ball, &player.ball) {
                continue;
            }

            if player.ball.diameter > ball.diameter {
                doomed[i] = true;
                player.absorb(ctx.tuning.capture_increase, &viewport);
                log::debug!(
                    "Captured ball {} (d={:.0}), controller now d={:.0}, score {}",
                    ball.id,
                    ball.diameter,
                    player.ball.diameter,
                    player.score
                );
                captured = true;
                arena.spawn_from_edge(player.ball.diameter, ctx.tuning, ctx.rng);
            } else {
                log::debug!(
                    "Controller (d={:.0}) hit ball {} (d={:.0})",
                    player.ball.diameter,
                    ball.id,
                    ball.diameter
                );
                player.destroy(ctx.now);
            }
        }

        arena.compact(&doomed);

        if captured {
            ctx.collision_sound();
        }

        if player.has_turn
            && ctx.now.saturating_sub(arena.last_spawn_at) >= ctx.tuning.spawn_delay_ms
        {
            arena.last_spawn_at = ctx.now;
            arena.spawn_from_edge(player.ball.diameter, ctx.tuning, ctx.rng);
        }
    }

    fn is_terminal(&self, _arena: &Arena, player: &Player) -> bool {
        !player.has_turn && player.ball.is_dead()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{SPAWN_DELAY_MS, TICK_MS};
    use crate::sim::ball::{Ball, BallColor, BallState};
    use crate::sim::events::GameEvent;
    use crate::tuning::Tuning;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct Harness {
        tuning: Tuning,
        rng: Pcg32,
        events: Vec<GameEvent>,
        arena: Arena,
        player: Player,
        rules: CaptureRules,
        now: u64,
    }

    impl Harness {
        fn new() -> Self {
            let tuning = Tuning::default();
            let mut arena = Arena::new(tuning.viewport());
            let mut player = Player::new(&tuning);
            let mut rules = CaptureRules::default();
            let mut rng = Pcg32::seed_from_u64(9);
            let mut events = Vec::new();
            let mut ctx = TickContext::new(0, &tuning, &mut rng, &mut events);
            rules.start_level(&mut arena, &mut player, Level::new(0, 0), &mut ctx);
            Self {
                tuning,
                rng,
                events,
                arena,
                player,
                rules,
                now: 0,
            }
        }

        /// Add a stationary ball
        fn add(&mut self, pos: Vec2, diameter: f32) -> u32 {
            let id = self.arena.next_entity_id();
            let mut ball = Ball::new(id, BallColor::Orange1, diameter);
            ball.pos = pos;
            self.arena.balls.push(ball);
            id
        }

        fn tick(&mut self) {
            self.now += TICK_MS;
            let mut ctx = TickContext::new(self.now, &self.tuning, &mut self.rng, &mut self.events);
            self.player.update(self.now, &self.tuning);
            self.rules.update(&mut self.arena, &mut self.player, &mut ctx);
        }

        fn input(&mut self, event: InputEvent) {
            let viewport = self.arena.viewport;
            self.rules.handle_input(&mut self.player, event, &viewport, self.now);
        }
    }

    #[test]
    fn test_start_centers_controller() {
        let h = Harness::new();
        assert_eq!(h.player.ball.pos, h.arena.viewport.center());
        assert!(h.arena.is_empty());
        assert!(h.player.has_turn);
    }

    #[test]
    fn test_absorb_smaller() {
        let mut h = Harness::new();
        let center = h.player.ball.pos;
        let victim = h.add(center + Vec2::new(5.0, 0.0), 16.0);

        h.tick();
        assert_eq!(h.player.ball.diameter, 24.0 + h.tuning.capture_increase);
        assert_eq!(h.player.score, 1);
        assert!(h.player.has_turn);
        assert!(h.arena.balls.iter().all(|b| b.id != victim));
        // Replacement spawned in the same tick
        assert_eq!(h.arena.len(), 1);
        assert_eq!(
            h.events
                .iter()
                .filter(|e| matches!(e, GameEvent::Collision { .. }))
                .count(),
            1
        );
        assert!(!h.rules.is_terminal(&h.arena, &h.player));
    }

    #[test]
    fn test_equal_size_kills() {
        let mut h = Harness::new();
        let center = h.player.ball.pos;
        h.add(center, 24.0);

        h.tick();
        assert!(!h.player.has_turn);
        assert_eq!(h.player.ball.state, BallState::Dead);
        assert_eq!(h.player.score, 0);
        assert!(h.rules.is_terminal(&h.arena, &h.player));

        // Nothing more happens to a dead controller
        h.add(center, 4.0);
        h.tick();
        assert_eq!(h.player.score, 0);
        assert_eq!(h.player.ball.diameter, 24.0);
    }

    #[test]
    fn test_escaped_balls_removed_without_score() {
        let mut h = Harness::new();
        let id = h.add(Vec2::new(-20.0, 300.0), 20.0);
        h.arena.balls[0].vel = Vec2::new(-3.0, 0.0);
        let stays = h.add(Vec2::new(-20.0, 500.0), 20.0);
        h.arena.balls[1].vel = Vec2::new(3.0, 0.0);

        h.tick();
        assert!(h.arena.balls.iter().all(|b| b.id != id));
        assert!(h.arena.balls.iter().any(|b| b.id == stays));
        assert_eq!(h.player.score, 0);
    }

    #[test]
    fn test_timed_spawns_need_a_turn() {
        let mut h = Harness::new();
        let ticks = SPAWN_DELAY_MS.div_ceil(TICK_MS);

        for _ in 0..ticks - 1 {
            h.tick();
        }
        assert!(h.arena.is_empty());
        h.tick();
        assert_eq!(h.arena.len(), 1);
        assert_eq!(h.arena.last_spawn_at, h.now);

        // Turn over: spawner stops
        h.arena.balls.clear();
        h.player.destroy(h.now);
        for _ in 0..ticks * 2 {
            h.tick();
        }
        assert!(h.arena.is_empty());
    }

    #[test]
    fn test_growth_at_edge_stays_inside() {
        let mut h = Harness::new();
        let corner = Vec2::new(12.0, 12.0);
        h.player.ball.pos = corner;
        h.add(corner + Vec2::new(4.0, 4.0), 8.0);

        h.tick();
        let r = h.player.ball.radius();
        assert_eq!(r, 13.0);
        assert!(h.player.ball.pos.x >= r && h.player.ball.pos.y >= r);
    }

    #[test]
    fn test_drag_moves_by_delta() {
        let mut h = Harness::new();
        let start = h.player.ball.pos;

        h.input(InputEvent::down(100.0, 100.0));
        h.input(InputEvent::moved(110.0, 95.0));
        assert_eq!(h.player.ball.pos, start + Vec2::new(10.0, -5.0));
        h.input(InputEvent::moved(130.0, 95.0));
        assert_eq!(h.player.ball.pos, start + Vec2::new(30.0, -5.0));

        // After release a new press re-anchors the drag
        h.input(InputEvent::up(130.0, 95.0));
        h.input(InputEvent::down(400.0, 400.0));
        h.input(InputEvent::moved(400.0, 410.0));
        assert_eq!(h.player.ball.pos, start + Vec2::new(30.0, 5.0));
    }

    #[test]
    fn test_drag_ignored_without_turn() {
        let mut h = Harness::new();
        let start = h.player.ball.pos;
        h.player.destroy(0);
        h.input(InputEvent::down(0.0, 0.0));
        h.input(InputEvent::moved(50.0, 50.0));
        assert_eq!(h.player.ball.pos, start);
    }

    #[test]
    fn test_growth_is_exact() {
        let mut h = Harness::new();
        let center = h.player.ball.pos;
        for k in 0..5 {
            let diameter_before = h.player.ball.diameter;
            h.arena.balls.clear();
            h.add(center, 8.0);
            h.tick();
            assert_eq!(h.player.ball.diameter, diameter_before + h.tuning.capture_increase);
            assert_eq!(h.player.score, k + 1);
        }
    }

    proptest! {
        #[test]
        fn prop_drag_stays_on_screen(
            moves in prop::collection::vec((-2000.0f32..2000.0, -2000.0f32..2000.0), 1..40),
            grow in 0.0f32..100.0,
        ) {
            let mut h = Harness::new();
            h.player.ball.diameter += grow;
            h.input(InputEvent::down(240.0, 400.0));
            for (x, y) in moves {
                h.input(InputEvent::moved(x, y));
                let r = h.player.ball.radius();
                let pos = h.player.ball.pos;
                prop_assert!(pos.x >= r && pos.x <= h.arena.viewport.width - r);
                prop_assert!(pos.y >= r && pos.y <= h.arena.viewport.height - r);
            }
        }
    }
}
