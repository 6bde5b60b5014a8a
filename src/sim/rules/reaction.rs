//! Reaction mode: one detonation, then the expansion spreads by contact
//!
//! An idle ball touching an expanding (or fully expanded) ball starts
//! expanding itself. Each first-time infection counts once against the
//! level goal. Infection is a one-way Idle -> Expanding step checked against
//! the sources present at the start of the pass, so the order balls are
//! visited in cannot change who ends up infected.

use glam::Vec2;

use super::{ArenaRules, TickContext};
use crate::sim::arena::Arena;
use crate::sim::collision::{Viewport, overlaps};
use crate::sim::input::{InputEvent, InputKind};
use crate::sim::levels::{GameMode, Level};
use crate::sim::player::Player;

#[derive(Debug, Default)]
pub struct ReactionRules;

impl ArenaRules for ReactionRules {
    fn mode(&self) -> GameMode {
        GameMode::Reaction
    }

    fn start_level(&mut self, arena: &mut Arena, player: &mut Player, level: Level, ctx: &mut TickContext) {
        player.reset(ctx.tuning);
        arena.clear(level.goal, ctx.now);
        arena.populate(level.count, ctx.tuning, ctx.rng);
    }

    fn handle_input(&mut self, player: &mut Player, event: InputEvent, _viewport: &Viewport, now: u64) {
        if event.kind != InputKind::Up {
            return;
        }
        if player.detonate_at(Vec2::new(event.x, event.y), now) {
            log::debug!("Detonated at ({:.0}, {:.0})", event.x, event.y);
        }
    }

    fn update(&mut self, arena: &mut Arena, player: &mut Player, ctx: &mut TickContext) {
        let walls = arena.viewport;
        let count = arena.balls.len();

        // Move everything first so collisions see one consistent snapshot
        for ball in arena.balls.iter_mut() {
            ball.update(ctx.now, ctx.tuning, Some(&walls));
        }

        // Balls infected this tick only become sources next tick
        let sources: Vec<bool> = arena.balls.iter().map(|b| b.is_reacting()).collect();
        let player_source = player.ball.is_reacting();

        let mut doomed = vec![false; count];
        let mut infected = 0u32;

        for i in 0..count {
            let ball = &arena.balls[i];
            if ball.is_dead() {
                doomed[i] = ball.exit_finished(ctx.now, ctx.tuning.exit_visual_ms);
                continue;
            }

            let touched_by_arena = arena
                .balls
                .iter()
                .zip(&sources)
                .enumerate()
                .any(|(j, (other, &source))| j != i && source && overlaps(other, ball));
            let touched_by_player = player_source && overlaps(&player.ball, ball);

            if (touched_by_arena || touched_by_player) && arena.balls[i].start_expand(ctx.now) {
                arena.decrement_goal();
                infected += 1;
            }
        }

        let removed = arena.compact(&doomed);

        if infected > 0 {
            log::debug!(
                "{} infected this tick, goal remaining {}",
                infected,
                arena.goal_remaining
            );
            ctx.collision_sound();
        }
        if removed > 0 {
            log::trace!("Removed {} burnt-out balls, {} left", removed, arena.len());
        }
    }

    fn is_terminal(&self, arena: &Arena, player: &Player) -> bool {
        !player.has_turn && player.ball.is_dead() && arena.active_count() == 0
    }
}
