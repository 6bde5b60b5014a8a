//! Session state machine: Loading -> Running -> GameOver -> Loading
//!
//! The session owns the level table, the seeded RNG and every collaborator
//! handle. Platform code calls `handle_input` for each pointer event (queued
//! until the next tick), `update` once per frame, and reads `view` to draw.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::ball::{Ball, BallColor, BallState};
use super::clock::Clock;
use super::events::GameEvent;
use super::input::InputEvent;
use super::levels::{GameMode, LEVELS, Level};
use super::player::Player;
use super::rules::{ArenaRules, TickContext, rules_for};
use crate::highscores::Scoreboard;
use crate::settings::OptionsSource;
use crate::tuning::Tuning;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Showing the loading screen; the level is built on the following tick
    Loading,
    Running,
    /// Waiting for the game-over screen to ask for another round
    GameOver,
}

/// How a level ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Goal met, next level unlocked
    LevelCleared,
    /// Goal met on the last level; the run starts over
    Completed,
    Lost,
}

/// Everything the game-over screen needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOverReport {
    pub mode: GameMode,
    pub outcome: Outcome,
    pub win: bool,
    pub new_high_score: bool,
    /// Score at the end of the level (before any reset)
    pub score: u32,
    pub score_text: String,
    /// Only present when no new record was set
    pub high_score_text: Option<String>,
    pub continue_label: String,
}

/// Scalar HUD state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub mode: GameMode,
    pub state: SessionState,
    /// 1-based level number (Reaction)
    pub level: usize,
    /// Reaction mode only
    pub goal_remaining: Option<u32>,
    pub score: u32,
    /// Opacity of the "how to play" overlay, 0.0 (gone) to 1.0
    pub hint_alpha: f32,
}

/// Hint overlay: shown until the first action or point, then fading out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Hint {
    visible: bool,
    changed_at: u64,
}

impl Hint {
    /// Re-showing restarts it at full opacity; hiding starts the fade once
    fn set(&mut self, visible: bool, now: u64) {
        if visible || self.visible {
            self.changed_at = now;
        }
        self.visible = visible;
    }

    fn alpha(&self, now: u64, fade_ms: u64) -> f32 {
        if self.visible {
            return 1.0;
        }
        if fade_ms == 0 {
            return 0.0;
        }
        let elapsed = now.saturating_sub(self.changed_at) as f32;
        (1.0 - elapsed / fade_ms as f32).clamp(0.0, 1.0)
    }
}

/// What the renderer needs to draw one ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub state: BallState,
    pub color: BallColor,
}

impl From<&Ball> for BallView {
    fn from(ball: &Ball) -> Self {
        Self {
            id: ball.id,
            pos: ball.pos,
            radius: ball.radius(),
            state: ball.state,
            color: ball.color,
        }
    }
}

/// Read-only snapshot for the render collaborator
#[derive(Debug, Clone, Copy)]
pub struct RenderView<'a> {
    pub balls: &'a [Ball],
    pub player: &'a Ball,
    pub hud: Hud,
}

impl RenderView<'_> {
    /// Arena balls followed by the controller's ball
    pub fn ball_views(&self) -> impl Iterator<Item = BallView> + '_ {
        self.balls
            .iter()
            .chain(std::iter::once(self.player))
            .map(BallView::from)
    }
}

pub struct Session {
    tuning: Tuning,
    rng: Pcg32,
    clock: Box<dyn Clock>,
    scoreboard: Box<dyn Scoreboard>,
    options: Box<dyn OptionsSource>,
    state: SessionState,
    /// Set once the loading screen has been shown for a tick
    notified_loading_screen: bool,
    mode: GameMode,
    vibration: bool,
    levels: Vec<Level>,
    level_index: usize,
    arena: Arena,
    player: Player,
    rules: Box<dyn ArenaRules>,
    pending_input: VecDeque<InputEvent>,
    events: Vec<GameEvent>,
    report: Option<GameOverReport>,
    hint: Hint,
    time_ticks: u64,
}

impl Session {
    pub fn new(
        seed: u64,
        tuning: Tuning,
        clock: Box<dyn Clock>,
        scoreboard: Box<dyn Scoreboard>,
        options: Box<dyn OptionsSource>,
    ) -> Self {
        let arena = Arena::new(tuning.viewport());
        let player = Player::new(&tuning);
        log::info!("New session (seed {})", seed);
        Self {
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            clock,
            scoreboard,
            options,
            state: SessionState::Loading,
            notified_loading_screen: false,
            mode: GameMode::default(),
            vibration: true,
            levels: LEVELS.to_vec(),
            level_index: 0,
            arena,
            player,
            rules: rules_for(GameMode::default()),
            pending_input: VecDeque::new(),
            events: Vec::new(),
            report: None,
            hint: Hint {
                visible: true,
                changed_at: 0,
            },
            time_ticks: 0,
        }
    }

    /// Replace the level table (an empty table is ignored)
    pub fn with_levels(mut self, levels: Vec<Level>) -> Self {
        if levels.is_empty() {
            log::warn!("Ignoring empty level table");
        } else {
            self.levels = levels;
            self.level_index = 0;
        }
        self
    }

    /// Queue a pointer event for the next tick
    pub fn handle_input(&mut self, event: InputEvent) {
        self.pending_input.push_back(event);
    }

    /// The render collaborator has drawn the loading screen
    pub fn notify_loading_shown(&mut self) {
        if self.state == SessionState::Loading {
            self.notified_loading_screen = true;
        }
    }

    /// Leave the game-over screen ("Next", "Retry", "New Game")
    pub fn restart(&mut self) {
        if self.state != SessionState::GameOver {
            return;
        }
        self.state = SessionState::Loading;
        self.notified_loading_screen = false;
        log::info!("Restarting ({} level {})", self.mode.as_str(), self.level_index + 1);
    }

    /// Advance one frame
    pub fn update(&mut self) {
        match self.state {
            SessionState::Loading => self.load(),
            SessionState::Running => self.run_tick(),
            SessionState::GameOver => self.pending_input.clear(),
        }
    }

    /// Take the signals emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn score(&self) -> u32 {
        self.player.score
    }

    pub fn goal_remaining(&self) -> u32 {
        self.arena.goal_remaining
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Result of the last finished level, while on the game-over screen
    pub fn report(&self) -> Option<&GameOverReport> {
        self.report.as_ref()
    }

    pub fn hud(&self) -> Hud {
        Hud {
            mode: self.mode,
            state: self.state,
            level: self.level_index + 1,
            goal_remaining: match self.mode {
                GameMode::Reaction => Some(self.arena.goal_remaining),
                GameMode::Capture => None,
            },
            score: self.player.score,
            hint_alpha: match self.state {
                SessionState::Running => self.hint.alpha(self.clock.now_ms(), self.tuning.hint_fade_ms),
                _ => 0.0,
            },
        }
    }

    pub fn view(&self) -> RenderView<'_> {
        RenderView {
            balls: &self.arena.balls,
            player: &self.player.ball,
            hud: self.hud(),
        }
    }

    fn current_level(&self) -> Level {
        self.levels[self.level_index.min(self.levels.len() - 1)]
    }

    fn load(&mut self) {
        // Let the loading screen render once before doing the work
        if !self.notified_loading_screen {
            self.notified_loading_screen = true;
            return;
        }

        let mode = self.options.selected_mode();
        if mode != self.mode {
            log::info!("Mode changed {} -> {}", self.mode.as_str(), mode.as_str());
            self.level_index = 0;
            self.player.score = 0;
        }
        self.mode = mode;
        self.vibration = self.options.vibration_enabled();
        self.rules = rules_for(mode);

        let level = self.current_level();
        let now = self.clock.now_ms();
        let mut ctx = TickContext::new(now, &self.tuning, &mut self.rng, &mut self.events);
        self.rules
            .start_level(&mut self.arena, &mut self.player, level, &mut ctx);

        self.pending_input.clear();
        self.report = None;
        self.hint.set(self.player.score == 0, now);
        self.state = SessionState::Running;

        match mode {
            GameMode::Reaction => log::info!(
                "Level {} loaded: {} balls, goal {}",
                self.level_index + 1,
                level.count,
                level.goal
            ),
            GameMode::Capture => log::info!("Capture round loaded"),
        }
    }

    fn run_tick(&mut self) {
        let now = self.clock.now_ms();
        let viewport = self.arena.viewport;

        let had_turn = self.player.has_turn;
        while let Some(event) = self.pending_input.pop_front() {
            self.rules
                .handle_input(&mut self.player, event, &viewport, now);
        }
        if had_turn && !self.player.has_turn {
            self.hint.set(false, now);
        }

        let score_before = self.player.score;
        self.player.update(now, &self.tuning);
        let mut ctx = TickContext::new(now, &self.tuning, &mut self.rng, &mut self.events);
        self.rules.update(&mut self.arena, &mut self.player, &mut ctx);
        self.time_ticks += 1;

        if score_before == 0 && self.player.score > 0 {
            self.hint.set(false, now);
        }

        if self.rules.is_terminal(&self.arena, &self.player) {
            self.finish();
        }
    }

    /// Score the level, update progression and hand over to the game-over screen
    fn finish(&mut self) {
        let report = match self.mode {
            GameMode::Reaction => {
                let level = self.current_level();
                let cleared = level.count.saturating_sub(self.arena.len() as u32);
                self.player.score += cleared;

                if self.arena.goal_remaining < 1 {
                    self.level_index += 1;
                    self.events.push(GameEvent::StopSounds);
                    self.events.push(GameEvent::Win);
                    if self.level_index >= self.levels.len() {
                        self.level_index = 0;
                        self.record_final(Outcome::Completed)
                    } else {
                        GameOverReport {
                            mode: self.mode,
                            outcome: Outcome::LevelCleared,
                            win: true,
                            new_high_score: false,
                            score: self.player.score,
                            score_text: format!("Score: {}", self.player.score),
                            high_score_text: None,
                            continue_label: "Next".to_string(),
                        }
                    }
                } else {
                    self.level_index = 0;
                    self.lose_feedback(false);
                    self.record_final(Outcome::Lost)
                }
            }
            GameMode::Capture => {
                self.lose_feedback(true);
                self.record_final(Outcome::Lost)
            }
        };

        log::info!(
            "{} game over: {:?}, score {}{}",
            self.mode.as_str(),
            report.outcome,
            report.score,
            if report.new_high_score { " (new high score)" } else { "" }
        );
        self.hint.visible = false;
        self.report = Some(report);
        self.state = SessionState::GameOver;
    }

    /// Persist the score, build the report, then reset the score
    fn record_final(&mut self, outcome: Outcome) -> GameOverReport {
        let score = self.player.score;
        let new_high_score = self.scoreboard.update_score(self.mode, score);
        let high_score_text = if new_high_score {
            None
        } else {
            Some(format!("High: {}", self.scoreboard.high_score(self.mode)))
        };
        self.player.score = 0;

        let (win, continue_label) = match outcome {
            Outcome::Completed => (true, "New Game"),
            Outcome::LevelCleared => (true, "Next"),
            Outcome::Lost => (false, "Retry"),
        };
        GameOverReport {
            mode: self.mode,
            outcome,
            win,
            new_high_score,
            score,
            score_text: format!("Score: {}", score),
            high_score_text,
            continue_label: continue_label.to_string(),
        }
    }

    fn lose_feedback(&mut self, exploded: bool) {
        if self.vibration {
            self.events.push(GameEvent::Vibrate {
                duration_ms: self.tuning.vibration_ms,
            });
        }
        self.events.push(GameEvent::StopSounds);
        if exploded {
            self.events.push(GameEvent::Explosion);
        }
        self.events.push(GameEvent::Lose);
    }
}
