//! Chain Reaction entry point
//!
//! Native builds run the simulation headless: a simple autoplayer feeds
//! pointer events through the platform input queue, feedback goes to the
//! log, and scores/options persist in `--data-dir` when given.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use chain_reaction::audio::{self, LogSink};
    use chain_reaction::consts::TICK_MS;
    use chain_reaction::persistence::{FileStore, KeyValueStore, MemoryStore};
    use chain_reaction::platform::{InputQueue, InputSender};
    use chain_reaction::sim::{Ball, Clock, GameMode, InputEvent, ManualClock, Session, SessionState};
    use chain_reaction::{Options, PersistentScoreboard, Tuning};
    use glam::Vec2;

    pub struct Config {
        pub mode: Option<GameMode>,
        pub seed: u64,
        pub ticks: u64,
        pub data_dir: Option<PathBuf>,
        pub tuning: Option<PathBuf>,
    }

    impl Default for Config {
        fn default() -> Self {
            Self {
                mode: None,
                seed: 0x00C0_FFEE,
                ticks: 60 * 60 * 5,
                data_dir: None,
                tuning: None,
            }
        }
    }

    fn print_usage() {
        println!("Usage: chain-reaction [OPTIONS]");
        println!();
        println!("Options:");
        println!("  --mode <reaction|capture>  Game mode (default: saved option)");
        println!("  --seed <N>                 RNG seed");
        println!("  --ticks <N>                Ticks to simulate (default: 18000)");
        println!("  --data-dir <DIR>           Persist scores and options here");
        println!("  --tuning <FILE>            JSON balance overrides");
        println!("  -h, --help                 Show this help");
    }

    fn next_value<'a>(args: &'a [String], i: &mut usize, opt_name: &str) -> Option<&'a str> {
        *i += 1;
        let value = args.get(*i).map(String::as_str);
        if value.is_none() {
            eprintln!("Error: {opt_name} requires a value");
        }
        value
    }

    fn parse_number(args: &[String], i: &mut usize, opt_name: &str) -> Option<u64> {
        let value = next_value(args, i, opt_name)?;
        match value.parse() {
            Ok(n) => Some(n),
            Err(_) => {
                eprintln!("Error: {opt_name} expects a number, got '{value}'");
                None
            }
        }
    }

    /// Parse command line arguments, or None if invalid/help requested
    pub fn parse_args() -> Option<Config> {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Config::default();
        let mut i = 1;

        while i < args.len() {
            match args[i].as_str() {
                "--mode" => {
                    let value = next_value(&args, &mut i, "--mode")?;
                    match GameMode::from_str(value) {
                        Some(mode) => config.mode = Some(mode),
                        None => {
                            eprintln!("Error: unknown mode '{value}'");
                            return None;
                        }
                    }
                }
                "--seed" => config.seed = parse_number(&args, &mut i, "--seed")?,
                "--ticks" => config.ticks = parse_number(&args, &mut i, "--ticks")?,
                "--data-dir" => {
                    config.data_dir = Some(PathBuf::from(next_value(&args, &mut i, "--data-dir")?));
                }
                "--tuning" => {
                    config.tuning = Some(PathBuf::from(next_value(&args, &mut i, "--tuning")?));
                }
                "--help" | "-h" => {
                    print_usage();
                    return None;
                }
                other => {
                    eprintln!("Unknown option: {other}");
                    print_usage();
                    return None;
                }
            }
            i += 1;
        }
        Some(config)
    }

    fn load_tuning(path: Option<&PathBuf>) -> Tuning {
        let Some(path) = path else {
            return Tuning::default();
        };
        match std::fs::read_to_string(path) {
            Ok(json) => match Tuning::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {} ({}), using defaults", path.display(), e);
                    Tuning::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {} ({}), using defaults", path.display(), e);
                Tuning::default()
            }
        }
    }

    /// Plays badly but legally: detonates on a ball in Reaction, steers
    /// toward prey and away from threats in Capture
    struct AutoPlayer {
        sender: InputSender,
        /// Pointer position while a drag is held
        cursor: Option<Vec2>,
    }

    impl AutoPlayer {
        fn act(&mut self, session: &Session) {
            if session.state() != SessionState::Running || !session.player().has_turn {
                self.cursor = None;
                return;
            }
            match session.mode() {
                GameMode::Reaction => {
                    // Give the population a moment to spread out first
                    if session.time_ticks() % 90 != 45 {
                        return;
                    }
                    if let Some(target) = session.arena().balls.first() {
                        self.sender.submit(InputEvent::up(target.pos.x, target.pos.y));
                    }
                }
                GameMode::Capture => self.steer(session),
            }
        }

        fn steer(&mut self, session: &Session) {
            let me = &session.player().ball;
            let cursor = match self.cursor {
                Some(cursor) => cursor,
                None => {
                    self.sender.submit(InputEvent::down(me.pos.x, me.pos.y));
                    me.pos
                }
            };

            let balls = &session.arena().balls;
            let threat = nearest(balls, me.pos, |b| b.diameter >= me.diameter);
            let prey = nearest(balls, me.pos, |b| b.diameter < me.diameter);

            let heading = match (threat, prey) {
                (Some(t), _) if t.pos.distance(me.pos) < me.radius() + t.radius() + 60.0 => {
                    (me.pos - t.pos).normalize_or_zero()
                }
                (_, Some(p)) => (p.pos - me.pos).normalize_or_zero(),
                _ => Vec2::ZERO,
            };
            // Drags are relative, so the cursor may wander off screen
            let cursor = cursor + heading * 4.0;
            self.sender.submit(InputEvent::moved(cursor.x, cursor.y));
            self.cursor = Some(cursor);
        }
    }

    fn nearest(balls: &[Ball], from: Vec2, pred: impl Fn(&Ball) -> bool) -> Option<&Ball> {
        balls
            .iter()
            .filter(|b| pred(b))
            .min_by(|a, b| a.pos.distance(from).total_cmp(&b.pos.distance(from)))
    }

    fn open_store(data_dir: Option<&PathBuf>, memory: &MemoryStore) -> Box<dyn KeyValueStore> {
        match data_dir {
            Some(dir) => Box::new(FileStore::new(dir)),
            None => Box::new(memory.clone()),
        }
    }

    pub fn run(config: Config) {
        let memory = MemoryStore::new();
        if let Some(dir) = &config.data_dir {
            log::info!("Persisting to {}", dir.display());
        }
        let mut store = open_store(config.data_dir.as_ref(), &memory);
        let mut options = Options::load(store.as_ref());
        if let Some(mode) = config.mode {
            options.mode = mode;
            if let Err(e) = options.save(store.as_mut()) {
                log::warn!("Failed to save options: {}", e);
            }
        }
        let sound = options.sound;
        let scoreboard = PersistentScoreboard::open(open_store(config.data_dir.as_ref(), &memory));

        let tuning = load_tuning(config.tuning.as_ref());
        let clock = ManualClock::new(0);
        let mut session = Session::new(
            config.seed,
            tuning,
            Box::new(clock.clone()),
            Box::new(scoreboard),
            Box::new(options),
        );

        let queue = InputQueue::default();
        let mut player = AutoPlayer {
            sender: queue.sender(),
            cursor: None,
        };
        let mut sink = LogSink::new();
        let mut game_over_at = None;
        let mut rounds = 0u32;

        for _ in 0..config.ticks {
            clock.advance(TICK_MS);
            player.act(&session);
            queue.drain_into(&mut session);
            session.update();

            let events = session.drain_events();
            audio::dispatch(&events, &mut sink, sound);

            if session.state() == SessionState::Loading {
                session.notify_loading_shown();
            }
            if session.state() != SessionState::GameOver {
                continue;
            }

            let now = clock.now_ms();
            let shown_since = *game_over_at.get_or_insert_with(|| {
                if let Some(report) = session.report() {
                    rounds += 1;
                    let high = match (&report.high_score_text, report.new_high_score) {
                        (Some(text), _) => text.as_str(),
                        (None, true) => "New high score!",
                        (None, false) => "",
                    };
                    log::info!(
                        "{:?}: {} {} [{}]",
                        report.outcome,
                        report.score_text,
                        high,
                        report.continue_label
                    );
                }
                now
            });
            // Let the explosion play before leaving the game-over screen
            if now.saturating_sub(shown_since) >= session.tuning().player_exit_visual_ms {
                game_over_at = None;
                session.restart();
            }
        }

        log::info!(
            "Simulated {} ticks: {} rounds, {} sounds, mode {}, level {}, score {}",
            config.ticks,
            rounds,
            sink.played(),
            session.mode().as_str(),
            session.level_index() + 1,
            session.score()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    chain_reaction::platform::init_logging();
    log::info!("Chain Reaction (headless) starting...");

    let Some(config) = headless::parse_args() else {
        return;
    };
    headless::run(config);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The page drives `Session` through the library; this only sets up logging
    chain_reaction::platform::init_logging();
    log::info!("Chain Reaction (wasm) loaded");
}
