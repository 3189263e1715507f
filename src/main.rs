//! Stick Bridge headless demo
//!
//! Plays seeded runs with a simple autopilot, driving the simulation with
//! synthetic 60 Hz timestamps and logging what a UI would show.
//!
//! Usage: `stick-bridge [seed] [config.json]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use stick_bridge::render::{self, DrawCommand, Surface};
    use stick_bridge::sim::{Game, GameEvent, GamePhase};
    use stick_bridge::{Config, HighScore};

    /// Frame length of the simulated display (ms)
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Safety cap on simulated frames per run
    const MAX_FRAMES: u32 = 200_000;
    const RUNS: u32 = 3;

    /// Surface that only tallies what it was asked to draw
    #[derive(Default)]
    struct Tally {
        frames: u64,
        commands: u64,
    }

    impl Surface for Tally {
        fn draw(&mut self, command: &DrawCommand) {
            if matches!(command, DrawCommand::Gradient { .. }) {
                self.frames += 1;
            }
            self.commands += 1;
        }
    }

    /// Press, hold until the tip nears the aim point, release
    struct Autopilot {
        rng: Pcg32,
        /// Max aiming error in px
        sloppiness: f32,
        aim: Option<f32>,
    }

    impl Autopilot {
        fn new(seed: u64) -> Self {
            Self {
                rng: Pcg32::seed_from_u64(seed ^ 0x5EED),
                sloppiness: 18.0,
                aim: None,
            }
        }

        fn act(&mut self, game: &mut Game) {
            match game.phase() {
                GamePhase::Waiting => {
                    let state = game.snapshot();
                    let anchor = state.stick.x;
                    let Some(target) = state.platforms.iter().find(|p| p.x > anchor) else {
                        return;
                    };
                    let error = self.rng.random_range(-self.sloppiness..=self.sloppiness);
                    self.aim = Some(target.midpoint() + error);
                    game.begin_stretch();
                }
                GamePhase::Stretching => {
                    let tip = game.snapshot().stick.tip();
                    if self.aim.is_some_and(|aim| tip >= aim) {
                        game.commit_stretch();
                        self.aim = None;
                    }
                }
                _ => {}
            }
        }
    }

    fn report(events: Vec<GameEvent>, store: &mut HighScore) {
        for event in events {
            match event {
                GameEvent::ScoreChanged { score, perfect: true } => log::info!("PERFECT! score {}", score),
                GameEvent::ScoreChanged { score, .. } => log::info!("score {}", score),
                GameEvent::GameOver { final_score } => log::info!("game over, final score {}", final_score),
                GameEvent::HighScoreBeaten { high_score } => {
                    store.submit(high_score);
                    log::info!(
                        "new high score {} (saved under {} as {})",
                        high_score,
                        HighScore::STORAGE_KEY,
                        store.to_json()
                    );
                }
                GameEvent::PhaseChanged { from, to } => log::trace!("{} -> {}", from.as_str(), to.as_str()),
            }
        }
    }

    pub fn run() {
        env_logger::init();

        let mut args = std::env::args().skip(1);
        let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(7);
        let config_text = args.next().and_then(|path| match std::fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!("Could not read {}: {}", path, e);
                None
            }
        });
        let config = Config::load_or_default(config_text.as_deref());

        log::info!("Stick Bridge demo starting (seed {})", seed);

        let mut store = HighScore::default();
        let mut game = Game::with_seed(config, seed);
        let mut pilot = Autopilot::new(seed);
        let mut surface = Tally::default();
        let mut now = 0.0;

        for run in 1..=RUNS {
            game.reset();
            game.set_high_score(store.best());

            for _ in 0..MAX_FRAMES {
                now += FRAME_MS;
                pilot.act(&mut game);
                let result = game.step(now);
                if result.requires_redraw {
                    render::render(game.snapshot(), game.config(), &mut surface);
                }
                report(game.drain_events(), &mut store);
                if game.is_game_over() {
                    break;
                }
            }

            println!("run {}: score {} (best {})", run, game.score(), store.best());
        }

        println!(
            "drew {} frames, {} commands; final high score {}",
            surface.frames,
            surface.commands,
            store.to_json()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web front end drives the library directly
}
