//! Phase state machine
//!
//! The frame driver calls [`Game::step`] with a monotonically increasing
//! timestamp (ms). Every phase advances at a constant rate against the
//! elapsed time since the previous step; input triggers are applied
//! instantly between steps.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{self, Hit};
use super::generator::{self, RandomSource};
use super::state::{GamePhase, GameState, Viewport};
use crate::config::Config;
use crate::consts::*;
use crate::highscore::HighScore;

/// What the frame driver should do after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    /// The snapshot changed and should be drawn
    pub requires_redraw: bool,
    /// Schedule another step
    pub keep_running: bool,
}

impl StepResult {
    /// Nothing to do until the next trigger
    pub const HALT: StepResult = StepResult {
        requires_redraw: false,
        keep_running: false,
    };

    /// Baseline recorded, nothing advanced yet
    pub const BASELINE: StepResult = StepResult {
        requires_redraw: false,
        keep_running: true,
    };
}

/// Notifications for UI, audio and persistence collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A landing was scored
    ScoreChanged { score: u64, perfect: bool },
    /// The hero fell off screen
    GameOver { final_score: u64 },
    /// The finished run set a new record
    HighScoreBeaten { high_score: u64 },
    /// The machine moved between phases
    PhaseChanged { from: GamePhase, to: GamePhase },
}

/// Owns the state of a run and advances it
#[derive(Debug, Clone)]
pub struct Game<R: RandomSource = Pcg32> {
    config: Config,
    rng: R,
    state: GameState,
    high_score: HighScore,
    /// Timestamp of the previous step; `None` until a baseline is recorded
    last_timestamp: Option<f64>,
    events: Vec<GameEvent>,
}

impl Game<Pcg32> {
    /// Create a game with a seeded generator
    pub fn with_seed(config: Config, seed: u64) -> Self {
        Self::new(config, Pcg32::seed_from_u64(seed))
    }
}

impl<R: RandomSource> Game<R> {
    /// Create a game ready to play (already reset)
    pub fn new(config: Config, mut rng: R) -> Self {
        let state = GameState::fresh(&config, config.viewport, &mut rng);
        Self {
            config,
            rng,
            state,
            high_score: HighScore::default(),
            last_timestamp: None,
            events: Vec::new(),
        }
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn is_game_over(&self) -> bool {
        self.state.game_over
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    /// Seed the record from storage
    pub fn set_high_score(&mut self, best: u64) {
        self.high_score = HighScore::new(best);
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Input triggers ===

    /// Start a new run, dropping undrained events. Valid from any phase.
    pub fn reset(&mut self) {
        let viewport = self.state.viewport;
        self.state = GameState::fresh(&self.config, viewport, &mut self.rng);
        self.last_timestamp = None;
        self.events.clear();
        log::info!(
            "Run reset: {} platforms up to x={}",
            self.state.platforms.len(),
            self.state.furthest_platform_edge()
        );
    }

    /// Press: start growing the stick. Only valid while waiting.
    pub fn begin_stretch(&mut self) {
        if self.state.phase != GamePhase::Waiting {
            log::trace!("begin_stretch ignored in {}", self.state.phase.as_str());
            return;
        }
        // Time spent idle must not count toward the stretch
        self.last_timestamp = None;
        self.set_phase(GamePhase::Stretching);
    }

    /// Release: let the stick fall. Only valid while stretching.
    pub fn commit_stretch(&mut self) {
        if self.state.phase != GamePhase::Stretching {
            log::trace!("commit_stretch ignored in {}", self.state.phase.as_str());
            return;
        }
        self.set_phase(GamePhase::Turning);
    }

    /// Board size changed. Non-positive sizes are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width > 0.0 && height > 0.0) {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }
        self.state.viewport = Viewport::new(width, height);
    }

    // === Frame step ===

    /// Advance the run to `timestamp` (ms)
    pub fn step(&mut self, timestamp: f64) -> StepResult {
        if self.state.game_over || self.state.phase == GamePhase::Waiting {
            return StepResult::HALT;
        }

        let Some(previous) = self.last_timestamp.replace(timestamp) else {
            return StepResult::BASELINE;
        };
        let elapsed = (timestamp - previous).max(0.0) as f32;

        match self.state.phase {
            GamePhase::Waiting => {}
            GamePhase::Stretching => self.stretch(elapsed),
            GamePhase::Turning => self.turn(elapsed),
            GamePhase::Walking => self.walk(elapsed),
            GamePhase::Transitioning => self.scroll(elapsed),
            GamePhase::Falling => self.fall(elapsed),
        }

        StepResult {
            requires_redraw: true,
            keep_running: !self.state.game_over && self.state.phase != GamePhase::Waiting,
        }
    }

    fn stretch(&mut self, elapsed: f32) {
        let max_length = self.state.viewport.max_stick_length();
        let stick = &mut self.state.stick;
        stick.length += elapsed / self.config.stretching_speed;

        if stick.length >= max_length {
            stick.length = max_length;
            log::debug!("Stick reached max length {}", max_length);
            self.set_phase(GamePhase::Turning);
        }
    }

    fn turn(&mut self, elapsed: f32) {
        let stick = &mut self.state.stick;
        stick.rotation += elapsed / self.config.turning_speed;
        if stick.rotation < LANDED_ROTATION {
            return;
        }
        stick.rotation = LANDED_ROTATION;

        let hit = self.landing();
        if hit.is_hit() {
            self.state.score += hit.points();
            self.events.push(GameEvent::ScoreChanged {
                score: self.state.score,
                perfect: hit.perfect,
            });
            log::debug!(
                "Landed at x={} ({}), score {}",
                self.state.stick.tip(),
                if hit.perfect { "perfect" } else { "ordinary" },
                self.state.score
            );

            generator::push_platform(&mut self.state.platforms, &self.config, &mut self.rng);
            generator::extend_trees(&mut self.state.trees, TREES_PER_LANDING, &self.config, &mut self.rng);
        } else {
            log::debug!("Missed at x={}", self.state.stick.tip());
        }

        self.set_phase(GamePhase::Walking);
    }

    fn walk(&mut self, elapsed: f32) {
        self.state.hero.pos.x += elapsed / self.config.walking_speed;

        let hit = self.landing();
        let (stop_x, next) = match hit.platform {
            Some(platform) => (platform.right() - self.config.hero_edge_offset, GamePhase::Transitioning),
            None => (self.state.stick.tip() + self.config.stick_overhang, GamePhase::Falling),
        };

        if self.state.hero.pos.x >= stop_x {
            self.state.hero.pos.x = stop_x;
            self.set_phase(next);
        }
    }

    fn scroll(&mut self, elapsed: f32) {
        self.state.scene_offset += elapsed / self.config.transitioning_speed;

        let Some(platform) = self.landing().platform else {
            panic!("transitioning without a landed platform");
        };

        if self.state.scene_offset > platform.right() - self.config.camera_padding {
            self.state.plant_new_stick(platform.right());
            self.state.prune_offscreen();
            self.set_phase(GamePhase::Waiting);
        }
    }

    fn fall(&mut self, elapsed: f32) {
        let hero = &mut self.state.hero;
        hero.fall_speed += self.config.fall_acceleration * elapsed;
        hero.pos.y += hero.fall_speed * elapsed;

        let stick = &mut self.state.stick;
        stick.rotation = (stick.rotation + self.config.stick_fall_rate * elapsed).min(FALLEN_ROTATION);

        if self.state.hero.pos.y > self.config.fall_limit(&self.state.viewport) {
            self.finish_run();
        }
    }

    fn finish_run(&mut self) {
        let score = self.state.score;
        self.state.game_over = true;
        self.events.push(GameEvent::GameOver { final_score: score });
        log::info!("Game over with score {}", score);

        if self.high_score.submit(score) {
            self.events.push(GameEvent::HighScoreBeaten { high_score: score });
            log::info!("New high score {}", score);
        }
    }

    fn landing(&self) -> Hit {
        collision::resolve_hit(&self.state.stick, &self.state.platforms, self.config.perfect_area_size)
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.state.phase;
        if from == to {
            return;
        }
        self.state.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
        log::debug!("Phase {} -> {}", from.as_str(), to.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::generator::ScriptedSource;
    use crate::sim::state::{Platform, Stick};

    /// With every sample at 0.5 the layout is 50-100, 220-280, 400-460, ...
    fn scripted_game() -> Game<ScriptedSource> {
        Game::new(Config::default(), ScriptedSource::constant(0.5))
    }

    /// Step in 16 ms frames until the phase changes or the driver is told to stop
    fn run_until_phase_change<R: RandomSource>(game: &mut Game<R>, now: &mut f64) -> GamePhase {
        let start = game.phase();
        for _ in 0..10_000 {
            *now += 16.0;
            let result = game.step(*now);
            if game.phase() != start || !result.keep_running {
                break;
            }
        }
        game.phase()
    }

    /// Stretch to `length` and release, returning the time after the release
    fn stretch_to<R: RandomSource>(game: &mut Game<R>, length: f32, start: f64) -> f64 {
        game.begin_stretch();
        assert_eq!(game.step(start), StepResult::BASELINE);
        let now = start + (length * game.config().stretching_speed) as f64;
        game.step(now);
        assert_eq!(game.snapshot().stick.length, length);
        game.commit_stretch();
        now
    }

    fn phases(events: &[GameEvent]) -> Vec<GamePhase> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::PhaseChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_waiting_halts() {
        let mut game = scripted_game();
        let before = game.snapshot().clone();
        assert_eq!(game.step(1000.0), StepResult::HALT);
        assert_eq!(game.step(2000.0), StepResult::HALT);
        assert_eq!(game.snapshot(), &before);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_first_step_only_records_baseline() {
        let mut game = scripted_game();
        game.begin_stretch();
        assert_eq!(game.phase(), GamePhase::Stretching);

        assert_eq!(game.step(50_000.0), StepResult::BASELINE);
        assert_eq!(game.snapshot().stick.length, 0.0);

        let result = game.step(50_040.0);
        assert!(result.requires_redraw && result.keep_running);
        assert_eq!(game.snapshot().stick.length, 10.0);
    }

    #[test]
    fn test_stretch_cap_forces_turning() {
        let mut game = scripted_game();
        game.begin_stretch();
        game.step(0.0);
        // Cap is min(800, 600 / 2) = 300
        game.step(10_000.0);
        assert_eq!(game.snapshot().stick.length, 300.0);
        assert_eq!(game.phase(), GamePhase::Turning);
    }

    #[test]
    fn test_resize_changes_stretch_cap() {
        let mut game = scripted_game();
        game.resize(200.0, 1000.0);
        game.resize(0.0, 500.0);
        game.begin_stretch();
        game.step(0.0);
        game.step(10_000.0);
        assert_eq!(game.snapshot().stick.length, 200.0);
    }

    #[test]
    fn test_perfect_landing_scores_two() {
        let mut game = scripted_game();
        assert_eq!(game.snapshot().platforms[1], Platform::new(220.0, 60.0));

        // Tip at the midpoint 250
        let now = stretch_to(&mut game, 150.0, 1000.0);
        assert_eq!(game.phase(), GamePhase::Turning);

        game.step(now + 360.0);
        assert_eq!(game.snapshot().stick.rotation, 90.0);
        assert_eq!(game.phase(), GamePhase::Walking);
        assert_eq!(game.score(), 2);

        let events = game.drain_events();
        assert!(events.contains(&GameEvent::ScoreChanged { score: 2, perfect: true }));
    }

    #[test]
    fn test_landing_extends_world() {
        let mut game = scripted_game();
        let platforms = game.snapshot().platforms.len();
        let trees = game.snapshot().trees.len();

        let now = stretch_to(&mut game, 130.0, 0.0);
        game.step(now + 400.0);

        assert_eq!(game.score(), 1);
        assert_eq!(game.snapshot().platforms.len(), platforms + 1);
        assert_eq!(game.snapshot().trees.len(), trees + TREES_PER_LANDING);
    }

    #[test]
    fn test_turning_is_gradual() {
        let mut game = scripted_game();
        let now = stretch_to(&mut game, 150.0, 0.0);
        game.step(now + 100.0);
        assert_eq!(game.snapshot().stick.rotation, 25.0);
        assert_eq!(game.phase(), GamePhase::Turning);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_walk_clamps_at_platform_edge() {
        let mut game = scripted_game();
        let now = stretch_to(&mut game, 150.0, 0.0);
        let now = now + 360.0;
        game.step(now);
        assert_eq!(game.phase(), GamePhase::Walking);

        // Far more time than needed: hero must stop at 280 - 10
        game.step(now + 100_000.0);
        assert_eq!(game.snapshot().hero.pos.x, 270.0);
        assert_eq!(game.phase(), GamePhase::Transitioning);
    }

    #[test]
    fn test_transition_plants_new_stick() {
        let mut game = scripted_game();
        let mut now = stretch_to(&mut game, 150.0, 0.0);
        assert_eq!(run_until_phase_change(&mut game, &mut now), GamePhase::Walking);
        assert_eq!(run_until_phase_change(&mut game, &mut now), GamePhase::Transitioning);

        let offset_before = game.snapshot().scene_offset;
        assert_eq!(run_until_phase_change(&mut game, &mut now), GamePhase::Waiting);

        let state = game.snapshot();
        assert!(state.scene_offset > offset_before);
        assert!(state.scene_offset > 280.0 - 100.0);
        assert_eq!(state.stick, Stick::planted_at(280.0));
        assert_eq!(state.planted_sticks.last().map(|s| s.length), Some(150.0));
        // First platform scrolled away, the landed one remains
        assert_eq!(state.platforms[0], Platform::new(220.0, 60.0));
        assert_eq!(game.step(now + 16.0), StepResult::HALT);
    }

    #[test]
    fn test_long_transition_frame_keeps_next_platform() {
        let mut game = scripted_game();
        let mut now = stretch_to(&mut game, 150.0, 0.0);
        assert_eq!(run_until_phase_change(&mut game, &mut now), GamePhase::Walking);
        assert_eq!(run_until_phase_change(&mut game, &mut now), GamePhase::Transitioning);

        // A stalled tab hands us ten seconds in one frame
        now += 10_000.0;
        game.step(now);
        assert_eq!(game.phase(), GamePhase::Waiting);

        let state = game.snapshot();
        assert!(state.scene_offset > 5000.0);
        assert_eq!(state.stick, Stick::planted_at(280.0));
        assert_eq!(state.platforms[0], Platform::new(220.0, 60.0));
        assert_eq!(state.platforms[1], Platform::new(400.0, 60.0));

        // The next platform is still reachable: tip at its midpoint 430
        let now = stretch_to(&mut game, 150.0, now + 16.0);
        game.step(now + 360.0);
        assert_eq!(game.phase(), GamePhase::Walking);
        assert_eq!(game.score(), 4);
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::ScoreChanged { score: 4, perfect: true }));
    }

    #[test]
    fn test_success_cycle_repeats() {
        let mut game = Game::with_seed(Config::default(), 2024);
        let mut now = 0.0;

        for round in 0..5 {
            // Aim for the middle of the next platform
            let stick_x = game.snapshot().stick.x;
            let target = *game
                .snapshot()
                .platforms
                .iter()
                .find(|p| p.x > stick_x)
                .unwrap();
            game.begin_stretch();
            now += 16.0;
            game.step(now);
            // Coarse frames overshoot a little; stop as soon as the tip passes the left edge + 1
            while game.snapshot().stick.tip() < target.x + 1.0 {
                now += 1.0;
                game.step(now);
            }
            game.commit_stretch();

            assert_eq!(run_until_phase_change(&mut game, &mut now), GamePhase::Walking);
            assert_eq!(run_until_phase_change(&mut game, &mut now), GamePhase::Transitioning);
            assert_eq!(run_until_phase_change(&mut game, &mut now), GamePhase::Waiting);
            assert_eq!(game.score(), round + 1);
        }

        let events = game.drain_events();
        let cycle = [
            GamePhase::Stretching,
            GamePhase::Turning,
            GamePhase::Walking,
            GamePhase::Transitioning,
            GamePhase::Waiting,
        ];
        assert_eq!(phases(&events), cycle.repeat(5));
    }

    #[test]
    fn test_overshoot_falls_and_ends_run() {
        let mut game = scripted_game();
        game.set_high_score(10);

        // Tip at 300 lands in the gap between 280 and 400
        let mut now = stretch_to(&mut game, 200.0, 0.0);
        assert_eq!(run_until_phase_change(&mut game, &mut now), GamePhase::Walking);
        assert_eq!(game.score(), 0);

        assert_eq!(run_until_phase_change(&mut game, &mut now), GamePhase::Falling);
        assert_eq!(game.snapshot().hero.pos.x, 300.0 + 17.0);

        let events_before_fall = game.drain_events();
        assert!(!events_before_fall.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));

        let mut last = StepResult::BASELINE;
        for _ in 0..1000 {
            now += 16.0;
            last = game.step(now);
            if !last.keep_running {
                break;
            }
        }
        assert!(!last.keep_running);
        assert!(game.is_game_over());
        assert!(game.snapshot().hero.pos.y > 340.0);
        assert!(game.snapshot().stick.rotation <= 180.0);

        let events = game.drain_events();
        assert!(events.contains(&GameEvent::GameOver { final_score: 0 }));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::HighScoreBeaten { .. })));

        // Further steps are inert
        assert_eq!(game.step(now + 16.0), StepResult::HALT);
    }

    #[test]
    fn test_falling_uses_euler_integration() {
        let mut game = scripted_game();
        let mut now = stretch_to(&mut game, 200.0, 0.0);
        run_until_phase_change(&mut game, &mut now);
        run_until_phase_change(&mut game, &mut now);
        assert_eq!(game.phase(), GamePhase::Falling);

        let y0 = game.snapshot().hero.pos.y;
        game.step(now + 10.0);
        // speed = 0.5 + 0.007 * 10 = 0.57, y += 0.57 * 10
        let hero = game.snapshot().hero;
        assert!((hero.fall_speed - 0.57).abs() < 1e-5);
        assert!((hero.pos.y - y0 - 5.7).abs() < 1e-4);
        // stick keeps rotating: 90 + 0.48 * 10
        assert!((game.snapshot().stick.rotation - 94.8).abs() < 1e-4);
    }

    #[test]
    fn test_stick_rotation_capped_when_falling() {
        let mut game = scripted_game();
        let mut now = stretch_to(&mut game, 200.0, 0.0);
        run_until_phase_change(&mut game, &mut now);
        run_until_phase_change(&mut game, &mut now);

        // One huge frame ends the run and must not over-rotate the stick
        game.step(now + 1000.0);
        assert_eq!(game.snapshot().stick.rotation, 180.0);
        assert!(game.is_game_over());
    }

    #[test]
    fn test_high_score_beaten_event() {
        let mut game = scripted_game();
        game.set_high_score(1);

        // Perfect landing, then overshoot on the next attempt
        let mut now = stretch_to(&mut game, 150.0, 0.0);
        for _ in 0..3 {
            run_until_phase_change(&mut game, &mut now);
        }
        assert_eq!(game.phase(), GamePhase::Waiting);
        assert_eq!(game.score(), 2);

        let mut now = stretch_to(&mut game, 290.0, now + 100.0);
        while game.step(now).keep_running {
            now += 16.0;
        }
        assert!(game.is_game_over());
        assert_eq!(game.high_score(), 2);
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::GameOver { final_score: 2 }));
        assert!(events.contains(&GameEvent::HighScoreBeaten { high_score: 2 }));
    }

    #[test]
    fn test_commit_while_waiting_is_ignored() {
        let mut game = scripted_game();
        let before = game.snapshot().clone();
        game.commit_stretch();
        assert_eq!(game.phase(), GamePhase::Waiting);
        assert_eq!(game.snapshot(), &before);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_begin_stretch_ignored_outside_waiting() {
        let mut game = scripted_game();
        game.begin_stretch();
        game.step(0.0);
        game.step(40.0);
        game.begin_stretch();
        // Baseline kept: the next step still advances
        game.step(80.0);
        assert_eq!(game.snapshot().stick.length, 20.0);
    }

    #[test]
    fn test_reset_is_idempotent_for_start_layout() {
        let mut game = Game::with_seed(Config::default(), 99);
        let mut now = stretch_to(&mut game, 200.0, 0.0);
        run_until_phase_change(&mut game, &mut now);

        game.reset();
        let first = game.snapshot().clone();
        game.reset();
        let second = game.snapshot().clone();

        for state in [&first, &second] {
            assert_eq!(state.phase, GamePhase::Waiting);
            assert_eq!(state.score, 0);
            assert_eq!(state.scene_offset, 0.0);
            assert_eq!(state.platforms[0], Platform::FIRST);
            assert_eq!(state.stick, Stick::planted_at(100.0));
            assert!(state.planted_sticks.is_empty());
            assert_eq!(state.hero.pos.x, 90.0);
            assert_eq!(state.hero.pos.y, 0.0);
            assert!(!state.game_over);
        }
    }

    #[test]
    fn test_reset_after_game_over_allows_play() {
        let mut game = scripted_game();
        let mut now = stretch_to(&mut game, 200.0, 0.0);
        while game.step(now).keep_running {
            now += 16.0;
        }
        assert!(game.is_game_over());

        game.begin_stretch();
        assert_eq!(game.phase(), GamePhase::Falling);

        game.reset();
        game.begin_stretch();
        assert_eq!(game.phase(), GamePhase::Stretching);
        assert_eq!(game.step(now + 1.0), StepResult::BASELINE);
    }

    #[test]
    fn test_reset_discards_undrained_events() {
        let mut game = scripted_game();
        let mut now = stretch_to(&mut game, 200.0, 0.0);
        while game.step(now).keep_running {
            now += 16.0;
        }
        assert!(game.is_game_over());

        game.reset();
        assert!(game.drain_events().is_empty());

        game.begin_stretch();
        assert_eq!(phases(&game.drain_events()), vec![GamePhase::Stretching]);
    }

    #[test]
    fn test_stale_timestamp_does_not_rewind() {
        let mut game = scripted_game();
        game.begin_stretch();
        game.step(1000.0);
        game.step(1040.0);
        game.step(900.0);
        assert_eq!(game.snapshot().stick.length, 10.0);
    }
}
