//! Game session: owns every component and sequences them on a fixed tick.
//!
//! The session is headless. A driver feeds it [`Intent`]s and calls [`GameSession::tick`]
//! once per frame with the elapsed time; a renderer reads it back through the accessors.
//! All timing runs on a session-owned clock that stops while paused.

use crate::animation::{self, AnimationJob, RenderState};
use crate::audio::{AudioSink, SoundEvent};
use crate::board::{Board, JewelType};
use crate::cascade::{Advance, CascadeController, CascadeTiming, Resume};
use crate::column::{COLUMN_SIZE, Column};
use crate::config::GameConfig;
use crate::deferred::{DeferredQueue, PhaseToken};
use crate::matching::{MatchSet, find_matches};
use crate::score::ScoreTracker;
use crate::spawn::SpawnPolicy;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the player to start.
    Start,
    /// A column is falling (or about to spawn).
    Playing,
    /// A cascade is resolving. Player control is suspended.
    Animating,
    GameOver,
}

/// Discrete player intents. The session decides whether each one takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Rotate,
    FastFallOn,
    FastFallOff,
    Restart,
    Start,
    TogglePause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeferredAction {
    /// Next detection pass after a finished animation batch.
    ContinueCascade,
    Spawn,
}

#[derive(Debug)]
pub struct GameSession<A: AudioSink = ()> {
    config: GameConfig,
    seed: u64,
    board: Board,
    column: Option<Column>,
    spawner: SpawnPolicy,
    score: ScoreTracker,
    cascade: CascadeController,
    deferred: DeferredQueue<DeferredAction>,
    token: PhaseToken,
    /// Start, Playing or GameOver. `Animating` is derived from the cascade.
    phase: Phase,
    paused: bool,
    clock: Duration,
    last_fall: Duration,
    fast_fall: bool,
    /// A spawn is scheduled but has not happened yet.
    spawn_pending: bool,
    audio: A,
}

impl<A: AudioSink> GameSession<A> {
    /// Builds a session in [`Phase::Start`]. The config is expected to be validated.
    pub fn new(config: GameConfig, audio: A) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let timing = CascadeTiming {
            clear: config.clear_duration,
            fall: config.fall_duration,
        };
        log::info!(
            "new session: {}x{} board, {} jewel types, seed {seed}",
            config.width,
            config.height,
            config.jewel_types
        );
        Self {
            board: Board::new(config.width, config.height),
            column: None,
            spawner: SpawnPolicy::new(config.jewel_types, seed),
            score: ScoreTracker::new(config.base_fall_interval),
            cascade: CascadeController::new(timing),
            deferred: DeferredQueue::default(),
            token: PhaseToken::default(),
            phase: Phase::Start,
            paused: false,
            clock: Duration::ZERO,
            last_fall: Duration::ZERO,
            fast_fall: false,
            spawn_pending: false,
            seed,
            config,
            audio,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active_column(&self) -> Option<&Column> {
        self.column.as_ref()
    }

    pub fn preview(&self) -> Option<&[JewelType; COLUMN_SIZE]> {
        self.spawner.preview()
    }

    pub fn score(&self) -> u32 {
        self.score.score()
    }

    pub fn level(&self) -> u32 {
        self.score.level()
    }

    pub fn phase(&self) -> Phase {
        if self.phase == Phase::Playing && self.cascade.is_resolving() {
            Phase::Animating
        } else {
            self.phase
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_fast_fall(&self) -> bool {
        self.fast_fall
    }

    /// Fall interval for the current level.
    pub fn fall_interval(&self) -> Duration {
        self.score.fall_interval()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// In-flight animation jobs paired with what to draw for them right now.
    pub fn animations(&self) -> impl Iterator<Item = (&AnimationJob, RenderState)> + '_ {
        let now = self.clock;
        self.cascade
            .jobs()
            .iter()
            .map(move |job| (job, animation::advance(job, now).render))
    }

    pub fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::Start => self.start(),
            Intent::Restart => self.restart(),
            Intent::TogglePause => self.toggle_pause(),
            Intent::MoveLeft => self.shift(-1),
            Intent::MoveRight => self.shift(1),
            Intent::Rotate => self.rotate(),
            Intent::FastFallOn => {
                if self.can_control() {
                    self.fast_fall = true;
                } else {
                    log::trace!("fast fall ignored in {:?}", self.phase());
                }
            }
            Intent::FastFallOff => self.fast_fall = false,
        }
    }

    fn can_control(&self) -> bool {
        !self.paused && self.phase() == Phase::Playing && self.column.is_some()
    }

    fn shift(&mut self, dx: i32) {
        if !self.can_control() {
            log::trace!("move ignored in {:?}", self.phase());
            return;
        }
        let Some(column) = self.column.as_mut() else {
            return;
        };
        let target = column.shifted(dx);
        if self.board.collides_at(target.x, target.y) {
            return;
        }
        *column = target;
        self.audio.notify(SoundEvent::Move);
    }

    fn rotate(&mut self) {
        if !self.can_control() {
            log::trace!("rotate ignored in {:?}", self.phase());
            return;
        }
        if let Some(column) = self.column.as_mut() {
            column.rotate();
            self.audio.notify(SoundEvent::Rotate);
        }
    }

    pub fn start(&mut self) {
        if self.phase != Phase::Start {
            return;
        }
        log::info!("session started");
        self.begin();
    }

    /// Wipes the board and score and spawns a fresh column. The lookahead survives.
    pub fn restart(&mut self) {
        log::info!("restart (score was {})", self.score.score());
        self.board.clear();
        self.score.reset();
        self.cascade.reset();
        self.column = None;
        self.begin();
    }

    fn begin(&mut self) {
        self.token = self.token.next();
        self.phase = Phase::Playing;
        self.paused = false;
        self.fast_fall = false;
        self.spawn_pending = false;
        self.last_fall = self.clock;
        self.spawn();
    }

    pub fn toggle_pause(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        self.paused = !self.paused;
        self.fast_fall = false;
        log::info!("{}", if self.paused { "paused" } else { "resumed" });
    }

    /// Advances the session clock by `dt` and runs one step: due deferred actions, then
    /// either an animation update or a fall step.
    pub fn tick(&mut self, dt: Duration) {
        if self.paused || self.phase != Phase::Playing {
            return;
        }
        self.clock += dt;
        let now = self.clock;

        for action in self.deferred.take_due(now, self.token) {
            if self.phase != Phase::Playing {
                break;
            }
            match action {
                DeferredAction::ContinueCascade => self.continue_cascade(),
                DeferredAction::Spawn => {
                    self.spawn_pending = false;
                    self.spawn();
                }
            }
        }
        if self.phase != Phase::Playing {
            return;
        }

        if self.cascade.is_resolving() {
            self.fast_fall = false;
            if let Advance::BatchComplete(batch) = self.cascade.advance(&mut self.board, now) {
                log::trace!("{batch:?} batch complete");
                self.after_delay(self.config.settle_delay, DeferredAction::ContinueCascade);
            }
        } else {
            self.fall_step(now);
        }
    }

    fn current_interval(&self) -> Duration {
        let interval = self.score.fall_interval();
        if self.fast_fall {
            interval / self.config.fast_fall_multiplier.max(1)
        } else {
            interval
        }
    }

    fn fall_step(&mut self, now: Duration) {
        if self.column.is_none() || now.saturating_sub(self.last_fall) < self.current_interval()
        {
            return;
        }
        self.last_fall = now;
        let Some(column) = self.column.as_mut() else {
            return;
        };
        if self.board.collides_at(column.x, column.y + 1) {
            self.land();
        } else {
            column.y += 1;
        }
    }

    fn land(&mut self) {
        let Some(column) = self.column.take() else {
            return;
        };
        log::debug!("column landed at ({}, {})", column.x, column.y);
        self.board.place(&column);
        self.audio.notify(SoundEvent::Place);

        let rules = self.config.rules;
        let matches = find_matches(&self.board, rules);
        if matches.is_empty() {
            self.request_spawn();
            return;
        }
        if self.config.animate {
            self.clear(matches);
        } else {
            let (score, audio) = (&mut self.score, &mut self.audio);
            self.cascade
                .resolve_instantly(&mut self.board, rules, matches, |m| award(score, audio, m));
            self.request_spawn();
        }
    }

    fn clear(&mut self, matches: MatchSet) {
        self.fast_fall = false;
        award(&mut self.score, &mut self.audio, &matches);
        self.cascade.begin_clear(&mut self.board, &matches, self.clock);
    }

    fn continue_cascade(&mut self) {
        match self.cascade.resume(&mut self.board, self.config.rules, self.clock) {
            Some(Resume::Matched(matches)) => self.clear(matches),
            Some(Resume::Settled) => self.request_spawn(),
            Some(Resume::Falling(_)) | None => {}
        }
    }

    fn after_delay(&mut self, delay: Duration, action: DeferredAction) {
        if delay.is_zero() {
            match action {
                DeferredAction::ContinueCascade => self.continue_cascade(),
                DeferredAction::Spawn => self.spawn(),
            }
        } else {
            self.deferred.schedule(self.clock + delay, self.token, action);
        }
    }

    /// Asks for the next column. A no-op while a column exists, a cascade is resolving or
    /// a spawn is already scheduled.
    pub(crate) fn request_spawn(&mut self) {
        if self.phase != Phase::Playing
            || self.column.is_some()
            || self.cascade.is_resolving()
            || self.spawn_pending
        {
            log::trace!("spawn request ignored");
            return;
        }
        if !self.config.spawn_delay.is_zero() {
            self.spawn_pending = true;
        }
        self.after_delay(self.config.spawn_delay, DeferredAction::Spawn);
    }

    fn spawn(&mut self) {
        if self.column.is_some() {
            return;
        }
        if SpawnPolicy::is_blocked(&self.board) {
            self.game_over();
            return;
        }
        let column = self.spawner.next(&self.board);
        log::debug!("spawned {:?} at ({}, {})", column.jewels, column.x, column.y);
        self.column = Some(column);
        self.last_fall = self.clock;
    }

    fn game_over(&mut self) {
        log::info!(
            "game over: score {}, level {}",
            self.score.score(),
            self.score.level()
        );
        self.phase = Phase::GameOver;
        self.token = self.token.next();
        self.column = None;
        self.fast_fall = false;
        self.spawn_pending = false;
        self.audio.notify(SoundEvent::GameOver);
    }
}

fn award<A: AudioSink>(score: &mut ScoreTracker, audio: &mut A, matches: &MatchSet) {
    audio.notify(SoundEvent::Match);
    if let Some(level) = score.award(matches.len()) {
        log::info!("level up: {level}");
        audio.notify(SoundEvent::LevelUp);
    }
}
