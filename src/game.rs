//! Session controller
//!
//! Owns the session, the periodic triggers and the high score bridge, and
//! walks the Idle -> Running -> Ended -> Running cycle. Ending a run cancels
//! both triggers and detaches jump input before anything is reset; the reset
//! and restart then happen immediately.

use serde::Serialize;

use crate::consts::MAX_FRAME_MS;
use crate::highscore::HighScoreBridge;
use crate::persistence::KeyValueStore;
use crate::platform::{Scheduler, Trigger};
use crate::sim::{
    EndCause, EntityBounds, GamePhase, GameSession, ObstacleGenerator, PlayAreaMetrics,
    SpawnOutcome, tick,
};
use crate::tuning::{Tuning, TuningError};

/// Notifications for the presentation layer, drained once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Entered Running
    Started { high_score: u32 },
    /// An obstacle appeared at the right edge
    Spawned { id: u32 },
    /// An obstacle left the play area
    Passed { id: u32, score: u32 },
    /// Run over; the game has already reset and restarted
    GameOver {
        score: u32,
        high_score: u32,
        cause: EndCause,
    },
}

impl GameEvent {
    /// Text for an end-of-game notice
    pub fn message(&self) -> Option<String> {
        match self {
            GameEvent::GameOver {
                score, high_score, ..
            } => Some(format!(
                "Game Over! Your score is {}. Your highest score is {}",
                score, high_score
            )),
            _ => None,
        }
    }
}

/// Read-only view of everything the presentation layer draws
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub play_area: PlayAreaMetrics,
    pub avatar: EntityBounds,
    /// Upper then lower segment for each obstacle, in spawn order
    pub segments: Vec<EntityBounds>,
    pub score: u32,
    pub high_score: u32,
}

/// The game state controller
pub struct Game<S> {
    tuning: Tuning,
    metrics: PlayAreaMetrics,
    session: GameSession,
    generator: ObstacleGenerator,
    scheduler: Scheduler,
    bridge: HighScoreBridge<S>,
    phase: GamePhase,
    high_score: u32,
    /// Jump input is only honored while attached
    jump_listening: bool,
    games_played: u32,
    events: Vec<GameEvent>,
}

impl<S: KeyValueStore> Game<S> {
    /// Create an idle game. Call [`Game::start`] to begin.
    ///
    /// Fails if `tuning` does not pass [`Tuning::validate`].
    pub fn new(tuning: Tuning, store: S, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        log::info!("Game initialized with seed: {}", seed);
        Ok(Self {
            metrics: tuning.play_area,
            session: GameSession::new(&tuning),
            generator: ObstacleGenerator::new(seed),
            scheduler: Scheduler::new(tuning.sim_interval_ms, tuning.spawn_interval_ms),
            bridge: HighScoreBridge::new(store),
            phase: GamePhase::Idle,
            high_score: 0,
            jump_listening: false,
            games_played: 0,
            events: Vec::new(),
            tuning,
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Completed runs since creation
    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn is_listening(&self) -> bool {
        self.jump_listening
    }

    pub fn store(&self) -> &S {
        self.bridge.store()
    }

    pub fn metrics(&self) -> PlayAreaMetrics {
        self.metrics
    }

    /// Host reports the current play area size
    pub fn set_metrics(&mut self, metrics: PlayAreaMetrics) {
        self.metrics = metrics;
    }

    /// Idle/Ended -> Running
    pub fn start(&mut self) {
        if self.phase == GamePhase::Running {
            log::warn!("start() ignored: already running");
            return;
        }
        self.high_score = self.bridge.load_high_score();
        self.session.score = 0;
        self.scheduler.start();
        self.jump_listening = true;
        self.phase = GamePhase::Running;
        log::info!("Run started (high score {})", self.high_score);
        self.events.push(GameEvent::Started {
            high_score: self.high_score,
        });
    }

    /// Jump trigger. Returns whether it reached the avatar.
    pub fn jump(&mut self) -> bool {
        if !self.jump_listening {
            return false;
        }
        self.session.avatar.jump(self.tuning.jump_impulse);
        true
    }

    /// One simulation step; ends the run on collision or boundary breach
    pub fn sim_tick(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        let outcome = tick(&mut self.session, &self.tuning, &self.metrics);
        for id in outcome.passed {
            self.events.push(GameEvent::Passed {
                id,
                score: self.session.score,
            });
        }
        if let Some(cause) = outcome.end {
            self.end_game(cause);
        }
    }

    /// One spawn attempt
    pub fn spawn_tick(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        if let SpawnOutcome::Spawned { id, .. } =
            self.generator.spawn(&mut self.session, &self.tuning, &self.metrics)
        {
            self.events.push(GameEvent::Spawned { id });
        }
    }

    /// Feed elapsed host time; fires every trigger that falls due in order.
    ///
    /// Triggers still pending in this frame when a run ends are dropped, the
    /// restarted run begins counting from the next call.
    pub fn advance(&mut self, dt_ms: f64) {
        let mut budget = dt_ms.clamp(0.0, MAX_FRAME_MS);
        if dt_ms > MAX_FRAME_MS {
            log::debug!("Frame delta {:.1}ms clamped", dt_ms);
        }

        let runs_before = self.games_played;
        while let Some(trigger) = self.scheduler.pop_due(&mut budget) {
            match trigger {
                Trigger::Sim => self.sim_tick(),
                Trigger::Spawn => self.spawn_tick(),
            }
            if self.games_played != runs_before {
                return;
            }
        }
        self.scheduler.elapse(budget);
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            play_area: self.metrics,
            avatar: self.session.avatar.bounds(),
            segments: self
                .session
                .obstacles
                .iter()
                .flat_map(|o| o.segment_bounds())
                .collect(),
            score: self.session.score,
            high_score: self.high_score,
        }
    }

    /// Running -> Ended, then reset and restart
    fn end_game(&mut self, cause: EndCause) {
        self.phase = GamePhase::Ended;
        self.scheduler.cancel();
        self.jump_listening = false;

        let score = self.session.score;
        self.high_score = self.bridge.finalize(score, self.high_score);
        self.games_played += 1;
        log::info!(
            "Game over ({:?}): score {}, high score {}",
            cause,
            score,
            self.high_score
        );
        self.events.push(GameEvent::GameOver {
            score,
            high_score: self.high_score,
            cause,
        });

        self.reset();
    }

    /// Clear the session and start a fresh run
    fn reset(&mut self) {
        self.session.reset(&self.tuning);
        self.start();
    }
}
