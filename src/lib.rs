//! Skyhop - A single-screen gap-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (avatar physics, obstacles, collisions)
//! - `game`: Session controller (start/end/reset state machine)
//! - `platform`: Clock and periodic triggers
//! - `persistence`: Key-value storage backends (memory, file, LocalStorage)
//! - `highscore`: Best score bridge over persistence
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod highscore;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use game::{Game, GameEvent, Snapshot};
pub use highscore::HighScoreBridge;
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Simulation trigger period (~60 Hz)
    pub const SIM_INTERVAL_MS: f64 = 17.0;
    /// Obstacle spawn trigger period
    pub const SPAWN_INTERVAL_MS: f64 = 2000.0;
    /// Longest frame delta fed to the scheduler (prevents catch-up spiral)
    pub const MAX_FRAME_MS: f64 = 250.0;

    /// Downward acceleration per simulation tick (px/tick²)
    pub const GRAVITY: f32 = 0.2;
    /// Velocity set by a jump (negative = upward)
    pub const JUMP_IMPULSE: f32 = -6.0;

    /// Vertical gap between upper and lower segments
    pub const GAP_HEIGHT: u32 = 150;
    /// Smallest upper segment height
    pub const MIN_PIPE_HEIGHT: u32 = 50;
    /// Largest upper segment height
    pub const MAX_PIPE_HEIGHT: u32 = 300;
    /// Horizontal obstacle speed (px/tick)
    pub const PIPE_SPEED: f32 = 2.0;
    pub const PIPE_WIDTH: f32 = 60.0;

    /// Avatar defaults
    pub const AVATAR_START_Y: f32 = 200.0;
    pub const AVATAR_X: f32 = 50.0;
    pub const AVATAR_WIDTH: f32 = 34.0;
    pub const AVATAR_HEIGHT: f32 = 24.0;

    /// Play area used until the host reports its real size
    pub const PLAY_AREA_WIDTH: f32 = 400.0;
    pub const PLAY_AREA_HEIGHT: f32 = 600.0;

    /// Persistence key for the best score
    pub const HIGH_SCORE_KEY: &str = "highScore";
}
