//! Data-driven game balance
//!
//! Every gameplay constant lives here so a host can swap in a JSON file
//! (native) or a LocalStorage entry (browser) without rebuilding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::PlayAreaMetrics;

/// Errors raised while loading or validating tuning data
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("could not read tuning file")]
    Io(#[from] std::io::Error),
    #[error("tuning data is not valid JSON")]
    Json(#[from] serde_json::Error),
    #[error("min pipe height {min} is larger than max pipe height {max}")]
    PipeRange { min: u32, max: u32 },
    #[error("{0} must be positive")]
    NonPositive(&'static str),
    #[error("play area height {height} cannot fit a {needed}px pipe column")]
    PlayAreaTooShort { height: f32, needed: u32 },
}

/// Gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Clock ===
    /// Simulation trigger period (ms)
    pub sim_interval_ms: f64,
    /// Spawn trigger period (ms)
    pub spawn_interval_ms: f64,

    // === Avatar ===
    pub gravity: f32,
    pub jump_impulse: f32,
    /// Vertical position on start/reset
    pub avatar_start_y: f32,
    pub avatar_x: f32,
    pub avatar_width: f32,
    pub avatar_height: f32,

    // === Obstacles ===
    pub gap_height: u32,
    pub min_pipe_height: u32,
    pub max_pipe_height: u32,
    pub pipe_speed: f32,
    pub pipe_width: f32,

    /// Play area used until the host reports one
    pub play_area: PlayAreaMetrics,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            sim_interval_ms: SIM_INTERVAL_MS,
            spawn_interval_ms: SPAWN_INTERVAL_MS,

            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            avatar_start_y: AVATAR_START_Y,
            avatar_x: AVATAR_X,
            avatar_width: AVATAR_WIDTH,
            avatar_height: AVATAR_HEIGHT,

            gap_height: GAP_HEIGHT,
            min_pipe_height: MIN_PIPE_HEIGHT,
            max_pipe_height: MAX_PIPE_HEIGHT,
            pipe_speed: PIPE_SPEED,
            pipe_width: PIPE_WIDTH,

            play_area: PlayAreaMetrics::new(PLAY_AREA_WIDTH, PLAY_AREA_HEIGHT),
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject constant combinations the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.min_pipe_height > self.max_pipe_height {
            return Err(TuningError::PipeRange {
                min: self.min_pipe_height,
                max: self.max_pipe_height,
            });
        }
        if self.sim_interval_ms <= 0.0 {
            return Err(TuningError::NonPositive("sim_interval_ms"));
        }
        if self.spawn_interval_ms <= 0.0 {
            return Err(TuningError::NonPositive("spawn_interval_ms"));
        }
        if self.pipe_width <= 0.0 {
            return Err(TuningError::NonPositive("pipe_width"));
        }
        if self.avatar_width <= 0.0 || self.avatar_height <= 0.0 {
            return Err(TuningError::NonPositive("avatar size"));
        }
        let needed = self.min_pipe_height + self.gap_height;
        if self.play_area.height < needed as f32 {
            return Err(TuningError::PlayAreaTooShort {
                height: self.play_area.height,
                needed,
            });
        }
        Ok(())
    }

    /// Load tuning from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "skyhop_tuning";

    /// Load tuning from LocalStorage (WASM only), defaults when absent or invalid
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.gravity, 0.2);
        assert_eq!(tuning.jump_impulse, -6.0);
        assert_eq!(tuning.gap_height, 150);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.5, "pipe_speed": 3.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.5);
        assert_eq!(tuning.pipe_speed, 3.0);
        assert_eq!(tuning.max_pipe_height, MAX_PIPE_HEIGHT);
    }

    #[test]
    fn test_rejects_inverted_pipe_range() {
        let err = Tuning::from_json(r#"{ "min_pipe_height": 300, "max_pipe_height": 50 }"#)
            .unwrap_err();
        assert!(matches!(err, TuningError::PipeRange { min: 300, max: 50 }));
    }

    #[test]
    fn test_rejects_short_play_area() {
        let tuning = Tuning {
            play_area: PlayAreaMetrics::new(400.0, 100.0),
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::PlayAreaTooShort { needed: 200, .. })
        ));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let tuning = Tuning {
            sim_interval_ms: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NonPositive("sim_interval_ms"))
        ));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(Tuning::from_json("{"), Err(TuningError::Json(_))));
    }
}
