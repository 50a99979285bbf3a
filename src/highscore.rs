//! Best score bridge
//!
//! One integer persisted under the `highScore` key. Reads never fail from the
//! game's point of view: anything missing or unreadable counts as 0.

use crate::consts::HIGH_SCORE_KEY;
use crate::persistence::KeyValueStore;

/// Reads and writes the persisted best score
#[derive(Debug, Clone)]
pub struct HighScoreBridge<S> {
    store: S,
}

impl<S: KeyValueStore> HighScoreBridge<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the persisted best score, 0 if absent or unparseable
    pub fn load_high_score(&self) -> u32 {
        match self.store.get_item(HIGH_SCORE_KEY) {
            Ok(Some(raw)) => parse_leading_score(&raw).unwrap_or_else(|| {
                log::warn!("Ignoring unparseable high score {:?}", raw);
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                log::warn!("Could not read high score: {}", e);
                0
            }
        }
    }

    /// Settle the best score at game end.
    ///
    /// Returns `max(score, high_score)` and writes it only when `score`
    /// beats `high_score`.
    pub fn finalize(&mut self, score: u32, high_score: u32) -> u32 {
        if score <= high_score {
            return high_score;
        }
        match self.store.set_item(HIGH_SCORE_KEY, &score.to_string()) {
            Ok(()) => log::info!("New high score: {}", score),
            Err(e) => log::warn!("Could not save high score {}: {}", score, e),
        }
        score
    }
}

/// Leading integer of a stored value, so `"17px"` reads as 17 and `"12.5"`
/// as 12. Negative values clamp to 0 and oversized ones to `u32::MAX`.
fn parse_leading_score(raw: &str) -> Option<u32> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return None;
    }
    if negative {
        return Some(0);
    }
    Some(digits.parse().unwrap_or(u32::MAX))
}
