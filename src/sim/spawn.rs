//! Obstacle generation
//!
//! One attempt per spawn trigger. A rejected placement is dropped, not retried.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{GameSession, Obstacle, PlayAreaMetrics};
use crate::tuning::Tuning;

/// Result of one spawn attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnOutcome {
    /// New obstacle appended with this id
    Spawned { id: u32, upper_height: u32 },
    /// Gap too close in size to an existing obstacle's gap
    Overlap { upper_height: u32, existing_id: u32 },
    /// Play area too short for the drawn upper height plus the gap
    NoRoom { upper_height: u32 },
}

/// Upper/lower segment heights for a drawn gap offset, or `None` if the
/// lower segment would have negative height.
pub fn segment_heights(
    upper_height: u32,
    gap_height: u32,
    area_height: f32,
) -> Option<(f32, f32)> {
    let lower = area_height - upper_height as f32 - gap_height as f32;
    (lower >= 0.0).then_some((upper_height as f32, lower))
}

/// Find the first obstacle whose gap is too close to the candidate.
///
/// Only sizes are compared, never horizontal distance: the candidate is
/// rejected when its upper segment is shorter than an existing upper segment
/// by less than `gap`, or likewise for the lower segments.
pub fn find_overlap<'a>(
    upper: f32,
    lower: f32,
    gap: f32,
    existing: impl IntoIterator<Item = &'a Obstacle>,
) -> Option<u32> {
    existing
        .into_iter()
        .find(|o| {
            let top = o.upper.height;
            let bottom = o.lower.height;
            (upper < top && top - upper < gap) || (lower < bottom && bottom - lower < gap)
        })
        .map(|o| o.id)
}

/// Seeded obstacle generator
#[derive(Debug, Clone)]
pub struct ObstacleGenerator {
    rng: Pcg32,
}

impl ObstacleGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Draw the upper segment height, inclusive on both ends
    pub fn draw_upper_height(&mut self, tuning: &Tuning) -> u32 {
        self.rng
            .random_range(tuning.min_pipe_height..=tuning.max_pipe_height)
    }

    /// Try to place one obstacle at the right edge of the play area
    pub fn spawn(
        &mut self,
        session: &mut GameSession,
        tuning: &Tuning,
        area: &PlayAreaMetrics,
    ) -> SpawnOutcome {
        let upper_height = self.draw_upper_height(tuning);
        place_obstacle(session, upper_height, tuning, area)
    }
}

/// Place an obstacle with a given upper height, applying the overlap rule
pub fn place_obstacle(
    session: &mut GameSession,
    upper_height: u32,
    tuning: &Tuning,
    area: &PlayAreaMetrics,
) -> SpawnOutcome {
    let Some((upper, lower)) = segment_heights(upper_height, tuning.gap_height, area.height) else {
        log::warn!(
            "Play area height {} too short for pipe {} + gap {}",
            area.height,
            upper_height,
            tuning.gap_height
        );
        return SpawnOutcome::NoRoom { upper_height };
    };

    let gap = tuning.gap_height as f32;
    if let Some(existing_id) = find_overlap(upper, lower, gap, &session.obstacles) {
        log::debug!(
            "Spawn rejected: upper {} too close to obstacle {}",
            upper_height,
            existing_id
        );
        return SpawnOutcome::Overlap {
            upper_height,
            existing_id,
        };
    }

    let id = session.next_entity_id();
    session.obstacles.push_back(Obstacle::new(
        id,
        area.width,
        tuning.pipe_width,
        upper,
        lower,
        gap,
    ));
    log::debug!("Spawned obstacle {} (upper {}, lower {})", id, upper, lower);
    SpawnOutcome::Spawned { id, upper_height }
}
