//! Fixed timestep simulation tick
//!
//! Avatar physics, boundary check, then obstacle motion with per-obstacle
//! removal and collision, in that order.

use super::collision::{BoundaryHit, boundary_hit};
use super::state::{GameSession, PlayAreaMetrics};
use crate::tuning::Tuning;

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCause {
    Boundary(BoundaryHit),
    /// Avatar touched a segment of this obstacle
    Obstacle(u32),
}

/// Observable results of one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// Obstacles that exited this tick, in exit order
    pub passed: Vec<u32>,
    /// First terminal condition detected, if any
    pub end: Option<EndCause>,
}

impl TickOutcome {
    pub fn ended(&self) -> bool {
        self.end.is_some()
    }
}

/// Advance the session by one simulation step
pub fn tick(session: &mut GameSession, tuning: &Tuning, area: &PlayAreaMetrics) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    session.time_ticks += 1;

    session.avatar.tick(tuning.gravity);
    let avatar = session.avatar.bounds();

    if let Some(hit) = boundary_hit(&avatar, area) {
        outcome.end = Some(EndCause::Boundary(hit));
    }

    // Every obstacle moves each tick. Only the front (oldest) obstacle is
    // retired; a newer one that is already off screen waits its turn, which
    // happens when the play area shrank between spawns.
    let mut idx = 0;
    while idx < session.obstacles.len() {
        let obstacle = &mut session.obstacles[idx];
        obstacle.advance(tuning.pipe_speed);
        let segments = obstacle.segment_bounds();
        let id = obstacle.id;

        if idx == 0 && obstacle.is_off_screen() {
            session.obstacles.pop_front();
            session.score += 1;
            outcome.passed.push(id);
        } else {
            idx += 1;
        }

        // The obstacle is still tested on the tick it is removed
        if outcome.end.is_none() && segments.iter().any(|s| s.overlaps(&avatar)) {
            outcome.end = Some(EndCause::Obstacle(id));
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::place_obstacle;
    use crate::sim::state::Obstacle;
    use proptest::prelude::*;

    fn setup() -> (GameSession, Tuning, PlayAreaMetrics) {
        let tuning = Tuning::default();
        let session = GameSession::new(&tuning);
        (session, tuning, PlayAreaMetrics::new(500.0, 600.0))
    }

    #[test]
    fn test_tick_moves_avatar_and_obstacles() {
        let (mut session, tuning, area) = setup();
        place_obstacle(&mut session, 300, &tuning, &area);

        let outcome = tick(&mut session, &tuning, &area);
        assert!(!outcome.ended());
        assert_eq!(session.time_ticks, 1);
        assert!((session.avatar.y - 200.2).abs() < 1e-4);
        assert_eq!(session.obstacles[0].upper.left, 498.0);
        assert_eq!(session.obstacles[0].lower.left, 498.0);
    }

    #[test]
    fn test_jump_then_tick_scenario() {
        let (mut session, tuning, area) = setup();
        tick(&mut session, &tuning, &area);
        session.avatar.jump(tuning.jump_impulse);
        tick(&mut session, &tuning, &area);
        assert!((session.avatar.velocity + 5.8).abs() < 1e-5);
        assert!((session.avatar.y - 194.4).abs() < 1e-4);
    }

    #[test]
    fn test_ceiling_and_floor_end_run() {
        let (mut session, tuning, area) = setup();
        session.avatar.y = 3.0;
        session.avatar.velocity = -5.0;
        let outcome = tick(&mut session, &tuning, &area);
        assert_eq!(outcome.end, Some(EndCause::Boundary(BoundaryHit::Ceiling)));

        let (mut session, tuning, area) = setup();
        session.avatar.y = area.height - session.avatar.size.y - 0.1;
        session.avatar.velocity = 0.0;
        let outcome = tick(&mut session, &tuning, &area);
        assert_eq!(outcome.end, Some(EndCause::Boundary(BoundaryHit::Floor)));
    }

    #[test]
    fn test_collision_same_tick() {
        let (mut session, tuning, area) = setup();
        // Upper segment spans 0..300 and sits right on the avatar column
        let id = session.next_entity_id();
        session.obstacles.push_back(Obstacle::new(
            id,
            session.avatar.x + 2.0,
            tuning.pipe_width,
            300.0,
            150.0,
            150.0,
        ));
        let outcome = tick(&mut session, &tuning, &area);
        assert_eq!(outcome.end, Some(EndCause::Obstacle(id)));
    }

    #[test]
    fn test_avatar_inside_gap_is_safe() {
        let (mut session, tuning, area) = setup();
        // Gap spans 150..300, avatar at ~200..224
        let id = session.next_entity_id();
        session.obstacles.push_back(Obstacle::new(
            id,
            session.avatar.x,
            tuning.pipe_width,
            150.0,
            300.0,
            150.0,
        ));
        let outcome = tick(&mut session, &tuning, &area);
        assert_eq!(outcome.end, None);
    }

    #[test]
    fn test_exit_scores_and_removes_front() {
        let (mut session, tuning, area) = setup();
        let id = session.next_entity_id();
        // Right edge at 1.0, crosses below zero after one tick
        session.obstacles.push_back(Obstacle::new(
            id,
            1.0 - tuning.pipe_width,
            tuning.pipe_width,
            100.0,
            350.0,
            150.0,
        ));
        place_obstacle(&mut session, 100, &tuning, &area);

        let outcome = tick(&mut session, &tuning, &area);
        assert_eq!(outcome.passed, vec![id]);
        assert_eq!(session.score, 1);
        assert_eq!(session.obstacles.len(), 1);
        // The survivor still moved this tick
        assert_eq!(session.obstacles[0].upper.left, area.width - tuning.pipe_speed);
    }

    #[test]
    fn test_fifo_exit_order() {
        let (mut session, tuning, area) = setup();
        let spawn_gap_ticks = 40;
        let mut spawned = Vec::new();
        for _ in 0..3 {
            // Same heights never trip the overlap rule
            if let crate::sim::SpawnOutcome::Spawned { id, .. } =
                place_obstacle(&mut session, 200, &tuning, &area)
            {
                spawned.push(id);
            }
            for _ in 0..spawn_gap_ticks {
                session.avatar.reset(tuning.avatar_start_y);
                tick(&mut session, &tuning, &area);
            }
        }
        assert_eq!(spawned.len(), 3);
        let lefts: Vec<f32> = session.obstacles.iter().map(|o| o.upper.left).collect();
        assert_eq!(lefts, vec![260.0, 340.0, 420.0]);

        let mut passed = Vec::new();
        while passed.len() < 3 {
            // Keep the avatar parked where the obstacles can't reach it
            session.avatar.reset(tuning.avatar_start_y);
            session.avatar.x = area.width * 10.0;
            let outcome = tick(&mut session, &tuning, &area);
            for id in outcome.passed {
                passed.push(id);
                assert_eq!(session.score as usize, passed.len());
            }
        }
        assert_eq!(passed, spawned);
        assert!(session.obstacles.is_empty());
    }

    #[test]
    fn test_removed_obstacle_still_collides() {
        let (mut session, tuning, area) = setup();
        // Avatar spans -40..-6, the obstacle's right edge lands at -1.0
        session.avatar.x = -40.0;
        let id = session.next_entity_id();
        session.obstacles.push_back(Obstacle::new(
            id,
            1.0 - tuning.pipe_width,
            tuning.pipe_width,
            300.0,
            150.0,
            150.0,
        ));

        let outcome = tick(&mut session, &tuning, &area);
        assert_eq!(outcome.passed, vec![id]);
        assert_eq!(session.score, 1);
        assert_eq!(outcome.end, Some(EndCause::Obstacle(id)));
        assert!(session.obstacles.is_empty());
    }

    #[test]
    fn test_exit_order_survives_shrinking_area() {
        let (mut session, tuning, wide) = setup();
        let narrow = PlayAreaMetrics::new(100.0, wide.height);
        let mut spawned = Vec::new();
        for area in [&wide, &narrow] {
            if let crate::sim::SpawnOutcome::Spawned { id, .. } =
                place_obstacle(&mut session, 200, &tuning, area)
            {
                spawned.push(id);
            }
        }
        assert_eq!(spawned.len(), 2);
        session.avatar.x = wide.width * 10.0;

        let mut passed = Vec::new();
        for _ in 0..400 {
            session.avatar.reset(tuning.avatar_start_y);
            let outcome = tick(&mut session, &tuning, &wide);
            if passed.is_empty() && !outcome.passed.is_empty() {
                // The newer obstacle left the screen long ago but waited
                // behind the older one
                assert_eq!(outcome.passed, spawned);
            }
            passed.extend(outcome.passed);
        }
        assert_eq!(passed, spawned);
        assert_eq!(session.score, 2);
        assert!(session.obstacles.is_empty());
    }

    proptest! {
        #[test]
        fn prop_score_counts_exits(count in 1usize..6, ticks in 0usize..800) {
            let (mut session, tuning, area) = setup();
            session.avatar.x = 1.0e6;
            for _ in 0..count {
                place_obstacle(&mut session, 200, &tuning, &area);
            }
            let mut exits = 0;
            for _ in 0..ticks {
                session.avatar.reset(tuning.avatar_start_y);
                exits += tick(&mut session, &tuning, &area).passed.len();
            }
            prop_assert_eq!(session.score as usize, exits);
            prop_assert_eq!(session.obstacles.len() + exits, count);
        }
    }
}
