//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{BoundaryHit, EntityBounds, boundary_hit};
pub use spawn::{ObstacleGenerator, SpawnOutcome, place_obstacle};
pub use state::{Avatar, GamePhase, GameSession, Obstacle, PipeSegment, PlayAreaMetrics};
pub use tick::{EndCause, TickOutcome, tick};
