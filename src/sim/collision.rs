//! Collision detection for axis-aligned boxes
//!
//! Screen coordinates: x grows right, y grows down from the ceiling.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::PlayAreaMetrics;

/// Position (top-left corner) plus size of an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityBounds {
    pub pos: Vec2,
    pub size: Vec2,
}

impl EntityBounds {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Overlap on both axes. Boxes that only touch along an edge still count.
    pub fn overlaps(&self, other: &EntityBounds) -> bool {
        !(self.top() > other.bottom()
            || self.bottom() < other.top()
            || self.left() > other.right()
            || self.right() < other.left())
    }
}

/// Why the avatar left the playable band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryHit {
    Ceiling,
    Floor,
}

/// Check the avatar against the ceiling and floor
pub fn boundary_hit(avatar: &EntityBounds, area: &PlayAreaMetrics) -> Option<BoundaryHit> {
    if avatar.top() <= 0.0 {
        Some(BoundaryHit::Ceiling)
    } else if avatar.bottom() >= area.height {
        Some(BoundaryHit::Floor)
    } else {
        None
    }
}
