//! Game session and core simulation types
//!
//! Everything one play session mutates lives in [`GameSession`].

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::EntityBounds;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start
    #[default]
    Idle,
    /// Ticking, jump input active
    Running,
    /// Collision or boundary breach; reset follows immediately
    Ended,
}

/// Size of the play area as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayAreaMetrics {
    pub width: f32,
    pub height: f32,
}

impl PlayAreaMetrics {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The player avatar. Only its vertical position moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    /// Top edge (px from the ceiling)
    pub y: f32,
    /// Vertical velocity (px/tick, positive = downward)
    pub velocity: f32,
    /// Fixed left edge
    pub x: f32,
    /// Fixed bounding size
    pub size: Vec2,
}

impl Avatar {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            y: tuning.avatar_start_y,
            velocity: 0.0,
            x: tuning.avatar_x,
            size: Vec2::new(tuning.avatar_width, tuning.avatar_height),
        }
    }

    /// Integrate one simulation step (gravity is applied before the move)
    pub fn tick(&mut self, gravity: f32) {
        self.velocity += gravity;
        self.y += self.velocity;
    }

    /// Kick upward. No cooldown: repeated jumps simply reset the velocity.
    pub fn jump(&mut self, impulse: f32) {
        self.velocity = impulse;
    }

    pub fn bounds(&self) -> EntityBounds {
        EntityBounds::new(Vec2::new(self.x, self.y), self.size)
    }

    pub fn reset(&mut self, start_y: f32) {
        self.y = start_y;
        self.velocity = 0.0;
    }
}

/// One half of an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeSegment {
    /// Left edge, decreases every tick
    pub left: f32,
    /// Top edge
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl PipeSegment {
    pub fn bounds(&self) -> EntityBounds {
        EntityBounds::new(
            Vec2::new(self.left, self.top),
            Vec2::new(self.width, self.height),
        )
    }
}

/// An upper/lower segment pair with a passable gap between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub upper: PipeSegment,
    pub lower: PipeSegment,
}

impl Obstacle {
    /// Build a pair whose upper segment is `upper_height` tall, placed at `left`.
    ///
    /// The lower segment fills the rest of the column below the gap.
    pub fn new(
        id: u32,
        left: f32,
        width: f32,
        upper_height: f32,
        lower_height: f32,
        gap_height: f32,
    ) -> Self {
        Self {
            id,
            upper: PipeSegment {
                left,
                top: 0.0,
                width,
                height: upper_height,
            },
            lower: PipeSegment {
                left,
                top: upper_height + gap_height,
                width,
                height: lower_height,
            },
        }
    }

    /// Move both segments left
    pub fn advance(&mut self, speed: f32) {
        self.upper.left -= speed;
        self.lower.left -= speed;
    }

    /// Right edge has crossed the left side of the play area
    pub fn is_off_screen(&self) -> bool {
        self.upper.left + self.upper.width < 0.0
    }

    pub fn segment_bounds(&self) -> [EntityBounds; 2] {
        [self.upper.bounds(), self.lower.bounds()]
    }

    /// Vertical span of the gap (top, bottom)
    pub fn gap_span(&self) -> (f32, f32) {
        (self.upper.height, self.lower.top)
    }
}

/// All state owned by one play session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub avatar: Avatar,
    /// Spawn order == left-to-right order; front exits first
    pub obstacles: VecDeque<Obstacle>,
    pub score: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Next entity ID
    next_id: u32,
}

impl GameSession {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            avatar: Avatar::new(tuning),
            obstacles: VecDeque::new(),
            score: 0,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Clear avatar motion, score and every obstacle
    pub fn reset(&mut self, tuning: &Tuning) {
        self.avatar.reset(tuning.avatar_start_y);
        self.obstacles.clear();
        self.score = 0;
        self.time_ticks = 0;
    }
}
