//! Traffic obstacles (wolves and foxes)
//!
//! An obstacle rides the center row of its lane at the lane's constant speed
//! and retires itself once it is a full margin past the far edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Wolf,
    Fox,
}

impl ObstacleKind {
    /// Capitalized name for lose/game-over messages
    pub fn display_name(&self) -> &'static str {
        match self {
            ObstacleKind::Wolf => "Wolf",
            ObstacleKind::Fox => "Fox",
        }
    }
}

/// Direction of travel along a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Toward +x
    Right,
    /// Toward -x
    Left,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Right => 1.0,
            Direction::Left => -1.0,
        }
    }

    /// X coordinate where obstacles of this direction enter
    pub fn spawn_edge(self, field_width: f32, margin: f32) -> f32 {
        match self {
            Direction::Right => -margin,
            Direction::Left => field_width + margin,
        }
    }

    /// X coordinate past which obstacles of this direction retire
    pub fn exit_edge(self, field_width: f32, margin: f32) -> f32 {
        match self {
            Direction::Right => field_width + margin,
            Direction::Left => -margin,
        }
    }
}

/// A moving obstacle entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Index of the owning lane
    pub lane: usize,
    /// Center position; y stays on the lane row
    pub pos: Vec2,
    /// Pixels per tick
    pub speed: f32,
    pub direction: Direction,
    /// Visual box (width, height)
    pub size: Vec2,
    /// Collision box (width, height), a scaled-down visual box
    pub hitbox_size: Vec2,
    pub active: bool,
}

impl Obstacle {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u32,
        kind: ObstacleKind,
        lane: usize,
        pos: Vec2,
        speed: f32,
        direction: Direction,
        size: Vec2,
        hitbox_scale: f32,
    ) -> Self {
        Self {
            id,
            kind,
            lane,
            pos,
            speed,
            direction,
            size,
            hitbox_size: size * hitbox_scale,
            active: true,
        }
    }

    /// Distance travelled along the direction of travel (larger = further ahead)
    #[inline]
    pub fn progress(&self) -> f32 {
        self.pos.x * self.direction.sign()
    }

    /// Move one tick. Returns false once the obstacle has retired.
    pub fn advance(&mut self, field_width: f32, margin: f32) -> bool {
        if !self.active {
            return false;
        }
        self.pos.x += self.speed * self.direction.sign();

        let exit = self.direction.exit_edge(field_width, margin);
        let past_exit = match self.direction {
            Direction::Right => self.pos.x > exit,
            Direction::Left => self.pos.x < exit,
        };
        if past_exit {
            self.active = false;
        }
        self.active
    }

    /// Collision box centered on the obstacle
    pub fn hitbox(&self) -> Rect {
        Rect::new(self.pos, self.hitbox_size * 0.5)
    }
}
