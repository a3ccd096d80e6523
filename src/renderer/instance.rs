//! Per-sprite instance data for batched 2D rendering

use bytemuck::{Pod, Zeroable};

use super::FrameView;
use crate::assets::{AssetTracker, SpriteKey};
use crate::consts::{RABBIT_SIZE, SPRITE_ASPECT};
use crate::sim::ObstacleKind;

/// One textured (or fallback-colored) quad
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub center: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
    /// 1.0 when the sprite texture is loaded, 0.0 to draw the flat fallback
    pub textured: f32,
    pub _pad: [f32; 3],
}

impl SpriteInstance {
    pub fn new(center: [f32; 2], size: [f32; 2], color: [f32; 4], textured: bool) -> Self {
        Self {
            center,
            size,
            color,
            textured: if textured { 1.0 } else { 0.0 },
            _pad: [0.0; 3],
        }
    }

    /// Goal, obstacles, then player (back to front)
    pub fn batch(frame: &FrameView, assets: &AssetTracker) -> Vec<SpriteInstance> {
        let mut out = Vec::with_capacity(frame.obstacles.len() + 2);

        let goal_size = frame.goal_size * frame.goal_pulse;
        out.push(Self::new(
            frame.goal_center.to_array(),
            goal_size.to_array(),
            colors::CARROT,
            assets.is_loaded(SpriteKey::Carrot),
        ));

        for obstacle in &frame.obstacles {
            out.push(Self::new(
                obstacle.pos.to_array(),
                obstacle.size.to_array(),
                colors::for_obstacle(obstacle.kind),
                assets.is_loaded(SpriteKey::for_obstacle(obstacle.kind)),
            ));
        }

        out.push(Self::new(
            frame.player_pos.to_array(),
            [RABBIT_SIZE, RABBIT_SIZE * SPRITE_ASPECT],
            colors::RABBIT,
            assets.is_loaded(SpriteKey::Rabbit),
        ));

        out
    }
}

/// Colors for game elements
pub mod colors {
    use super::ObstacleKind;

    pub const WOLF: [f32; 4] = [0.545, 0.0, 0.0, 1.0]; // #8B0000
    pub const FOX: [f32; 4] = [0.627, 0.322, 0.176, 1.0]; // #A0522D
    pub const RABBIT: [f32; 4] = [0.545, 0.271, 0.075, 1.0]; // #8B4513
    pub const CARROT: [f32; 4] = [1.0, 0.549, 0.0, 1.0]; // #FF8C00

    pub fn for_obstacle(kind: ObstacleKind) -> [f32; 4] {
        match kind {
            ObstacleKind::Wolf => WOLF,
            ObstacleKind::Fox => FOX,
        }
    }
}
