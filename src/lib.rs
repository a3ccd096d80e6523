//! Carrot Dash - A lane-crossing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lane traffic, collisions, round state)
//! - `renderer`: Read-only frame view and sprite instance data for a renderer
//! - `platform`: Input snapshot mapping and fixed-step frame clock
//! - `assets`: Sprite manifest and the one-time "assets ready" gate
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use assets::{AssetError, AssetTracker};
pub use tuning::{HitPolicy, Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical milliseconds per simulation tick (~60 Hz)
    pub const TICK_MS: u64 = 16;
    /// Tick length in seconds, for frame clocks
    pub const SIM_DT: f32 = TICK_MS as f32 / 1000.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Field dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Lane center rows, top to bottom
    pub const LANE_ROWS: [f32; 6] = [120.0, 180.0, 240.0, 300.0, 360.0, 420.0];
    /// Per-lane traffic multipliers (>1 = quieter lane, spawns less often)
    pub const LANE_TRAFFIC_MULTIPLIER: [f32; 6] = [1.6, 1.0, 1.4, 1.0, 1.6, 1.2];

    /// Sprite sizes (width; height is SPRITE_ASPECT of width)
    pub const WOLF_SIZE: f32 = 75.0;
    pub const FOX_SIZE: f32 = 70.0;
    pub const RABBIT_SIZE: f32 = 64.0;
    pub const SPRITE_ASPECT: f32 = 0.8;
    /// Hitbox is this fraction of the sprite box (generous to the player)
    pub const HITBOX_SCALE: f32 = 0.8;

    /// Distance past the field edge where obstacles spawn and retire
    pub const OFFSCREEN_MARGIN: f32 = 100.0;

    /// Spawn rules
    pub const CONVOY_SIZE: u32 = 3;
    pub const CONVOY_SPACING: f32 = 100.0;
    pub const CONVOY_CHANCE: f32 = 0.25;
    pub const CONVOY_COOLDOWN_MS: f32 = 500.0;
    pub const MIN_SPAWN_GAP: f32 = 220.0;
    pub const BASE_SPAWN_INTERVAL_MS: (f32, f32) = (1700.0, 2600.0);
    pub const MAX_ACTIVE_PER_LANE: usize = 2;
    pub const GLOBAL_MAX_OBSTACLES: usize = 10;

    /// Player defaults
    pub const PLAYER_START: (f32, f32) = (FIELD_WIDTH / 2.0, FIELD_HEIGHT - 80.0);
    pub const PLAYER_RADIUS: f32 = RABBIT_SIZE * 0.4;
    pub const PLAYER_SPEED: f32 = 5.0;

    /// Goal (carrot) box, center and size
    pub const GOAL_CENTER: (f32, f32) = (FIELD_WIDTH / 2.0, 80.0);
    pub const GOAL_SIZE: (f32, f32) = (30.0, 40.0);

    /// Round rules
    pub const STARTING_LIVES: u32 = 3;
    pub const GOAL_BONUS: u64 = 100;
    /// Win pause: 2 seconds at 60 Hz
    pub const WIN_PAUSE_TICKS: u32 = 120;
    /// Lose pause: 1.5 seconds at 60 Hz
    pub const LOSE_PAUSE_TICKS: u32 = 90;
}

/// Clamp a point so a circle of `radius` stays inside a `width` x `height` field
#[inline]
pub fn clamp_circle_to_field(pos: Vec2, radius: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        pos.x.clamp(radius, (width - radius).max(radius)),
        pos.y.clamp(radius, (height - radius).max(radius)),
    )
}
