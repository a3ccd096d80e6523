//! Data-driven game balance
//!
//! Every number the simulation consults lives here so a round can be
//! re-balanced from a JSON file without touching code. `Tuning::default()`
//! reproduces the shipped balance.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{Direction, ObstacleKind};

/// How many lives a tick with several simultaneous obstacle hits costs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitPolicy {
    /// One life per colliding obstacle
    #[default]
    PerObstacle,
    /// At most one life per tick
    PerTick,
}

/// Closed interval for uniform random draws
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform draw in [min, max]; degenerate spans return `min`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.min + rng.random::<f32>() * (self.max - self.min)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    fn is_ordered(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// One lane of traffic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneTuning {
    /// Lane center row
    pub y: f32,
    pub kind: ObstacleKind,
    pub direction: Direction,
    /// Spawn delay multiplier (>1 = quieter lane)
    pub traffic_multiplier: f32,
}

/// Per obstacle kind: sprite width and lane speed range (px/tick)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KindTuning {
    pub size: f32,
    pub speed: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub base_interval_ms: Span,
    pub convoy_chance: f32,
    pub convoy_size: u32,
    pub convoy_spacing: f32,
    pub convoy_cooldown_ms: f32,
    /// Minimum distance from the spawn edge to the trailing obstacle
    pub min_gap: f32,
    pub max_per_lane: usize,
    pub global_max: usize,
    pub offscreen_margin: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            base_interval_ms: Span::new(BASE_SPAWN_INTERVAL_MS.0, BASE_SPAWN_INTERVAL_MS.1),
            convoy_chance: CONVOY_CHANCE,
            convoy_size: CONVOY_SIZE,
            convoy_spacing: CONVOY_SPACING,
            convoy_cooldown_ms: CONVOY_COOLDOWN_MS,
            min_gap: MIN_SPAWN_GAP,
            max_per_lane: MAX_ACTIVE_PER_LANE,
            global_max: GLOBAL_MAX_OBSTACLES,
            offscreen_margin: OFFSCREEN_MARGIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub start: Vec2,
    pub radius: f32,
    /// Pixels per tick, per axis
    pub speed: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            start: Vec2::new(PLAYER_START.0, PLAYER_START.1),
            radius: PLAYER_RADIUS,
            speed: PLAYER_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalTuning {
    pub center: Vec2,
    pub size: Vec2,
    /// Cosmetic pulse scale range and per-tick step
    pub pulse: Span,
    pub pulse_step: f32,
}

impl Default for GoalTuning {
    fn default() -> Self {
        Self {
            center: Vec2::new(GOAL_CENTER.0, GOAL_CENTER.1),
            size: Vec2::new(GOAL_SIZE.0, GOAL_SIZE.1),
            pulse: Span::new(0.9, 1.1),
            pulse_step: 0.005,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundTuning {
    pub lives: u32,
    pub goal_bonus: u64,
    pub win_pause_ticks: u32,
    pub lose_pause_ticks: u32,
    pub hit_policy: HitPolicy,
}

impl Default for RoundTuning {
    fn default() -> Self {
        Self {
            lives: STARTING_LIVES,
            goal_bonus: GOAL_BONUS,
            win_pause_ticks: WIN_PAUSE_TICKS,
            lose_pause_ticks: LOSE_PAUSE_TICKS,
            hit_policy: HitPolicy::PerObstacle,
        }
    }
}

/// Complete balance sheet for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub field_width: f32,
    pub field_height: f32,
    pub lanes: Vec<LaneTuning>,
    pub wolf: KindTuning,
    pub fox: KindTuning,
    /// Sprite height as a fraction of its width
    pub sprite_aspect: f32,
    pub hitbox_scale: f32,
    pub spawn: SpawnTuning,
    pub player: PlayerTuning,
    pub goal: GoalTuning,
    pub round: RoundTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        // Alternate wolves heading right and foxes heading left, top lane first
        let lanes = LANE_ROWS
            .iter()
            .zip(LANE_TRAFFIC_MULTIPLIER)
            .enumerate()
            .map(|(i, (&y, traffic_multiplier))| {
                let (kind, direction) = if i % 2 == 0 {
                    (ObstacleKind::Wolf, Direction::Right)
                } else {
                    (ObstacleKind::Fox, Direction::Left)
                };
                LaneTuning {
                    y,
                    kind,
                    direction,
                    traffic_multiplier,
                }
            })
            .collect();

        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            lanes,
            wolf: KindTuning {
                size: WOLF_SIZE,
                speed: Span::new(2.0, 3.5),
            },
            fox: KindTuning {
                size: FOX_SIZE,
                speed: Span::new(2.5, 4.0),
            },
            sprite_aspect: SPRITE_ASPECT,
            hitbox_scale: HITBOX_SCALE,
            spawn: SpawnTuning::default(),
            player: PlayerTuning::default(),
            goal: GoalTuning::default(),
            round: RoundTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON balance sheet (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn kind(&self, kind: ObstacleKind) -> &KindTuning {
        match kind {
            ObstacleKind::Wolf => &self.wolf,
            ObstacleKind::Fox => &self.fox,
        }
    }

    /// Sprite box (width, height) for an obstacle kind
    pub fn sprite_size(&self, kind: ObstacleKind) -> Vec2 {
        let size = self.kind(kind).size;
        Vec2::new(size, size * self.sprite_aspect)
    }

    /// Reject balance sheets that would break simulation invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("field_width", self.field_width)?;
        positive("field_height", self.field_height)?;
        positive("wolf.size", self.wolf.size)?;
        positive("fox.size", self.fox.size)?;
        positive("sprite_aspect", self.sprite_aspect)?;
        positive("hitbox_scale", self.hitbox_scale)?;
        positive("player.radius", self.player.radius)?;
        positive("player.speed", self.player.speed)?;
        positive("spawn.convoy_spacing", self.spawn.convoy_spacing)?;
        positive("spawn.min_gap", self.spawn.min_gap)?;
        positive("goal.pulse_step", self.goal.pulse_step)?;

        if self.lanes.is_empty() {
            return Err(TuningError::NoLanes);
        }
        for (index, lane) in self.lanes.iter().enumerate() {
            if !(0.0..=self.field_height).contains(&lane.y) {
                return Err(TuningError::LaneOutsideField { index, y: lane.y });
            }
            positive("lanes.traffic_multiplier", lane.traffic_multiplier)?;
        }

        ordered("wolf.speed", &self.wolf.speed)?;
        ordered("fox.speed", &self.fox.speed)?;
        ordered("spawn.base_interval_ms", &self.spawn.base_interval_ms)?;
        ordered("goal.pulse", &self.goal.pulse)?;
        if self.wolf.speed.min <= 0.0 || self.fox.speed.min <= 0.0 {
            return Err(TuningError::NonPositive("speed.min"));
        }

        if !(0.0..=1.0).contains(&self.spawn.convoy_chance) {
            return Err(TuningError::Probability(self.spawn.convoy_chance));
        }
        if self.spawn.convoy_size == 0 {
            return Err(TuningError::ZeroCount("spawn.convoy_size"));
        }
        if self.spawn.max_per_lane == 0 {
            return Err(TuningError::ZeroCount("spawn.max_per_lane"));
        }
        if self.spawn.global_max == 0 {
            return Err(TuningError::ZeroCount("spawn.global_max"));
        }
        if self.round.lives == 0 {
            return Err(TuningError::ZeroCount("round.lives"));
        }

        // Convoy members must not overlap and must respect the spawn gap
        let widest = self.wolf.size.max(self.fox.size);
        if self.spawn.convoy_spacing < widest || self.spawn.convoy_spacing > self.spawn.min_gap {
            return Err(TuningError::ConvoySpacing {
                spacing: self.spawn.convoy_spacing,
                widest,
                min_gap: self.spawn.min_gap,
            });
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::NonPositive(field))
    }
}

fn ordered(field: &'static str, span: &Span) -> Result<(), TuningError> {
    if span.is_ordered() {
        Ok(())
    } else {
        Err(TuningError::InvalidRange {
            field,
            min: span.min,
            max: span.max,
        })
    }
}

/// Balance sheet errors
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("Failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Tuning must define at least one lane")]
    NoLanes,

    #[error("Lane {index} row {y} lies outside the field")]
    LaneOutsideField { index: usize, y: f32 },

    #[error("{field} range is invalid: [{min}, {max}]")]
    InvalidRange { field: &'static str, min: f32, max: f32 },

    #[error("{0} must be positive")]
    NonPositive(&'static str),

    #[error("{0} must be at least 1")]
    ZeroCount(&'static str),

    #[error("Convoy chance {0} is not a probability")]
    Probability(f32),

    #[error("Convoy spacing {spacing} must be between the widest sprite ({widest}) and the minimum gap ({min_gap})")]
    ConvoySpacing { spacing: f32, widest: f32, min_gap: f32 },
}
