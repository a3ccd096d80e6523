//! Per-lane traffic controller
//!
//! A lane owns its obstacles and decides, each tick, whether to emit one
//! spawn (a single obstacle or a convoy). Spawning requires:
//! 1. lane below its active cap
//! 2. field below the global cap
//! 3. the lane's spawn delay elapsed since its last spawn
//! 4. the trailing obstacle at least `min_gap` from the spawn edge
//!
//! Obstacles are kept ordered along the direction of travel, leading first,
//! so the trailing obstacle is always the last element.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::obstacle::{Direction, Obstacle, ObstacleKind};
use crate::tuning::{LaneTuning, Tuning};

/// One lane of traffic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub index: usize,
    /// Center row obstacles ride on
    pub y: f32,
    pub kind: ObstacleKind,
    pub direction: Direction,
    /// Constant traversal speed for the round (px/tick)
    pub speed: f32,
    pub traffic_multiplier: f32,
    pub max_active: usize,
    /// Logical time of the last spawn (ms)
    pub last_spawn_ms: u64,
    /// Delay before the next spawn may happen (ms)
    pub next_spawn_delay_ms: f32,
    /// Active obstacles, leading first
    obstacles: Vec<Obstacle>,
}

impl Lane {
    /// Build a lane, drawing its round speed and first spawn delay
    pub fn new<R: Rng + ?Sized>(
        index: usize,
        config: &LaneTuning,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Self {
        let speed = tuning.kind(config.kind).speed.sample(rng);
        let next_spawn_delay_ms =
            tuning.spawn.base_interval_ms.sample(rng) * config.traffic_multiplier;
        Self {
            index,
            y: config.y,
            kind: config.kind,
            direction: config.direction,
            speed,
            traffic_multiplier: config.traffic_multiplier,
            max_active: tuning.spawn.max_per_lane,
            last_spawn_ms: 0,
            next_spawn_delay_ms,
            obstacles: Vec::with_capacity(tuning.spawn.max_per_lane),
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn active_count(&self) -> usize {
        self.obstacles.len()
    }

    /// The obstacle furthest along the lane
    pub fn leading(&self) -> Option<&Obstacle> {
        self.obstacles.first()
    }

    /// The obstacle closest to the spawn edge
    pub fn trailing(&self) -> Option<&Obstacle> {
        self.obstacles.last()
    }

    pub fn spawn_edge(&self, tuning: &Tuning) -> f32 {
        self.direction
            .spawn_edge(tuning.field_width, tuning.spawn.offscreen_margin)
    }

    /// Signed distance from the spawn edge to the trailing obstacle along
    /// the direction of travel. Negative while it is still queued behind
    /// the edge.
    pub fn trailing_gap(&self, tuning: &Tuning) -> Option<f32> {
        let edge = self.spawn_edge(tuning);
        self.trailing()
            .map(|o| (o.pos.x - edge) * self.direction.sign())
    }

    /// Whether the lane may spawn this tick
    pub fn can_spawn(&self, now_ms: u64, global_active: usize, tuning: &Tuning) -> bool {
        if self.obstacles.len() >= self.max_active {
            return false;
        }
        if global_active >= tuning.spawn.global_max {
            return false;
        }
        let since_last = now_ms.saturating_sub(self.last_spawn_ms) as f32;
        if since_last < self.next_spawn_delay_ms {
            return false;
        }
        match self.trailing_gap(tuning) {
            Some(gap) => gap >= tuning.spawn.min_gap,
            None => true,
        }
    }

    /// Attempt one spawn decision. Returns how many obstacles entered.
    ///
    /// `global_active` is the shared field-wide counter; it is bumped for
    /// every obstacle spawned so later lanes in the same tick see it.
    pub fn try_spawn<R: Rng + ?Sized>(
        &mut self,
        now_ms: u64,
        global_active: &mut usize,
        mut next_id: impl FnMut() -> u32,
        tuning: &Tuning,
        rng: &mut R,
    ) -> usize {
        if !self.can_spawn(now_ms, *global_active, tuning) {
            return 0;
        }

        let spawn = &tuning.spawn;
        let is_convoy = rng.random::<f32>() < spawn.convoy_chance;
        let wanted = if is_convoy { spawn.convoy_size as usize } else { 1 };
        let count = wanted
            .min(self.max_active - self.obstacles.len())
            .min(spawn.global_max - *global_active);

        let edge = self.spawn_edge(tuning);
        let size = tuning.sprite_size(self.kind);
        for i in 0..count {
            // Convoy members queue up behind the spawn edge
            let x = edge - self.direction.sign() * i as f32 * spawn.convoy_spacing;
            let obstacle = Obstacle::new(
                next_id(),
                self.kind,
                self.index,
                Vec2::new(x, self.y),
                self.speed,
                self.direction,
                size,
                tuning.hitbox_scale,
            );
            self.insert(obstacle);
        }
        *global_active += count;

        self.last_spawn_ms = now_ms;
        let cooldown = if count > 1 { spawn.convoy_cooldown_ms } else { 0.0 };
        self.next_spawn_delay_ms =
            spawn.base_interval_ms.sample(rng) * self.traffic_multiplier + cooldown;

        log::debug!(
            "Lane {} spawned {} {:?} (next in {:.0} ms)",
            self.index,
            count,
            self.kind,
            self.next_spawn_delay_ms
        );
        count
    }

    /// Advance every obstacle one tick and drop the retired ones.
    /// Returns how many retired.
    pub fn advance(&mut self, tuning: &Tuning) -> usize {
        let before = self.obstacles.len();
        let (width, margin) = (tuning.field_width, tuning.spawn.offscreen_margin);
        self.obstacles.retain_mut(|o| o.advance(width, margin));
        before - self.obstacles.len()
    }

    /// Remove every obstacle (round restart)
    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    /// Insert keeping leading-first order
    fn insert(&mut self, obstacle: Obstacle) {
        let progress = obstacle.progress();
        let idx = self.obstacles.partition_point(|o| o.progress() >= progress);
        self.obstacles.insert(idx, obstacle);
    }

    /// Smallest distance between consecutive obstacles, if there are two or more
    pub fn min_consecutive_gap(&self) -> Option<f32> {
        self.obstacles
            .windows(2)
            .map(|pair| pair[0].progress() - pair[1].progress())
            .reduce(f32::min)
    }
}
