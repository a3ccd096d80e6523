//! Field-wide traffic simulation
//!
//! Owns every lane plus the shared active-obstacle counter that enforces the
//! global cap. Lanes are independent apart from that counter.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::lane::Lane;
use super::obstacle::Obstacle;
use super::state::GameEvent;
use crate::tuning::Tuning;

/// All lanes of traffic for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Traffic {
    lanes: Vec<Lane>,
    /// Obstacles alive across all lanes
    active: usize,
    /// Next obstacle ID
    next_id: u32,
}

impl Traffic {
    /// Build every lane from the tuning table (no obstacles yet)
    pub fn new<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> Self {
        let lanes = tuning
            .lanes
            .iter()
            .enumerate()
            .map(|(index, config)| Lane::new(index, config, tuning, rng))
            .collect();
        Self {
            lanes,
            active: 0,
            next_id: 1,
        }
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// Obstacles alive across all lanes
    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Every active obstacle, lane by lane, leading first within a lane
    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.lanes.iter().flat_map(|lane| lane.obstacles().iter())
    }

    /// Advance all obstacles, retire the ones that left the field, then give
    /// each lane one spawn decision against the shared counter.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        now_ms: u64,
        tuning: &Tuning,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) {
        let mut retired = 0;
        for lane in &mut self.lanes {
            retired += lane.advance(tuning);
        }
        self.active -= retired;
        if retired > 0 {
            log::debug!("Retired {} obstacles ({} active)", retired, self.active);
        }

        let next_id = &mut self.next_id;
        for lane in &mut self.lanes {
            let spawned = lane.try_spawn(
                now_ms,
                &mut self.active,
                || {
                    let id = *next_id;
                    *next_id += 1;
                    id
                },
                tuning,
                rng,
            );
            if spawned > 0 {
                events.push(GameEvent::Spawned {
                    lane: lane.index,
                    count: spawned,
                });
            }
        }

        debug_assert_eq!(
            self.active,
            self.lanes.iter().map(Lane::active_count).sum::<usize>()
        );
    }

    /// Drop every obstacle
    pub fn clear(&mut self) {
        for lane in &mut self.lanes {
            lane.clear();
        }
        self.active = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TICK_MS;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn run(traffic: &mut Traffic, tuning: &Tuning, rng: &mut Pcg32, ticks: u64) {
        let mut events = Vec::new();
        for t in 1..=ticks {
            traffic.step(t * TICK_MS, tuning, rng, &mut events);
        }
    }

    #[test]
    fn test_no_instant_flood() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut traffic = Traffic::new(&tuning, &mut rng);
        // Shortest possible first delay is 1700 ms * 1.0
        run(&mut traffic, &tuning, &mut rng, 100);
        assert_eq!(traffic.active_count(), 0);
    }

    #[test]
    fn test_traffic_fills_and_flows() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut traffic = Traffic::new(&tuning, &mut rng);
        run(&mut traffic, &tuning, &mut rng, 600);
        assert!(traffic.active_count() > 0);
        assert_eq!(traffic.obstacles().count(), traffic.active_count());
        for obstacle in traffic.obstacles() {
            let lane = &traffic.lanes()[obstacle.lane];
            assert_eq!(obstacle.pos.y, lane.y);
            assert_eq!(obstacle.kind, lane.kind);
            assert_eq!(obstacle.direction, lane.direction);
        }
    }

    #[test]
    fn test_spawn_events_match_count() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut traffic = Traffic::new(&tuning, &mut rng);
        let mut events = Vec::new();
        for t in 1..=300 {
            traffic.step(t * TICK_MS, &tuning, &mut rng, &mut events);
        }
        let spawned: usize = events
            .iter()
            .map(|e| match e {
                GameEvent::Spawned { count, .. } => *count,
                _ => 0,
            })
            .sum();
        // Nothing can retire within 300 ticks of spawning off-screen
        assert_eq!(spawned, traffic.active_count());
    }

    #[test]
    fn test_clear_resets_counter() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut traffic = Traffic::new(&tuning, &mut rng);
        run(&mut traffic, &tuning, &mut rng, 600);
        traffic.clear();
        assert_eq!(traffic.active_count(), 0);
        assert_eq!(traffic.obstacles().count(), 0);
    }

    proptest! {
        #[test]
        fn prop_caps_and_gaps_hold(
            seed in any::<u64>(),
            global_max in 1usize..12,
            max_per_lane in 1usize..5,
            convoy_chance in 0.0f32..=1.0,
            convoy_size in 1u32..5,
            convoy_spacing in 75.0f32..=220.0,
            convoy_cooldown_ms in 0.0f32..600.0,
            fast_spawns in any::<bool>(),
        ) {
            let mut tuning = Tuning::default();
            tuning.spawn.global_max = global_max;
            tuning.spawn.max_per_lane = max_per_lane;
            tuning.spawn.convoy_chance = convoy_chance;
            tuning.spawn.convoy_size = convoy_size;
            tuning.spawn.convoy_spacing = convoy_spacing;
            tuning.spawn.convoy_cooldown_ms = convoy_cooldown_ms;
            tuning.spawn.base_interval_ms = if fast_spawns {
                crate::tuning::Span::new(16.0, 16.0)
            } else {
                crate::tuning::Span::new(100.0, 400.0)
            };
            prop_assert!(tuning.validate().is_ok());

            let mut rng = Pcg32::seed_from_u64(seed);
            let mut traffic = Traffic::new(&tuning, &mut rng);
            let mut events = Vec::new();
            for t in 1..=1500u64 {
                traffic.step(t * TICK_MS, &tuning, &mut rng, &mut events);

                prop_assert!(traffic.active_count() <= tuning.spawn.global_max);
                for lane in traffic.lanes() {
                    prop_assert!(lane.active_count() <= lane.max_active);
                    if let Some(gap) = lane.min_consecutive_gap() {
                        prop_assert!(gap >= tuning.spawn.convoy_spacing - 0.5);
                    }
                }
            }
        }
    }
}
