//! Fixed timestep simulation tick
//!
//! One call = one logical frame:
//! player input -> collisions -> round transitions -> traffic advance/spawn.

use glam::Vec2;

use super::collision::circle_rect_intersect;
use super::obstacle::ObstacleKind;
use super::state::{GameEvent, GamePhase, GameState, HitOutcome};
use crate::consts::TICK_MS;
use crate::tuning::HitPolicy;

/// Input snapshot for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Leave the intro screen
    pub start: bool,
    /// Start over after game over
    pub restart: bool,
}

impl TickInput {
    /// Held directions as a per-axis unit step (screen y grows downward)
    pub fn axis(&self) -> Vec2 {
        let x = (self.right as i8 - self.left as i8) as f32;
        let y = (self.down as i8 - self.up as i8) as f32;
        Vec2::new(x, y)
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    // Nothing runs until the asset loader has reported in
    if !state.assets_ready() {
        return;
    }

    state.goal.update_pulse(&state.tuning);

    // Clock and traffic follow the phase the tick started in
    let running = state.round.phase().is_running();

    match state.round.phase() {
        GamePhase::Intro => {
            if input.start && state.round.start() {
                log::info!("Round started (seed {})", state.seed);
                state.events.push(GameEvent::RoundStarted);
            }
        }
        GamePhase::GameOver => {
            if input.restart {
                state.restart();
            }
        }
        GamePhase::WinPause | GamePhase::LosePause => {
            state.player.moving = false;
            if state.round.count_down_pause() {
                state.player.reset(&state.tuning);
                state.events.push(GameEvent::Resumed);
            }
        }
        GamePhase::Playing => update_player(state, input),
    }

    if running {
        state.round.advance_clock(TICK_MS);
        state.step_traffic();
    }
}

/// Move the player, then resolve goal and obstacle contact
fn update_player(state: &mut GameState, input: &TickInput) {
    let tuning = &state.tuning;
    state
        .player
        .steer(input.axis(), tuning.field_width, tuning.field_height);

    let (pos, radius) = (state.player.pos, state.player.radius);

    // Reaching the goal takes precedence over any hit in the same tick
    if circle_rect_intersect(pos, radius, &state.goal.rect()) {
        state.round.reach_goal(tuning);
        let score = state.round.score();
        log::info!("Goal reached! Score: {}", score);
        state.events.push(GameEvent::GoalReached { score });
        return;
    }

    let hits: Vec<ObstacleKind> = state
        .traffic
        .obstacles()
        .filter(|o| o.active && circle_rect_intersect(pos, radius, &o.hitbox()))
        .map(|o| o.kind)
        .collect();

    let lives_before = state.round.lives();
    let outcome = state.round.take_hits(&hits, tuning);
    if outcome == HitOutcome::Ignored {
        return;
    }

    let lives = state.round.lives();
    state
        .events
        .extend(hit_events(&hits, lives_before, tuning.round.hit_policy));
    match outcome {
        HitOutcome::GameOver => {
            let score = state.round.score();
            log::info!("Game over! Final score: {}", score);
            state.events.push(GameEvent::GameOver { score });
        }
        _ => {
            let name = hits.last().map(|k| k.display_name()).unwrap_or_default();
            log::info!("Caught by a {}! {} lives left", name, lives);
        }
    }
}

/// One `PlayerHit` per life charged, each carrying the lives left after it
fn hit_events(hits: &[ObstacleKind], lives_before: u32, policy: HitPolicy) -> Vec<GameEvent> {
    let charged = match policy {
        HitPolicy::PerObstacle => hits,
        HitPolicy::PerTick => &hits[hits.len().saturating_sub(1)..],
    };
    charged
        .iter()
        .enumerate()
        .map(|(i, &kind)| GameEvent::PlayerHit {
            kind,
            lives: lives_before.saturating_sub(i as u32 + 1),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn start() -> TickInput {
        TickInput {
            start: true,
            ..Default::default()
        }
    }

    /// A ready state already in Playing
    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.mark_assets_ready();
        tick(&mut state, &start());
        assert_eq!(state.round.phase(), GamePhase::Playing);
        state
    }

    /// Park the player in the middle of lane 3 and wait for traffic to arrive
    fn wait_for_hit(state: &mut GameState) -> bool {
        state.player.pos = Vec2::new(400.0, state.traffic.lanes()[3].y);
        for _ in 0..3000 {
            tick(state, &TickInput::default());
            if state.round.phase() != GamePhase::Playing {
                return true;
            }
        }
        false
    }

    #[test]
    fn test_assets_gate_blocks_ticks() {
        let mut state = GameState::new(1);
        for _ in 0..10 {
            tick(&mut state, &start());
        }
        assert_eq!(state.round.phase(), GamePhase::Intro);
        assert_eq!(state.round.time_ms(), 0);
        assert_eq!(state.goal.pulse_scale, 1.0);

        state.mark_assets_ready();
        tick(&mut state, &start());
        assert_eq!(state.round.phase(), GamePhase::Playing);
        assert_eq!(state.events, vec![GameEvent::RoundStarted]);
    }

    #[test]
    fn test_intro_freezes_traffic_and_player() {
        let mut state = GameState::new(2);
        state.mark_assets_ready();
        let input = TickInput {
            up: true,
            ..Default::default()
        };
        for _ in 0..500 {
            tick(&mut state, &input);
        }
        assert_eq!(state.round.time_ms(), 0);
        assert_eq!(state.traffic.active_count(), 0);
        assert_eq!(state.player.pos, state.tuning.player.start);
    }

    #[test]
    fn test_input_moves_player() {
        let mut state = playing(3);
        let start_pos = state.player.pos;
        let input = TickInput {
            up: true,
            left: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.player.pos, start_pos + Vec2::new(-5.0, -5.0));
        assert!(state.player.moving);
        assert_eq!(state.round.time_ms(), TICK_MS);
    }

    #[test]
    fn test_goal_scenario() {
        let mut state = playing(4);
        state.player.pos = state.goal.center;
        tick(&mut state, &TickInput::default());

        assert!(state.round.has_won());
        assert_eq!(state.round.score(), state.tuning.round.goal_bonus);
        assert_eq!(state.round.phase(), GamePhase::WinPause);
        assert_eq!(
            state.round.win_pause_ticks(),
            state.tuning.round.win_pause_ticks
        );
        assert!(state.events.contains(&GameEvent::GoalReached { score: 100 }));

        // Player is frozen during the pause
        let frozen = state.player.pos;
        let input = TickInput {
            down: true,
            ..Default::default()
        };
        for _ in 0..state.tuning.round.win_pause_ticks - 1 {
            tick(&mut state, &input);
            assert_eq!(state.player.pos, frozen);
        }
        tick(&mut state, &input);
        assert_eq!(state.round.phase(), GamePhase::Playing);
        assert_eq!(state.player.pos, state.tuning.player.start);
        assert!(state.events.contains(&GameEvent::Resumed));
        // Score is kept across the pause
        assert_eq!(state.round.score(), 100);
    }

    #[test]
    fn test_last_life_goes_straight_to_game_over() {
        let mut state = playing(5);
        let tuning = state.tuning.clone();
        state.round.set_lives(1, &tuning);
        assert!(wait_for_hit(&mut state));

        assert_eq!(state.round.lives(), 0);
        assert_eq!(state.round.phase(), GamePhase::GameOver);
        assert_eq!(state.round.lose_pause_ticks(), 0);
        assert!(state.round.last_hit().is_some());
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::GameOver { .. })
        ));

        // Terminal: nothing but the goal pulse moves until restart
        let snapshot = state.clone();
        for _ in 0..60 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.round, snapshot.round);
        assert_eq!(state.traffic, snapshot.traffic);
        assert_eq!(state.player, snapshot.player);
    }

    #[test]
    fn test_hit_enters_lose_pause_then_resumes() {
        let mut state = playing(6);
        assert!(wait_for_hit(&mut state));

        assert_eq!(state.round.lives(), 2);
        assert_eq!(state.round.phase(), GamePhase::LosePause);
        assert!(state.round.has_lost());
        assert_eq!(
            state.round.lose_pause_ticks(),
            state.tuning.round.lose_pause_ticks
        );
        assert!(matches!(
            state.events.iter().find(|e| matches!(e, GameEvent::PlayerHit { .. })),
            Some(GameEvent::PlayerHit { kind: ObstacleKind::Fox, lives: 2 })
        ));

        // Traffic keeps moving while the player is frozen
        let t0 = state.round.time_ms();
        for _ in 0..state.tuning.round.lose_pause_ticks {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.round.time_ms() > t0);
        assert_eq!(state.round.phase(), GamePhase::Playing);
        assert_eq!(state.player.pos, state.tuning.player.start);
        assert_eq!(state.round.lives(), 2);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = playing(7);
        let tuning = state.tuning.clone();
        state.round.set_lives(1, &tuning);
        assert!(wait_for_hit(&mut state));
        assert_eq!(state.round.phase(), GamePhase::GameOver);

        // Start does nothing in game over
        tick(&mut state, &start());
        assert_eq!(state.round.phase(), GamePhase::GameOver);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart);
        assert_eq!(state.round.phase(), GamePhase::Intro);
        assert_eq!(state.round.lives(), 3);
        assert_eq!(state.round.score(), 0);
        assert_eq!(state.round.time_ms(), 0);
        assert_eq!(state.traffic.active_count(), 0);
        assert_eq!(state.player.pos, tuning.player.start);
        assert!(state.assets_ready());
    }

    #[test]
    fn test_reset_mid_pause_matches_fresh_round() {
        let mut state = playing(8);
        assert!(wait_for_hit(&mut state));
        state.reset();

        let mut fresh = GameState::new(8);
        fresh.mark_assets_ready();
        assert_eq!(state, fresh);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = playing(99999);
        let mut state2 = playing(99999);
        let inputs = [
            TickInput {
                up: true,
                ..Default::default()
            },
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        for i in 0..900 {
            let input = &inputs[(i / 40) % inputs.len()];
            tick(&mut state1, input);
            tick(&mut state2, input);
        }
        assert_eq!(state1, state2);
    }

    #[test]
    fn test_multi_hit_policy_per_tick() {
        let mut tuning = Tuning::default();
        tuning.round.hit_policy = HitPolicy::PerTick;
        let mut state = GameState::with_tuning(9, tuning);
        state.mark_assets_ready();
        tick(&mut state, &start());
        assert!(wait_for_hit(&mut state));
        assert_eq!(state.round.lives(), 2);
    }

    #[test]
    fn test_multi_hit_events_count_down_lives() {
        let hits = [ObstacleKind::Wolf, ObstacleKind::Fox];
        assert_eq!(
            hit_events(&hits, 3, HitPolicy::PerObstacle),
            vec![
                GameEvent::PlayerHit { kind: ObstacleKind::Wolf, lives: 2 },
                GameEvent::PlayerHit { kind: ObstacleKind::Fox, lives: 1 },
            ]
        );
        assert_eq!(
            hit_events(&hits, 3, HitPolicy::PerTick),
            vec![GameEvent::PlayerHit { kind: ObstacleKind::Fox, lives: 2 }]
        );
        // Lives never go below zero
        assert_eq!(
            hit_events(&hits, 1, HitPolicy::PerObstacle)[1],
            GameEvent::PlayerHit { kind: ObstacleKind::Fox, lives: 0 }
        );
    }

    #[test]
    fn test_clock_follows_running_phases() {
        let mut state = playing(13);
        assert_eq!(state.round.time_ms(), 0);

        state.player.pos = state.goal.center;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.round.phase(), GamePhase::WinPause);
        assert!(state.round.phase().is_running());

        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.round.time_ms(), 11 * TICK_MS);
        assert_eq!(state.round.time_ticks(), 11);
    }

    #[test]
    fn test_axis() {
        let both = TickInput {
            up: true,
            down: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(both.axis(), Vec2::new(1.0, 0.0));
        assert_eq!(TickInput::default().axis(), Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_field(
            seed in any::<u64>(),
            moves in proptest::collection::vec((any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()), 1..400),
        ) {
            let mut state = playing(seed);
            for (up, down, left, right) in moves {
                let input = TickInput { up, down, left, right, ..Default::default() };
                tick(&mut state, &input);
                if state.round.phase() == GamePhase::Playing {
                    let p = state.player.pos;
                    let r = state.player.radius;
                    prop_assert!(p.x >= r && p.x <= state.tuning.field_width - r);
                    prop_assert!(p.y >= r && p.y <= state.tuning.field_height - r);
                }
                prop_assert!(state.traffic.active_count() <= state.tuning.spawn.global_max);
            }
        }
    }
}
