//! Game state and core simulation types
//!
//! `GameState` owns everything one round needs: the round state machine,
//! the player, the goal, all lane traffic, and the seeded RNG. It is built
//! fresh per round and stepped by `tick`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::obstacle::ObstacleKind;
use super::traffic::Traffic;
use crate::clamp_circle_to_field;
use crate::tuning::{HitPolicy, Tuning, TuningError};

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start signal
    Intro,
    /// Player in control
    Playing,
    /// Goal reached; player frozen while traffic keeps moving
    WinPause,
    /// Player hit; player frozen while traffic keeps moving
    LosePause,
    /// Out of lives, waiting for restart
    GameOver,
}

impl GamePhase {
    /// Whether traffic and timers advance in this phase
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            GamePhase::Playing | GamePhase::WinPause | GamePhase::LosePause
        )
    }
}

/// Things that happened during a tick, for logging/audio/UI layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted,
    GoalReached { score: u64 },
    PlayerHit { kind: ObstacleKind, lives: u32 },
    GameOver { score: u64 },
    /// A win/lose pause ended and control returned to the player
    Resumed,
    Spawned { lane: usize, count: usize },
    Restarted { seed: u64 },
}

/// Result of applying a tick's obstacle hits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Ignored,
    LosePause,
    GameOver,
}

/// Lives, score, phase and pause timers
///
/// Fields are private: only the transitions below may change them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    phase: GamePhase,
    lives: u32,
    score: u64,
    /// Logical time while running (ms)
    time_ms: u64,
    /// Simulation tick counter while running
    time_ticks: u64,
    win_pause_ticks: u32,
    lose_pause_ticks: u32,
    last_hit: Option<ObstacleKind>,
}

impl RoundState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: GamePhase::Intro,
            lives: tuning.round.lives,
            score: 0,
            time_ms: 0,
            time_ticks: 0,
            win_pause_ticks: 0,
            lose_pause_ticks: 0,
            last_hit: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn time_ms(&self) -> u64 {
        self.time_ms
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn win_pause_ticks(&self) -> u32 {
        self.win_pause_ticks
    }

    pub fn lose_pause_ticks(&self) -> u32 {
        self.lose_pause_ticks
    }

    /// Kind of the obstacle that last hit the player
    pub fn last_hit(&self) -> Option<ObstacleKind> {
        self.last_hit
    }

    pub fn has_won(&self) -> bool {
        self.phase == GamePhase::WinPause
    }

    pub fn has_lost(&self) -> bool {
        self.phase == GamePhase::LosePause
    }

    /// Intro -> Playing. Returns false in any other phase.
    pub(crate) fn start(&mut self) -> bool {
        if self.phase != GamePhase::Intro {
            return false;
        }
        self.phase = GamePhase::Playing;
        true
    }

    pub(crate) fn advance_clock(&mut self, tick_ms: u64) {
        self.time_ms += tick_ms;
        self.time_ticks += 1;
    }

    /// Award the goal bonus and freeze the player for the win pause
    pub(crate) fn reach_goal(&mut self, tuning: &Tuning) {
        self.score = self.score.saturating_add(tuning.round.goal_bonus);
        self.win_pause_ticks = tuning.round.win_pause_ticks;
        self.phase = GamePhase::WinPause;
    }

    /// Apply this tick's obstacle hits (iteration order)
    pub(crate) fn take_hits(&mut self, hits: &[ObstacleKind], tuning: &Tuning) -> HitOutcome {
        let Some(&last) = hits.last() else {
            return HitOutcome::Ignored;
        };
        if self.phase != GamePhase::Playing {
            return HitOutcome::Ignored;
        }

        let cost = match tuning.round.hit_policy {
            HitPolicy::PerObstacle => hits.len() as u32,
            HitPolicy::PerTick => 1,
        };
        self.lives = self.lives.saturating_sub(cost);
        self.last_hit = Some(last);

        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            HitOutcome::GameOver
        } else {
            self.lose_pause_ticks = tuning.round.lose_pause_ticks;
            self.phase = GamePhase::LosePause;
            HitOutcome::LosePause
        }
    }

    /// Count down an active pause. Returns true when it just ended.
    pub(crate) fn count_down_pause(&mut self) -> bool {
        let timer = match self.phase {
            GamePhase::WinPause => &mut self.win_pause_ticks,
            GamePhase::LosePause => &mut self.lose_pause_ticks,
            _ => return false,
        };
        *timer = timer.saturating_sub(1);
        if *timer == 0 {
            self.phase = GamePhase::Playing;
            true
        } else {
            false
        }
    }

    /// Override lives (clamped to the tuned starting value)
    pub fn set_lives(&mut self, lives: u32, tuning: &Tuning) {
        if lives > tuning.round.lives {
            log::warn!("Clamping lives {} to {}", lives, tuning.round.lives);
        }
        self.lives = lives.min(tuning.round.lives);
    }
}

/// The player character (rabbit)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Pixels per tick, per axis
    pub speed: f32,
    /// Consumed by the animation layer
    pub moving: bool,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: tuning.player.start,
            radius: tuning.player.radius,
            speed: tuning.player.speed,
            moving: false,
        }
    }

    /// Back to the start position, standing still
    pub fn reset(&mut self, tuning: &Tuning) {
        self.pos = tuning.player.start;
        self.moving = false;
    }

    /// Move by `axis` (each component -1, 0 or 1) and keep the collision
    /// circle inside the field
    pub fn steer(&mut self, axis: Vec2, field_width: f32, field_height: f32) {
        self.moving = axis != Vec2::ZERO;
        let next = self.pos + axis * self.speed;
        self.pos = clamp_circle_to_field(next, self.radius, field_width, field_height);
    }
}

/// The goal (carrot)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub center: Vec2,
    pub size: Vec2,
    /// Cosmetic only, never used for collision
    pub pulse_scale: f32,
    pulse_dir: f32,
}

impl Goal {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            center: tuning.goal.center,
            size: tuning.goal.size,
            pulse_scale: 1.0,
            pulse_dir: 1.0,
        }
    }

    /// Unscaled collision box
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.center, self.size)
    }

    /// Bounce the pulse scale between the tuned bounds
    pub fn update_pulse(&mut self, tuning: &Tuning) {
        let pulse = &tuning.goal.pulse;
        self.pulse_scale += tuning.goal.pulse_step * self.pulse_dir;
        if self.pulse_scale >= pulse.max {
            self.pulse_dir = -1.0;
        } else if self.pulse_scale <= pulse.min {
            self.pulse_dir = 1.0;
        }
    }
}

/// Complete game state for one round
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Round seed; `reset` replays from it
    pub seed: u64,
    pub tuning: Tuning,
    /// Set once by the asset loader; ticks are no-ops until then
    assets_ready: bool,
    pub round: RoundState,
    pub player: Player,
    pub goal: Goal,
    pub traffic: Traffic,
    /// Events recorded during the last tick
    pub events: Vec<GameEvent>,
    rng: Pcg32,
}

impl GameState {
    /// Create a new game state with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Validate `tuning`, then build the state from it
    pub fn try_with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::with_tuning(seed, tuning))
    }

    /// Build from `tuning` as given. Validation is the caller's job: use
    /// `try_with_tuning` or `Tuning::from_json` for untrusted values.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let traffic = Traffic::new(&tuning, &mut rng);
        Self {
            seed,
            round: RoundState::new(&tuning),
            player: Player::new(&tuning),
            goal: Goal::new(&tuning),
            traffic,
            tuning,
            assets_ready: false,
            events: Vec::new(),
            rng,
        }
    }

    /// Rebuild round, player, goal and traffic from the round seed.
    /// Safe in any phase; the asset gate is left as is.
    pub fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.round = RoundState::new(&self.tuning);
        self.player = Player::new(&self.tuning);
        self.goal = Goal::new(&self.tuning);
        self.traffic = Traffic::new(&self.tuning, &mut self.rng);
        self.events.clear();
    }

    /// Draw a fresh round seed, then reset into Intro
    pub fn restart(&mut self) {
        let seed = self.rng.random::<u64>();
        self.seed = seed;
        self.reset();
        log::info!("Round restarted (seed {})", seed);
        self.events.push(GameEvent::Restarted { seed });
    }

    /// One-time "assets ready" signal from the loader
    pub fn mark_assets_ready(&mut self) {
        if !self.assets_ready {
            log::info!("Assets ready, simulation unlocked");
        }
        self.assets_ready = true;
    }

    pub fn assets_ready(&self) -> bool {
        self.assets_ready
    }

    /// Advance traffic one tick at the current logical time
    pub(crate) fn step_traffic(&mut self) {
        let now_ms = self.round.time_ms();
        self.traffic
            .step(now_ms, &self.tuning, &mut self.rng, &mut self.events);
    }
}
