//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (lane order, leading obstacle first)
//! - No rendering or platform dependencies

pub mod collision;
pub mod lane;
pub mod obstacle;
pub mod state;
pub mod tick;
pub mod traffic;

pub use collision::{Rect, circle_circle_intersect, circle_rect_intersect};
pub use lane::Lane;
pub use obstacle::{Direction, Obstacle, ObstacleKind};
pub use state::{GameEvent, GamePhase, GameState, Goal, HitOutcome, Player, RoundState};
pub use tick::{TickInput, tick};
pub use traffic::Traffic;
