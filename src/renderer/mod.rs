//! Renderer-facing boundary
//!
//! A renderer never touches `GameState` directly. Each frame it receives a
//! read-only `FrameView` snapshot, plus the asset tracker to decide between
//! sprites and fallback art.

pub mod instance;

pub use instance::{SpriteInstance, colors};

use glam::Vec2;
use serde::Serialize;

use crate::assets::AssetTracker;
use crate::sim::{GamePhase, GameState, ObstacleKind, Rect};

/// Anything that can draw a frame
pub trait Renderer {
    fn render(&mut self, frame: &FrameView, assets: &AssetTracker);
}

/// One obstacle as the renderer sees it
#[derive(Debug, Clone, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub hitbox: Rect,
}

/// Everything drawn for one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameView {
    pub field: Vec2,
    pub lane_rows: Vec<f32>,
    pub player_pos: Vec2,
    pub player_radius: f32,
    pub player_moving: bool,
    pub goal_center: Vec2,
    pub goal_size: Vec2,
    pub goal_pulse: f32,
    pub obstacles: Vec<ObstacleView>,
    pub phase: GamePhase,
    pub lives: u32,
    pub score: u64,
    pub last_hit: Option<ObstacleKind>,
}

impl FrameView {
    pub fn capture(state: &GameState) -> Self {
        let obstacles = state
            .traffic
            .obstacles()
            .map(|o| ObstacleView {
                id: o.id,
                kind: o.kind,
                pos: o.pos,
                size: o.size,
                hitbox: o.hitbox(),
            })
            .collect();

        Self {
            field: Vec2::new(state.tuning.field_width, state.tuning.field_height),
            lane_rows: state.traffic.lanes().iter().map(|l| l.y).collect(),
            player_pos: state.player.pos,
            player_radius: state.player.radius,
            player_moving: state.player.moving,
            goal_center: state.goal.center,
            goal_size: state.goal.size,
            goal_pulse: state.goal.pulse_scale,
            obstacles,
            phase: state.round.phase(),
            lives: state.round.lives(),
            score: state.round.score(),
            last_hit: state.round.last_hit(),
        }
    }

    /// Overlay text for the current phase, if any
    pub fn banner(&self) -> Option<String> {
        match self.phase {
            GamePhase::Intro => Some("Press Enter or Space to start".to_string()),
            GamePhase::WinPause => Some("You got the carrot! Great job!".to_string()),
            GamePhase::LosePause => {
                let name = self.last_hit.map(|k| k.display_name()).unwrap_or("traffic");
                Some(format!("Caught by the {}! Try again!", name))
            }
            GamePhase::GameOver => Some(format!(
                "GAME OVER - Final Score: {} - Press Enter to Restart",
                self.score
            )),
            GamePhase::Playing => None,
        }
    }

    /// One-line HUD summary
    pub fn hud_line(&self) -> String {
        format!(
            "{:?} | lives {} | score {} | obstacles {}",
            self.phase,
            self.lives,
            self.score,
            self.obstacles.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, tick};

    #[test]
    fn test_capture_reflects_state() {
        let mut state = GameState::new(11);
        state.mark_assets_ready();
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
        );
        for _ in 0..400 {
            tick(&mut state, &TickInput::default());
        }

        let frame = FrameView::capture(&state);
        assert_eq!(frame.obstacles.len(), state.traffic.active_count());
        assert_eq!(frame.lane_rows.len(), 6);
        assert_eq!(frame.phase, GamePhase::Playing);
        assert_eq!(frame.lives, 3);
        assert_eq!(frame.player_pos, state.player.pos);
        assert!(frame.banner().is_none());
    }

    #[test]
    fn test_banner_names_last_hit() {
        let state = GameState::new(12);
        let mut frame = FrameView::capture(&state);
        assert!(frame.banner().unwrap().contains("start"));

        frame.phase = GamePhase::LosePause;
        frame.last_hit = Some(ObstacleKind::Wolf);
        assert_eq!(frame.banner().unwrap(), "Caught by the Wolf! Try again!");

        frame.phase = GamePhase::GameOver;
        frame.score = 300;
        assert!(frame.banner().unwrap().contains("Final Score: 300"));
    }
}
