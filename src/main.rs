//! Carrot Dash entry point
//!
//! Headless native runner: loads tuning, resolves the sprite manifest and
//! drives the fixed-step loop with a simple autopilot, logging the HUD.
//!
//! Usage: `carrot-dash [tuning.json] [frames]`

use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec2;

use carrot_dash::assets::{AssetError, AssetTracker, SpriteKey};
use carrot_dash::platform::{FrameClock, Key, KeyboardState};
use carrot_dash::renderer::{FrameView, Renderer, SpriteInstance};
use carrot_dash::sim::{GameEvent, GamePhase, GameState, Rect, circle_rect_intersect, tick};
use carrot_dash::Tuning;

/// Nominal display refresh
const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_FRAMES: u64 = 60 * 120;
const DEFAULT_SEED: u64 = 0xC0FFEE;

/// Renderer stand-in that logs the HUD instead of drawing
struct LogRenderer {
    frames: u64,
    every: u64,
    last_banner: Option<String>,
}

impl Renderer for LogRenderer {
    fn render(&mut self, frame: &FrameView, assets: &AssetTracker) {
        let batch = SpriteInstance::batch(frame, assets);
        if self.frames % self.every == 0 {
            log::info!("{} | {} sprites", frame.hud_line(), batch.len());
        }
        let banner = frame.banner();
        if banner != self.last_banner {
            if let Some(text) = &banner {
                log::info!("[{}]", text);
            }
            self.last_banner = banner;
        }
        self.frames += 1;
    }
}

/// Presses Up when the row ahead looks clear, backs off when threatened
struct Autopilot;

impl Autopilot {
    /// Horizontal look-ahead padding around each obstacle hitbox
    const LOOKAHEAD: f32 = 90.0;
    /// How far ahead of the player to probe
    const PROBE: f32 = 30.0;

    fn drive(&self, frame: &FrameView, keys: &mut KeyboardState) {
        keys.key_up(Key::Up);
        keys.key_up(Key::Down);
        keys.key_up(Key::Left);
        keys.key_up(Key::Right);
        if frame.phase != GamePhase::Playing {
            return;
        }

        let pos = frame.player_pos;
        let radius = frame.player_radius;
        let threatened = |probe: Vec2| {
            frame.obstacles.iter().any(|o| {
                let padded = Rect::new(
                    o.hitbox.center,
                    o.hitbox.half_extents + Vec2::new(Self::LOOKAHEAD, 4.0),
                );
                circle_rect_intersect(probe, radius, &padded)
            })
        };

        if !threatened(pos - Vec2::new(0.0, Self::PROBE)) {
            keys.key_down(Key::Up);
        } else if threatened(pos) {
            keys.key_down(Key::Down);
        }

        // Drift toward the goal column
        let dx = frame.goal_center.x - pos.x;
        if dx > 2.0 {
            keys.key_down(Key::Right);
        } else if dx < -2.0 {
            keys.key_down(Key::Left);
        }
    }
}

fn load_tuning(path: Option<&str>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading tuning file {}", path))?;
    let tuning = Tuning::from_json(&json).with_context(|| format!("loading tuning from {}", path))?;
    log::info!("Loaded tuning from {}", path);
    Ok(tuning)
}

/// Resolve every sprite; missing files fall back to vector art
fn resolve_assets(state: &mut GameState) -> AssetTracker {
    let mut assets = AssetTracker::default();
    for key in SpriteKey::ALL {
        let path = key.path();
        let outcome = if Path::new(&path).exists() {
            Ok(())
        } else {
            Err(AssetError::Load {
                path,
                reason: "file not found".to_string(),
            })
        };
        if assets.resolve(key, outcome) {
            state.mark_assets_ready();
        }
    }
    assets
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::Spawned { .. } => log::trace!("{:?}", event),
            _ => log::debug!("{:?}", event),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Carrot Dash (headless) starting...");

    let args: Vec<String> = std::env::args().collect();
    let tuning = load_tuning(args.get(1).map(String::as_str))?;
    let frames: u64 = match args.get(2) {
        Some(n) => n.parse().with_context(|| format!("invalid frame count {:?}", n))?,
        None => DEFAULT_FRAMES,
    };

    let mut state = GameState::try_with_tuning(DEFAULT_SEED, tuning)?;
    let assets = resolve_assets(&mut state);

    let mut clock = FrameClock::default();
    let mut keys = KeyboardState::new();
    let mut renderer = LogRenderer {
        frames: 0,
        every: 120,
        last_banner: None,
    };
    let autopilot = Autopilot;

    keys.key_down(Key::Enter);
    for frame_index in 0..frames {
        if frame_index == 1 {
            keys.key_up(Key::Enter);
        }

        for _ in 0..clock.advance(FRAME_DT) {
            let input = keys.snapshot();
            tick(&mut state, &input);
            keys.clear_one_shots();
            log_events(&state.events);
        }

        let view = FrameView::capture(&state);
        renderer.render(&view, &assets);
        autopilot.drive(&view, &mut keys);

        if state.round.phase() == GamePhase::GameOver {
            break;
        }
    }

    let view = FrameView::capture(&state);
    log::info!("Final: {}", view.hud_line());
    log::debug!("Final frame: {}", serde_json::to_string(&view)?);
    Ok(())
}
