//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Input events (keyboard -> per-tick snapshot)
//! - Time/ticks (variable frame delta -> fixed logical steps)

pub mod input;
pub mod time;

pub use input::{Key, KeyboardState};
pub use time::FrameClock;
