//! Keyboard state -> per-tick input snapshot
//!
//! Movement keys are level-triggered (held). Start/restart are
//! edge-triggered and stay latched until `clear_one_shots` runs after the
//! tick that consumed them.

use std::collections::HashSet;

use crate::sim::TickInput;

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
}

impl Key {
    /// Map a DOM-style key name (`"ArrowUp"`, `"w"`, `" "`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowUp" | "w" | "W" => Some(Key::Up),
            "ArrowDown" | "s" | "S" => Some(Key::Down),
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            "Enter" => Some(Key::Enter),
            " " | "Space" => Some(Key::Space),
            _ => None,
        }
    }
}

/// Currently held keys plus latched one-shot signals
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<Key>,
    start: bool,
    restart: bool,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        // Auto-repeat shouldn't re-fire one-shots
        if self.held.insert(key) {
            match key {
                Key::Enter => {
                    self.start = true;
                    self.restart = true;
                }
                Key::Space => self.start = true,
                _ => {}
            }
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Snapshot for the next tick
    pub fn snapshot(&self) -> TickInput {
        TickInput {
            up: self.is_held(Key::Up),
            down: self.is_held(Key::Down),
            left: self.is_held(Key::Left),
            right: self.is_held(Key::Right),
            start: self.start,
            restart: self.restart,
        }
    }

    /// Clear one-shot inputs after a tick processed them
    pub fn clear_one_shots(&mut self) {
        self.start = false;
        self.restart = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("ArrowUp"), Some(Key::Up));
        assert_eq!(Key::from_name("d"), Some(Key::Right));
        assert_eq!(Key::from_name(" "), Some(Key::Space));
        assert_eq!(Key::from_name("q"), None);
    }

    #[test]
    fn test_held_keys_map_to_movement() {
        let mut keys = KeyboardState::new();
        keys.key_down(Key::Up);
        keys.key_down(Key::Left);
        let input = keys.snapshot();
        assert!(input.up && input.left && !input.down && !input.right);

        keys.key_up(Key::Up);
        assert!(!keys.snapshot().up);
    }

    #[test]
    fn test_one_shots_latch_until_cleared() {
        let mut keys = KeyboardState::new();
        keys.key_down(Key::Space);
        keys.key_up(Key::Space);
        // Released before the tick ran, still delivered once
        assert!(keys.snapshot().start);
        assert!(!keys.snapshot().restart);
        keys.clear_one_shots();
        assert!(!keys.snapshot().start);

        keys.key_down(Key::Enter);
        let input = keys.snapshot();
        assert!(input.start && input.restart);

        // Holding Enter does not re-fire after clearing
        keys.clear_one_shots();
        keys.key_down(Key::Enter);
        assert!(!keys.snapshot().restart);
    }
}
