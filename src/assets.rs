//! Sprite manifest and load tracking
//!
//! The simulation only cares about one thing: has every sprite been
//! resolved? A failed load still counts as resolved; the renderer falls back
//! to vector art for anything not loaded.

use serde::{Deserialize, Serialize};

use crate::sim::ObstacleKind;

/// Every sprite the game draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpriteKey {
    Wolf,
    Fox,
    Rabbit,
    Carrot,
    Heart,
}

impl SpriteKey {
    pub const ALL: [SpriteKey; 5] = [
        SpriteKey::Wolf,
        SpriteKey::Fox,
        SpriteKey::Rabbit,
        SpriteKey::Carrot,
        SpriteKey::Heart,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SpriteKey::Wolf => "wolf",
            SpriteKey::Fox => "fox",
            SpriteKey::Rabbit => "rabbit",
            SpriteKey::Carrot => "carrot",
            SpriteKey::Heart => "heart",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Default path relative to the asset root
    pub fn path(&self) -> String {
        format!("assets/{}.png", self.name())
    }

    pub fn for_obstacle(kind: ObstacleKind) -> Self {
        match kind {
            ObstacleKind::Wolf => SpriteKey::Wolf,
            ObstacleKind::Fox => SpriteKey::Fox,
        }
    }
}

/// Load state of one sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetStatus {
    Pending,
    Loaded,
    /// Resolved without a sprite; drawn with fallback art
    Failed,
}

/// Tracks sprite resolution for the "assets ready" gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetTracker {
    entries: Vec<(SpriteKey, AssetStatus)>,
}

impl Default for AssetTracker {
    fn default() -> Self {
        Self::new(&SpriteKey::ALL)
    }
}

impl AssetTracker {
    pub fn new(keys: &[SpriteKey]) -> Self {
        let mut entries: Vec<(SpriteKey, AssetStatus)> = Vec::with_capacity(keys.len());
        for &key in keys {
            if !entries.iter().any(|(k, _)| *k == key) {
                entries.push((key, AssetStatus::Pending));
            }
        }
        Self { entries }
    }

    /// Record a load outcome. Returns true when this resolution made the
    /// whole manifest ready.
    pub fn resolve(&mut self, key: SpriteKey, outcome: Result<(), AssetError>) -> bool {
        let was_ready = self.is_ready();
        let status = match outcome {
            Ok(()) => AssetStatus::Loaded,
            Err(e) => {
                log::warn!("{}; using fallback for {}", e, key.name());
                AssetStatus::Failed
            }
        };
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = status,
            None => log::warn!("Ignoring unlisted sprite {}", key.name()),
        }
        !was_ready && self.is_ready()
    }

    /// Record a load outcome by sprite name
    pub fn resolve_named(
        &mut self,
        name: &str,
        outcome: Result<(), AssetError>,
    ) -> Result<bool, AssetError> {
        let key = SpriteKey::from_name(name).ok_or_else(|| AssetError::UnknownKey(name.to_string()))?;
        Ok(self.resolve(key, outcome))
    }

    pub fn status(&self, key: SpriteKey) -> Option<AssetStatus> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, status)| *status)
    }

    /// Whether a real sprite is available (otherwise draw fallback art)
    pub fn is_loaded(&self, key: SpriteKey) -> bool {
        self.status(key) == Some(AssetStatus::Loaded)
    }

    /// Every listed sprite resolved, successfully or not
    pub fn is_ready(&self) -> bool {
        self.entries
            .iter()
            .all(|(_, status)| *status != AssetStatus::Pending)
    }

    pub fn pending(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, status)| *status == AssetStatus::Pending)
            .count()
    }
}

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Unknown sprite: {0}")]
    UnknownKey(String),

    #[error("Failed to load {path}: {reason}")]
    Load { path: String, reason: String },
}
