/// Persisted player preferences
use crate::types::RepeatMode;
use serde::{Deserialize, Serialize};

/// Player settings restored on startup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Volume (0.0-1.0)
    pub volume: f32,

    /// Shuffle enabled
    pub shuffle: bool,

    /// Repeat mode
    pub repeat: RepeatMode,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}
