//! Core types for playback management

use groove_core::Track;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use groove_core::RepeatMode;

/// Transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// No track loaded
    #[default]
    Idle,

    /// Track loaded, not playing
    Paused,

    /// Track loaded and playing
    Playing,
}

impl PlaybackState {
    /// Whether a track is loaded
    pub fn is_loaded(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Configuration for the transport
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0.0-1.0, default: 1.0)
    pub volume: f32,

    /// Initial shuffle flag (default: off)
    pub shuffle: bool,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Backend progress polling interval in milliseconds (default: 250)
    pub progress_interval_ms: u64,

    /// Capacity of the event broadcast channel (default: 256)
    pub event_capacity: usize,
}

impl PlaybackConfig {
    /// Progress polling interval as a Duration
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            shuffle: false,
            repeat: RepeatMode::Off,
            progress_interval_ms: 250,
            event_capacity: 256,
        }
    }
}

/// Point-in-time view of the transport, for UIs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportSnapshot {
    pub current_track: Option<Track>,
    pub state: PlaybackState,
    pub position: Duration,
    pub duration: Duration,
    pub volume: f32,
    pub muted: bool,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub queue: Vec<Track>,
    pub queue_position: usize,
}

impl TransportSnapshot {
    /// Whether audio is playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.volume, 1.0);
        assert!(!config.shuffle);
        assert_eq!(config.repeat, RepeatMode::Off);
        assert_eq!(config.progress_interval(), Duration::from_millis(250));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: PlaybackConfig =
            serde_json::from_str(r#"{"repeat": "all", "volume": 0.5}"#).unwrap();
        assert_eq!(config.repeat, RepeatMode::All);
        assert_eq!(config.volume, 0.5);
        assert_eq!(config.progress_interval_ms, 250);
    }

    #[test]
    fn only_idle_is_unloaded() {
        assert!(!PlaybackState::Idle.is_loaded());
        assert!(PlaybackState::Paused.is_loaded());
        assert!(PlaybackState::Playing.is_loaded());
    }
}
