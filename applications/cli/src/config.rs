/// Player configuration
use crate::error::{CliError, Result};
use clap::ValueEnum;
use groove_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file, read from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "groove.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GrooveConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_audio")]
    pub audio: AudioSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    /// Directory holding tracks.json, playlists.json and settings.json
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioSettings {
    #[serde(default = "default_backend")]
    pub backend: BackendKind,

    /// Simulated track length for the headless backend
    #[serde(default = "default_headless_track_secs")]
    pub headless_track_secs: u64,
}

/// Playback backend, chosen once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Default output device (rodio)
    Desktop,
    /// Virtual clock, no audio device
    Headless,
}

impl GrooveConfig {
    /// Load configuration from file and environment
    ///
    /// Reads `path` (or `groove.toml` if it exists), then overrides with
    /// `GROOVE_*` variables using `__` between sections, e.g.
    /// `GROOVE_PLAYBACK__VOLUME=0.5` or `GROOVE_AUDIO__BACKEND=headless`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("GROOVE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let volume = self.playback.volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(CliError::Config(format!(
                "playback.volume must be between 0.0 and 1.0 (got {volume})"
            )));
        }

        if self.playback.progress_interval_ms == 0 {
            return Err(CliError::Config(
                "playback.progress_interval_ms must be greater than zero".to_string(),
            ));
        }

        if self.playback.event_capacity == 0 {
            return Err(CliError::Config(
                "playback.event_capacity must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn headless_track_duration(&self) -> Duration {
        Duration::from_secs(self.audio.headless_track_secs)
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        data_dir: default_data_dir(),
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_audio() -> AudioSettings {
    AudioSettings {
        backend: default_backend(),
        headless_track_secs: default_headless_track_secs(),
    }
}

fn default_backend() -> BackendKind {
    BackendKind::Desktop
}

fn default_headless_track_secs() -> u64 {
    180
}

impl Default for GrooveConfig {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            storage: default_storage(),
            audio: default_audio(),
        }
    }
}
