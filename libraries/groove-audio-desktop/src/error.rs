/// Desktop audio errors
use groove_playback::PlaybackError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for audio operations
pub type Result<T> = std::result::Result<T, AudioError>;

/// Audio errors
#[derive(Debug, Error)]
pub enum AudioError {
    /// No usable output device
    #[error("Audio device error: {0}")]
    Device(String),

    /// Source file could not be opened
    #[error("Failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source file is not a decodable audio format
    #[error("Failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },

    /// Seek rejected by the decoder
    #[error("Seek failed: {0}")]
    Seek(String),

    /// Command needs a loaded source
    #[error("No source loaded")]
    NoSource,

    /// Audio thread is gone
    #[error("Audio thread stopped")]
    ThreadStopped,
}

impl From<AudioError> for PlaybackError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::NoSource => PlaybackError::NoTrackLoaded,
            other => PlaybackError::backend(other.to_string()),
        }
    }
}
