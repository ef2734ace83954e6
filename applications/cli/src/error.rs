/// CLI error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Invalid command: {0}")]
    Usage(String),

    #[error(transparent)]
    Service(#[from] groove_service::ServiceError),

    #[error(transparent)]
    Playback(#[from] groove_playback::PlaybackError),

    #[error(transparent)]
    Audio(#[from] groove_audio_desktop::AudioError),

    #[error(transparent)]
    Core(#[from] groove_core::CoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
