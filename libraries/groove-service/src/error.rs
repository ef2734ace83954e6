//! Error types for the music service

use groove_core::{CoreError, PlaylistId, TrackId};
use groove_playback::PlaybackError;
use thiserror::Error;

/// Music service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Playlist name empty after trimming
    #[error("Playlist name must not be empty")]
    InvalidName,

    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    /// Transport or backend failure (including load failures)
    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error(transparent)]
    Core(#[from] CoreError),

    /// Playlist import document rejected
    #[error("Import failed: {0}")]
    Import(String),
}

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;
