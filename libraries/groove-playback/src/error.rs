//! Error types for playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The playback primitive rejected a track
    ///
    /// Display is the one-line user notification.
    #[error("\"{title}\" could not be played")]
    LoadFailed {
        /// Title of the track that failed
        title: String,
        /// Backend-supplied reason (for logs)
        reason: String,
    },

    /// No track is currently loaded in the backend
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Backend (audio device / media element) error
    #[error("Playback backend error: {0}")]
    Backend(String),

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),
}

impl PlaybackError {
    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_failure_is_a_one_line_notification() {
        let err = PlaybackError::LoadFailed {
            title: "Song 2".to_string(),
            reason: "unsupported format: .xyz".to_string(),
        };
        assert_eq!(err.to_string(), "\"Song 2\" could not be played");
    }
}
