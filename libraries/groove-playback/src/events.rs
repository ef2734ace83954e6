//! Playback Events
//!
//! Broadcast to UIs so they never have to reach into shared state.
//! Events are emitted at key points:
//! - State changes (play/pause/idle)
//! - Track changes
//! - Position updates (relayed from the backend's progress polling)
//! - Queue, volume, shuffle and repeat changes

use crate::types::{PlaybackState, RepeatMode};
use groove_core::TrackId;
use serde::{Deserialize, Serialize};

/// Events emitted by the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// Transport state changed
    StateChanged {
        /// The new state
        state: PlaybackState,
    },

    /// A new track became current
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Track reached its natural end
    TrackFinished {
        /// ID of the finished track
        track_id: TrackId,
    },

    /// Position update from the backend
    PositionUpdate {
        /// Current playback position
        position_ms: u64,
        /// Total track duration
        duration_ms: u64,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0.0-1.0)
        level: f32,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Queue changed (tracks added/removed/cleared)
    QueueChanged {
        /// New queue length
        length: usize,
        /// Current queue position
        position: usize,
    },

    /// Shuffle toggled
    ShuffleChanged {
        /// New shuffle flag
        enabled: bool,
    },

    /// Repeat mode changed
    RepeatChanged {
        /// New repeat mode
        mode: RepeatMode,
    },

    /// User-visible error (e.g. a track that could not be played)
    Error {
        /// One-line notification text
        message: String,
    },
}
