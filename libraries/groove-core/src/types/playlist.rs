/// Playlist domain types
use crate::types::{PlaylistId, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named, ordered list of track IDs
///
/// Duplicates are permitted and IDs whose track has left the library are
/// kept; rendering simply skips them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name
    pub name: String,

    /// Track IDs in playlist order
    pub track_ids: Vec<TrackId>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Playlist {
    /// Create a new playlist with a generated ID
    pub fn new(name: impl Into<String>, track_ids: Vec<TrackId>) -> Self {
        Self::with_id(PlaylistId::generate(), name, track_ids, Utc::now())
    }

    /// Create a playlist with a specific ID (for loading from storage)
    pub fn with_id(
        id: PlaylistId,
        name: impl Into<String>,
        track_ids: Vec<TrackId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            track_ids,
            created_at,
        }
    }

    /// Whether the playlist references the given track at least once
    pub fn contains(&self, track_id: &TrackId) -> bool {
        self.track_ids.contains(track_id)
    }
}

/// Import/export document: `{"playlists": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistExport {
    /// Exported playlists
    pub playlists: Vec<Playlist>,
}
