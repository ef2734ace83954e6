/// ID types for Groove entities
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Random suffix appended to time-based identifiers
fn random_suffix() -> String {
    let mut simple = Uuid::new_v4().simple().to_string();
    simple.truncate(9);
    simple
}

/// Track identifier
///
/// Stable for the lifetime of a track. Metadata updates never change it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a track ID from an existing value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new time-based track ID with a random suffix
    pub fn generate() -> Self {
        Self(format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            random_suffix()
        ))
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Playlist identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(String);

impl PlaylistId {
    /// Create a playlist ID from an existing value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new unique playlist ID (`playlist_<millis>_<suffix>`)
    pub fn generate() -> Self {
        Self(format!(
            "playlist_{}_{}",
            Utc::now().timestamp_millis(),
            random_suffix()
        ))
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlaylistId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_track_ids_are_unique() {
        let ids: HashSet<TrackId> = (0..500).map(|_| TrackId::generate()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn generated_playlist_ids_have_prefix() {
        let id = PlaylistId::generate();
        assert!(id.as_str().starts_with("playlist_"));
        assert_ne!(id, PlaylistId::generate());
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = TrackId::new("track-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"track-1\"");
        let back: TrackId = serde_json::from_str("\"track-1\"").unwrap();
        assert_eq!(back, id);
    }
}
