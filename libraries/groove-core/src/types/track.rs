/// Track domain type
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playable audio item
///
/// Identity is fixed at creation; metadata updates replace fields but
/// never the `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Playback source reference (file path or URL)
    pub url: String,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,

    /// Artwork reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork: Option<String>,

    /// Track duration in milliseconds (authoritative once known)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl Track {
    /// Create a new track with a generated ID
    pub fn new(url: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self::with_id(TrackId::generate(), url, title, artist)
    }

    /// Create a track with a specific ID (for loading from storage)
    pub fn with_id(
        id: TrackId,
        url: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
    ) -> Self {
        Self {
            id,
            url: url.into(),
            title: title.into(),
            artist: artist.into(),
            album: None,
            artwork: None,
            duration_ms: None,
        }
    }

    /// Get the track duration as a Duration
    pub fn duration(&self) -> Option<Duration> {
        self.duration_ms.map(Duration::from_millis)
    }

    /// Set the track duration from a Duration
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_ms = Some(duration.as_millis() as u64);
    }

    /// Apply a metadata update in place
    ///
    /// Fields left as `None` in the update are untouched.
    pub fn apply(&mut self, update: UpdateTrack) {
        if let Some(url) = update.url {
            self.url = url;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(artist) = update.artist {
            self.artist = artist;
        }
        if let Some(album) = update.album {
            self.album = Some(album);
        }
        if let Some(artwork) = update.artwork {
            self.artwork = Some(artwork);
        }
        if let Some(duration_ms) = update.duration_ms {
            self.duration_ms = Some(duration_ms);
        }
    }

    /// Case-insensitive match against title, artist and album
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        self.title.to_lowercase().contains(&query)
            || self.artist.to_lowercase().contains(&query)
            || self
                .album
                .as_deref()
                .is_some_and(|album| album.to_lowercase().contains(&query))
    }
}

/// Data for updating a track (all fields optional)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTrack {
    pub url: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub artwork: Option<String>,
    pub duration_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Track {
        let mut track = Track::with_id(
            TrackId::new("t1"),
            "/music/song.mp3",
            "Blue Monday",
            "New Order",
        );
        track.album = Some("Power, Corruption & Lies".to_string());
        track
    }

    #[test]
    fn update_keeps_identity() {
        let mut track = sample();
        track.apply(UpdateTrack {
            title: Some("Blue Monday '88".to_string()),
            duration_ms: Some(245_000),
            ..Default::default()
        });

        assert_eq!(track.id, TrackId::new("t1"));
        assert_eq!(track.title, "Blue Monday '88");
        assert_eq!(track.artist, "New Order");
        assert_eq!(track.duration(), Some(Duration::from_secs(245)));
    }

    #[test]
    fn search_matches_any_field_ignoring_case() {
        let track = sample();
        assert!(track.matches("blue"));
        assert!(track.matches("NEW ORDER"));
        assert!(track.matches("corruption"));
        assert!(track.matches("  "));
        assert!(!track.matches("joy division"));
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let track = Track::with_id(TrackId::new("t2"), "/a.mp3", "A", "B");
        let json = serde_json::to_value(&track).unwrap();
        assert!(json.get("album").is_none());
        assert!(json.get("duration_ms").is_none());

        let back: Track = serde_json::from_value(json).unwrap();
        assert_eq!(back, track);
    }
}
