//! Persistence contract for library and playlist state

use crate::error::Result;
use crate::types::{PlayerSettings, Playlist, Track};
use async_trait::async_trait;

/// Durable storage for the track library and playlists
///
/// The engine writes whole collections back after every mutating
/// operation. There is no transactional guarantee beyond "the last
/// successful save wins".
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    /// Load the ordered track library
    async fn load_tracks(&self) -> Result<Vec<Track>>;

    /// Replace the stored track library
    async fn save_tracks(&self, tracks: &[Track]) -> Result<()>;

    /// Load all playlists
    async fn load_playlists(&self) -> Result<Vec<Playlist>>;

    /// Replace the stored playlists
    async fn save_playlists(&self, playlists: &[Playlist]) -> Result<()>;

    /// Load saved player settings
    ///
    /// Adapters without settings support report defaults.
    async fn load_settings(&self) -> Result<PlayerSettings> {
        Ok(PlayerSettings::default())
    }

    /// Persist player settings
    async fn save_settings(&self, settings: &PlayerSettings) -> Result<()> {
        let _ = settings;
        Ok(())
    }
}
