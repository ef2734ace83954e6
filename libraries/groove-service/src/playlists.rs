//! Playlist store
//!
//! CRUD over named track-ID lists, independent of playback. Duplicate IDs
//! are allowed on add, and IDs whose track left the library are kept;
//! [`PlaylistStore::playlist_tracks`] skips them when resolving.

use crate::error::{Result, ServiceError};
use groove_core::{PersistenceAdapter, Playlist, PlaylistExport, PlaylistId, Track, TrackId};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// Playlists backed by a persistence adapter
pub struct PlaylistStore {
    playlists: RwLock<Vec<Playlist>>,
    store: Arc<dyn PersistenceAdapter>,
}

impl PlaylistStore {
    /// Create an empty playlist store
    pub fn new(store: Arc<dyn PersistenceAdapter>) -> Self {
        Self {
            playlists: RwLock::new(Vec::new()),
            store,
        }
    }

    /// Load playlists from `store`
    pub async fn load(store: Arc<dyn PersistenceAdapter>) -> groove_core::Result<Self> {
        let playlists = store.load_playlists().await?;
        info!(count = playlists.len(), "Playlists loaded");
        Ok(Self {
            playlists: RwLock::new(playlists),
            store,
        })
    }

    /// Create a playlist
    ///
    /// # Errors
    /// `ServiceError::InvalidName` if `name` is blank.
    pub async fn create(&self, name: &str, track_ids: Vec<TrackId>) -> Result<Playlist> {
        let name = validate_name(name)?;
        let playlist = Playlist::new(name, track_ids);

        let mut playlists = self.playlists.write().await;
        playlists.push(playlist.clone());
        info!(playlist_id = %playlist.id, name = %playlist.name, "Playlist created");
        self.persist(&playlists).await;

        Ok(playlist)
    }

    /// Rename a playlist
    pub async fn rename(&self, playlist_id: &PlaylistId, name: &str) -> Result<()> {
        let name = validate_name(name)?;
        self.modify(playlist_id, |playlist| playlist.name = name)
            .await
    }

    /// Delete a playlist
    pub async fn delete(&self, playlist_id: &PlaylistId) -> Result<Playlist> {
        let mut playlists = self.playlists.write().await;
        let index = playlists
            .iter()
            .position(|playlist| &playlist.id == playlist_id)
            .ok_or_else(|| ServiceError::PlaylistNotFound(playlist_id.clone()))?;

        let removed = playlists.remove(index);
        info!(playlist_id = %playlist_id, "Playlist deleted");
        self.persist(&playlists).await;

        Ok(removed)
    }

    /// Append a track ID (duplicates allowed)
    pub async fn add_track(&self, playlist_id: &PlaylistId, track_id: TrackId) -> Result<()> {
        self.modify(playlist_id, |playlist| playlist.track_ids.push(track_id))
            .await
    }

    /// Remove every occurrence of `track_id`
    ///
    /// Returns how many entries were removed.
    pub async fn remove_track(&self, playlist_id: &PlaylistId, track_id: &TrackId) -> Result<usize> {
        let mut removed = 0;
        self.modify(playlist_id, |playlist| {
            let before = playlist.track_ids.len();
            playlist.track_ids.retain(|id| id != track_id);
            removed = before - playlist.track_ids.len();
        })
        .await?;
        Ok(removed)
    }

    /// Resolve a playlist against the library, skipping dangling IDs
    pub async fn playlist_tracks(
        &self,
        playlist_id: &PlaylistId,
        library: &[Track],
    ) -> Result<Vec<Track>> {
        let playlist = self
            .get(playlist_id)
            .await
            .ok_or_else(|| ServiceError::PlaylistNotFound(playlist_id.clone()))?;

        Ok(playlist
            .track_ids
            .iter()
            .filter_map(|id| library.iter().find(|track| &track.id == id).cloned())
            .collect())
    }

    pub async fn get(&self, playlist_id: &PlaylistId) -> Option<Playlist> {
        self.playlists
            .read()
            .await
            .iter()
            .find(|playlist| &playlist.id == playlist_id)
            .cloned()
    }

    /// First playlist named `name` (exact match after trimming)
    pub async fn find_by_name(&self, name: &str) -> Option<Playlist> {
        let name = name.trim();
        self.playlists
            .read()
            .await
            .iter()
            .find(|playlist| playlist.name == name)
            .cloned()
    }

    pub async fn all(&self) -> Vec<Playlist> {
        self.playlists.read().await.clone()
    }

    // ===== Import / Export =====

    /// Serialize every playlist as `{"playlists": [...]}`
    pub async fn export_json(&self) -> Result<String> {
        let document = PlaylistExport {
            playlists: self.all().await,
        };
        let json = serde_json::to_string_pretty(&document).map_err(groove_core::CoreError::from)?;
        Ok(json)
    }

    /// Import playlists from an export document
    ///
    /// Imported playlists get fresh IDs. Nothing is imported if the
    /// document is malformed or any playlist name is blank.
    pub async fn import_json(&self, json: &str) -> Result<Vec<Playlist>> {
        let document: PlaylistExport =
            serde_json::from_str(json).map_err(|err| ServiceError::Import(err.to_string()))?;

        let imported = document
            .playlists
            .into_iter()
            .enumerate()
            .map(|(index, playlist)| match validate_name(&playlist.name) {
                Ok(name) => Ok(Playlist::new(name, playlist.track_ids)),
                Err(_) => Err(ServiceError::Import(format!(
                    "playlist {} has an empty name",
                    index + 1
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        let mut playlists = self.playlists.write().await;
        playlists.extend(imported.iter().cloned());
        info!(count = imported.len(), "Playlists imported");
        self.persist(&playlists).await;

        Ok(imported)
    }

    async fn modify(
        &self,
        playlist_id: &PlaylistId,
        update: impl FnOnce(&mut Playlist),
    ) -> Result<()> {
        let mut playlists = self.playlists.write().await;
        let playlist = playlists
            .iter_mut()
            .find(|playlist| &playlist.id == playlist_id)
            .ok_or_else(|| ServiceError::PlaylistNotFound(playlist_id.clone()))?;

        update(playlist);
        debug!(playlist_id = %playlist_id, tracks = playlist.track_ids.len(), "Playlist updated");
        self.persist(&playlists).await;
        Ok(())
    }

    async fn persist(&self, playlists: &[Playlist]) {
        if let Err(err) = self.store.save_playlists(playlists).await {
            error!(error = %err, "Failed to save playlists");
        }
    }
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidName);
    }
    Ok(name.to_string())
}
