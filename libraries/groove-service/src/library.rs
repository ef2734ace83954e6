//! Track library
//!
//! Authoritative, insertion-ordered list of every known track. Each
//! mutation writes the whole list back through the persistence adapter;
//! a failed write is logged and the in-memory change stands.

use groove_core::{PersistenceAdapter, Track, TrackId, UpdateTrack};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Ordered track collection backed by a persistence adapter
pub struct TrackLibrary {
    tracks: RwLock<Arc<Vec<Track>>>,
    store: Arc<dyn PersistenceAdapter>,
}

impl TrackLibrary {
    /// Create an empty library
    pub fn new(store: Arc<dyn PersistenceAdapter>) -> Self {
        Self {
            tracks: RwLock::new(Arc::new(Vec::new())),
            store,
        }
    }

    /// Load the library from `store`
    pub async fn load(store: Arc<dyn PersistenceAdapter>) -> groove_core::Result<Self> {
        let tracks = store.load_tracks().await?;
        info!(count = tracks.len(), "Library loaded");
        Ok(Self {
            tracks: RwLock::new(Arc::new(tracks)),
            store,
        })
    }

    /// Append tracks, preserving their order
    ///
    /// IDs are not de-duplicated. Returns the new library size.
    pub async fn add_tracks(&self, new_tracks: Vec<Track>) -> usize {
        let mut tracks = self.tracks.write().await;
        let added = new_tracks.len();
        Arc::make_mut(&mut tracks).extend(new_tracks);
        info!(added, total = tracks.len(), "Tracks added");
        self.persist(&tracks).await;
        tracks.len()
    }

    /// Remove the track with `track_id`
    pub async fn remove_track(&self, track_id: &TrackId) -> Option<Track> {
        let mut tracks = self.tracks.write().await;
        let index = tracks.iter().position(|track| &track.id == track_id)?;
        let removed = Arc::make_mut(&mut tracks).remove(index);
        info!(track_id = %track_id, "Track removed");
        self.persist(&tracks).await;
        Some(removed)
    }

    /// Remove every track
    pub async fn clear(&self) {
        let mut tracks = self.tracks.write().await;
        *tracks = Arc::new(Vec::new());
        info!("Library cleared");
        self.persist(&tracks).await;
    }

    /// Replace metadata of the track with `track_id`
    ///
    /// The ID never changes. Returns the updated track.
    pub async fn update_track(&self, track_id: &TrackId, update: UpdateTrack) -> Option<Track> {
        let mut tracks = self.tracks.write().await;
        let index = tracks.iter().position(|track| &track.id == track_id)?;
        let track = &mut Arc::make_mut(&mut tracks)[index];
        track.apply(update);
        let updated = track.clone();
        self.persist(&tracks).await;
        Some(updated)
    }

    /// Snapshot of the full ordered list
    pub async fn all_tracks(&self) -> Arc<Vec<Track>> {
        Arc::clone(&*self.tracks.read().await)
    }

    /// Look up a track
    pub async fn get(&self, track_id: &TrackId) -> Option<Track> {
        self.tracks
            .read()
            .await
            .iter()
            .find(|track| &track.id == track_id)
            .cloned()
    }

    /// Tracks whose title, artist or album contain `query` (case-insensitive)
    pub async fn search(&self, query: &str) -> Vec<Track> {
        self.tracks
            .read()
            .await
            .iter()
            .filter(|track| track.matches(query))
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.tracks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tracks.read().await.is_empty()
    }

    async fn persist(&self, tracks: &[Track]) {
        if let Err(err) = self.store.save_tracks(tracks).await {
            error!(error = %err, "Failed to save library");
        }
    }
}
