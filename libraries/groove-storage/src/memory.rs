//! In-memory persistence adapter

use crate::error::StorageError;
use async_trait::async_trait;
use groove_core::{PersistenceAdapter, PlayerSettings, Playlist, Result, Track};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Keeps collections in memory for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    tracks: RwLock<Vec<Track>>,
    playlists: RwLock<Vec<Playlist>>,
    settings: RwLock<PlayerSettings>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a library and playlists
    pub fn with_contents(tracks: Vec<Track>, playlists: Vec<Playlist>) -> Self {
        Self {
            tracks: RwLock::new(tracks),
            playlists: RwLock::new(playlists),
            ..Self::default()
        }
    }

    /// Make every subsequent save fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves across all collections
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable.into());
        }
        Ok(())
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl PersistenceAdapter for MemoryStore {
    async fn load_tracks(&self) -> Result<Vec<Track>> {
        Ok(self.tracks.read().await.clone())
    }

    async fn save_tracks(&self, tracks: &[Track]) -> Result<()> {
        self.check_writable()?;
        *self.tracks.write().await = tracks.to_vec();
        self.record_write();
        Ok(())
    }

    async fn load_playlists(&self) -> Result<Vec<Playlist>> {
        Ok(self.playlists.read().await.clone())
    }

    async fn save_playlists(&self, playlists: &[Playlist]) -> Result<()> {
        self.check_writable()?;
        *self.playlists.write().await = playlists.to_vec();
        self.record_write();
        Ok(())
    }

    async fn load_settings(&self) -> Result<PlayerSettings> {
        Ok(*self.settings.read().await)
    }

    async fn save_settings(&self, settings: &PlayerSettings) -> Result<()> {
        self.check_writable()?;
        *self.settings.write().await = *settings;
        self.record_write();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_then_load_tracks() {
        let store = MemoryStore::new();
        let tracks = vec![Track::new("/a.mp3", "A", "Artist")];

        store.save_tracks(&tracks).await.unwrap();

        assert_eq!(store.load_tracks().await.unwrap(), tracks);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn failing_writes_leave_contents_untouched() {
        let store = MemoryStore::with_contents(vec![Track::new("/a.mp3", "A", "Artist")], vec![]);
        store.set_fail_writes(true);

        let result = store.save_tracks(&[]).await;

        assert!(result.is_err());
        assert_eq!(store.load_tracks().await.unwrap().len(), 1);
        assert_eq!(store.write_count(), 0);
    }
}
