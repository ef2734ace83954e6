//! Music service
//!
//! The single, explicitly constructed entry point for UIs. Owns the track
//! library and playlist store, shares the transport, and exposes every
//! user command. Commands resolve once their side effects (including any
//! backend call) have settled.

use crate::error::{Result, ServiceError};
use crate::library::TrackLibrary;
use crate::playlists::PlaylistStore;
use groove_core::{
    PersistenceAdapter, PlayerSettings, Playlist, PlaylistId, RepeatMode, Track, TrackId,
    UpdateTrack,
};
use groove_playback::{BackendEventReceiver, PlaybackEvent, Transport, TransportSnapshot};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Music player facade
pub struct MusicService {
    library: TrackLibrary,
    playlists: PlaylistStore,
    transport: Arc<Transport>,
    store: Arc<dyn PersistenceAdapter>,
}

impl MusicService {
    /// Load library, playlists and saved settings from `store`
    ///
    /// Unreadable settings fall back to defaults.
    pub async fn open(
        store: Arc<dyn PersistenceAdapter>,
        transport: Arc<Transport>,
    ) -> Result<Self> {
        let library = TrackLibrary::load(Arc::clone(&store)).await?;
        let playlists = PlaylistStore::load(Arc::clone(&store)).await?;

        let settings = match store.load_settings().await {
            Ok(settings) => settings,
            Err(err) => {
                warn!(error = %err, "Failed to load player settings, using defaults");
                PlayerSettings::default()
            }
        };
        transport.restore_settings(settings).await?;

        info!(
            tracks = library.len().await,
            playlists = playlists.all().await.len(),
            backend = transport.backend_name(),
            "Music service ready"
        );

        Ok(Self {
            library,
            playlists,
            transport,
            store,
        })
    }

    /// Feed backend notifications into the transport
    ///
    /// Runs until the backend drops its sender.
    pub fn spawn_event_pump(self: &Arc<Self>, mut events: BackendEventReceiver) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let library = service.library.all_tracks().await;
                if let Err(err) = service.transport.handle_backend_event(event, &library).await {
                    warn!(error = %err, "Backend event handling failed");
                }
            }
            debug!("Backend event channel closed");
        })
    }

    /// Subscribe to playback events
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.transport.subscribe()
    }

    /// Shared transport
    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    /// Point-in-time transport view
    pub async fn snapshot(&self) -> TransportSnapshot {
        self.transport.snapshot().await
    }

    /// Pause and release the backend
    pub async fn shutdown(&self) -> Result<()> {
        self.transport.shutdown().await?;
        Ok(())
    }

    // ===== Playback Control =====

    /// Play a library track
    pub async fn play_track(&self, track_id: &TrackId) -> Result<()> {
        let track = self.library_track(track_id).await?;
        self.transport.play_track(track).await?;
        Ok(())
    }

    /// Pause playback (no-op unless playing)
    pub async fn pause_track(&self) -> Result<()> {
        self.transport.pause().await?;
        Ok(())
    }

    /// Resume a paused track (no-op while idle)
    pub async fn resume_track(&self) -> Result<()> {
        self.transport.resume().await?;
        Ok(())
    }

    /// Seek to `seconds` (clamped into the current track)
    pub async fn seek_to(&self, seconds: f64) -> Result<()> {
        self.transport.seek_to(seconds_to_duration(seconds)).await?;
        Ok(())
    }

    /// Set volume, clamped into `[0, 1]`; returns the stored level
    pub async fn set_volume(&self, level: f32) -> Result<f32> {
        let stored = self.transport.set_volume(level).await?;
        self.save_settings().await;
        Ok(stored)
    }

    /// Toggle mute, returning whether audio is now muted
    pub async fn toggle_mute(&self) -> Result<bool> {
        self.transport.toggle_mute().await?;
        Ok(self.transport.is_muted().await)
    }

    /// Advance through the queue, or the library when the queue is empty
    pub async fn next_track(&self) -> Result<()> {
        let library = self.library.all_tracks().await;
        self.transport.next_track(&library).await?;
        Ok(())
    }

    /// Step back, wrapping from the first entry to the last
    pub async fn previous_track(&self) -> Result<()> {
        let library = self.library.all_tracks().await;
        self.transport.previous_track(&library).await?;
        Ok(())
    }

    /// Flip shuffle, returning the new flag
    pub async fn toggle_shuffle(&self) -> bool {
        let enabled = self.transport.toggle_shuffle().await;
        self.save_settings().await;
        enabled
    }

    /// Cycle repeat `off -> all -> one`, returning the new mode
    pub async fn toggle_repeat(&self) -> RepeatMode {
        let mode = self.transport.toggle_repeat().await;
        self.save_settings().await;
        mode
    }

    // ===== Library =====

    /// Append tracks to the library, returning the new size
    pub async fn add_tracks(&self, tracks: Vec<Track>) -> usize {
        self.library.add_tracks(tracks).await
    }

    /// Remove a track from the library
    ///
    /// Drops its queue entries and stops playback if it is current.
    /// Playlists keep the ID. Returns `None` if no such track exists.
    pub async fn remove_track(&self, track_id: &TrackId) -> Result<Option<Track>> {
        let Some(removed) = self.library.remove_track(track_id).await else {
            return Ok(None);
        };
        self.transport.on_track_removed(track_id).await?;
        Ok(Some(removed))
    }

    /// Empty the library, the queue and current playback
    pub async fn clear_tracks(&self) -> Result<()> {
        self.library.clear().await;
        self.transport.on_library_cleared().await?;
        Ok(())
    }

    /// Replace metadata of a library track
    pub async fn update_track(&self, track_id: &TrackId, update: UpdateTrack) -> Result<Track> {
        let updated = self
            .library
            .update_track(track_id, update)
            .await
            .ok_or_else(|| ServiceError::TrackNotFound(track_id.clone()))?;
        self.transport.refresh_track(&updated).await;
        Ok(updated)
    }

    /// Full library in insertion order
    pub async fn tracks(&self) -> Arc<Vec<Track>> {
        self.library.all_tracks().await
    }

    /// Library tracks matching `query` on title, artist or album
    pub async fn search(&self, query: &str) -> Vec<Track> {
        self.library.search(query).await
    }

    // ===== Queue =====

    /// Append a library track to the play queue
    pub async fn add_to_queue(&self, track_id: &TrackId) -> Result<()> {
        let track = self.library_track(track_id).await?;
        self.transport.add_to_queue(track).await;
        Ok(())
    }

    /// Queue a library track to play right after the current one
    pub async fn play_next(&self, track_id: &TrackId) -> Result<()> {
        let track = self.library_track(track_id).await?;
        self.transport.play_next(track).await;
        Ok(())
    }

    /// Empty the play queue; navigation falls back to the library
    pub async fn clear_queue(&self) {
        self.transport.clear_queue().await;
    }

    /// Remove the queue entry at `index` (`None` if out of range)
    pub async fn remove_from_queue(&self, index: usize) -> Option<Track> {
        self.transport.remove_from_queue(index).await
    }

    // ===== Playlists =====

    /// Create a playlist; the name must not be blank
    pub async fn create_playlist(&self, name: &str, track_ids: Vec<TrackId>) -> Result<Playlist> {
        self.playlists.create(name, track_ids).await
    }

    /// Rename a playlist; the name must not be blank
    pub async fn rename_playlist(&self, playlist_id: &PlaylistId, name: &str) -> Result<()> {
        self.playlists.rename(playlist_id, name).await
    }

    /// Delete a playlist; tracks and playback are unaffected
    pub async fn delete_playlist(&self, playlist_id: &PlaylistId) -> Result<Playlist> {
        self.playlists.delete(playlist_id).await
    }

    /// Append a track ID to a playlist (duplicates allowed)
    pub async fn add_track_to_playlist(
        &self,
        playlist_id: &PlaylistId,
        track_id: TrackId,
    ) -> Result<()> {
        self.playlists.add_track(playlist_id, track_id).await
    }

    /// Remove every occurrence of a track, returning how many were removed
    pub async fn remove_track_from_playlist(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
    ) -> Result<usize> {
        self.playlists.remove_track(playlist_id, track_id).await
    }

    /// All playlists in creation order
    pub async fn playlists(&self) -> Vec<Playlist> {
        self.playlists.all().await
    }

    /// Playlist with exactly this (trimmed) name
    pub async fn find_playlist(&self, name: &str) -> Option<Playlist> {
        self.playlists.find_by_name(name).await
    }

    /// Library tracks of a playlist, skipping IDs no longer in the library
    pub async fn playlist_tracks(&self, playlist_id: &PlaylistId) -> Result<Vec<Track>> {
        let library = self.library.all_tracks().await;
        self.playlists.playlist_tracks(playlist_id, &library).await
    }

    /// Replace the play queue with a playlist and play entry `start`
    ///
    /// An empty playlist leaves playback unchanged.
    pub async fn play_playlist(&self, playlist_id: &PlaylistId, start: usize) -> Result<()> {
        let tracks = self.playlist_tracks(playlist_id).await?;
        if tracks.is_empty() {
            debug!(playlist_id = %playlist_id, "Nothing to play");
            return Ok(());
        }
        self.transport.replace_queue(tracks, start).await?;
        Ok(())
    }

    /// All playlists as a pretty-printed JSON document
    pub async fn export_playlists(&self) -> Result<String> {
        self.playlists.export_json().await
    }

    /// Add playlists from an export document, with fresh IDs
    pub async fn import_playlists(&self, json: &str) -> Result<Vec<Playlist>> {
        self.playlists.import_json(json).await
    }

    // ===== Helpers =====

    async fn library_track(&self, track_id: &TrackId) -> Result<Track> {
        self.library
            .get(track_id)
            .await
            .ok_or_else(|| ServiceError::TrackNotFound(track_id.clone()))
    }

    async fn save_settings(&self) {
        let settings = self.transport.settings().await;
        if let Err(err) = self.store.save_settings(&settings).await {
            error!(error = %err, "Failed to save player settings");
        }
    }
}

/// Seconds to a Duration; negative and NaN become zero
fn seconds_to_duration(seconds: f64) -> Duration {
    if seconds.is_nan() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
}
