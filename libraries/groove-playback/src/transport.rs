//! Transport state machine
//!
//! Owns the current track, play/pause state, volume, shuffle/repeat flags
//! and the play queue, and drives a [`PlaybackBackend`].
//!
//! State lives behind a Tokio mutex that is only held while mutating it;
//! every backend call happens with the lock released. A newer load
//! supersedes an in-flight one through `load_generation`: when a load
//! settles after a newer one started, its result is discarded.
//!
//! The library is not owned here. Operations that fall back to it
//! (`next_track`, `previous_track`, backend `Ended`) take the current
//! library order as a slice.

use crate::{
    backend::{BackendEvent, PlaybackBackend},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    navigation::{resolve_next, resolve_previous, NextStep},
    queue::PlayQueue,
    types::{PlaybackConfig, PlaybackState, RepeatMode, TransportSnapshot},
    volume::Volume,
};
use groove_core::{PlayerSettings, Track, TrackId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

struct TransportInner {
    /// Loaded track (`None` while idle)
    current: Option<Track>,

    state: PlaybackState,

    /// Last position/duration reported by the backend
    position: Duration,
    duration: Duration,

    volume: Volume,
    shuffle: bool,
    repeat: RepeatMode,
    queue: PlayQueue,

    /// Track the navigation cursor refers to
    ///
    /// Set when a track is resolved or played directly, and kept when its
    /// load fails so "next" continues after it.
    anchor: Option<TrackId>,

    rng: StdRng,
}

impl TransportInner {
    /// Queue position navigation continues from
    ///
    /// The stored position, even when the current track was played from
    /// outside the queue or its entry was removed. `None` until something
    /// is anchored, so the queue then starts at its first entry.
    fn queue_cursor(&self) -> Option<usize> {
        self.anchor.as_ref()?;
        (!self.queue.is_empty()).then(|| self.queue.position())
    }

    /// Index of the anchored track in the library
    fn library_cursor(&self, library: &[Track]) -> Option<usize> {
        let anchor = self.anchor.as_ref()?;
        library.iter().position(|track| &track.id == anchor)
    }

    fn queue_changed(&self) -> PlaybackEvent {
        PlaybackEvent::QueueChanged {
            length: self.queue.len(),
            position: self.queue.position(),
        }
    }

    fn volume_changed(&self) -> PlaybackEvent {
        PlaybackEvent::VolumeChanged {
            level: self.volume.level(),
            is_muted: self.volume.is_muted(),
        }
    }
}

/// Playback transport
///
/// Shared as `Arc<Transport>`; every method takes `&self`.
pub struct Transport {
    backend: Arc<dyn PlaybackBackend>,
    inner: Mutex<TransportInner>,
    load_generation: AtomicU64,
    events: broadcast::Sender<PlaybackEvent>,
}

impl Transport {
    /// Create an idle transport over `backend`
    pub fn new(backend: Arc<dyn PlaybackBackend>, config: &PlaybackConfig) -> Self {
        Self::with_rng(backend, config, StdRng::from_entropy())
    }

    /// Create a transport with a deterministic shuffle sequence
    pub fn with_seed(backend: Arc<dyn PlaybackBackend>, config: &PlaybackConfig, seed: u64) -> Self {
        Self::with_rng(backend, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(backend: Arc<dyn PlaybackBackend>, config: &PlaybackConfig, rng: StdRng) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            backend,
            inner: Mutex::new(TransportInner {
                current: None,
                state: PlaybackState::Idle,
                position: Duration::ZERO,
                duration: Duration::ZERO,
                volume: Volume::new(config.volume),
                shuffle: config.shuffle,
                repeat: config.repeat,
                queue: PlayQueue::new(),
                anchor: None,
                rng,
            }),
            load_generation: AtomicU64::new(0),
            events,
        }
    }

    /// Subscribe to playback events
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Name of the backend in use
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    // ===== Playback Control =====

    /// Load and play `track`
    ///
    /// If the track is in the play queue the queue position moves to it.
    ///
    /// # Errors
    /// `PlaybackError::LoadFailed` if the backend rejects the source. The
    /// transport is then idle.
    pub async fn play_track(&self, track: Track) -> Result<()> {
        {
            let mut inner = self.inner.lock().await;
            let at_position = inner.queue.current().is_some_and(|entry| entry.id == track.id);
            if !at_position {
                if let Some(index) = inner.queue.index_of(&track.id) {
                    inner.queue.set_position(index);
                }
            }
            inner.anchor = Some(track.id.clone());
        }

        self.start(track).await
    }

    /// Pause playback (no-op unless playing)
    pub async fn pause(&self) -> Result<()> {
        if self.inner.lock().await.state != PlaybackState::Playing {
            return Ok(());
        }

        self.backend.pause().await?;

        let mut inner = self.inner.lock().await;
        if inner.state == PlaybackState::Playing {
            self.transition(&mut inner, PlaybackState::Paused);
        }
        Ok(())
    }

    /// Resume playback (no-op unless paused)
    pub async fn resume(&self) -> Result<()> {
        if self.inner.lock().await.state != PlaybackState::Paused {
            return Ok(());
        }

        self.backend.play().await?;

        let mut inner = self.inner.lock().await;
        if inner.state == PlaybackState::Paused {
            self.transition(&mut inner, PlaybackState::Playing);
        }
        Ok(())
    }

    /// Stop playback and clear the current track
    pub async fn stop(&self) -> Result<()> {
        let was_loaded = {
            let mut inner = self.inner.lock().await;
            let was_loaded = inner.state.is_loaded();
            inner.current = None;
            inner.anchor = None;
            inner.position = Duration::ZERO;
            inner.duration = Duration::ZERO;
            self.transition(&mut inner, PlaybackState::Idle);
            was_loaded
        };

        if was_loaded {
            self.backend.pause().await?;
        }
        Ok(())
    }

    /// Pause and release the backend
    pub async fn shutdown(&self) -> Result<()> {
        self.stop().await?;
        self.backend.release().await?;
        info!(backend = self.backend.name(), "Transport shut down");
        Ok(())
    }

    // ===== Seek =====

    /// Seek within the current track
    ///
    /// Clamped to `[0, duration]` once the duration is known. No-op while
    /// idle.
    pub async fn seek_to(&self, position: Duration) -> Result<()> {
        let position = {
            let inner = self.inner.lock().await;
            if !inner.state.is_loaded() {
                return Ok(());
            }
            if inner.duration > Duration::ZERO {
                position.min(inner.duration)
            } else {
                position
            }
        };

        self.backend.seek(position).await?;

        let mut inner = self.inner.lock().await;
        if inner.state.is_loaded() {
            inner.position = position;
            self.emit(PlaybackEvent::PositionUpdate {
                position_ms: millis(position),
                duration_ms: millis(inner.duration),
            });
        }
        Ok(())
    }

    // ===== Volume =====

    /// Set volume, clamped into `[0, 1]`
    ///
    /// Returns the stored level.
    pub async fn set_volume(&self, level: f32) -> Result<f32> {
        let (stored, effective) = {
            let mut inner = self.inner.lock().await;
            let stored = inner.volume.set_level(level);
            (stored, inner.volume.effective())
        };

        self.backend.set_volume(effective).await?;
        self.emit(self.inner.lock().await.volume_changed());
        Ok(stored)
    }

    /// Mute output without changing the stored level
    pub async fn mute(&self) -> Result<()> {
        self.update_volume(Volume::mute).await
    }

    /// Restore output to the stored level
    pub async fn unmute(&self) -> Result<()> {
        self.update_volume(Volume::unmute).await
    }

    /// Toggle mute
    pub async fn toggle_mute(&self) -> Result<()> {
        self.update_volume(Volume::toggle_mute).await
    }

    async fn update_volume(&self, update: impl FnOnce(&mut Volume)) -> Result<()> {
        let effective = {
            let mut inner = self.inner.lock().await;
            update(&mut inner.volume);
            inner.volume.effective()
        };

        self.backend.set_volume(effective).await?;
        self.emit(self.inner.lock().await.volume_changed());
        Ok(())
    }

    // ===== Navigation =====

    /// Advance to the next track
    ///
    /// Resolves against the play queue when it has entries, otherwise
    /// against `library`. When nothing resolves, playback does not change.
    pub async fn next_track(&self, library: &[Track]) -> Result<()> {
        let Some(track) = self.resolve_next_track(library).await else {
            debug!("Next: nothing to advance to");
            return Ok(());
        };
        self.start(track).await
    }

    /// Go back to the previous track
    ///
    /// Always cycles, wrapping from the first entry to the last. No-op
    /// while nothing is current.
    pub async fn previous_track(&self, library: &[Track]) -> Result<()> {
        let track = {
            let mut inner = self.inner.lock().await;
            if inner.current.is_none() {
                return Ok(());
            }

            let track = if inner.queue.is_empty() {
                let cursor = inner.library_cursor(library);
                resolve_previous(library.len(), cursor).map(|index| library[index].clone())
            } else {
                let cursor = inner.queue_cursor();
                resolve_previous(inner.queue.len(), cursor).and_then(|index| {
                    inner.queue.set_position(index);
                    inner.queue.current().cloned()
                })
            };

            let Some(track) = track else {
                return Ok(());
            };
            inner.anchor = Some(track.id.clone());
            track
        };

        self.start(track).await
    }

    async fn resolve_next_track(&self, library: &[Track]) -> Option<Track> {
        let mut inner = self.inner.lock().await;
        let inner = &mut *inner;
        let use_queue = !inner.queue.is_empty();

        let (len, cursor) = if use_queue {
            (inner.queue.len(), inner.queue_cursor())
        } else {
            (library.len(), inner.library_cursor(library))
        };

        let step = resolve_next(len, cursor, inner.shuffle, inner.repeat, &mut inner.rng);
        debug!(?step, len, ?cursor, "Resolved next");

        let track = match step {
            NextStep::Stop => return None,
            NextStep::ReplayCurrent => inner.current.clone()?,
            NextStep::Advance(index) if use_queue => {
                inner.queue.set_position(index);
                inner.queue.current().cloned()?
            }
            NextStep::Advance(index) => library.get(index).cloned()?,
        };

        inner.anchor = Some(track.id.clone());
        Some(track)
    }

    // ===== Shuffle & Repeat =====

    /// Flip shuffle, returning the new flag
    pub async fn toggle_shuffle(&self) -> bool {
        let mut inner = self.inner.lock().await;
        inner.shuffle = !inner.shuffle;
        self.emit(PlaybackEvent::ShuffleChanged {
            enabled: inner.shuffle,
        });
        inner.shuffle
    }

    /// Set shuffle
    pub async fn set_shuffle(&self, enabled: bool) {
        let mut inner = self.inner.lock().await;
        if inner.shuffle != enabled {
            inner.shuffle = enabled;
            self.emit(PlaybackEvent::ShuffleChanged { enabled });
        }
    }

    /// Cycle repeat mode `off -> all -> one -> off`, returning the new mode
    pub async fn toggle_repeat(&self) -> RepeatMode {
        let mut inner = self.inner.lock().await;
        inner.repeat = inner.repeat.cycle();
        self.emit(PlaybackEvent::RepeatChanged { mode: inner.repeat });
        inner.repeat
    }

    /// Set repeat mode
    pub async fn set_repeat(&self, mode: RepeatMode) {
        let mut inner = self.inner.lock().await;
        if inner.repeat != mode {
            inner.repeat = mode;
            self.emit(PlaybackEvent::RepeatChanged { mode });
        }
    }

    // ===== Queue Management =====

    /// Append `track` to the play queue
    ///
    /// Starting a queue while a track is current puts that track first so
    /// the queue continues from it.
    pub async fn add_to_queue(&self, track: Track) {
        let mut inner = self.inner.lock().await;
        Self::seed_queue(&mut inner);
        inner.queue.push(track);
        self.emit(inner.queue_changed());
    }

    /// Insert `track` so it plays right after the current one
    pub async fn play_next(&self, track: Track) {
        let mut inner = self.inner.lock().await;
        if inner.queue.is_empty() {
            Self::seed_queue(&mut inner);
            inner.queue.insert_next(track);
        } else {
            let index = inner.queue_cursor().map_or(0, |cursor| cursor + 1);
            inner.queue.insert(index, track);
        }
        self.emit(inner.queue_changed());
    }

    fn seed_queue(inner: &mut TransportInner) {
        if !inner.queue.is_empty() {
            return;
        }
        if let Some(current) = inner.current.clone() {
            inner.anchor = Some(current.id.clone());
            inner.queue.push(current);
        }
    }

    /// Remove the queue entry at `index`
    ///
    /// Playback of the current track continues.
    pub async fn remove_from_queue(&self, index: usize) -> Option<Track> {
        let mut inner = self.inner.lock().await;
        let removed = inner.queue.remove(index)?;
        self.emit(inner.queue_changed());
        Some(removed)
    }

    /// Empty the play queue
    ///
    /// Navigation falls back to the library.
    pub async fn clear_queue(&self) {
        let mut inner = self.inner.lock().await;
        inner.queue.clear();
        self.emit(inner.queue_changed());
    }

    /// Replace the play queue and play the entry at `start`
    ///
    /// An empty `tracks` only clears the queue.
    pub async fn replace_queue(&self, tracks: Vec<Track>, start: usize) -> Result<()> {
        let track = {
            let mut inner = self.inner.lock().await;
            inner.queue.replace(tracks, start);
            self.emit(inner.queue_changed());

            let Some(track) = inner.queue.current().cloned() else {
                return Ok(());
            };
            inner.anchor = Some(track.id.clone());
            track
        };

        self.start(track).await
    }

    // ===== Library Notifications =====

    /// A track left the library
    ///
    /// Drops its queue entries and stops playback if it is current.
    pub async fn on_track_removed(&self, track_id: &TrackId) -> Result<()> {
        let is_current = {
            let mut inner = self.inner.lock().await;
            if inner.queue.remove_track(track_id) > 0 {
                self.emit(inner.queue_changed());
            }
            if inner.anchor.as_ref() == Some(track_id) && inner.current.is_none() {
                inner.anchor = None;
            }
            inner.current.as_ref().is_some_and(|track| &track.id == track_id)
        };

        if is_current {
            info!(track_id = %track_id, "Current track removed from library");
            self.stop().await?;
        }
        Ok(())
    }

    /// The library was emptied
    pub async fn on_library_cleared(&self) -> Result<()> {
        {
            let mut inner = self.inner.lock().await;
            if !inner.queue.is_empty() {
                inner.queue.clear();
                self.emit(inner.queue_changed());
            }
        }
        self.stop().await
    }

    /// Track metadata changed
    pub async fn refresh_track(&self, track: &Track) {
        let mut inner = self.inner.lock().await;
        inner.queue.refresh_track(track);
        if inner.current.as_ref().is_some_and(|current| current.id == track.id) {
            if inner.duration == Duration::ZERO {
                inner.duration = track.duration().unwrap_or_default();
            }
            inner.current = Some(track.clone());
        }
    }

    // ===== Backend Events =====

    /// Apply a backend notification
    ///
    /// `Ended` runs the same resolution as [`Transport::next_track`] once;
    /// when nothing resolves the transport stays paused on the finished
    /// track.
    pub async fn handle_backend_event(&self, event: BackendEvent, library: &[Track]) -> Result<()> {
        match event {
            BackendEvent::Progress { position, duration } => {
                let mut inner = self.inner.lock().await;
                if inner.state.is_loaded() {
                    inner.position = position;
                    inner.duration = duration;
                    self.emit(PlaybackEvent::PositionUpdate {
                        position_ms: millis(position),
                        duration_ms: millis(duration),
                    });
                }
                Ok(())
            }
            BackendEvent::StateChanged { is_playing } => {
                let mut inner = self.inner.lock().await;
                if inner.state.is_loaded() {
                    let state = if is_playing {
                        PlaybackState::Playing
                    } else {
                        PlaybackState::Paused
                    };
                    self.transition(&mut inner, state);
                }
                Ok(())
            }
            BackendEvent::Ended => {
                {
                    let mut inner = self.inner.lock().await;
                    let Some(finished) = inner.current.as_ref().map(|track| track.id.clone())
                    else {
                        return Ok(());
                    };
                    debug!(track_id = %finished, "Track finished");
                    self.emit(PlaybackEvent::TrackFinished { track_id: finished });
                    self.transition(&mut inner, PlaybackState::Paused);
                }
                self.next_track(library).await
            }
        }
    }

    // ===== Settings =====

    /// Apply saved volume, shuffle and repeat
    pub async fn restore_settings(&self, settings: PlayerSettings) -> Result<()> {
        self.set_shuffle(settings.shuffle).await;
        self.set_repeat(settings.repeat).await;
        self.set_volume(settings.volume).await?;
        Ok(())
    }

    /// Current volume, shuffle and repeat
    pub async fn settings(&self) -> PlayerSettings {
        let inner = self.inner.lock().await;
        PlayerSettings {
            volume: inner.volume.level(),
            shuffle: inner.shuffle,
            repeat: inner.repeat,
        }
    }

    // ===== State Queries =====

    /// Point-in-time view of the transport
    pub async fn snapshot(&self) -> TransportSnapshot {
        let inner = self.inner.lock().await;
        TransportSnapshot {
            current_track: inner.current.clone(),
            state: inner.state,
            position: inner.position,
            duration: inner.duration,
            volume: inner.volume.level(),
            muted: inner.volume.is_muted(),
            shuffle: inner.shuffle,
            repeat: inner.repeat,
            queue: inner.queue.tracks().to_vec(),
            queue_position: inner.queue.position(),
        }
    }

    /// Currently loaded track
    pub async fn current_track(&self) -> Option<Track> {
        self.inner.lock().await.current.clone()
    }

    /// Transport state
    pub async fn state(&self) -> PlaybackState {
        self.inner.lock().await.state
    }

    /// Whether audio is playing
    pub async fn is_playing(&self) -> bool {
        self.inner.lock().await.state == PlaybackState::Playing
    }

    /// Last reported position
    pub async fn position(&self) -> Duration {
        self.inner.lock().await.position
    }

    /// Last reported duration
    pub async fn duration(&self) -> Duration {
        self.inner.lock().await.duration
    }

    /// Stored volume level
    pub async fn volume(&self) -> f32 {
        self.inner.lock().await.volume.level()
    }

    /// Whether output is muted
    pub async fn is_muted(&self) -> bool {
        self.inner.lock().await.volume.is_muted()
    }

    /// Shuffle flag
    pub async fn shuffle(&self) -> bool {
        self.inner.lock().await.shuffle
    }

    /// Repeat mode
    pub async fn repeat(&self) -> RepeatMode {
        self.inner.lock().await.repeat
    }

    /// Play queue contents
    pub async fn queue(&self) -> Vec<Track> {
        self.inner.lock().await.queue.tracks().to_vec()
    }

    /// Play queue position
    pub async fn queue_position(&self) -> usize {
        self.inner.lock().await.queue.position()
    }

    // ===== Internals =====

    /// Load `track`, apply volume and start it
    async fn start(&self, track: Track) -> Result<()> {
        let generation = self.load_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let volume = self.inner.lock().await.volume.effective();

        let outcome = self.load_and_play(&track.url, volume, generation).await;

        let mut inner = self.inner.lock().await;
        if self.load_generation.load(Ordering::SeqCst) != generation {
            debug!(track_id = %track.id, "Load superseded by a newer request");
            return Ok(());
        }

        match outcome {
            Ok(()) => {
                let previous_track_id = inner.current.take().map(|previous| previous.id);
                inner.position = Duration::ZERO;
                inner.duration = track.duration().unwrap_or_default();
                info!(track_id = %track.id, title = %track.title, "Now playing");
                self.emit(PlaybackEvent::TrackChanged {
                    track_id: track.id.clone(),
                    previous_track_id,
                });
                inner.current = Some(track);
                self.transition(&mut inner, PlaybackState::Playing);
                Ok(())
            }
            Err(err) => {
                warn!(
                    track_id = %track.id,
                    url = %track.url,
                    backend = self.backend.name(),
                    error = %err,
                    "Failed to play track"
                );
                inner.current = None;
                inner.position = Duration::ZERO;
                inner.duration = Duration::ZERO;
                self.transition(&mut inner, PlaybackState::Idle);

                let error = PlaybackError::LoadFailed {
                    title: track.title,
                    reason: err.to_string(),
                };
                self.emit(PlaybackEvent::Error {
                    message: error.to_string(),
                });
                Err(error)
            }
        }
    }

    async fn load_and_play(&self, url: &str, volume: f32, generation: u64) -> Result<()> {
        if let Err(err) = self.backend.load(url).await {
            // The previous source may still be audible, unless a newer
            // load already replaced it
            if self.load_generation.load(Ordering::SeqCst) == generation {
                if let Err(pause_err) = self.backend.pause().await {
                    debug!(error = %pause_err, "Pause after failed load");
                }
            }
            return Err(err);
        }
        if self.load_generation.load(Ordering::SeqCst) != generation {
            return Ok(());
        }
        self.backend.set_volume(volume).await?;
        self.backend.play().await
    }

    fn transition(&self, inner: &mut TransportInner, state: PlaybackState) {
        if inner.state != state {
            debug!(from = ?inner.state, to = ?state, "Transport state");
            inner.state = state;
            self.emit(PlaybackEvent::StateChanged { state });
        }
    }

    fn emit(&self, event: PlaybackEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
