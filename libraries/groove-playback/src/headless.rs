//! Headless playback backend
//!
//! Simulates a media element without an audio device: sources "play" by
//! advancing a virtual clock. Used for servers, CI and the `headless`
//! backend setting. The clock either runs on its own
//! ([`HeadlessBackend::spawn_clock`]) or is driven by hand with
//! [`HeadlessBackend::advance`].

use crate::backend::{BackendEvent, BackendEventSender, PlaybackBackend};
use crate::error::{PlaybackError, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Settings for the simulated backend
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Duration assigned to every loaded source
    pub track_duration: Duration,

    /// File extensions rejected by `load` (lowercase, without dot)
    pub unsupported_extensions: Vec<String>,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            track_duration: Duration::from_secs(180),
            unsupported_extensions: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
struct HeadlessState {
    url: Option<String>,
    playing: bool,
    position: Duration,
    duration: Duration,
    volume: f32,
}

/// Virtual-clock backend
pub struct HeadlessBackend {
    config: HeadlessConfig,
    state: Mutex<HeadlessState>,
    events: Option<BackendEventSender>,
}

impl HeadlessBackend {
    /// Create a backend that reports events on `events`
    pub fn new(config: HeadlessConfig, events: BackendEventSender) -> Self {
        Self {
            config,
            state: Mutex::new(HeadlessState {
                volume: 1.0,
                ..HeadlessState::default()
            }),
            events: Some(events),
        }
    }

    /// Create a backend that reports nothing
    pub fn silent(config: HeadlessConfig) -> Self {
        Self {
            config,
            state: Mutex::new(HeadlessState {
                volume: 1.0,
                ..HeadlessState::default()
            }),
            events: None,
        }
    }

    /// Advance the virtual clock by `elapsed`
    ///
    /// Emits a progress report while loaded. Reaching the end stops the
    /// clock and emits `StateChanged { is_playing: false }` then `Ended`.
    pub async fn advance(&self, elapsed: Duration) {
        let mut state = self.state.lock().await;
        if state.url.is_none() {
            return;
        }
        if !state.playing {
            self.emit(BackendEvent::Progress {
                position: state.position,
                duration: state.duration,
            });
            return;
        }

        state.position = (state.position + elapsed).min(state.duration);
        self.emit(BackendEvent::Progress {
            position: state.position,
            duration: state.duration,
        });

        if state.position >= state.duration {
            state.playing = false;
            self.emit(BackendEvent::StateChanged { is_playing: false });
            self.emit(BackendEvent::Ended);
        }
    }

    /// Run the virtual clock on a Tokio task, ticking every `interval`
    pub fn spawn_clock(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let backend = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                backend.advance(interval).await;
            }
        })
    }

    /// Currently loaded source
    pub async fn loaded_url(&self) -> Option<String> {
        self.state.lock().await.url.clone()
    }

    /// Whether the virtual clock is running
    pub async fn is_playing(&self) -> bool {
        self.state.lock().await.playing
    }

    /// Virtual playback position
    pub async fn position(&self) -> Duration {
        self.state.lock().await.position
    }

    /// Last volume set
    pub async fn volume(&self) -> f32 {
        self.state.lock().await.volume
    }

    fn emit(&self, event: BackendEvent) {
        if let Some(events) = &self.events {
            // Receiver gone means the transport shut down
            let _ = events.send(event);
        }
    }

    fn is_supported(&self, url: &str) -> bool {
        let extension = Path::new(url)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        match extension {
            Some(ext) => !self.config.unsupported_extensions.contains(&ext),
            None => true,
        }
    }
}

#[async_trait]
impl PlaybackBackend for HeadlessBackend {
    fn name(&self) -> &'static str {
        "headless"
    }

    async fn load(&self, url: &str) -> Result<()> {
        if url.trim().is_empty() {
            return Err(PlaybackError::backend("empty source"));
        }
        if !self.is_supported(url) {
            return Err(PlaybackError::backend(format!("unsupported format: {url}")));
        }

        let mut state = self.state.lock().await;
        let was_playing = state.playing;
        state.url = Some(url.to_string());
        state.playing = false;
        state.position = Duration::ZERO;
        state.duration = self.config.track_duration;

        if was_playing {
            self.emit(BackendEvent::StateChanged { is_playing: false });
        }
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.url.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        if state.position >= state.duration {
            state.position = Duration::ZERO;
        }
        if !state.playing {
            state.playing = true;
            self.emit(BackendEvent::StateChanged { is_playing: true });
        }
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.playing {
            state.playing = false;
            self.emit(BackendEvent::StateChanged { is_playing: false });
        }
        Ok(())
    }

    async fn seek(&self, position: Duration) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.url.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        state.position = position.min(state.duration);
        Ok(())
    }

    async fn set_volume(&self, volume: f32) -> Result<()> {
        self.state.lock().await.volume = volume.clamp(0.0, 1.0);
        Ok(())
    }

    async fn release(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        let was_playing = state.playing;
        *state = HeadlessState {
            volume: state.volume,
            ..HeadlessState::default()
        };
        if was_playing {
            self.emit(BackendEvent::StateChanged { is_playing: false });
        }
        Ok(())
    }
}
