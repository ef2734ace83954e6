//! Playback Primitive contract
//!
//! The transport drives an opaque backend (native audio device, media
//! element, or the headless simulator) through this trait. Backends
//! report progress, play/pause changes and natural track completion by
//! sending [`BackendEvent`]s on the channel they were constructed with.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;

/// Notification raised by a backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackendEvent {
    /// Periodic position report (every progress interval while loaded)
    Progress {
        position: Duration,
        duration: Duration,
    },

    /// Backend started or stopped producing audio
    StateChanged { is_playing: bool },

    /// Current source played to its end
    ///
    /// Sent exactly once per natural completion.
    Ended,
}

/// Sending half handed to a backend at construction
pub type BackendEventSender = mpsc::UnboundedSender<BackendEvent>;

/// Receiving half consumed by the event pump
pub type BackendEventReceiver = mpsc::UnboundedReceiver<BackendEvent>;

/// Create a backend event channel
pub fn backend_channel() -> (BackendEventSender, BackendEventReceiver) {
    mpsc::unbounded_channel()
}

/// Opaque audio playback capability
///
/// Every call resolves once the backend has settled. Implementations must
/// be shareable across tasks; the transport never holds its own lock
/// while awaiting them.
#[async_trait]
pub trait PlaybackBackend: Send + Sync {
    /// Short backend name for logs ("desktop", "headless")
    fn name(&self) -> &'static str;

    /// Load a source, replacing whatever was loaded
    ///
    /// The source starts paused at position zero.
    ///
    /// # Returns
    /// * `Ok(())` - Source is ready to play
    /// * `Err(_)` - Unsupported format, corrupt file, I/O error
    async fn load(&self, url: &str) -> Result<()>;

    /// Start or resume playback of the loaded source
    async fn play(&self) -> Result<()>;

    /// Pause playback
    async fn pause(&self) -> Result<()>;

    /// Seek within the loaded source
    async fn seek(&self, position: Duration) -> Result<()>;

    /// Set output volume (0.0-1.0)
    async fn set_volume(&self, volume: f32) -> Result<()>;

    /// Stop playback and drop the loaded source
    ///
    /// Called on shutdown. Defaults to pausing.
    async fn release(&self) -> Result<()> {
        self.pause().await
    }
}
