//! Groove - Playback Management
//!
//! Platform-agnostic play queue and transport state machine for Groove.
//!
//! This crate provides:
//! - Play queue with a current position (append, play-next, remove, clear)
//! - Next/previous resolution over the queue or the library
//! - Shuffle and repeat modes (Off, All, One)
//! - Volume control (0.0-1.0, mute/unmute)
//! - Seek within the loaded track
//! - Playback events on a broadcast channel
//!
//! # Architecture
//!
//! `groove-playback` never touches an audio device:
//! - Audio output is a [`PlaybackBackend`] supplied by the platform
//! - The library is passed in as a slice, never owned
//! - [`HeadlessBackend`] runs everything on a virtual clock
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use groove_core::Track;
//! use groove_playback::{HeadlessBackend, HeadlessConfig, PlaybackConfig, Transport};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> groove_playback::Result<()> {
//! let backend = Arc::new(HeadlessBackend::silent(HeadlessConfig::default()));
//! let transport = Transport::new(backend, &PlaybackConfig::default());
//!
//! let library = vec![
//!     Track::new("/music/one.mp3", "One", "Artist"),
//!     Track::new("/music/two.mp3", "Two", "Artist"),
//! ];
//!
//! transport.play_track(library[0].clone()).await?;
//! transport.next_track(&library).await?;
//!
//! assert_eq!(transport.current_track().await, Some(library[1].clone()));
//! # Ok(())
//! # }
//! ```
//!
//! # Example: Shuffle and Repeat
//!
//! ```rust
//! use groove_playback::{HeadlessBackend, HeadlessConfig, PlaybackConfig, RepeatMode, Transport};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let backend = Arc::new(HeadlessBackend::silent(HeadlessConfig::default()));
//! let transport = Transport::new(backend, &PlaybackConfig::default());
//!
//! assert!(transport.toggle_shuffle().await);
//! assert_eq!(transport.toggle_repeat().await, RepeatMode::All);
//! # }
//! ```

mod backend;
mod error;
mod events;
mod headless;
pub mod navigation;
mod queue;
mod transport;
pub mod types;
mod volume;

// Public exports
pub use backend::{
    backend_channel, BackendEvent, BackendEventReceiver, BackendEventSender, PlaybackBackend,
};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use headless::{HeadlessBackend, HeadlessConfig};
pub use queue::PlayQueue;
pub use transport::Transport;
pub use types::{PlaybackConfig, PlaybackState, RepeatMode, TransportSnapshot};
pub use volume::Volume;
