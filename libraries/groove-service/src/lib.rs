//! Groove - Music Service
//!
//! Wires the track library, the playlist store and the transport into a
//! single service object handed to UIs.
//!
//! This crate provides:
//! - `TrackLibrary`: insertion-ordered tracks, search, metadata updates
//! - `PlaylistStore`: named track-ID lists, JSON import/export
//! - `MusicService`: every user command, plus the backend event pump
//!
//! # Example
//!
//! ```rust
//! use groove_core::Track;
//! use groove_playback::{HeadlessBackend, HeadlessConfig, PlaybackConfig, Transport};
//! use groove_service::MusicService;
//! use groove_storage::MemoryStore;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> groove_service::Result<()> {
//! let backend = Arc::new(HeadlessBackend::silent(HeadlessConfig::default()));
//! let transport = Arc::new(Transport::new(backend, &PlaybackConfig::default()));
//! let service = MusicService::open(Arc::new(MemoryStore::new()), transport).await?;
//!
//! let track = Track::new("/music/song.mp3", "Song", "Artist");
//! service.add_tracks(vec![track.clone()]).await;
//! service.play_track(&track.id).await?;
//!
//! assert!(service.snapshot().await.is_playing());
//! # Ok(())
//! # }
//! ```

mod error;
mod library;
mod playlists;
mod service;

pub use error::{Result, ServiceError};
pub use library::TrackLibrary;
pub use playlists::PlaylistStore;
pub use service::MusicService;
