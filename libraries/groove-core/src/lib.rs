//! Groove Core
//!
//! Platform-agnostic core types, the persistence contract, and error handling
//! shared by every Groove crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `UpdateTrack`, `Playlist`, `PlayerSettings`
//! - **Identifiers**: `TrackId`, `PlaylistId`
//! - **Persistence**: the `PersistenceAdapter` trait, implemented by `groove-storage`
//! - **Error Handling**: unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use groove_core::types::{Playlist, Track};
//!
//! let track = Track::new("file:///music/song.mp3", "My Favorite Song", "Some Artist");
//! let playlist = Playlist::new("Favorites", vec![track.id.clone()]);
//!
//! assert_eq!(playlist.track_ids, vec![track.id]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod storage;
pub mod types;

pub use error::{CoreError, Result};
pub use storage::PersistenceAdapter;

pub use types::{
    Playlist, PlaylistExport, PlaylistId, PlayerSettings, RepeatMode, Track, TrackId, UpdateTrack,
};
