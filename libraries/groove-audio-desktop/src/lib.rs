//! Desktop audio output for Groove
//!
//! `DesktopBackend` implements the playback backend contract on the
//! default output device using rodio (cpal output, symphonia decoding).
//!
//! # Features
//!
//! - Local files and `file://` URLs
//! - Play, pause, seek and volume
//! - Progress reports on a fixed interval
//! - One `Ended` notification per natural completion
//!
//! # Example
//!
//! ```no_run
//! use groove_audio_desktop::DesktopBackend;
//! use groove_playback::{backend_channel, PlaybackBackend};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (events, _rx) = backend_channel();
//! let backend = DesktopBackend::open(events, Duration::from_millis(250))?;
//!
//! backend.load("/music/song.flac").await?;
//! backend.set_volume(0.8).await?;
//! backend.play().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod backend;
mod error;
mod source;
mod thread;

pub use backend::DesktopBackend;
pub use error::{AudioError, Result};
pub use source::resolve_path;
