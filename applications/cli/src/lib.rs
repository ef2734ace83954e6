//! Groove CLI
//!
//! Wires configuration, storage, the playback backend and `MusicService`
//! together, and provides the line-oriented command shell used by the
//! `groove` binary.

pub mod app;
pub mod config;
pub mod error;
pub mod scan;
pub mod shell;

pub use config::{BackendKind, GrooveConfig};
pub use error::{CliError, Result};
