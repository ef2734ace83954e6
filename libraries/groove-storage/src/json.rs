//! JSON file persistence adapter
//!
//! Layout of the data directory:
//! ```text
//! <data_dir>/
//!   tracks.json
//!   playlists.json
//!   settings.json
//! ```
//! A missing file reads as an empty collection (or default settings).
//! Saves write a sibling `.tmp` file and rename it over the target so a
//! crash mid-write never leaves a truncated document behind.

use crate::error::StorageError;
use async_trait::async_trait;
use groove_core::{PersistenceAdapter, PlayerSettings, Playlist, Track};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const TRACKS_FILE: &str = "tracks.json";
const PLAYLISTS_FILE: &str = "playlists.json";
const SETTINGS_FILE: &str = "settings.json";

/// Stores each collection as a pretty-printed JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    data_dir: PathBuf,
    // Serializes writers so temp files never collide
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `data_dir`
    pub async fn open(data_dir: impl Into<PathBuf>) -> groove_core::Result<Self> {
        let data_dir = data_dir.into();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .map_err(StorageError::from)?;

        tracing::debug!(path = ?data_dir, "Opened JSON store");

        Ok(Self {
            data_dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Directory holding the store files
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    async fn read_or_default<T>(&self, file: &str) -> crate::Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.data_dir.join(file);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(T::default()),
            Err(err) => return Err(err.into()),
        };

        serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt { path, source })
    }

    async fn write_atomic<T>(&self, file: &str, value: &T) -> crate::Result<()>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_vec_pretty(value)?;
        let path = self.data_dir.join(file);
        let tmp = path.with_extension("json.tmp");

        let _guard = self.write_lock.lock().await;
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::trace!(path = ?path, bytes = json.len(), "Saved store file");
        Ok(())
    }
}

#[async_trait]
impl PersistenceAdapter for JsonFileStore {
    async fn load_tracks(&self) -> groove_core::Result<Vec<Track>> {
        Ok(self.read_or_default(TRACKS_FILE).await?)
    }

    async fn save_tracks(&self, tracks: &[Track]) -> groove_core::Result<()> {
        Ok(self.write_atomic(TRACKS_FILE, tracks).await?)
    }

    async fn load_playlists(&self) -> groove_core::Result<Vec<Playlist>> {
        Ok(self.read_or_default(PLAYLISTS_FILE).await?)
    }

    async fn save_playlists(&self, playlists: &[Playlist]) -> groove_core::Result<()> {
        Ok(self.write_atomic(PLAYLISTS_FILE, playlists).await?)
    }

    async fn load_settings(&self) -> groove_core::Result<PlayerSettings> {
        Ok(self.read_or_default(SETTINGS_FILE).await?)
    }

    async fn save_settings(&self, settings: &PlayerSettings) -> groove_core::Result<()> {
        Ok(self.write_atomic(SETTINGS_FILE, settings).await?)
    }
}
