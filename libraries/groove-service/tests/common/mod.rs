//! Shared test helpers

#![allow(dead_code)]

use async_trait::async_trait;
use groove_core::{PersistenceAdapter, Track, TrackId};
use groove_playback::{PlaybackBackend, PlaybackConfig, PlaybackError, Result, Transport};
use groove_service::MusicService;
use groove_storage::MemoryStore;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Backend double that records every call
#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<String>>,
    rejected: Mutex<HashSet<String>>,
}

impl RecordingBackend {
    pub fn reject(&self, url: &str) {
        self.rejected.lock().unwrap().insert(url.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PlaybackBackend for RecordingBackend {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn load(&self, url: &str) -> Result<()> {
        self.record(format!("load {url}"));
        if self.rejected.lock().unwrap().contains(url) {
            return Err(PlaybackError::backend("corrupt file"));
        }
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        self.record("play".to_string());
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.record("pause".to_string());
        Ok(())
    }

    async fn seek(&self, position: Duration) -> Result<()> {
        self.record(format!("seek {}", position.as_millis()));
        Ok(())
    }

    async fn set_volume(&self, volume: f32) -> Result<()> {
        self.record(format!("volume {volume}"));
        Ok(())
    }
}

pub fn create_test_track(id: &str) -> Track {
    Track::with_id(
        TrackId::new(id),
        format!("/music/{id}.mp3"),
        format!("Track {id}"),
        "Test Artist",
    )
}

pub fn create_library(count: usize) -> Vec<Track> {
    (1..=count)
        .map(|index| create_test_track(&format!("T{index}")))
        .collect()
}

pub struct Harness {
    pub service: Arc<MusicService>,
    pub backend: Arc<RecordingBackend>,
    pub store: Arc<MemoryStore>,
    pub library: Vec<Track>,
}

/// Service over a memory store pre-filled with `count` library tracks
pub async fn harness(count: usize) -> Harness {
    let library = create_library(count);
    let store = Arc::new(MemoryStore::with_contents(library.clone(), Vec::new()));
    harness_with_store(store, library).await
}

pub async fn harness_with_store(store: Arc<MemoryStore>, library: Vec<Track>) -> Harness {
    let backend = Arc::new(RecordingBackend::default());
    let transport = Arc::new(Transport::with_seed(
        backend.clone(),
        &PlaybackConfig::default(),
        7,
    ));
    let adapter: Arc<dyn PersistenceAdapter> = store.clone();
    let service = MusicService::open(adapter, transport).await.unwrap();
    backend.clear_calls();

    Harness {
        service: Arc::new(service),
        backend,
        store,
        library,
    }
}

pub async fn current_id(service: &MusicService) -> Option<String> {
    service
        .snapshot()
        .await
        .current_track
        .map(|track| track.id.to_string())
}
