//! Shared test helpers

#![allow(dead_code)]

use async_trait::async_trait;
use groove_core::{Track, TrackId};
use groove_playback::{PlaybackBackend, PlaybackError, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// Backend double that records every call
#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<String>>,
    rejected: Mutex<HashSet<String>>,
    load_delays: Mutex<HashMap<String, Duration>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `load(url)` fail
    pub fn reject(&self, url: &str) {
        self.rejected.lock().unwrap().insert(url.to_string());
    }

    /// Make `load(url)` take `delay`
    pub fn delay_load(&self, url: &str, delay: Duration) {
        self.load_delays
            .lock()
            .unwrap()
            .insert(url.to_string(), delay);
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
        let delay = self.load_delays.lock().unwrap().get(url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.record(format!("load {url}"));
        if self.rejected.lock().unwrap().contains(url) {
            return Err(PlaybackError::backend(format!("unsupported format: {url}")));
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

    async fn release(&self) -> Result<()> {
        self.record("release".to_string());
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
