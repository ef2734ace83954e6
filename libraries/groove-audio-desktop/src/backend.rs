//! `PlaybackBackend` over the audio thread

use crate::error::{AudioError, Result};
use crate::source::resolve_path;
use crate::thread::{spawn_audio_thread, AudioCommand, Reply};
use async_trait::async_trait;
use crossbeam_channel::Sender;
use groove_playback::{BackendEventSender, PlaybackBackend};
use std::sync::Mutex;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, info};

/// Native audio device backend
///
/// Decodes local files with rodio and plays them on the default output
/// device. Dropping the backend stops the audio thread.
pub struct DesktopBackend {
    commands: Sender<AudioCommand>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl DesktopBackend {
    /// Open the default output device
    ///
    /// Progress is reported on `events` every `progress_interval`.
    pub fn open(events: BackendEventSender, progress_interval: Duration) -> Result<Self> {
        let (commands, receiver) = crossbeam_channel::unbounded();
        let thread = spawn_audio_thread(receiver, events, progress_interval)?;
        info!(interval_ms = progress_interval.as_millis() as u64, "Audio device opened");

        Ok(Self {
            commands,
            thread: Mutex::new(Some(thread)),
        })
    }

    async fn request(&self, command: impl FnOnce(Reply) -> AudioCommand) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .map_err(|_| AudioError::ThreadStopped)?;
        response.await.map_err(|_| AudioError::ThreadStopped)?
    }
}

impl Drop for DesktopBackend {
    fn drop(&mut self) {
        let _ = self.commands.send(AudioCommand::Shutdown);
        let handle = self.thread.lock().ok().and_then(|mut thread| thread.take());
        if let Some(handle) = handle {
            if handle.join().is_err() {
                debug!("Audio thread panicked");
            }
        }
    }
}

#[async_trait]
impl PlaybackBackend for DesktopBackend {
    fn name(&self) -> &'static str {
        "desktop"
    }

    async fn load(&self, url: &str) -> groove_playback::Result<()> {
        let path = resolve_path(url);
        Ok(self
            .request(|reply| AudioCommand::Load { path, reply })
            .await?)
    }

    async fn play(&self) -> groove_playback::Result<()> {
        Ok(self.request(|reply| AudioCommand::Play { reply }).await?)
    }

    async fn pause(&self) -> groove_playback::Result<()> {
        Ok(self.request(|reply| AudioCommand::Pause { reply }).await?)
    }

    async fn seek(&self, position: Duration) -> groove_playback::Result<()> {
        Ok(self
            .request(|reply| AudioCommand::Seek { position, reply })
            .await?)
    }

    async fn set_volume(&self, volume: f32) -> groove_playback::Result<()> {
        Ok(self
            .request(|reply| AudioCommand::SetVolume { volume, reply })
            .await?)
    }

    async fn release(&self) -> groove_playback::Result<()> {
        Ok(self.request(|reply| AudioCommand::Release { reply }).await?)
    }
}
