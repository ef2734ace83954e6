//! Audio thread
//!
//! The rodio output stream is not `Send`, so it lives on a dedicated OS
//! thread for the lifetime of the backend. Async callers send
//! [`AudioCommand`]s over a crossbeam channel and await the reply on a
//! oneshot. Between commands the thread polls the sink every progress
//! interval, reporting position and detecting natural track completion.

use crate::error::{AudioError, Result};
use crate::source::open_source;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use groove_playback::{BackendEvent, BackendEventSender};
use rodio::{OutputStream, OutputStreamBuilder, Sink};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, warn};

pub(crate) type Reply = oneshot::Sender<Result<()>>;

/// Command for the audio thread
pub(crate) enum AudioCommand {
    Load { path: PathBuf, reply: Reply },
    Play { reply: Reply },
    Pause { reply: Reply },
    Seek { position: Duration, reply: Reply },
    SetVolume { volume: f32, reply: Reply },
    Release { reply: Reply },
    Shutdown,
}

/// Start the audio thread and wait until the output device is open
pub(crate) fn spawn_audio_thread(
    commands: Receiver<AudioCommand>,
    events: BackendEventSender,
    progress_interval: Duration,
) -> Result<JoinHandle<()>> {
    let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<()>>(1);

    let handle = thread::Builder::new()
        .name("groove-audio".to_string())
        .spawn(move || {
            let mut stream = match OutputStreamBuilder::open_default_stream() {
                Ok(stream) => stream,
                Err(err) => {
                    let _ = ready_tx.send(Err(AudioError::Device(err.to_string())));
                    return;
                }
            };
            // rodio logs to stderr when the stream is dropped
            stream.log_on_drop(false);
            let _ = ready_tx.send(Ok(()));

            run(&stream, &commands, &events, progress_interval);
            debug!("Audio thread exiting");
        })
        .map_err(|err| AudioError::Device(err.to_string()))?;

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(handle),
        Ok(Err(err)) => Err(err),
        Err(_) => Err(AudioError::ThreadStopped),
    }
}

fn run(
    stream: &OutputStream,
    commands: &Receiver<AudioCommand>,
    events: &BackendEventSender,
    progress_interval: Duration,
) {
    let mut player = SinkPlayer::new(events.clone());
    let mut last_report = Instant::now();

    loop {
        match commands.recv_timeout(progress_interval) {
            Ok(AudioCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Ok(command) => player.handle(stream, command),
            Err(RecvTimeoutError::Timeout) => {}
        }

        if last_report.elapsed() >= progress_interval {
            player.poll();
            last_report = Instant::now();
        }
    }

    player.release();
}

/// Sink state owned by the audio thread
pub(crate) struct SinkPlayer {
    sink: Option<Sink>,
    duration: Option<Duration>,
    volume: f32,
    playing: bool,
    events: BackendEventSender,
}

impl SinkPlayer {
    pub(crate) fn new(events: BackendEventSender) -> Self {
        Self {
            sink: None,
            duration: None,
            volume: 1.0,
            playing: false,
            events,
        }
    }

    fn handle(&mut self, stream: &OutputStream, command: AudioCommand) {
        match command {
            AudioCommand::Load { path, reply } => {
                let result = self.load(stream, path);
                let _ = reply.send(result);
            }
            AudioCommand::Play { reply } => {
                let _ = reply.send(self.play());
            }
            AudioCommand::Pause { reply } => {
                self.pause();
                let _ = reply.send(Ok(()));
            }
            AudioCommand::Seek { position, reply } => {
                let _ = reply.send(self.seek(position));
            }
            AudioCommand::SetVolume { volume, reply } => {
                self.set_volume(volume);
                let _ = reply.send(Ok(()));
            }
            AudioCommand::Release { reply } => {
                self.release();
                let _ = reply.send(Ok(()));
            }
            AudioCommand::Shutdown => {}
        }
    }

    fn load(&mut self, stream: &OutputStream, path: PathBuf) -> Result<()> {
        // Decode before touching the current sink so a bad file leaves it alone
        let (source, duration) = open_source(&path)?;

        self.release();

        let sink = Sink::connect_new(stream.mixer());
        sink.pause();
        sink.set_volume(self.volume);
        sink.append(source);

        debug!(path = ?path, ?duration, "Source loaded");
        self.sink = Some(sink);
        self.duration = duration;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let sink = self.sink.as_ref().ok_or(AudioError::NoSource)?;
        sink.play();
        if !self.playing {
            self.playing = true;
            self.emit(BackendEvent::StateChanged { is_playing: true });
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        if self.playing {
            self.playing = false;
            self.emit(BackendEvent::StateChanged { is_playing: false });
        }
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        let sink = self.sink.as_ref().ok_or(AudioError::NoSource)?;
        sink.try_seek(position)
            .map_err(|err| AudioError::Seek(err.to_string()))
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }

    pub(crate) fn release(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.duration = None;
        if self.playing {
            self.playing = false;
            self.emit(BackendEvent::StateChanged { is_playing: false });
        }
    }

    /// Report progress and detect the end of the source
    pub(crate) fn poll(&mut self) {
        let Some(sink) = &self.sink else {
            return;
        };

        let position = sink.get_pos();
        let finished = self.playing && sink.empty();
        self.emit(BackendEvent::Progress {
            position,
            duration: self.duration.unwrap_or(position),
        });

        if finished {
            self.playing = false;
            self.emit(BackendEvent::StateChanged { is_playing: false });
            self.emit(BackendEvent::Ended);
        }
    }

    #[cfg(test)]
    pub(crate) fn attach(&mut self, sink: Sink, duration: Option<Duration>) {
        self.sink = Some(sink);
        self.duration = duration;
    }

    #[cfg(test)]
    pub(crate) fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    fn emit(&self, event: BackendEvent) {
        if self.events.send(event).is_err() {
            warn!("Backend event receiver dropped");
        }
    }
}
