/// Application wiring
use crate::config::{BackendKind, GrooveConfig};
use crate::error::Result;
use crate::scan::DirectoryScanner;
use crate::shell::{self, Outcome};
use groove_audio_desktop::DesktopBackend;
use groove_playback::{
    backend_channel, BackendEventReceiver, HeadlessBackend, HeadlessConfig, PlaybackBackend,
    PlaybackEvent,
};
use groove_service::MusicService;
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Construct the configured playback backend
///
/// This is the only place the backend kind is inspected. Returns the
/// backend with the receiver its events arrive on.
pub fn build_backend(
    config: &GrooveConfig,
) -> Result<(Arc<dyn PlaybackBackend>, BackendEventReceiver)> {
    let (tx, rx) = backend_channel();
    let interval = config.playback.progress_interval();

    let backend: Arc<dyn PlaybackBackend> = match config.audio.backend {
        BackendKind::Desktop => Arc::new(DesktopBackend::open(tx, interval)?),
        BackendKind::Headless => {
            let headless = Arc::new(HeadlessBackend::new(
                HeadlessConfig {
                    track_duration: config.headless_track_duration(),
                    ..HeadlessConfig::default()
                },
                tx,
            ));
            headless.spawn_clock(interval);
            headless
        }
    };

    info!(backend = backend.name(), "Playback backend ready");
    Ok((backend, rx))
}

/// Import audio files under `path` into the library
///
/// Returns `(added, skipped)`.
pub async fn import_directory(service: &MusicService, path: &Path) -> Result<(usize, usize)> {
    let known: HashSet<String> = service
        .tracks()
        .await
        .iter()
        .map(|track| track.url.clone())
        .collect();

    let report = DirectoryScanner::new().scan(path, &known)?;
    let added = report.tracks.len();
    if added > 0 {
        service.add_tracks(report.tracks).await;
    }

    info!(path = %path.display(), added, skipped = report.skipped, "Import finished");
    Ok((added, report.skipped))
}

/// Print user notifications (`PlaybackEvent::Error`) as they arrive
pub fn spawn_notifier(service: &MusicService) -> JoinHandle<()> {
    let mut events = service.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(PlaybackEvent::Error { message }) => eprintln!("! {message}"),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Notification listener lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Read commands from `input` until EOF or `quit`
///
/// Command errors are printed and the shell keeps going.
pub async fn run_shell<R, W>(service: &MusicService, input: R, output: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        let command = match shell::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                writeln!(output, "{err}")?;
                continue;
            }
        };

        match shell::execute(service, command).await {
            Ok(Outcome::Print(text)) => writeln!(output, "{text}")?,
            Ok(Outcome::Quit) => break,
            Err(err) if shell::is_notified(&err) => {}
            Err(err) => writeln!(output, "{err}")?,
        }
        output.flush()?;
    }

    Ok(())
}
