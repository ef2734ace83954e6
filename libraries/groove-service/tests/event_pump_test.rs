//! Backend event pump tests
//!
//! Runs the service over the headless backend and drives its virtual
//! clock by hand.

use groove_core::{PersistenceAdapter, Track, TrackId};
use groove_playback::{
    backend_channel, HeadlessBackend, HeadlessConfig, PlaybackConfig, PlaybackEvent,
    PlaybackState, Transport,
};
use groove_service::MusicService;
use groove_storage::MemoryStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::timeout;

// ===== Test Helpers =====

fn create_library() -> Vec<Track> {
    (1..=3)
        .map(|index| {
            Track::with_id(
                TrackId::new(format!("T{index}")),
                format!("/music/{index}.mp3"),
                format!("Track {index}"),
                "Artist",
            )
        })
        .collect()
}

async fn setup() -> (Arc<MusicService>, Arc<HeadlessBackend>, Vec<Track>) {
    let library = create_library();
    let (tx, rx) = backend_channel();
    let backend = Arc::new(HeadlessBackend::new(
        HeadlessConfig {
            track_duration: Duration::from_secs(5),
            unsupported_extensions: Vec::new(),
        },
        tx,
    ));
    let transport = Arc::new(Transport::with_seed(
        backend.clone(),
        &PlaybackConfig::default(),
        3,
    ));
    let store: Arc<dyn PersistenceAdapter> =
        Arc::new(MemoryStore::with_contents(library.clone(), Vec::new()));

    let service = Arc::new(MusicService::open(store, transport).await.unwrap());
    service.spawn_event_pump(rx);
    (service, backend, library)
}

/// Wait for the first event matching `predicate`
async fn wait_for(
    rx: &mut broadcast::Receiver<PlaybackEvent>,
    predicate: impl Fn(&PlaybackEvent) -> bool,
) -> PlaybackEvent {
    timeout(Duration::from_secs(2), async {
        loop {
            match rx.recv().await {
                Ok(event) if predicate(&event) => return event,
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => panic!("event channel closed"),
            }
        }
    })
    .await
    .unwrap()
}

// ===== Tests =====

#[tokio::test]
async fn track_end_advances_to_next() {
    let (service, backend, library) = setup().await;
    let mut rx = service.subscribe();

    service.play_track(&library[0].id).await.unwrap();
    backend.advance(Duration::from_secs(5)).await;

    let event = wait_for(&mut rx, |event| {
        matches!(event, PlaybackEvent::TrackChanged { track_id, .. } if track_id.as_str() == "T2")
    })
    .await;

    assert_eq!(
        event,
        PlaybackEvent::TrackChanged {
            track_id: library[1].id.clone(),
            previous_track_id: Some(library[0].id.clone()),
        }
    );
    assert_eq!(backend.loaded_url().await.as_deref(), Some("/music/2.mp3"));
}

#[tokio::test]
async fn progress_updates_position() {
    let (service, backend, library) = setup().await;
    let mut rx = service.subscribe();

    service.play_track(&library[0].id).await.unwrap();
    backend.advance(Duration::from_millis(1500)).await;

    wait_for(&mut rx, |event| {
        matches!(event, PlaybackEvent::PositionUpdate { position_ms: 1500, .. })
    })
    .await;

    let snapshot = service.snapshot().await;
    assert_eq!(snapshot.position, Duration::from_millis(1500));
    assert_eq!(snapshot.duration, Duration::from_secs(5));
}

#[tokio::test]
async fn end_of_library_stays_paused() {
    let (service, backend, library) = setup().await;
    let mut rx = service.subscribe();

    service.play_track(&library[2].id).await.unwrap();
    backend.advance(Duration::from_secs(5)).await;

    wait_for(&mut rx, |event| {
        matches!(event, PlaybackEvent::TrackFinished { .. })
    })
    .await;

    // Let the pump finish resolving "next"
    tokio::time::sleep(Duration::from_millis(50)).await;
    let snapshot = service.snapshot().await;
    assert_eq!(snapshot.state, PlaybackState::Paused);
    assert_eq!(
        snapshot.current_track.map(|track| track.id),
        Some(library[2].id.clone())
    );
}
