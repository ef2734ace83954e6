//! Integration tests for the music service commands
//!
//! Covers the documented playback scenarios end to end over a memory
//! store and a recording backend.

mod common;

use common::{create_test_track, current_id, harness};
use groove_core::{PersistenceAdapter, RepeatMode, TrackId, UpdateTrack};
use groove_playback::{PlaybackEvent, PlaybackState};
use groove_service::ServiceError;

// ===== Scenarios =====

#[tokio::test]
async fn scenario_a_sequential_stops_at_end() {
    let h = harness(3).await;

    h.service.play_track(&h.library[0].id).await.unwrap();
    h.service.next_track().await.unwrap();
    assert_eq!(current_id(&h.service).await.as_deref(), Some("T2"));

    h.service.next_track().await.unwrap();
    assert_eq!(current_id(&h.service).await.as_deref(), Some("T3"));

    h.service.next_track().await.unwrap();
    assert_eq!(current_id(&h.service).await.as_deref(), Some("T3"));
    assert!(h.service.snapshot().await.is_playing());
}

#[tokio::test]
async fn scenario_b_repeat_all_wraps() {
    let h = harness(3).await;
    assert_eq!(h.service.toggle_repeat().await, RepeatMode::All);

    h.service.play_track(&h.library[0].id).await.unwrap();
    h.service.next_track().await.unwrap();
    h.service.next_track().await.unwrap();
    h.service.next_track().await.unwrap();

    assert_eq!(current_id(&h.service).await.as_deref(), Some("T1"));
}

#[tokio::test]
async fn scenario_c_play_next_while_playing_from_library() {
    let h = harness(3).await;
    let t4 = create_test_track("T4");
    h.service.add_tracks(vec![t4.clone()]).await;

    h.service.play_track(&h.library[1].id).await.unwrap();
    h.service.play_next(&t4.id).await.unwrap();

    let queue: Vec<String> = h
        .service
        .snapshot()
        .await
        .queue
        .iter()
        .map(|track| track.id.to_string())
        .collect();
    assert_eq!(queue, vec!["T2", "T4"]);

    h.service.next_track().await.unwrap();
    assert_eq!(current_id(&h.service).await.as_deref(), Some("T4"));
}

#[tokio::test]
async fn scenario_d_remove_track_from_playlist() {
    let h = harness(3).await;
    let favorites = h
        .service
        .create_playlist(
            "Favorites",
            vec![h.library[0].id.clone(), h.library[2].id.clone()],
        )
        .await
        .unwrap();

    let found = h.service.find_playlist("Favorites").await.unwrap();
    h.service
        .remove_track_from_playlist(&found.id, &h.library[0].id)
        .await
        .unwrap();

    let playlist = h
        .service
        .playlists()
        .await
        .into_iter()
        .find(|playlist| playlist.id == favorites.id)
        .unwrap();
    assert_eq!(playlist.track_ids, vec![h.library[2].id.clone()]);
}

#[tokio::test]
async fn scenario_e_volume_clamps() {
    let h = harness(0).await;

    assert_eq!(h.service.set_volume(1.5).await.unwrap(), 1.0);
    assert_eq!(h.service.set_volume(-0.2).await.unwrap(), 0.0);
    assert_eq!(h.service.snapshot().await.volume, 0.0);
}

// ===== Playback Commands =====

#[tokio::test]
async fn load_failure_reports_title() {
    let h = harness(2).await;
    h.backend.reject(&h.library[1].url);

    let err = h.service.play_track(&h.library[1].id).await.unwrap_err();

    assert!(matches!(err, ServiceError::Playback(_)));
    assert_eq!(err.to_string(), "\"Track T2\" could not be played");
    assert_eq!(h.service.snapshot().await.state, PlaybackState::Idle);
}

#[tokio::test]
async fn unknown_track_is_rejected_before_backend() {
    let h = harness(1).await;

    let err = h.service.play_track(&TrackId::new("nope")).await.unwrap_err();

    assert!(matches!(err, ServiceError::TrackNotFound(_)));
    assert!(h.backend.calls().is_empty());
}

#[tokio::test]
async fn seek_takes_seconds() {
    let h = harness(1).await;
    h.service.play_track(&h.library[0].id).await.unwrap();
    h.backend.clear_calls();

    h.service.seek_to(12.5).await.unwrap();
    h.service.seek_to(-4.0).await.unwrap();

    assert_eq!(h.backend.calls(), vec!["seek 12500", "seek 0"]);
}

#[tokio::test]
async fn commands_while_idle_are_noops() {
    let h = harness(2).await;

    h.service.pause_track().await.unwrap();
    h.service.resume_track().await.unwrap();
    h.service.seek_to(30.0).await.unwrap();
    h.service.previous_track().await.unwrap();

    assert!(h.backend.calls().is_empty());
    assert_eq!(h.service.snapshot().await.state, PlaybackState::Idle);
}

#[tokio::test]
async fn pause_twice_matches_pause_once() {
    let h = harness(1).await;
    h.service.play_track(&h.library[0].id).await.unwrap();

    h.service.pause_track().await.unwrap();
    let once = (h.service.snapshot().await, h.backend.calls());
    h.service.pause_track().await.unwrap();
    let twice = (h.service.snapshot().await, h.backend.calls());

    assert_eq!(once, twice);
}

#[tokio::test]
async fn toggle_repeat_three_times_restores_mode() {
    let h = harness(0).await;

    h.service.toggle_repeat().await;
    h.service.toggle_repeat().await;
    let mode = h.service.toggle_repeat().await;

    assert_eq!(mode, RepeatMode::Off);
}

#[tokio::test]
async fn playback_events_reach_subscribers() {
    let h = harness(2).await;
    let mut rx = h.service.subscribe();

    h.service.play_track(&h.library[0].id).await.unwrap();
    h.service.toggle_shuffle().await;

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }

    assert!(events.contains(&PlaybackEvent::TrackChanged {
        track_id: h.library[0].id.clone(),
        previous_track_id: None,
    }));
    assert!(events.contains(&PlaybackEvent::StateChanged {
        state: PlaybackState::Playing
    }));
    assert!(events.contains(&PlaybackEvent::ShuffleChanged { enabled: true }));
}

// ===== Library =====

#[tokio::test]
async fn removing_current_track_stops_playback() {
    let h = harness(3).await;
    let playlist = h
        .service
        .create_playlist("Mix", vec![h.library[1].id.clone()])
        .await
        .unwrap();
    h.service.play_track(&h.library[1].id).await.unwrap();

    let removed = h.service.remove_track(&h.library[1].id).await.unwrap();

    assert_eq!(removed.map(|track| track.id), Some(h.library[1].id.clone()));
    let snapshot = h.service.snapshot().await;
    assert_eq!(snapshot.state, PlaybackState::Idle);
    assert!(snapshot.current_track.is_none());

    // Playlists keep the dangling ID but resolve without it
    let stored = h.service.playlists().await;
    assert_eq!(stored[0].track_ids, vec![h.library[1].id.clone()]);
    assert!(h.service.playlist_tracks(&playlist.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn removing_missing_track_is_noop() {
    let h = harness(1).await;
    assert!(h
        .service
        .remove_track(&TrackId::new("nope"))
        .await
        .unwrap()
        .is_none());
    assert_eq!(h.service.tracks().await.len(), 1);
}

#[tokio::test]
async fn clear_tracks_resets_queue_and_playback() {
    let h = harness(3).await;
    h.service.play_track(&h.library[0].id).await.unwrap();
    h.service.add_to_queue(&h.library[2].id).await.unwrap();

    h.service.clear_tracks().await.unwrap();

    let snapshot = h.service.snapshot().await;
    assert!(h.service.tracks().await.is_empty());
    assert!(snapshot.queue.is_empty());
    assert!(snapshot.current_track.is_none());
    assert_eq!(snapshot.state, PlaybackState::Idle);
}

#[tokio::test]
async fn update_track_refreshes_current_copy() {
    let h = harness(2).await;
    h.service.play_track(&h.library[0].id).await.unwrap();

    let updated = h
        .service
        .update_track(
            &h.library[0].id,
            UpdateTrack {
                title: Some("Retitled".to_string()),
                ..UpdateTrack::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, h.library[0].id);
    let current = h.service.snapshot().await.current_track.unwrap();
    assert_eq!(current.title, "Retitled");
}

// ===== Queue =====

#[tokio::test]
async fn remove_from_queue_keeps_current_logical_track() {
    let h = harness(4).await;
    for track in &h.library {
        h.service.add_to_queue(&track.id).await.unwrap();
    }
    h.service.next_track().await.unwrap();
    h.service.next_track().await.unwrap();
    h.service.next_track().await.unwrap();
    assert_eq!(current_id(&h.service).await.as_deref(), Some("T3"));

    h.service.remove_from_queue(0).await.unwrap();

    assert_eq!(h.service.snapshot().await.queue_position, 1);
    h.service.next_track().await.unwrap();
    assert_eq!(current_id(&h.service).await.as_deref(), Some("T4"));
}

#[tokio::test]
async fn clear_queue_falls_back_to_library() {
    let h = harness(3).await;
    h.service.play_track(&h.library[0].id).await.unwrap();
    h.service.add_to_queue(&h.library[2].id).await.unwrap();

    h.service.clear_queue().await;
    h.service.next_track().await.unwrap();

    assert_eq!(current_id(&h.service).await.as_deref(), Some("T2"));
}

// ===== Playlists =====

#[tokio::test]
async fn play_playlist_replaces_queue() {
    let h = harness(3).await;
    let playlist = h
        .service
        .create_playlist(
            "Reverse",
            vec![
                h.library[2].id.clone(),
                TrackId::new("gone"),
                h.library[0].id.clone(),
            ],
        )
        .await
        .unwrap();

    h.service.play_playlist(&playlist.id, 0).await.unwrap();

    let snapshot = h.service.snapshot().await;
    assert_eq!(snapshot.queue.len(), 2);
    assert_eq!(current_id(&h.service).await.as_deref(), Some("T3"));

    h.service.next_track().await.unwrap();
    assert_eq!(current_id(&h.service).await.as_deref(), Some("T1"));
}

#[tokio::test]
async fn export_then_import_assigns_fresh_ids() {
    let h = harness(2).await;
    let original = h
        .service
        .create_playlist("Chill", vec![h.library[0].id.clone()])
        .await
        .unwrap();

    let json = h.service.export_playlists().await.unwrap();
    let imported = h.service.import_playlists(&json).await.unwrap();

    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].name, "Chill");
    assert_eq!(imported[0].track_ids, original.track_ids);
    assert_ne!(imported[0].id, original.id);
    assert_eq!(h.service.playlists().await.len(), 2);
    assert_eq!(h.store.load_playlists().await.unwrap().len(), 2);
}

#[tokio::test]
async fn delete_playlist_leaves_playback_alone() {
    let h = harness(2).await;
    let playlist = h
        .service
        .create_playlist("Mix", vec![h.library[0].id.clone()])
        .await
        .unwrap();
    h.service.play_playlist(&playlist.id, 0).await.unwrap();

    h.service.delete_playlist(&playlist.id).await.unwrap();

    assert!(h.service.playlists().await.is_empty());
    assert!(h.service.snapshot().await.is_playing());
    assert_eq!(h.service.tracks().await.len(), 2);
}
