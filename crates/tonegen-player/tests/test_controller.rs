//! Integration tests for the playback controller.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tonegen_audio::{encode, synthesize, ToneParameters, WavHeader};
use tonegen_player::{
    AudioSource, DryRunAudioService, FaultPoint, FsStorage, MemoryStorage, PlaybackController,
    PlaybackError, PlayerConfig, PlayerError, ServiceEvent, SessionState, Storage,
    StorageEncoding, StorageError, StoredAudio, ToneSource, WriteOptions,
};

fn short_tone_config() -> PlayerConfig {
    PlayerConfig {
        source: ToneSource::Synthesized(ToneParameters::new(440.0, 8000, 0.05)),
        ..PlayerConfig::default()
    }
}

fn controller_with(
    config: PlayerConfig,
    service: impl FnOnce(Arc<MemoryStorage>) -> DryRunAudioService,
) -> (PlaybackController<DryRunAudioService>, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let service = service(Arc::clone(&storage));
    let controller = PlaybackController::new(config, storage.clone(), service);
    (controller, storage)
}

fn dry_run(storage: Arc<MemoryStorage>) -> DryRunAudioService {
    DryRunAudioService::with_storage(storage)
}

fn loaded_event(source: &str) -> ServiceEvent {
    ServiceEvent::Loaded {
        source: source.to_string(),
        num_samples: 400,
        sample_rate: 8000,
        looping: false,
    }
}

struct FailingStorage;

#[async_trait]
impl Storage for FailingStorage {
    async fn write(
        &self,
        _payload: &[u8],
        name: &str,
        _options: WriteOptions,
    ) -> Result<StoredAudio, StorageError> {
        Err(StorageError::Write {
            path: PathBuf::from("/readonly").join(name),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only filesystem"),
        })
    }

    async fn read_back(&self, stored: &StoredAudio) -> Result<Vec<u8>, StorageError> {
        Err(StorageError::NotFound {
            name: stored.name.clone(),
        })
    }
}

// ============================================================================
// Play / stop lifecycle
// ============================================================================

#[tokio::test]
async fn test_play_then_stop() {
    let (controller, storage) = controller_with(short_tone_config(), dry_run);
    assert_eq!(controller.state(), SessionState::Idle);

    controller.play().await.unwrap();
    assert_eq!(controller.state(), SessionState::Playing);
    assert!(controller.is_playing());
    assert_eq!(storage.raw("sine440.wav").unwrap().len(), 44 + 400 * 2);
    assert!(matches!(
        controller.now_playing().await,
        Some(AudioSource::Stored(ref stored)) if stored.uri == "memory://sine440.wav"
    ));

    controller.stop().await.unwrap();
    assert_eq!(controller.state(), SessionState::Idle);
    assert!(controller.now_playing().await.is_none());

    assert_eq!(
        controller.service().events(),
        vec![
            loaded_event("memory://sine440.wav"),
            ServiceEvent::Played,
            ServiceEvent::Stopped,
            ServiceEvent::Unloaded,
        ]
    );
}

#[tokio::test]
async fn test_stored_file_is_the_encoded_tone() {
    let (controller, storage) = controller_with(short_tone_config(), dry_run);
    controller.play().await.unwrap();

    let expected = encode(&synthesize(440.0, 8000, 0.05).unwrap(), 8000).unwrap();
    assert_eq!(storage.raw("sine440.wav").unwrap(), expected.into_bytes());
}

#[tokio::test]
async fn test_stop_when_idle_is_noop() {
    let (controller, _) = controller_with(short_tone_config(), dry_run);

    controller.stop().await.unwrap();
    controller.stop().await.unwrap();

    assert_eq!(controller.state(), SessionState::Idle);
    assert!(controller.service().events().is_empty());
}

#[tokio::test]
async fn test_second_play_is_rejected() {
    let (controller, _) = controller_with(short_tone_config(), dry_run);
    controller.play().await.unwrap();

    let err = controller.play().await.unwrap_err();
    assert!(matches!(
        err,
        PlayerError::AlreadyActive {
            state: SessionState::Playing
        }
    ));
    assert!(controller.is_playing());
    // Only the first play reached the service
    assert_eq!(controller.service().events().len(), 2);
}

#[tokio::test]
async fn test_play_again_after_stop() {
    let (controller, _) = controller_with(short_tone_config(), dry_run);
    controller.play().await.unwrap();
    controller.stop().await.unwrap();
    controller.play().await.unwrap();
    assert!(controller.is_playing());
    assert_eq!(controller.service().events().len(), 6);
}

#[tokio::test]
async fn test_toggle() {
    let (controller, _) = controller_with(short_tone_config(), dry_run);

    assert_eq!(controller.toggle().await.unwrap(), SessionState::Playing);
    assert_eq!(controller.toggle().await.unwrap(), SessionState::Idle);
    assert_eq!(controller.toggle().await.unwrap(), SessionState::Playing);
    controller.shutdown().await.unwrap();
    assert_eq!(controller.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_looping_is_forwarded() {
    let config = PlayerConfig {
        looping: true,
        ..short_tone_config()
    };
    let (controller, _) = controller_with(config, dry_run);
    controller.play().await.unwrap();

    assert!(matches!(
        controller.service().events()[0],
        ServiceEvent::Loaded { looping: true, .. }
    ));
}

#[tokio::test]
async fn test_subscribers_observe_transitions() {
    let (controller, _) = controller_with(short_tone_config(), dry_run);
    let mut rx = controller.subscribe();
    assert_eq!(*rx.borrow_and_update(), SessionState::Idle);

    controller.play().await.unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), SessionState::Playing);

    controller.stop().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), SessionState::Idle);
}

// ============================================================================
// Ordering
// ============================================================================

#[tokio::test]
async fn test_stop_during_load_waits_then_releases() {
    let (controller, _) = controller_with(short_tone_config(), |storage| {
        dry_run(storage).with_load_delay(Duration::from_millis(100))
    });
    let controller = Arc::new(controller);
    let mut rx = controller.subscribe();

    let player = Arc::clone(&controller);
    let play_task = tokio::spawn(async move { player.play().await });

    rx.wait_for(|state| *state == SessionState::Loading)
        .await
        .unwrap();
    controller.stop().await.unwrap();

    play_task.await.unwrap().unwrap();
    assert_eq!(controller.state(), SessionState::Idle);
    assert_eq!(
        controller.service().events(),
        vec![
            loaded_event("memory://sine440.wav"),
            ServiceEvent::Played,
            ServiceEvent::Stopped,
            ServiceEvent::Unloaded,
        ]
    );
}

#[tokio::test]
async fn test_cancelled_play_during_load_returns_to_idle() {
    let (controller, _) = controller_with(short_tone_config(), |storage| {
        dry_run(storage).with_load_delay(Duration::from_millis(200))
    });
    let mut rx = controller.subscribe();

    let cancelled = tokio::time::timeout(Duration::from_millis(20), controller.play()).await;
    assert!(cancelled.is_err());
    assert_eq!(controller.state(), SessionState::Idle);
    assert_eq!(*rx.borrow_and_update(), SessionState::Idle);

    controller.play().await.unwrap();
    assert!(controller.is_playing());
    controller.stop().await.unwrap();
    assert_eq!(controller.state(), SessionState::Idle);
    assert_eq!(
        controller.service().events(),
        vec![
            loaded_event("memory://sine440.wav"),
            ServiceEvent::Played,
            ServiceEvent::Stopped,
            ServiceEvent::Unloaded,
        ]
    );
}

#[tokio::test]
async fn test_cancelled_play_after_load_unloads_sound() {
    let (controller, _) = controller_with(short_tone_config(), |storage| {
        dry_run(storage).with_play_delay(Duration::from_millis(200))
    });

    let cancelled = tokio::time::timeout(Duration::from_millis(50), controller.play()).await;
    assert!(cancelled.is_err());
    assert_eq!(controller.state(), SessionState::Idle);

    // The abandoned sound is released on a background task
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(
        controller.service().events(),
        vec![loaded_event("memory://sine440.wav"), ServiceEvent::Unloaded]
    );
    controller.stop().await.unwrap();
}

#[tokio::test]
async fn test_play_during_load_is_rejected() {
    let (controller, _) = controller_with(short_tone_config(), |storage| {
        dry_run(storage).with_load_delay(Duration::from_millis(100))
    });
    let controller = Arc::new(controller);
    let mut rx = controller.subscribe();

    let player = Arc::clone(&controller);
    let play_task = tokio::spawn(async move { player.play().await });

    rx.wait_for(|state| *state == SessionState::Loading)
        .await
        .unwrap();
    let err = controller.play().await.unwrap_err();

    assert!(matches!(err, PlayerError::AlreadyActive { .. }));
    play_task.await.unwrap().unwrap();
    assert!(controller.is_playing());
}

// ============================================================================
// Failure handling
// ============================================================================

#[tokio::test]
async fn test_invalid_tone_fails_before_storage() {
    let config = PlayerConfig {
        source: ToneSource::Synthesized(ToneParameters::new(0.0, 44100, 1.0)),
        ..PlayerConfig::default()
    };
    let (controller, storage) = controller_with(config, dry_run);

    let err = controller.play().await.unwrap_err();
    assert!(matches!(err, PlayerError::Audio(_)));
    assert_eq!(err.code(), "AUDIO_001");
    assert!(storage.is_empty());
    assert!(controller.service().events().is_empty());
    assert_eq!(controller.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_storage_failure_reverts_to_idle() {
    let controller = PlaybackController::new(
        short_tone_config(),
        Arc::new(FailingStorage),
        DryRunAudioService::new(),
    );

    let err = controller.play().await.unwrap_err();
    assert!(matches!(err, PlayerError::Storage(StorageError::Write { .. })));
    assert!(err.to_string().contains("read-only filesystem"));
    assert_eq!(controller.state(), SessionState::Idle);
    controller.stop().await.unwrap();
}

#[tokio::test]
async fn test_load_failure_reverts_to_idle() {
    let (controller, _) = controller_with(short_tone_config(), |storage| {
        dry_run(storage).with_fault(FaultPoint::Load)
    });

    let err = controller.play().await.unwrap_err();
    assert!(matches!(err, PlayerError::Playback(PlaybackError::Load { .. })));
    assert_eq!(controller.state(), SessionState::Idle);
    assert!(controller.service().events().is_empty());
}

#[tokio::test]
async fn test_play_failure_unloads_handle() {
    let (controller, _) = controller_with(short_tone_config(), |storage| {
        dry_run(storage).with_fault(FaultPoint::Play)
    });

    let err = controller.play().await.unwrap_err();
    assert!(matches!(err, PlayerError::Playback(PlaybackError::Play { .. })));
    assert_eq!(controller.state(), SessionState::Idle);
    assert_eq!(
        controller.service().events(),
        vec![loaded_event("memory://sine440.wav"), ServiceEvent::Unloaded]
    );
}

#[tokio::test]
async fn test_stop_failure_still_unloads_and_reverts() {
    let (controller, _) = controller_with(short_tone_config(), |storage| {
        dry_run(storage).with_fault(FaultPoint::Stop)
    });
    controller.play().await.unwrap();

    let err = controller.stop().await.unwrap_err();
    assert!(matches!(err, PlayerError::Playback(PlaybackError::Stop { .. })));
    assert_eq!(controller.state(), SessionState::Idle);
    assert_eq!(
        controller.service().events().last(),
        Some(&ServiceEvent::Unloaded)
    );

    // Toggle remains usable after the error
    assert_eq!(controller.toggle().await.unwrap(), SessionState::Playing);
}

// ============================================================================
// Sources and storage backends
// ============================================================================

#[tokio::test]
async fn test_bundled_source_skips_synthesis_and_storage() {
    let tmp = tempfile::tempdir().unwrap();
    let asset = tmp.path().join("bundled.wav");
    let wav = encode(&synthesize(440.0, 8000, 0.05).unwrap(), 8000).unwrap();
    std::fs::write(&asset, wav.as_bytes()).unwrap();

    let config = PlayerConfig {
        source: ToneSource::Bundled {
            path: asset.clone(),
        },
        ..PlayerConfig::default()
    };
    let (controller, storage) = controller_with(config, dry_run);
    controller.play().await.unwrap();

    assert!(storage.is_empty());
    assert_eq!(
        controller.service().events()[0],
        loaded_event(&asset.display().to_string())
    );
}

#[tokio::test]
async fn test_bundled_source_missing_file() {
    let config = PlayerConfig {
        source: ToneSource::Bundled {
            path: PathBuf::from("/nonexistent/bundled.wav"),
        },
        ..PlayerConfig::default()
    };
    let (controller, _) = controller_with(config, dry_run);

    let err = controller.play().await.unwrap_err();
    assert!(matches!(err, PlayerError::Playback(PlaybackError::Load { .. })));
    assert_eq!(controller.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_fs_storage_base64_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    let storage = Arc::new(FsStorage::new(tmp.path()));
    let config = PlayerConfig {
        encoding: StorageEncoding::Base64,
        file_name: "tone.wav".to_string(),
        ..short_tone_config()
    };
    let controller = PlaybackController::new(
        config,
        storage.clone(),
        DryRunAudioService::with_storage(storage.clone()),
    );

    controller.play().await.unwrap();

    // Base64 only describes the payload handed to storage; the file is a WAV
    let at_rest = std::fs::read(tmp.path().join("tone.wav")).unwrap();
    let header = WavHeader::parse(&at_rest).unwrap();
    assert_eq!(header.num_samples(), 400);
    assert!(matches!(
        controller.service().events()[0],
        ServiceEvent::Loaded {
            num_samples: 400,
            ..
        }
    ));
    controller.stop().await.unwrap();
}
