//! Audio service that validates and logs instead of producing sound.
//!
//! Every loaded source is decoded and its WAV header checked, so a dry run
//! catches the same malformed buffers a real player would reject. Calls are
//! recorded in a shared event log for inspection.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tonegen_audio::WavHeader;

use crate::error::PlaybackError;
use crate::service::{AudioService, AudioSource, LoadOptions, SoundHandle};
use crate::storage::Storage;

/// A recorded audio service call.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceEvent {
    /// A source was loaded.
    Loaded {
        /// Display form of the source.
        source: String,
        /// Sample frames in the loaded file.
        num_samples: usize,
        /// Sample rate of the loaded file.
        sample_rate: u32,
        /// Whether looping was requested.
        looping: bool,
    },
    /// Playback started.
    Played,
    /// Playback stopped.
    Stopped,
    /// The sound was released.
    Unloaded,
}

/// Operation at which an injected failure fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultPoint {
    /// Fail in [`AudioService::load`].
    Load,
    /// Fail in [`SoundHandle::play`].
    Play,
    /// Fail in [`SoundHandle::stop`].
    Stop,
    /// Fail in [`SoundHandle::unload`].
    Unload,
}

type EventLog = Arc<Mutex<Vec<ServiceEvent>>>;

/// Audio service that validates loaded audio and records calls.
#[derive(Clone, Default)]
pub struct DryRunAudioService {
    storage: Option<Arc<dyn Storage>>,
    events: EventLog,
    fault: Option<FaultPoint>,
    load_delay: Duration,
    play_delay: Duration,
}

impl std::fmt::Debug for DryRunAudioService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DryRunAudioService")
            .field("has_storage", &self.storage.is_some())
            .field("fault", &self.fault)
            .field("load_delay", &self.load_delay)
            .field("play_delay", &self.play_delay)
            .finish()
    }
}

impl DryRunAudioService {
    /// Creates a service that can load in-memory and file sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service that resolves [`AudioSource::Stored`] through `storage`.
    pub fn with_storage(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage: Some(storage),
            ..Self::default()
        }
    }

    /// Makes the given operation fail.
    pub fn with_fault(mut self, fault: FaultPoint) -> Self {
        self.fault = Some(fault);
        self
    }

    /// Delays every load by `delay`.
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    /// Delays every `play()` on handles from this service by `delay`.
    pub fn with_play_delay(mut self, delay: Duration) -> Self {
        self.play_delay = delay;
        self
    }

    /// Snapshot of recorded events.
    pub fn events(&self) -> Vec<ServiceEvent> {
        self.events.lock().clone()
    }

    async fn read_source(&self, source: &AudioSource) -> Result<Vec<u8>, PlaybackError> {
        match source {
            AudioSource::Bytes(bytes) => Ok(bytes.to_vec()),
            AudioSource::Stored(stored) => {
                let storage = self.storage.as_ref().ok_or_else(|| {
                    PlaybackError::load(format!("no storage configured to resolve {}", stored.uri))
                })?;
                storage
                    .read_back(stored)
                    .await
                    .map_err(|e| PlaybackError::load(e.to_string()))
            }
            AudioSource::File(path) => tokio::fs::read(path)
                .await
                .map_err(|e| PlaybackError::load(format!("{}: {}", path.display(), e))),
        }
    }
}

#[async_trait]
impl AudioService for DryRunAudioService {
    type Handle = DryRunHandle;

    async fn load(
        &self,
        source: AudioSource,
        options: LoadOptions,
    ) -> Result<DryRunHandle, PlaybackError> {
        if !self.load_delay.is_zero() {
            tokio::time::sleep(self.load_delay).await;
        }
        if self.fault == Some(FaultPoint::Load) {
            return Err(PlaybackError::load("injected load failure"));
        }

        let bytes = self.read_source(&source).await?;
        let header = WavHeader::parse(&bytes).map_err(|e| PlaybackError::load(e.to_string()))?;

        tracing::info!(
            source = %source,
            sample_rate = header.format.sample_rate,
            duration_seconds = header.duration_seconds(),
            looping = options.is_looping,
            "dry run: loaded sound"
        );
        self.events.lock().push(ServiceEvent::Loaded {
            source: source.to_string(),
            num_samples: header.num_samples(),
            sample_rate: header.format.sample_rate,
            looping: options.is_looping,
        });

        let mut handle = DryRunHandle {
            events: Arc::clone(&self.events),
            fault: self.fault,
            play_delay: self.play_delay,
            loaded: true,
            playing: false,
        };
        if options.should_play {
            handle.play().await?;
        }
        Ok(handle)
    }
}

/// Handle returned by [`DryRunAudioService`].
#[derive(Debug)]
pub struct DryRunHandle {
    events: EventLog,
    fault: Option<FaultPoint>,
    play_delay: Duration,
    loaded: bool,
    playing: bool,
}

impl DryRunHandle {
    /// Whether playback is running.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether the sound is still loaded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

#[async_trait]
impl SoundHandle for DryRunHandle {
    async fn play(&mut self) -> Result<(), PlaybackError> {
        if !self.play_delay.is_zero() {
            tokio::time::sleep(self.play_delay).await;
        }
        if !self.loaded {
            return Err(PlaybackError::play("sound is not loaded"));
        }
        if self.fault == Some(FaultPoint::Play) {
            return Err(PlaybackError::play("injected play failure"));
        }
        self.playing = true;
        self.events.lock().push(ServiceEvent::Played);
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), PlaybackError> {
        if self.fault == Some(FaultPoint::Stop) {
            return Err(PlaybackError::stop("injected stop failure"));
        }
        self.playing = false;
        self.events.lock().push(ServiceEvent::Stopped);
        Ok(())
    }

    async fn unload(&mut self) -> Result<(), PlaybackError> {
        if self.fault == Some(FaultPoint::Unload) {
            return Err(PlaybackError::unload("injected unload failure"));
        }
        self.playing = false;
        self.loaded = false;
        self.events.lock().push(ServiceEvent::Unloaded);
        Ok(())
    }
}
