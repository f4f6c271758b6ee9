//! Audio service collaborator: loads a sound and controls its playback.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use crate::error::PlaybackError;
use crate::storage::StoredAudio;

/// Where a sound is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// An in-memory WAV buffer.
    Bytes(Arc<[u8]>),
    /// A payload previously written through a [`crate::Storage`].
    Stored(StoredAudio),
    /// A WAV file on disk, such as a bundled asset.
    File(PathBuf),
}

impl fmt::Display for AudioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioSource::Bytes(bytes) => write!(f, "<{} bytes in memory>", bytes.len()),
            AudioSource::Stored(stored) => f.write_str(&stored.uri),
            AudioSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Options for [`AudioService::load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Start playing as soon as the sound is loaded.
    pub should_play: bool,
    /// Restart from the beginning when playback reaches the end.
    pub is_looping: bool,
}

/// A platform audio service.
#[async_trait]
pub trait AudioService: Send + Sync {
    /// Handle to a loaded sound.
    type Handle: SoundHandle;

    /// Loads a sound, optionally starting playback.
    async fn load(
        &self,
        source: AudioSource,
        options: LoadOptions,
    ) -> Result<Self::Handle, PlaybackError>;
}

/// A loaded sound.
#[async_trait]
pub trait SoundHandle: Send + Sync + 'static {
    /// Starts or resumes playback.
    async fn play(&mut self) -> Result<(), PlaybackError>;

    /// Stops playback. The sound stays loaded.
    async fn stop(&mut self) -> Result<(), PlaybackError>;

    /// Releases the sound. The handle must not be used afterwards.
    async fn unload(&mut self) -> Result<(), PlaybackError>;
}
