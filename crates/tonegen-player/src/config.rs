//! Player configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tonegen_audio::ToneParameters;

use crate::error::{PlayerError, PlayerResult};
use crate::storage::{validate_name, StorageEncoding};

/// Default name the rendered tone is stored under.
pub const DEFAULT_FILE_NAME: &str = "sine440.wav";

/// Where the controller gets its audio from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToneSource {
    /// Render the tone at play time.
    Synthesized(ToneParameters),
    /// Play a pre-rendered WAV file, skipping synthesis and storage.
    Bundled {
        /// Path to the WAV file.
        path: PathBuf,
    },
}

impl Default for ToneSource {
    fn default() -> Self {
        ToneSource::Synthesized(ToneParameters::default())
    }
}

/// Configuration for [`crate::PlaybackController`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    /// Audio source.
    pub source: ToneSource,
    /// Name the rendered tone is stored under.
    pub file_name: String,
    /// Representation of the stored tone.
    pub encoding: StorageEncoding,
    /// Loop playback until stopped.
    pub looping: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            source: ToneSource::default(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            encoding: StorageEncoding::default(),
            looping: false,
        }
    }
}

impl PlayerConfig {
    /// Parses and validates a JSON config.
    pub fn from_json_str(json: &str) -> PlayerResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PlayerError::config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_path(path: &Path) -> PlayerResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            PlayerError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Checks tone parameters and the storage name.
    pub fn validate(&self) -> PlayerResult<()> {
        if let ToneSource::Synthesized(tone) = &self.source {
            tone.validate()?;
        }
        validate_name(&self.file_name)
            .map_err(|e| PlayerError::config(e.to_string()))?;
        Ok(())
    }

    /// Tone parameters, if the source is synthesized.
    pub fn tone(&self) -> Option<&ToneParameters> {
        match &self.source {
            ToneSource::Synthesized(tone) => Some(tone),
            ToneSource::Bundled { .. } => None,
        }
    }
}
