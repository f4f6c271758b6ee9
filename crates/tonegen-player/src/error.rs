//! Error types for the playback layer.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tonegen_audio::AudioError;

use crate::session::SessionState;

/// Result type for controller operations.
pub type PlayerResult<T> = Result<T, PlayerError>;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Name is empty or is not a plain file name.
    #[error("invalid storage name '{name}': {reason}")]
    InvalidName {
        /// Rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Writing the payload failed (quota, permissions, missing directory).
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Reading a stored payload back failed.
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        /// Source path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A base64 payload could not be decoded.
    #[error("payload for '{name}' is not valid base64: {message}")]
    Decode {
        /// Name the payload was written under.
        name: String,
        /// Decoder message.
        message: String,
    },

    /// Nothing is stored under the name.
    #[error("no stored audio named '{name}'")]
    NotFound {
        /// Requested name.
        name: String,
    },
}

/// Errors raised by an audio service or one of its handles.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The source could not be loaded.
    #[error("failed to load audio: {message}")]
    Load {
        /// Error message.
        message: String,
    },

    /// Playback could not be started.
    #[error("failed to start playback: {message}")]
    Play {
        /// Error message.
        message: String,
    },

    /// Playback could not be stopped.
    #[error("failed to stop playback: {message}")]
    Stop {
        /// Error message.
        message: String,
    },

    /// The loaded sound could not be released.
    #[error("failed to unload audio: {message}")]
    Unload {
        /// Error message.
        message: String,
    },
}

impl PlaybackError {
    /// Creates a load error.
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load {
            message: message.into(),
        }
    }

    /// Creates a play error.
    pub fn play(message: impl Into<String>) -> Self {
        Self::Play {
            message: message.into(),
        }
    }

    /// Creates a stop error.
    pub fn stop(message: impl Into<String>) -> Self {
        Self::Stop {
            message: message.into(),
        }
    }

    /// Creates an unload error.
    pub fn unload(message: impl Into<String>) -> Self {
        Self::Unload {
            message: message.into(),
        }
    }
}

/// Errors surfaced by [`crate::PlaybackController`] and configuration loading.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Synthesis or encoding rejected its input. Raised before any I/O.
    #[error(transparent)]
    Audio(#[from] AudioError),

    /// The storage collaborator failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The audio service collaborator failed.
    #[error("playback error: {0}")]
    Playback(#[from] PlaybackError),

    /// `play()` was called while a session is loading or playing.
    #[error("a play session is already {state}")]
    AlreadyActive {
        /// State of the existing session.
        state: SessionState,
    },

    /// Configuration could not be read or parsed.
    #[error("invalid config: {message}")]
    Config {
        /// Error message.
        message: String,
    },
}

impl PlayerError {
    /// Creates a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Stable error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            PlayerError::Audio(err) => err.code(),
            PlayerError::Storage(_) => "PLAYER_001",
            PlayerError::Playback(_) => "PLAYER_002",
            PlayerError::AlreadyActive { .. } => "PLAYER_003",
            PlayerError::Config { .. } => "PLAYER_004",
        }
    }

    /// Error category.
    pub fn category(&self) -> &'static str {
        match self {
            PlayerError::Audio(err) => err.category(),
            _ => "player",
        }
    }
}
