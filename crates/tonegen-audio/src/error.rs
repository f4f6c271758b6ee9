//! Error types for the audio core.

use thiserror::Error;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur during tone synthesis or WAV encoding.
#[derive(Debug, Error)]
pub enum AudioError {
    /// A synthesis input was zero, negative, non-finite, or out of range.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: String,
    },

    /// The sample buffer or format could not be encoded into a WAV container.
    #[error("encoding error: {message}")]
    Encoding {
        /// Error message.
        message: String,
    },

    /// I/O error while writing an encoded buffer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AudioError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    /// Creates an encoding error.
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Stable error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            AudioError::InvalidParameter { .. } => "AUDIO_001",
            AudioError::Encoding { .. } => "AUDIO_002",
            AudioError::Io(_) => "AUDIO_003",
        }
    }

    /// Error category.
    pub fn category(&self) -> &'static str {
        "audio"
    }
}
