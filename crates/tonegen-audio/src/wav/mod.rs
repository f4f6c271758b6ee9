//! Deterministic PCM WAV encoder.
//!
//! Writes the canonical 44-byte RIFF/WAVE header followed by 16-bit mono
//! little-endian samples. There are no timestamps or optional chunks, so the
//! same samples always encode to the same bytes.

mod encoder;
mod format;
mod header;


pub use encoder::{encode, write_wav, EncodedAudioBuffer};
pub use format::WavFormat;
pub use header::WavHeader;

/// Size of the canonical PCM WAV header in bytes.
pub const HEADER_LEN: usize = 44;

/// Largest sample count whose data chunk still fits the 32-bit RIFF size field.
pub const MAX_SAMPLES: usize = (u32::MAX as usize - 36) / 2;

/// Highest sample rate whose mono 16-bit byte rate fits the 32-bit field.
pub const MAX_SAMPLE_RATE: u32 = u32::MAX / 2;

/// BLAKE3 hash of a PCM payload, hex encoded.
pub fn hash_pcm(pcm: &[u8]) -> String {
    blake3::hash(pcm).to_hex().to_string()
}
