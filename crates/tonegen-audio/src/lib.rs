//! tonegen audio core
//!
//! Synthesizes pure sine tones as 16-bit PCM and encodes them into canonical
//! uncompressed WAV files.
//!
//! # Determinism
//!
//! Synthesis and encoding are pure functions of their inputs. The same
//! parameters produce byte-identical WAV output across runs, and the BLAKE3
//! hash of the PCM payload can be used to compare renders.
//!
//! # Example
//!
//! ```
//! use tonegen_audio::{encode, synthesize};
//!
//! let samples = synthesize(440.0, 44100, 1.0)?;
//! let wav = encode(&samples, 44100)?;
//! assert_eq!(wav.len(), 44 + 44100 * 2);
//! # Ok::<(), tonegen_audio::AudioError>(())
//! ```
//!
//! # Crate Structure
//!
//! - [`tone`] - Sine tone synthesis and 16-bit quantization
//! - [`wav`] - WAV encoder, header read-back and PCM hashing
//! - [`error`] - Error types

pub mod error;
pub mod tone;
pub mod wav;

// Re-export main types at crate root
pub use error::{AudioError, AudioResult};
pub use tone::{synthesize, SampleBuffer, ToneParameters};
pub use wav::{encode, EncodedAudioBuffer, WavFormat, WavHeader};
