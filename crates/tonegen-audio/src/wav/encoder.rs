//! WAV container assembly.

use std::io::Write;
use std::ops::Deref;

use crate::error::{AudioError, AudioResult};

use super::format::{WavFormat, PCM_FORMAT_TAG};
use super::{hash_pcm, HEADER_LEN, MAX_SAMPLES, MAX_SAMPLE_RATE};

/// Bytes per mono 16-bit frame.
const FRAME_LEN: usize = 2;

/// Encoded WAV file: header followed by the PCM payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAudioBuffer {
    bytes: Vec<u8>,
    format: WavFormat,
}

impl EncodedAudioBuffer {
    /// Returns the complete file bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the buffer and returns the file bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Format the buffer was encoded with.
    pub fn format(&self) -> WavFormat {
        self.format
    }

    /// Number of samples in the data chunk.
    pub fn num_samples(&self) -> usize {
        (self.bytes.len() - HEADER_LEN) / FRAME_LEN
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.num_samples() as f64 / self.format.sample_rate as f64
    }

    /// BLAKE3 hash of the PCM payload (not the full file).
    pub fn pcm_hash(&self) -> String {
        hash_pcm(&self.bytes[HEADER_LEN..])
    }
}

impl Deref for EncodedAudioBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for EncodedAudioBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Encodes mono 16-bit samples into a WAV file buffer.
///
/// # Arguments
/// * `samples` - PCM samples in playback order
/// * `sample_rate` - Sample rate in Hz
///
/// # Returns
/// A buffer of exactly `44 + samples.len() * 2` bytes, or
/// [`AudioError::Encoding`] if the buffer is empty, the sample rate is 0 or
/// above [`MAX_SAMPLE_RATE`], or the data does not fit the 32-bit size fields.
pub fn encode(samples: &[i16], sample_rate: u32) -> AudioResult<EncodedAudioBuffer> {
    let format = WavFormat::mono(sample_rate);
    let mut bytes = Vec::with_capacity(HEADER_LEN + samples.len() * 2);
    write_wav(&mut bytes, &format, samples)?;

    tracing::debug!(
        sample_rate,
        num_samples = samples.len(),
        bytes = bytes.len(),
        "encoded wav buffer"
    );

    Ok(EncodedAudioBuffer { bytes, format })
}

/// Writes a complete WAV file to a writer.
///
/// Input is validated before the first byte is written, so a rejected call
/// never leaves a partial file behind.
pub fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, samples: &[i16]) -> AudioResult<()> {
    if samples.is_empty() {
        return Err(AudioError::encoding("sample buffer is empty"));
    }
    if format.sample_rate == 0 {
        return Err(AudioError::encoding("sample rate must be greater than 0"));
    }
    if format.channels != 1 || format.bits_per_sample != 16 {
        return Err(AudioError::encoding(format!(
            "only mono 16-bit PCM is supported, got {} channel(s) at {} bits",
            format.channels, format.bits_per_sample
        )));
    }
    if samples.len() > MAX_SAMPLES {
        return Err(AudioError::encoding(format!(
            "{} samples exceed the WAV limit of {}",
            samples.len(),
            MAX_SAMPLES
        )));
    }

    let (Some(block_align), Some(byte_rate)) = (format.block_align(), format.byte_rate()) else {
        return Err(AudioError::encoding(format!(
            "byte rate for {} Hz does not fit in 32 bits (max sample rate {})",
            format.sample_rate, MAX_SAMPLE_RATE
        )));
    };
    let data_size = (samples.len() * FRAME_LEN) as u32;
    let riff_size = 36 + data_size; // File size minus the 8-byte RIFF preamble

    // RIFF header
    writer.write_all(b"RIFF")?;
    writer.write_all(&riff_size.to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    // fmt chunk
    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?;
    writer.write_all(&PCM_FORMAT_TAG.to_le_bytes())?;
    writer.write_all(&format.channels.to_le_bytes())?;
    writer.write_all(&format.sample_rate.to_le_bytes())?;
    writer.write_all(&byte_rate.to_le_bytes())?;
    writer.write_all(&block_align.to_le_bytes())?;
    writer.write_all(&format.bits_per_sample.to_le_bytes())?;

    // data chunk
    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;

    let mut pcm = Vec::with_capacity(data_size as usize);
    for &sample in samples {
        pcm.extend_from_slice(&sample.to_le_bytes());
    }
    writer.write_all(&pcm)?;

    Ok(())
}
