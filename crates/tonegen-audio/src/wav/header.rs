//! Read-back of canonical WAV headers.

use crate::error::{AudioError, AudioResult};

use super::format::{WavFormat, PCM_FORMAT_TAG};
use super::HEADER_LEN;

/// Fields of a canonical 44-byte PCM WAV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    /// RIFF chunk size (file size minus 8).
    pub riff_size: u32,
    /// Audio format tag (1 = PCM).
    pub audio_format: u16,
    /// Channel count, sample rate and bit depth.
    pub format: WavFormat,
    /// Byte rate as stored in the file.
    pub byte_rate: u32,
    /// Block align as stored in the file.
    pub block_align: u16,
    /// Data chunk size in bytes.
    pub data_size: u32,
}

impl WavHeader {
    /// Parses and validates the header at the start of `bytes`.
    ///
    /// Rejects anything the encoder would not have produced: wrong chunk
    /// IDs, a non-PCM format tag, derived fields that disagree with the
    /// format, or size fields that disagree with the buffer length.
    pub fn parse(bytes: &[u8]) -> AudioResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(AudioError::encoding(format!(
                "buffer is {} bytes, shorter than the {}-byte header",
                bytes.len(),
                HEADER_LEN
            )));
        }

        expect_tag(bytes, 0, b"RIFF")?;
        expect_tag(bytes, 8, b"WAVE")?;
        expect_tag(bytes, 12, b"fmt ")?;
        expect_tag(bytes, 36, b"data")?;

        let fmt_size = read_u32(bytes, 16);
        if fmt_size != 16 {
            return Err(AudioError::encoding(format!(
                "fmt chunk size is {}, expected 16",
                fmt_size
            )));
        }

        let header = Self {
            riff_size: read_u32(bytes, 4),
            audio_format: read_u16(bytes, 20),
            format: WavFormat {
                channels: read_u16(bytes, 22),
                sample_rate: read_u32(bytes, 24),
                bits_per_sample: read_u16(bytes, 34),
            },
            byte_rate: read_u32(bytes, 28),
            block_align: read_u16(bytes, 32),
            data_size: read_u32(bytes, 40),
        };

        if header.audio_format != PCM_FORMAT_TAG {
            return Err(AudioError::encoding(format!(
                "audio format {} is not uncompressed PCM",
                header.audio_format
            )));
        }
        if header.format.sample_rate == 0 || header.format.channels == 0 {
            return Err(AudioError::encoding(
                "sample rate and channel count must be non-zero",
            ));
        }
        if header.format.bits_per_sample == 0 || header.format.bits_per_sample % 8 != 0 {
            return Err(AudioError::encoding(format!(
                "unsupported bit depth {}",
                header.format.bits_per_sample
            )));
        }
        // Derived from untrusted fields, so overflow counts as a mismatch
        if Some(header.block_align) != header.format.block_align()
            || Some(header.byte_rate) != header.format.byte_rate()
        {
            return Err(AudioError::encoding(format!(
                "byte rate {} / block align {} disagree with {} Hz, {} channel(s), {} bits",
                header.byte_rate,
                header.block_align,
                header.format.sample_rate,
                header.format.channels,
                header.format.bits_per_sample
            )));
        }
        if header.riff_size != header.data_size.wrapping_add(36) {
            return Err(AudioError::encoding(format!(
                "RIFF size {} does not match data size {}",
                header.riff_size, header.data_size
            )));
        }
        if HEADER_LEN + header.data_size as usize != bytes.len() {
            return Err(AudioError::encoding(format!(
                "data size {} does not match the {} payload bytes present",
                header.data_size,
                bytes.len() - HEADER_LEN
            )));
        }

        Ok(header)
    }

    /// Parses the header and returns it together with the PCM payload.
    pub fn parse_with_data(bytes: &[u8]) -> AudioResult<(Self, &[u8])> {
        let header = Self::parse(bytes)?;
        // parse() has checked that the payload runs exactly to the end
        Ok((header, &bytes[HEADER_LEN..]))
    }

    /// Number of sample frames in the data chunk.
    pub fn num_samples(&self) -> usize {
        self.data_size as usize / self.block_align as usize
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.num_samples() as f64 / self.format.sample_rate as f64
    }
}

fn expect_tag(bytes: &[u8], offset: usize, tag: &[u8; 4]) -> AudioResult<()> {
    let found = &bytes[offset..offset + 4];
    if found != tag {
        return Err(AudioError::encoding(format!(
            "expected '{}' at offset {}, found {:?}",
            String::from_utf8_lossy(tag),
            offset,
            String::from_utf8_lossy(found)
        )));
    }
    Ok(())
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
