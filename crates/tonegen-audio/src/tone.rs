//! Pure sine tone synthesis into 16-bit PCM.
//!
//! Sample `i` is `round(sin(2π·f·i/r) × 32767)`, so identical parameters
//! always produce a bit-identical [`SampleBuffer`].

use std::f64::consts::TAU;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::error::{AudioError, AudioResult};
use crate::wav::{MAX_SAMPLES, MAX_SAMPLE_RATE};

/// Default tone frequency (concert A) in Hz.
pub const DEFAULT_FREQUENCY: f64 = 440.0;
/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
/// Default tone duration in seconds.
pub const DEFAULT_DURATION: f64 = 5.0;

/// Full-scale amplitude for signed 16-bit PCM.
const FULL_SCALE: f64 = 32767.0;

/// Parameters for a single pure tone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneParameters {
    /// Tone frequency in Hz.
    pub frequency: f64,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Duration in seconds.
    pub duration: f64,
}

impl Default for ToneParameters {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_FREQUENCY,
            sample_rate: DEFAULT_SAMPLE_RATE,
            duration: DEFAULT_DURATION,
        }
    }
}

impl ToneParameters {
    /// Creates tone parameters. Validation happens in [`ToneParameters::validate`].
    pub fn new(frequency: f64, sample_rate: u32, duration: f64) -> Self {
        Self {
            frequency,
            sample_rate,
            duration,
        }
    }

    /// Checks every parameter and returns the number of samples to render.
    pub fn validate(&self) -> AudioResult<usize> {
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(AudioError::invalid_param(
                "frequency",
                format!("must be a positive finite number of Hz, got {}", self.frequency),
            ));
        }
        if self.sample_rate == 0 {
            return Err(AudioError::invalid_param(
                "sample_rate",
                "must be greater than 0",
            ));
        }
        if self.sample_rate > MAX_SAMPLE_RATE {
            return Err(AudioError::invalid_param(
                "sample_rate",
                format!(
                    "{} Hz overflows the WAV byte rate field (max {})",
                    self.sample_rate, MAX_SAMPLE_RATE
                ),
            ));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(AudioError::invalid_param(
                "duration",
                format!("must be a positive finite number of seconds, got {}", self.duration),
            ));
        }

        let count = (self.sample_rate as f64 * self.duration).round();
        if count < 1.0 {
            return Err(AudioError::invalid_param(
                "duration",
                format!(
                    "{} s at {} Hz rounds to zero samples",
                    self.duration, self.sample_rate
                ),
            ));
        }
        if count > MAX_SAMPLES as f64 {
            return Err(AudioError::invalid_param(
                "duration",
                format!(
                    "{} s at {} Hz exceeds the WAV limit of {} samples",
                    self.duration, self.sample_rate, MAX_SAMPLES
                ),
            ));
        }

        Ok(count as usize)
    }

    /// Number of samples these parameters render, if valid.
    pub fn sample_count(&self) -> AudioResult<usize> {
        self.validate()
    }

    /// Renders the tone.
    pub fn synthesize(&self) -> AudioResult<SampleBuffer> {
        let num_samples = self.validate()?;
        let sample_rate = self.sample_rate as f64;

        let samples: Vec<i16> = (0..num_samples)
            .map(|i| {
                let t = i as f64 / sample_rate;
                quantize((TAU * self.frequency * t).sin())
            })
            .collect();

        tracing::debug!(
            frequency = self.frequency,
            sample_rate = self.sample_rate,
            num_samples,
            "synthesized sine tone"
        );

        Ok(SampleBuffer(samples))
    }
}

/// Synthesizes a pure sine tone as 16-bit PCM.
///
/// # Arguments
/// * `frequency` - Tone frequency in Hz
/// * `sample_rate` - Sample rate in Hz
/// * `duration` - Duration in seconds
///
/// # Returns
/// Exactly `round(sample_rate × duration)` samples, or
/// [`AudioError::InvalidParameter`] for zero, negative or non-finite input.
pub fn synthesize(frequency: f64, sample_rate: u32, duration: f64) -> AudioResult<SampleBuffer> {
    ToneParameters::new(frequency, sample_rate, duration).synthesize()
}

/// Converts an amplitude in [-1.0, 1.0] to a signed 16-bit sample.
///
/// Values outside the range are clipped. Rounds half away from zero.
pub fn quantize(amplitude: f64) -> i16 {
    (amplitude.clamp(-1.0, 1.0) * FULL_SCALE).round() as i16
}

/// Immutable sequence of mono 16-bit PCM samples.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SampleBuffer(Vec<i16>);

impl SampleBuffer {
    /// Returns the samples as a slice.
    pub fn as_slice(&self) -> &[i16] {
        &self.0
    }

    /// Consumes the buffer and returns the samples.
    pub fn into_vec(self) -> Vec<i16> {
        self.0
    }
}

impl Deref for SampleBuffer {
    type Target = [i16];

    fn deref(&self) -> &[i16] {
        &self.0
    }
}

impl From<Vec<i16>> for SampleBuffer {
    fn from(samples: Vec<i16>) -> Self {
        Self(samples)
    }
}

impl AsRef<[i16]> for SampleBuffer {
    fn as_ref(&self) -> &[i16] {
        &self.0
    }
}
