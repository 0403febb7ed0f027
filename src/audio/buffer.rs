//! Audio buffer implementation
//!
//! AudioBuffer is the frames x channels sample matrix every effect consumes
//! and produces. Samples are interleaved: [L0, R0, L1, R1, ...].

use crate::error::{FxError, Result};

/// Audio sample data with metadata
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Interleaved audio samples, nominally -1.0..1.0
    samples: Vec<f32>,
    /// Number of audio channels (1 = mono, 2 = stereo)
    channels: u16,
    /// Sample rate in Hz
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create a new audio buffer from interleaved samples
    pub fn new(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Result<Self> {
        if samples.is_empty() {
            return Err(FxError::EmptyBuffer);
        }
        if channels == 0 || samples.len() % channels as usize != 0 {
            return Err(FxError::UnsupportedFormat {
                details: format!(
                    "Sample count {} is not divisible by channel count {}",
                    samples.len(),
                    channels
                ),
            });
        }
        if sample_rate == 0 {
            return Err(FxError::UnsupportedFormat {
                details: "sample rate must be positive".to_string(),
            });
        }
        Ok(Self {
            samples,
            channels,
            sample_rate,
        })
    }

    /// Promote a 1-D mono signal to a single-channel buffer
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        Self::new(samples, 1, sample_rate)
    }

    /// Build a buffer from a frames x channels matrix
    ///
    /// Every frame must have the same channel count.
    pub fn from_frames(frames: &[Vec<f32>], sample_rate: u32) -> Result<Self> {
        let channels = frames.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = frames.iter().position(|f| f.len() != channels) {
            return Err(FxError::UnsupportedFormat {
                details: format!(
                    "frame {} has {} channels, expected {}",
                    bad,
                    frames[bad].len(),
                    channels
                ),
            });
        }
        let channels = u16::try_from(channels).map_err(|_| FxError::UnsupportedFormat {
            details: format!("{} channels is more than a WAV file can hold", channels),
        })?;
        Self::new(frames.concat(), channels, sample_rate)
    }

    /// Create a mono sine wave test tone
    pub fn sine_wave(frequency: f32, duration_secs: f32, sample_rate: u32) -> Self {
        let num_samples = (duration_secs * sample_rate as f32) as usize;
        let samples = (0..num_samples)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * std::f32::consts::PI * frequency * t).sin()
            })
            .collect();

        Self {
            samples,
            channels: 1,
            sample_rate,
        }
    }

    /// Get a reference to the samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Get a mutable reference to the samples
    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Get the number of channels
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the number of frames (samples per channel)
    pub fn num_frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    /// Get the duration in seconds
    pub fn duration(&self) -> f32 {
        self.num_frames() as f32 / self.sample_rate as f32
    }

    /// Iterate over frames, one slice of `channels` samples per frame
    pub fn frames_mut(&mut self) -> std::slice::ChunksExactMut<'_, f32> {
        let channels = self.channels.max(1) as usize;
        self.samples.chunks_exact_mut(channels)
    }

    /// Largest absolute sample value across all channels
    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
    }

    /// Apply gain in linear scale
    pub fn apply_gain(&mut self, gain: f32) {
        for sample in &mut self.samples {
            *sample *= gain;
        }
    }

    /// Check if buffers are identical (bit-perfect comparison)
    pub fn is_identical_to(&self, other: &AudioBuffer) -> bool {
        self.channels == other.channels
            && self.sample_rate == other.sample_rate
            && self.samples == other.samples
    }
}

// Helpers for unit tests
#[cfg(test)]
impl AudioBuffer {
    /// Create a silent buffer with the given duration
    pub(crate) fn silence(duration_secs: f32, channels: u16, sample_rate: u32) -> Self {
        let num_samples = (duration_secs * sample_rate as f32) as usize * channels as usize;
        Self {
            samples: vec![0.0; num_samples],
            channels,
            sample_rate,
        }
    }

    /// Get samples for a specific channel (0-indexed)
    pub(crate) fn channel_samples(&self, channel: u16) -> Vec<f32> {
        if channel >= self.channels {
            return Vec::new();
        }
        self.samples
            .iter()
            .skip(channel as usize)
            .step_by(self.channels as usize)
            .copied()
            .collect()
    }

    /// Apply gain in decibels
    pub(crate) fn apply_gain_db(&mut self, gain_db: f32) {
        let gain_linear = 10.0_f32.powf(gain_db / 20.0);
        self.apply_gain(gain_linear);
    }

    /// Check if buffers are approximately equal within tolerance
    pub(crate) fn is_approx_equal(&self, other: &AudioBuffer, tolerance: f32) -> bool {
        if self.channels != other.channels || self.sample_rate != other.sample_rate {
            return false;
        }
        if self.samples.len() != other.samples.len() {
            return false;
        }
        self.samples
            .iter()
            .zip(other.samples.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}
