//! Compressor effect
//!
//! Feed-forward peak compressor: envelope follower, hard-knee gain computer,
//! attack/release smoothing applied in the dB domain.

use super::effect::{time_coeff, Effect};
use crate::audio::AudioBuffer;

/// Compressor parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorParams {
    /// Threshold level in dB
    pub threshold_db: f32,
    /// Compression ratio (1.0 = no compression)
    pub ratio: f32,
    /// Attack time in milliseconds
    pub attack_ms: f32,
    /// Release time in milliseconds
    pub release_ms: f32,
}

impl Default for CompressorParams {
    fn default() -> Self {
        Self {
            threshold_db: 0.0,
            ratio: 1.0,
            attack_ms: 1.0,
            release_ms: 100.0,
        }
    }
}

/// Compressor dynamics processor
#[derive(Debug, Clone)]
pub struct Compressor {
    params: CompressorParams,
    attack_coeff: f32,
    release_coeff: f32,
    /// Current gain reduction per channel in dB (<= 0)
    gain_reduction_db: Vec<f32>,
}

impl Compressor {
    pub fn with_params(params: CompressorParams) -> Self {
        Self {
            params,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            gain_reduction_db: Vec::new(),
        }
    }

    pub fn params(&self) -> &CompressorParams {
        &self.params
    }

    /// Static gain computer: gain change in dB for an input level
    fn target_reduction_db(&self, input_db: f32) -> f32 {
        let threshold = self.params.threshold_db;
        if input_db <= threshold || self.params.ratio <= 1.0 {
            0.0
        } else {
            (threshold + (input_db - threshold) / self.params.ratio) - input_db
        }
    }
}

fn linear_to_db(linear: f32) -> f32 {
    if linear > 0.0 {
        20.0 * linear.log10()
    } else {
        -96.0
    }
}

impl Effect for Compressor {
    fn prepare(&mut self, sample_rate: u32, channels: usize) {
        self.attack_coeff = time_coeff(self.params.attack_ms, sample_rate);
        self.release_coeff = time_coeff(self.params.release_ms, sample_rate);
        self.gain_reduction_db = vec![0.0; channels];
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        for frame in buffer.frames_mut() {
            for (ch, sample) in frame.iter_mut().enumerate() {
                let target = self.target_reduction_db(linear_to_db(sample.abs()));
                let current = self.gain_reduction_db[ch];

                // More reduction needed -> attack, otherwise release
                let coeff = if target < current {
                    self.attack_coeff
                } else {
                    self.release_coeff
                };
                let smoothed = coeff * current + (1.0 - coeff) * target;
                self.gain_reduction_db[ch] = smoothed;

                *sample *= 10.0_f32.powf(smoothed / 20.0);
            }
        }
    }
}
