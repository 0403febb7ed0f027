//! Limiter effect
//!
//! Linked-channel peak limiter with instant attack and configurable release.
//! Gain reduction is computed from the loudest channel of each frame so the
//! stereo image does not shift.

use super::effect::{db_to_gain, time_coeff, Effect};
use crate::audio::AudioBuffer;

/// Limiter parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimiterParams {
    /// Ceiling in dB
    pub threshold_db: f32,
    /// Release time in milliseconds
    pub release_ms: f32,
}

impl Default for LimiterParams {
    fn default() -> Self {
        Self {
            threshold_db: -10.0,
            release_ms: 100.0,
        }
    }
}

/// Peak limiter
#[derive(Debug, Clone)]
pub struct Limiter {
    params: LimiterParams,
    ceiling: f32,
    release_coeff: f32,
    /// Current linear gain (<= 1)
    gain: f32,
}

impl Limiter {
    pub fn with_params(params: LimiterParams) -> Self {
        Self {
            params,
            ceiling: db_to_gain(params.threshold_db),
            release_coeff: 0.0,
            gain: 1.0,
        }
    }
}

impl Effect for Limiter {
    fn prepare(&mut self, sample_rate: u32, _channels: usize) {
        self.ceiling = db_to_gain(self.params.threshold_db);
        self.release_coeff = time_coeff(self.params.release_ms, sample_rate);
        self.gain = 1.0;
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        for frame in buffer.frames_mut() {
            let peak = frame.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
            let required = if peak > self.ceiling {
                self.ceiling / peak
            } else {
                1.0
            };

            self.gain = if required < self.gain {
                required
            } else {
                self.release_coeff * self.gain + (1.0 - self.release_coeff) * required
            };

            for sample in frame.iter_mut() {
                *sample *= self.gain;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_never_exceeds_ceiling() {
        let mut buffer = AudioBuffer::sine_wave(220.0, 0.5, 44100);
        buffer.apply_gain(2.0);

        let mut limiter = Limiter::with_params(LimiterParams {
            threshold_db: -6.0,
            release_ms: 50.0,
        });
        limiter.prepare(44100, 1);
        limiter.process(&mut buffer);

        assert!(buffer.peak() <= db_to_gain(-6.0) + 1e-5);
    }

    #[test]
    fn test_signal_below_ceiling_untouched() {
        let mut buffer = AudioBuffer::sine_wave(220.0, 0.1, 44100);
        buffer.apply_gain(0.1);
        let original = buffer.clone();

        let mut limiter = Limiter::with_params(LimiterParams::default());
        limiter.prepare(44100, 1);
        limiter.process(&mut buffer);

        assert!(buffer.is_approx_equal(&original, 1e-6));
    }
}
