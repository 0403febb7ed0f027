//! High-pass and low-pass filters
//!
//! Second-order Butterworth sections using the Audio EQ Cookbook formulas.

use std::f64::consts::PI;

use super::effect::Effect;
use crate::audio::AudioBuffer;

/// Butterworth Q for a second-order section
const BUTTERWORTH_Q: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Filter response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassType {
    /// Remove content below the cutoff
    HighPass,
    /// Remove content above the cutoff
    LowPass,
}

/// Biquad filter coefficients, normalized by a0
#[derive(Debug, Clone, Copy, Default)]
struct BiquadCoeffs {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl BiquadCoeffs {
    /// Reference: https://www.w3.org/2011/audio/audio-eq-cookbook.html
    fn calculate(pass: PassType, sample_rate: f64, frequency: f64) -> Self {
        // Keep the cutoff below Nyquist, even when Nyquist is under 1 Hz
        let hi = (sample_rate / 2.0 - 1.0).max(sample_rate * 0.45);
        let freq = frequency.clamp(1.0_f64.min(hi * 0.5), hi);

        let w0 = 2.0 * PI * freq / sample_rate;
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * BUTTERWORTH_Q);

        let (b0, b1, b2) = match pass {
            PassType::LowPass => ((1.0 - cos_w0) / 2.0, 1.0 - cos_w0, (1.0 - cos_w0) / 2.0),
            PassType::HighPass => ((1.0 + cos_w0) / 2.0, -(1.0 + cos_w0), (1.0 + cos_w0) / 2.0),
        };
        let a0 = 1.0 + alpha;

        BiquadCoeffs {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: (-2.0 * cos_w0) / a0,
            a2: (1.0 - alpha) / a0,
        }
    }
}

/// Biquad filter state for one channel
#[derive(Debug, Clone, Copy, Default)]
struct BiquadState {
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl BiquadState {
    fn process(&mut self, input: f64, c: &BiquadCoeffs) -> f64 {
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }
}

/// Cutoff filter used for both HighpassFilter and LowpassFilter
#[derive(Debug, Clone)]
pub struct PassFilter {
    pass: PassType,
    cutoff_hz: f32,
    coeffs: BiquadCoeffs,
    states: Vec<BiquadState>,
}

impl PassFilter {
    pub fn new(pass: PassType, cutoff_hz: f32) -> Self {
        Self {
            pass,
            cutoff_hz,
            coeffs: BiquadCoeffs::default(),
            states: Vec::new(),
        }
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(PassType::HighPass, cutoff_hz)
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(PassType::LowPass, cutoff_hz)
    }

    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }
}

impl Effect for PassFilter {
    fn prepare(&mut self, sample_rate: u32, channels: usize) {
        self.coeffs = BiquadCoeffs::calculate(self.pass, sample_rate as f64, self.cutoff_hz as f64);
        self.states = vec![BiquadState::default(); channels];
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        for frame in buffer.frames_mut() {
            for (state, sample) in self.states.iter_mut().zip(frame.iter_mut()) {
                *sample = state.process(*sample as f64, &self.coeffs) as f32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rms(buffer: &AudioBuffer) -> f32 {
        // Skip the transient at the start
        let tail = &buffer.samples()[buffer.samples().len() / 4..];
        (tail.iter().map(|s| s * s).sum::<f32>() / tail.len() as f32).sqrt()
    }

    fn filtered(mut filter: PassFilter, frequency: f32) -> f32 {
        let mut buffer = AudioBuffer::sine_wave(frequency, 0.5, 44100);
        filter.prepare(44100, 1);
        filter.process(&mut buffer);
        rms(&buffer)
    }

    #[test]
    fn test_low_pass_filter() {
        let passed = filtered(PassFilter::lowpass(1000.0), 100.0);
        let cut = filtered(PassFilter::lowpass(1000.0), 10000.0);
        assert!(passed > 0.6);
        assert!(cut < 0.05);
    }

    #[test]
    fn test_high_pass_filter() {
        let passed = filtered(PassFilter::highpass(1000.0), 10000.0);
        let cut = filtered(PassFilter::highpass(1000.0), 100.0);
        assert!(passed > 0.6);
        assert!(cut < 0.05);
    }

    #[test]
    fn test_low_sample_rates_stay_finite() {
        for sample_rate in [2, 40] {
            for mut filter in [PassFilter::highpass(80.0), PassFilter::lowpass(5000.0)] {
                let mut buffer = AudioBuffer::from_mono(vec![0.1; 64], sample_rate).unwrap();
                filter.prepare(sample_rate, 1);
                filter.process(&mut buffer);
                assert!(buffer.samples().iter().all(|s| s.is_finite()), "{} Hz", sample_rate);
            }
        }
    }

    #[test]
    fn test_cutoff_above_nyquist_is_stable() {
        let mut buffer = AudioBuffer::sine_wave(440.0, 0.1, 8000);
        let mut filter = PassFilter::lowpass(20000.0);
        filter.prepare(8000, 1);
        filter.process(&mut buffer);
        assert!(buffer.samples().iter().all(|s| s.is_finite()));
    }
}
