//! Phaser effect
//!
//! Six first-order allpass stages whose break frequency is swept by an LFO
//! around a centre frequency, with feedback from the last stage.

use std::f32::consts::PI;

use super::effect::Effect;
use crate::audio::AudioBuffer;

const STAGES: usize = 6;

/// Phaser parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaserParams {
    /// LFO rate in Hz
    pub rate_hz: f32,
    /// Sweep depth (0-1), in octaves either side of the centre
    pub depth: f32,
    /// Centre frequency of the sweep in Hz
    pub centre_frequency_hz: f32,
    /// Feedback (-1 to 1)
    pub feedback: f32,
    /// Wet proportion of the output (0-1)
    pub mix: f32,
}

impl Default for PhaserParams {
    fn default() -> Self {
        Self {
            rate_hz: 1.0,
            depth: 0.5,
            centre_frequency_hz: 1300.0,
            feedback: 0.0,
            mix: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ChannelState {
    /// Previous input and output of every stage
    x1: [f32; STAGES],
    y1: [f32; STAGES],
    last: f32,
}

/// Swept allpass phaser
#[derive(Debug, Clone)]
pub struct Phaser {
    params: PhaserParams,
    sample_rate: f32,
    states: Vec<ChannelState>,
    phase: f32,
}

impl Phaser {
    pub fn with_params(params: PhaserParams) -> Self {
        Self {
            params,
            sample_rate: 44100.0,
            states: Vec::new(),
            phase: 0.0,
        }
    }

    pub fn params(&self) -> &PhaserParams {
        &self.params
    }

    /// Allpass coefficient for a break frequency
    fn coefficient(&self, frequency: f32) -> f32 {
        // Very low sample rates narrow the band below 20 Hz
        let hi = self.sample_rate * 0.45;
        let f = frequency.clamp(20.0_f32.min(hi * 0.5), hi);
        let t = (PI * f / self.sample_rate).tan();
        (t - 1.0) / (t + 1.0)
    }
}

impl Effect for Phaser {
    fn prepare(&mut self, sample_rate: u32, channels: usize) {
        self.sample_rate = sample_rate as f32;
        self.states = vec![ChannelState::default(); channels];
        self.phase = 0.0;
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        let p = self.params;
        let phase_inc = p.rate_hz / self.sample_rate;

        for frame in buffer.frames_mut() {
            let lfo = (2.0 * PI * self.phase).sin();
            let frequency = p.centre_frequency_hz * 2.0_f32.powf(lfo * p.depth);
            let a = self.coefficient(frequency);

            for (state, sample) in self.states.iter_mut().zip(frame.iter_mut()) {
                let mut x = *sample + state.last * p.feedback;
                for stage in 0..STAGES {
                    let y = a * x + state.x1[stage] - a * state.y1[stage];
                    state.x1[stage] = x;
                    state.y1[stage] = y;
                    x = y;
                }
                state.last = x;
                *sample = *sample * (1.0 - p.mix) + x * p.mix;
            }

            self.phase = (self.phase + phase_inc).fract();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phaser_changes_signal() {
        let mut buffer = AudioBuffer::sine_wave(1000.0, 0.2, 44100);
        let original = buffer.clone();
        let mut phaser = Phaser::with_params(PhaserParams {
            feedback: 0.5,
            ..PhaserParams::default()
        });
        phaser.prepare(44100, 1);
        phaser.process(&mut buffer);

        assert!(!buffer.is_approx_equal(&original, 1e-3));
        assert!(buffer.samples().iter().all(|s| s.is_finite()));
        assert_eq!(buffer.num_frames(), original.num_frames());
    }

    #[test]
    fn test_low_sample_rates_stay_finite() {
        for sample_rate in [2, 40] {
            let mut buffer = AudioBuffer::from_mono(vec![0.1; 64], sample_rate).unwrap();
            let mut phaser = Phaser::with_params(PhaserParams::default());
            phaser.prepare(sample_rate, 1);
            phaser.process(&mut buffer);
            assert!(buffer.samples().iter().all(|s| s.is_finite()), "{} Hz", sample_rate);
        }
    }

    #[test]
    fn test_allpass_coefficient_range() {
        let mut phaser = Phaser::with_params(PhaserParams::default());
        phaser.prepare(44100, 2);
        let a = phaser.coefficient(1300.0);
        assert!(a > -1.0 && a < 1.0);
    }
}
