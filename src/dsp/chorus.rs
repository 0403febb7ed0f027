//! Chorus effect
//!
//! A short delay line whose length is swept by a sine LFO around a centre
//! delay. Each channel gets a quarter-cycle LFO offset for width.

use std::f32::consts::PI;

use super::effect::Effect;
use crate::audio::AudioBuffer;

/// Sweep range at depth 1.0, in milliseconds either side of the centre
const MAX_SWEEP_MS: f32 = 5.0;

/// Chorus parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChorusParams {
    /// LFO rate in Hz
    pub rate_hz: f32,
    /// Modulation depth (0-1)
    pub depth: f32,
    /// Centre of the swept delay in milliseconds
    pub centre_delay_ms: f32,
    /// Feedback (-1 to 1)
    pub feedback: f32,
    /// Wet proportion of the output (0-1)
    pub mix: f32,
}

impl Default for ChorusParams {
    fn default() -> Self {
        Self {
            rate_hz: 1.0,
            depth: 0.25,
            centre_delay_ms: 7.0,
            feedback: 0.0,
            mix: 0.5,
        }
    }
}

/// Read a fractional delay from a circular buffer with linear interpolation
pub(crate) fn read_fractional(line: &[f32], write_pos: usize, delay: f32) -> f32 {
    let len = line.len();
    let whole = delay.floor() as usize;
    let frac = delay - whole as f32;
    let i0 = (write_pos + len * 2 - whole) % len;
    let i1 = (write_pos + len * 2 - whole - 1) % len;
    line[i0] * (1.0 - frac) + line[i1] * frac
}

/// Modulated-delay chorus
#[derive(Debug, Clone)]
pub struct Chorus {
    params: ChorusParams,
    sample_rate: f32,
    lines: Vec<Vec<f32>>,
    write_pos: usize,
    phase: f32,
}

impl Chorus {
    pub fn with_params(params: ChorusParams) -> Self {
        Self {
            params,
            sample_rate: 44100.0,
            lines: Vec::new(),
            write_pos: 0,
            phase: 0.0,
        }
    }

    pub fn params(&self) -> &ChorusParams {
        &self.params
    }
}

impl Effect for Chorus {
    fn prepare(&mut self, sample_rate: u32, channels: usize) {
        self.sample_rate = sample_rate as f32;
        let max_delay_ms = self.params.centre_delay_ms + MAX_SWEEP_MS;
        let len = (max_delay_ms * 0.001 * self.sample_rate).ceil() as usize + 4;
        self.lines = vec![vec![0.0; len]; channels];
        self.write_pos = 0;
        self.phase = 0.0;
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        let p = self.params;
        let ms_to_samples = 0.001 * self.sample_rate;
        let phase_inc = p.rate_hz / self.sample_rate;

        for frame in buffer.frames_mut() {
            for (ch, (line, sample)) in self.lines.iter_mut().zip(frame.iter_mut()).enumerate() {
                let lfo = (2.0 * PI * (self.phase + ch as f32 * 0.25)).sin();
                let delay_ms = (p.centre_delay_ms + lfo * p.depth * MAX_SWEEP_MS).max(0.0);
                let delay = (delay_ms * ms_to_samples).max(1.0);

                let wet = read_fractional(line, self.write_pos, delay);
                line[self.write_pos] = *sample + wet * p.feedback;
                *sample = *sample * (1.0 - p.mix) + wet * p.mix;
            }

            self.write_pos = (self.write_pos + 1) % self.lines.first().map_or(1, Vec::len);
            self.phase = (self.phase + phase_inc).fract();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_mix_is_identity() {
        let mut buffer = AudioBuffer::sine_wave(440.0, 0.1, 44100);
        let original = buffer.clone();
        let mut chorus = Chorus::with_params(ChorusParams {
            mix: 0.0,
            ..ChorusParams::default()
        });
        chorus.prepare(44100, 1);
        chorus.process(&mut buffer);
        assert!(buffer.is_approx_equal(&original, 1e-6));
    }

    #[test]
    fn test_wet_signal_differs() {
        let mut buffer = AudioBuffer::sine_wave(440.0, 0.1, 44100);
        let original = buffer.clone();
        let mut chorus = Chorus::with_params(ChorusParams {
            rate_hz: 3.0,
            depth: 0.8,
            mix: 0.7,
            ..ChorusParams::default()
        });
        chorus.prepare(44100, 1);
        chorus.process(&mut buffer);
        assert!(!buffer.is_approx_equal(&original, 1e-3));
        assert!(buffer.samples().iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_fractional_read_interpolates() {
        let line = vec![0.0, 1.0, 2.0, 3.0];
        // write_pos 0: one sample back is index 3, two back is index 2
        assert!((read_fractional(&line, 0, 1.5) - 2.5).abs() < 1e-6);
    }
}
