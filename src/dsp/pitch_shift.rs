//! Pitch shift effect
//!
//! Delay-line pitch shifter: two read taps sweep through a short window at
//! a rate set by the pitch ratio and are crossfaded with triangular windows
//! so each tap is silent when it wraps.

use super::chorus::read_fractional;
use super::effect::Effect;
use crate::audio::AudioBuffer;

/// Crossfade window length in seconds
const WINDOW_SECONDS: f32 = 0.05;

/// Delay-line pitch shifter
#[derive(Debug, Clone)]
pub struct PitchShift {
    semitones: f32,
    /// Window length in samples
    window: f32,
    lines: Vec<Vec<f32>>,
    write_pos: usize,
    phase: f32,
}

impl PitchShift {
    pub fn new(semitones: f32) -> Self {
        Self {
            semitones,
            window: 0.0,
            lines: Vec::new(),
            write_pos: 0,
            phase: 0.0,
        }
    }

    pub fn semitones(&self) -> f32 {
        self.semitones
    }

    /// Playback-speed ratio for the configured shift
    pub fn ratio(&self) -> f32 {
        2.0_f32.powf(self.semitones / 12.0)
    }
}

/// Triangular window: 0 at the ends, 1 in the middle
fn triangle(phase: f32) -> f32 {
    1.0 - (2.0 * phase - 1.0).abs()
}

impl Effect for PitchShift {
    fn prepare(&mut self, sample_rate: u32, channels: usize) {
        self.window = (WINDOW_SECONDS * sample_rate as f32).max(64.0);
        let len = self.window.ceil() as usize + 4;
        self.lines = vec![vec![0.0; len]; channels];
        self.write_pos = 0;
        self.phase = 0.0;
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        if self.semitones == 0.0 {
            return;
        }

        let step = (1.0 - self.ratio()) / self.window;
        let len = self.lines.first().map_or(1, Vec::len);

        for frame in buffer.frames_mut() {
            let phase_a = self.phase;
            let phase_b = (self.phase + 0.5).fract();
            let (gain_a, gain_b) = (triangle(phase_a), triangle(phase_b));

            for (line, sample) in self.lines.iter_mut().zip(frame.iter_mut()) {
                line[self.write_pos] = *sample;
                // Read one sample behind the write head at minimum
                let tap_a = read_fractional(line, self.write_pos, phase_a * self.window);
                let tap_b = read_fractional(line, self.write_pos, phase_b * self.window);
                *sample = tap_a * gain_a + tap_b * gain_b;
            }

            self.write_pos = (self.write_pos + 1) % len;
            self.phase = (self.phase + step).rem_euclid(1.0);
        }
    }
}
