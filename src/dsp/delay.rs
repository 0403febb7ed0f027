//! Delay Effect
//!
//! Feedback echo with a wet/dry mix. One circular buffer per channel.

use super::effect::Effect;
use crate::audio::AudioBuffer;

/// Delay parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayParams {
    /// Delay time in seconds
    pub delay_seconds: f32,
    /// Feedback amount (0-1)
    pub feedback: f32,
    /// Wet proportion of the output (0-1)
    pub mix: f32,
}

impl Default for DelayParams {
    fn default() -> Self {
        Self {
            delay_seconds: 0.5,
            feedback: 0.0,
            mix: 0.5,
        }
    }
}

/// Feedback delay line
#[derive(Debug, Clone)]
pub struct Delay {
    params: DelayParams,
    /// Delay length in samples
    delay_samples: usize,
    /// Circular buffer per channel
    lines: Vec<Vec<f32>>,
    /// Current write position in circular buffer
    write_pos: usize,
}

impl Delay {
    pub fn with_params(params: DelayParams) -> Self {
        Self {
            params,
            delay_samples: 0,
            lines: Vec::new(),
            write_pos: 0,
        }
    }

    pub fn params(&self) -> &DelayParams {
        &self.params
    }
}

impl Effect for Delay {
    fn prepare(&mut self, sample_rate: u32, channels: usize) {
        self.delay_samples = (self.params.delay_seconds * sample_rate as f32).round() as usize;
        self.lines = vec![vec![0.0; self.delay_samples.max(1)]; channels];
        self.write_pos = 0;
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        let mix = self.params.mix;
        let feedback = self.params.feedback;

        // A zero-length echo coincides with the dry signal
        if self.delay_samples == 0 {
            return;
        }

        let len = self.delay_samples;
        for frame in buffer.frames_mut() {
            for (line, sample) in self.lines.iter_mut().zip(frame.iter_mut()) {
                let delayed = line[self.write_pos];
                line[self.write_pos] = *sample + delayed * feedback;
                *sample = *sample * (1.0 - mix) + delayed * mix;
            }
            self.write_pos = (self.write_pos + 1) % len;
        }
    }
}
