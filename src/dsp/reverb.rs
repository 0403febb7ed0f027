//! Reverb effect
//!
//! Freeverb algorithm:
//! - 8 parallel low-pass comb filters
//! - 4 series allpass filters for diffusion
//! - stereo width cross-mix
//! - freeze mode (infinite sustain, no new input)

use super::effect::Effect;
use crate::audio::AudioBuffer;

// ============================================================================
// Freeverb Constants
// ============================================================================

/// Reference sample rate for Freeverb delays
const REFERENCE_SAMPLE_RATE: f64 = 44100.0;

/// Comb filter delays at 44100 Hz
const COMB_DELAYS: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// Allpass filter delays at 44100 Hz
const ALLPASS_DELAYS: [usize; 4] = [556, 441, 341, 225];

/// Extra delay per channel index, decorrelates the tanks
const STEREO_SPREAD: usize = 23;

const ALLPASS_GAIN: f32 = 0.5;
const ROOM_SCALE: f32 = 0.28;
const ROOM_OFFSET: f32 = 0.7;
const DAMP_SCALE: f32 = 0.4;
const FIXED_GAIN: f32 = 0.015;
const WET_SCALE: f32 = 3.0;

/// Reverb parameters, all 0-1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParams {
    pub room_size: f32,
    pub damping: f32,
    pub wet_level: f32,
    pub dry_level: f32,
    pub width: f32,
    /// >= 0.5 holds the current tail indefinitely
    pub freeze_mode: f32,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            room_size: 0.5,
            damping: 0.5,
            wet_level: 0.33,
            dry_level: 0.4,
            width: 1.0,
            freeze_mode: 0.0,
        }
    }
}

impl ReverbParams {
    fn frozen(&self) -> bool {
        self.freeze_mode >= 0.5
    }
}

// ============================================================================
// Filter Components
// ============================================================================

/// Low-pass comb filter
#[derive(Debug, Clone)]
struct CombFilter {
    buffer: Vec<f32>,
    pos: usize,
    filter_state: f32,
}

impl CombFilter {
    fn new(delay: usize) -> Self {
        Self {
            buffer: vec![0.0; delay.max(1)],
            pos: 0,
            filter_state: 0.0,
        }
    }

    fn process(&mut self, input: f32, feedback: f32, damp1: f32, damp2: f32) -> f32 {
        let output = self.buffer[self.pos];
        self.filter_state = output * damp2 + self.filter_state * damp1;
        self.buffer[self.pos] = input + self.filter_state * feedback;
        self.pos = (self.pos + 1) % self.buffer.len();
        output
    }
}

/// Schroeder allpass used for diffusion
#[derive(Debug, Clone)]
struct AllpassFilter {
    buffer: Vec<f32>,
    pos: usize,
}

impl AllpassFilter {
    fn new(delay: usize) -> Self {
        Self {
            buffer: vec![0.0; delay.max(1)],
            pos: 0,
        }
    }

    fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.pos];
        let output = delayed - input;
        self.buffer[self.pos] = input + delayed * ALLPASS_GAIN;
        self.pos = (self.pos + 1) % self.buffer.len();
        output
    }
}

/// One channel's comb bank and allpass chain
#[derive(Debug, Clone)]
struct Tank {
    combs: Vec<CombFilter>,
    allpasses: Vec<AllpassFilter>,
}

impl Tank {
    fn new(sample_rate: u32, spread: usize) -> Self {
        let scale = sample_rate as f64 / REFERENCE_SAMPLE_RATE;
        let scaled = |d: usize| (((d + spread) as f64) * scale) as usize;
        Self {
            combs: COMB_DELAYS.iter().map(|&d| CombFilter::new(scaled(d))).collect(),
            allpasses: ALLPASS_DELAYS
                .iter()
                .map(|&d| AllpassFilter::new(scaled(d)))
                .collect(),
        }
    }

    fn process(&mut self, input: f32, feedback: f32, damp1: f32, damp2: f32) -> f32 {
        let mut out: f32 = self
            .combs
            .iter_mut()
            .map(|c| c.process(input, feedback, damp1, damp2))
            .sum();
        for allpass in &mut self.allpasses {
            out = allpass.process(out);
        }
        out
    }
}

// ============================================================================
// Main Reverb Effect
// ============================================================================

/// Freeverb-style reverb
#[derive(Debug, Clone)]
pub struct Reverb {
    params: ReverbParams,
    tanks: Vec<Tank>,
    wet_out: Vec<f32>,
}

impl Reverb {
    pub fn with_params(params: ReverbParams) -> Self {
        Self {
            params,
            tanks: Vec::new(),
            wet_out: Vec::new(),
        }
    }

    pub fn params(&self) -> &ReverbParams {
        &self.params
    }
}

impl Effect for Reverb {
    fn prepare(&mut self, sample_rate: u32, channels: usize) {
        self.tanks = (0..channels)
            .map(|ch| Tank::new(sample_rate, ch * STEREO_SPREAD))
            .collect();
        self.wet_out = vec![0.0; channels];
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        let p = self.params;
        let (feedback, damp, input_gain) = if p.frozen() {
            (1.0, 0.0, 0.0)
        } else {
            (p.room_size * ROOM_SCALE + ROOM_OFFSET, p.damping * DAMP_SCALE, FIXED_GAIN)
        };
        let (damp1, damp2) = (damp, 1.0 - damp);

        let wet = p.wet_level * WET_SCALE;
        let wet1 = wet * (p.width / 2.0 + 0.5);
        let wet2 = wet * ((1.0 - p.width) / 2.0);

        for frame in buffer.frames_mut() {
            // Freeverb feeds the channel sum into every tank
            let input = frame.iter().sum::<f32>() * input_gain;
            for (tank, out) in self.tanks.iter_mut().zip(self.wet_out.iter_mut()) {
                *out = tank.process(input, feedback, damp1, damp2);
            }

            let channels = frame.len();
            for (ch, sample) in frame.iter_mut().enumerate() {
                let own = self.wet_out[ch];
                let wet_sample = if channels == 2 {
                    own * wet1 + self.wet_out[1 - ch] * wet2
                } else {
                    own * (wet1 + wet2)
                };
                *sample = *sample * p.dry_level + wet_sample;
            }
        }
    }
}
