//! Ladder filter
//!
//! Four cascaded one-pole stages with saturating resonance feedback. The
//! response mode is a weighted mix of the input and the four stage outputs.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use super::effect::Effect;
use crate::audio::AudioBuffer;

/// Ladder filter response mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LadderMode {
    Lpf12,
    Hpf12,
    Bpf12,
    Lpf24,
    Hpf24,
    Bpf24,
}

impl LadderMode {
    pub const ALL: [LadderMode; 6] = [
        LadderMode::Lpf12,
        LadderMode::Hpf12,
        LadderMode::Bpf12,
        LadderMode::Lpf24,
        LadderMode::Hpf24,
        LadderMode::Bpf24,
    ];

    /// Name used in preset documents (`LadderFilter.Mode.HPF12`)
    pub fn as_str(&self) -> &'static str {
        match self {
            LadderMode::Lpf12 => "LPF12",
            LadderMode::Hpf12 => "HPF12",
            LadderMode::Bpf12 => "BPF12",
            LadderMode::Lpf24 => "LPF24",
            LadderMode::Hpf24 => "HPF24",
            LadderMode::Bpf24 => "BPF24",
        }
    }

    /// Stage weights and resonance compensation
    fn mix(&self) -> ([f32; 5], f32) {
        match self {
            LadderMode::Lpf12 => ([0.0, 0.0, 1.0, 0.0, 0.0], 0.5),
            LadderMode::Hpf12 => ([1.0, -2.0, 1.0, 0.0, 0.0], 0.0),
            LadderMode::Bpf12 => ([0.0, 0.0, -1.0, 1.0, 0.0], 0.5),
            LadderMode::Lpf24 => ([0.0, 0.0, 0.0, 0.0, 1.0], 0.5),
            LadderMode::Hpf24 => ([1.0, -4.0, 6.0, -4.0, 1.0], 0.0),
            LadderMode::Bpf24 => ([0.0, 0.0, 1.0, -2.0, 1.0], 0.5),
        }
    }
}

impl fmt::Display for LadderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LadderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LadderMode::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown ladder mode '{}'", s))
    }
}

/// Ladder filter parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LadderParams {
    pub mode: LadderMode,
    /// Cutoff in Hz
    pub cutoff_hz: f32,
    /// Resonance amount (0-1)
    pub resonance: f32,
    /// Input drive (>= 1)
    pub drive: f32,
}

impl Default for LadderParams {
    fn default() -> Self {
        Self {
            mode: LadderMode::Lpf12,
            cutoff_hz: 200.0,
            resonance: 0.0,
            drive: 1.0,
        }
    }
}

/// Drive-dependent makeup gain
fn drive_gain(drive: f32) -> f32 {
    drive.powf(-2.642) * 0.6103 + 0.3903
}

/// Ladder filter
#[derive(Debug, Clone)]
pub struct LadderFilter {
    params: LadderParams,
    /// Pole coefficient, exp(-2 pi fc / fs)
    pole: f32,
    states: Vec<[f32; 5]>,
}

impl LadderFilter {
    pub fn with_params(params: LadderParams) -> Self {
        Self {
            params,
            pole: 0.0,
            states: Vec::new(),
        }
    }

    pub fn params(&self) -> &LadderParams {
        &self.params
    }
}

impl Effect for LadderFilter {
    fn prepare(&mut self, sample_rate: u32, channels: usize) {
        let nyquist = sample_rate as f32 / 2.0;
        let hi = nyquist * 0.95;
        let cutoff = self.params.cutoff_hz.clamp(1.0_f32.min(hi * 0.5), hi);
        self.pole = (-2.0 * PI * cutoff / sample_rate as f32).exp();
        self.states = vec![[0.0; 5]; channels];
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        let (weights, comp) = self.params.mode.mix();
        let resonance = 0.1 + self.params.resonance * 0.9;
        let drive = self.params.drive;
        let gain = drive_gain(drive);
        let drive2 = drive * 0.04 + 0.96;
        let gain2 = drive_gain(drive2);

        let a1 = self.pole;
        let g = 1.0 - a1;
        let b0 = g * 0.769_230_77;
        let b1 = g * 0.230_769_23;

        for frame in buffer.frames_mut() {
            for (s, sample) in self.states.iter_mut().zip(frame.iter_mut()) {
                let dx = gain * (drive * *sample).tanh();
                let a = dx + resonance * -4.0 * (gain2 * (drive2 * s[4]).tanh() - dx * comp);
                let b = b1 * s[0] + a1 * s[1] + b0 * a;
                let c = b1 * s[1] + a1 * s[2] + b0 * b;
                let d = b1 * s[2] + a1 * s[3] + b0 * c;
                let e = b1 * s[3] + a1 * s[4] + b0 * d;
                *s = [a, b, c, d, e];

                *sample = weights
                    .iter()
                    .zip(s.iter())
                    .map(|(w, v)| w * v)
                    .sum();
            }
        }
    }
}
