//! Effect trait definition
//!
//! Base trait for all DSP processors. A processor is built fresh from
//! validated parameters for every run, so it only has to be correct for one
//! pass over one buffer.

use crate::audio::AudioBuffer;

/// Base trait for all DSP effects
pub trait Effect: Send {
    /// Size internal state for the buffer about to be processed
    fn prepare(&mut self, sample_rate: u32, channels: usize);

    /// Process audio in-place
    fn process(&mut self, buffer: &mut AudioBuffer);
}

/// Convert decibels to a linear gain factor
pub(crate) fn db_to_gain(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert a time constant in milliseconds into a one-pole smoothing coefficient
pub(crate) fn time_coeff(ms: f32, sample_rate: u32) -> f32 {
    if ms <= 0.0 {
        return 0.0;
    }
    (-1.0 / (ms * 0.001 * sample_rate as f32)).exp()
}
