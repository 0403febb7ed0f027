//! Distortion effect
//!
//! Drive the signal into a tanh waveshaper. Stateless.

use super::effect::{db_to_gain, Effect};
use crate::audio::AudioBuffer;

/// Tanh waveshaping distortion
#[derive(Debug, Clone)]
pub struct Distortion {
    drive_db: f32,
    drive: f32,
}

impl Distortion {
    pub fn new(drive_db: f32) -> Self {
        Self {
            drive_db,
            drive: db_to_gain(drive_db),
        }
    }

    pub fn drive_db(&self) -> f32 {
        self.drive_db
    }
}

impl Effect for Distortion {
    fn prepare(&mut self, _sample_rate: u32, _channels: usize) {
        self.drive = db_to_gain(self.drive_db);
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        for sample in buffer.samples_mut() {
            *sample = (*sample * self.drive).tanh();
        }
    }
}
