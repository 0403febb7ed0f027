//! DSP Effects Library
//!
//! One processor per effect kind. All of them implement the `Effect` trait
//! and work on whole in-memory buffers.

mod chorus;
mod compressor;
mod delay;
mod distortion;
mod effect;
mod filter;
mod ladder;
mod limiter;
mod phaser;
mod pitch_shift;
mod reverb;

pub use chorus::{Chorus, ChorusParams};
pub use compressor::{Compressor, CompressorParams};
pub use delay::{Delay, DelayParams};
pub use distortion::Distortion;
pub use effect::Effect;
pub use filter::{PassFilter, PassType};
pub use ladder::{LadderFilter, LadderMode, LadderParams};
pub use limiter::{Limiter, LimiterParams};
pub use phaser::{Phaser, PhaserParams};
pub use pitch_shift::PitchShift;
pub use reverb::{Reverb, ReverbParams};
