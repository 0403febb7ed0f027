//! Audio buffer and I/O utilities
//!
//! This module provides the sample matrix type and WAV file I/O.

mod buffer;
mod io;

pub use buffer::AudioBuffer;
pub use io::{load_wav, save_wav, save_wav_with_depth};
