//! Audio file I/O operations
//!
//! Handles loading and saving WAV files using the hound crate.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::debug;

use crate::audio::AudioBuffer;
use crate::error::{FxError, Result};

/// Load a WAV file into an AudioBuffer
///
/// Integer files are scaled to -1.0..1.0. A mono file yields a
/// single-channel buffer.
pub fn load_wav<P: AsRef<Path>>(path: P) -> Result<AudioBuffer> {
    let path = path.as_ref();
    let read_err = |e: hound::Error| FxError::AudioReadError {
        path: path.display().to_string(),
        source: e,
    };

    let reader = WavReader::open(path).map_err(read_err)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map_err(read_err))
            .collect::<Result<Vec<f32>>>()?,
        SampleFormat::Int => {
            let max_val = (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val).map_err(read_err))
                .collect::<Result<Vec<f32>>>()?
        }
    };

    debug!(
        "Loaded {} ({} ch, {} Hz, {} samples)",
        path.display(),
        spec.channels,
        spec.sample_rate,
        samples.len()
    );

    AudioBuffer::new(samples, spec.channels, spec.sample_rate)
}

/// Save an AudioBuffer to a WAV file (32-bit float)
pub fn save_wav<P: AsRef<Path>>(buffer: &AudioBuffer, path: P) -> Result<()> {
    save_wav_with_depth(buffer, path, 32)
}

/// Save an AudioBuffer to a WAV file with specific bit depth
///
/// 32 bits writes IEEE float; 16 and 24 bits write clamped integers.
pub fn save_wav_with_depth<P: AsRef<Path>>(buffer: &AudioBuffer, path: P, bits: u16) -> Result<()> {
    let path = path.as_ref();
    let write_err = |e: hound::Error| FxError::AudioWriteError {
        path: path.display().to_string(),
        source: e,
    };

    let spec = match bits {
        32 => WavSpec {
            channels: buffer.channels(),
            sample_rate: buffer.sample_rate(),
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        },
        16 | 24 => WavSpec {
            channels: buffer.channels(),
            sample_rate: buffer.sample_rate(),
            bits_per_sample: bits,
            sample_format: SampleFormat::Int,
        },
        other => {
            return Err(FxError::UnsupportedFormat {
                details: format!("{}-bit output (use 16, 24 or 32)", other),
            })
        }
    };

    // The writer owns the file handle; it is closed on drop even when a
    // sample write fails part way.
    let mut writer = WavWriter::create(path, spec).map_err(write_err)?;

    if spec.sample_format == SampleFormat::Float {
        for &sample in buffer.samples() {
            writer.write_sample(sample).map_err(write_err)?;
        }
    } else {
        let max_val = ((1u32 << (bits - 1)) - 1) as f32;
        for &sample in buffer.samples() {
            let int_sample = (sample.clamp(-1.0, 1.0) * max_val) as i32;
            writer.write_sample(int_sample).map_err(write_err)?;
        }
    }

    writer.finalize().map_err(write_err)?;
    debug!("Wrote {} ({}-bit)", path.display(), bits);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_wav_round_trip_float() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.wav");

        let original = AudioBuffer::sine_wave(440.0, 0.5, 44100);
        save_wav(&original, &path).unwrap();

        let loaded = load_wav(&path).unwrap();

        assert_eq!(original.channels(), loaded.channels());
        assert_eq!(original.sample_rate(), loaded.sample_rate());
        assert!(original.is_approx_equal(&loaded, 1e-6));
    }

    #[test]
    fn test_wav_round_trip_16bit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test_16bit.wav");

        let original = AudioBuffer::sine_wave(440.0, 0.5, 44100);
        save_wav_with_depth(&original, &path, 16).unwrap();

        let loaded = load_wav(&path).unwrap();

        // 16-bit has less precision, allow larger tolerance
        assert!(original.is_approx_equal(&loaded, 1e-4));
    }

    #[test]
    fn test_rejects_unsupported_depth() {
        let dir = tempdir().unwrap();
        let original = AudioBuffer::sine_wave(440.0, 0.1, 8000);
        let result = save_wav_with_depth(&original, dir.path().join("x.wav"), 12);
        assert!(matches!(result, Err(FxError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_wav("nonexistent_file.wav");
        assert!(matches!(result, Err(FxError::AudioReadError { .. })));
    }
}
