//! Processing Orchestrator
//!
//! Runs a chain over a whole buffer, keeps the result out of clipping and
//! writes it next to a timestamped name.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use log::{info, warn};

use crate::audio::{load_wav, save_wav_with_depth, AudioBuffer};
use crate::chain::{ChainBuilder, EffectChain, SlotCatalog};
use crate::config::Settings;
use crate::error::{FxError, Result};
use crate::preset::{DEFAULT_AUDIO_EXTENSION, TIMESTAMP_FORMAT};
use crate::registry::EffectRegistry;

/// Apply a chain left to right, then normalize overflow
pub fn process(chain: &EffectChain, buffer: AudioBuffer) -> AudioBuffer {
    let mut output = chain.process(buffer);
    normalize_peak(&mut output);
    output
}

/// Scale the whole buffer down if its peak exceeds full scale
///
/// One global gain of `1 / peak`, never per channel. Buffers already within
/// full scale are left untouched, so repeated calls change nothing.
pub fn normalize_peak(buffer: &mut AudioBuffer) {
    let peak = buffer.peak();
    if peak > 1.0 && peak.is_finite() {
        // Dividing keeps the new peak at exactly 1.0
        for sample in buffer.samples_mut() {
            *sample /= peak;
        }
    }
}

/// `base_<YYYYMMDD_HHMMSS>.ext` from an output-name hint
///
/// Only the file name of the hint is kept. A hint without an extension gets
/// `.wav`. Two runs within the same second produce the same name.
pub fn timestamped_filename(hint: &str, timestamp: &NaiveDateTime) -> String {
    let path = Path::new(hint);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or(DEFAULT_AUDIO_EXTENSION);
    format!("{}_{}.{}", stem, timestamp.format(TIMESTAMP_FORMAT), ext)
}

/// Renders chains to audio files in the configured output directory
pub struct Orchestrator<'a> {
    builder: ChainBuilder<'a>,
    output_dir: PathBuf,
    bit_depth: u16,
}

impl<'a> Orchestrator<'a> {
    pub fn new(registry: &'a EffectRegistry, catalog: &'a SlotCatalog, settings: &Settings) -> Self {
        Self {
            builder: ChainBuilder::new(registry, catalog),
            output_dir: settings.output_dir.clone(),
            bit_depth: settings.output_bit_depth,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Process a WAV file and write `<hint base>_<timestamp>.<ext>`
    pub fn apply_to_file(&self, chain: &EffectChain, input: &Path, hint: &str) -> Result<PathBuf> {
        self.apply_to_file_at(chain, input, hint, &Local::now().naive_local())
    }

    /// Same as `apply_to_file` with an explicit timestamp
    pub fn apply_to_file_at(
        &self,
        chain: &EffectChain,
        input: &Path,
        hint: &str,
        timestamp: &NaiveDateTime,
    ) -> Result<PathBuf> {
        let path = self.output_dir.join(timestamped_filename(hint, timestamp));
        self.render(chain, input, &path)?;
        Ok(path)
    }

    /// Process a file with one slot's default chain
    ///
    /// The slot is matched case-insensitively on its id or display name.
    pub fn apply_slot(&self, slot_name: &str, input: &Path) -> Result<PathBuf> {
        let slot = self
            .builder
            .catalog()
            .find(slot_name)
            .ok_or_else(|| FxError::UnknownSlot {
                slot: slot_name.trim().to_string(),
            })?;
        let chain = self.builder.default_chain(slot)?;
        info!("Applying slot '{}' ({} units)", slot.name, chain.len());
        self.apply_to_file(&chain, input, slot.output_hint)
    }

    /// Render every slot with its defaults, one file per slot
    pub fn render_all_slots(&self, input: &Path) -> Result<Vec<PathBuf>> {
        let source = load_wav(input)?;
        let mut written = Vec::new();
        for slot in self.builder.catalog().iter() {
            let chain = self.builder.default_chain(slot)?;
            let output = process(&chain, source.clone());
            let path = self.output_dir.join(slot.output_hint);
            self.write(&output, &path)?;
            info!("Rendered {} -> {}", slot.name, path.display());
            written.push(path);
        }
        Ok(written)
    }

    fn render(&self, chain: &EffectChain, input: &Path, output: &Path) -> Result<()> {
        let source = load_wav(input)?;
        if chain.is_empty() {
            warn!("Empty chain, output will only be peak-normalized");
        }
        let processed = process(chain, source);
        self.write(&processed, output)?;
        info!("Wrote {} ({:.2}s)", output.display(), processed.duration());
        Ok(())
    }

    fn write(&self, buffer: &AudioBuffer, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        save_wav_with_depth(buffer, path, self.bit_depth)
    }
}
