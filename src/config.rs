//! Runtime settings
//!
//! Loaded from a JSON file (`fxrack.json` in the working directory unless a
//! path is given), then overridden by `FXRACK_PRESET_DIR` and
//! `FXRACK_OUTPUT_DIR`. A missing default file just means defaults.

use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{FxError, Result};

/// Settings file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "fxrack.json";

pub const PRESET_DIR_ENV: &str = "FXRACK_PRESET_DIR";
pub const OUTPUT_DIR_ENV: &str = "FXRACK_OUTPUT_DIR";

/// Bit depths accepted for rendered audio
pub const SUPPORTED_BIT_DEPTHS: [u16; 3] = [16, 24, 32];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding `.pdl` preset documents
    pub preset_dir: PathBuf,
    /// Directory rendered audio is written to
    pub output_dir: PathBuf,
    /// 16 or 24 for integer PCM, 32 for float
    pub output_bit_depth: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preset_dir: PathBuf::from("presets"),
            output_dir: PathBuf::from("."),
            output_bit_depth: 32,
        }
    }
}

impl Settings {
    /// Load settings from an explicit file, or the default file if present
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        settings.apply_overrides(|key| env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Parse a JSON settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| FxError::Config {
            details: format!("cannot open {}: {}", path.display(), e),
        })?;
        let settings: Settings =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| FxError::Config {
                details: format!("invalid settings in {}: {}", path.display(), e),
            })?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Apply environment overrides from a lookup function
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(PRESET_DIR_ENV).filter(|v| !v.is_empty()) {
            self.preset_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|v| !v.is_empty()) {
            self.output_dir = PathBuf::from(dir);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_BIT_DEPTHS.contains(&self.output_bit_depth) {
            return Err(FxError::Config {
                details: format!(
                    "output_bit_depth must be one of 16, 24, 32 (got {})",
                    self.output_bit_depth
                ),
            });
        }
        Ok(())
    }
}
