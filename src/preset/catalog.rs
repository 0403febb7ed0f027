//! Preset Catalog
//!
//! Stored presets are `.pdl` files in one flat directory. Listing reads the
//! directory every time.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;
use walkdir::WalkDir;

use super::codec::PresetDocument;
use crate::error::{FxError, Result};

/// Preset file extension
pub const PRESET_EXTENSION: &str = "pdl";

/// Directory of stored preset documents
#[derive(Debug, Clone)]
pub struct PresetCatalog {
    dir: PathBuf,
}

impl PresetCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a preset of this name is stored at
    pub fn path_for(&self, name: &str) -> PathBuf {
        let stem: String = name
            .trim()
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        self.dir.join(format!("{}.{}", stem, PRESET_EXTENSION))
    }

    /// Names of stored presets, sorted
    pub fn list_presets(&self) -> Result<BTreeSet<String>> {
        if !self.dir.is_dir() {
            return Err(FxError::PresetNotFound {
                path: self.dir.clone(),
                source: None,
            });
        }

        let mut names = BTreeSet::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| FxError::Io(e.into()))?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(PRESET_EXTENSION)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.insert(stem.to_string());
            }
        }
        Ok(names)
    }

    /// Read a stored preset document
    pub fn load(&self, name: &str) -> Result<String> {
        let path = self.path_for(name);
        fs::read_to_string(&path).map_err(|e| FxError::PresetNotFound {
            path,
            source: Some(e),
        })
    }

    /// Store a document under its title, replacing any previous version
    pub fn save(&self, document: &PresetDocument) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(document.title());
        {
            let mut writer = BufWriter::new(File::create(&path)?);
            writer.write_all(document.as_str().as_bytes())?;
            writer.flush()?;
        }
        info!("Saved preset to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::codec::{encode, PresetRequest};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn document(title: &str) -> PresetDocument {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        encode(
            &PresetRequest {
                title: Some(title.to_string()),
                ..Default::default()
            },
            &ts,
        )
    }

    #[test]
    fn test_list_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.pdl"), "").unwrap();
        fs::write(dir.path().join("a.pdl"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("c.pdl")).unwrap();

        let names = PresetCatalog::new(dir.path()).list_presets().unwrap();
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_list_missing_dir() {
        let dir = TempDir::new().unwrap();
        let catalog = PresetCatalog::new(dir.path().join("absent"));
        assert!(matches!(
            catalog.list_presets(),
            Err(FxError::PresetNotFound { .. })
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let catalog = PresetCatalog::new(dir.path().join("presets"));
        let doc = document("Night Drive");

        let path = catalog.save(&doc).unwrap();
        assert_eq!(path.file_name().unwrap(), "Night Drive.pdl");
        assert_eq!(catalog.load("Night Drive").unwrap(), doc.as_str());
        assert!(catalog.list_presets().unwrap().contains("Night Drive"));
    }

    #[test]
    fn test_save_sanitizes_separators() {
        let dir = TempDir::new().unwrap();
        let catalog = PresetCatalog::new(dir.path());
        let path = catalog.save(&document("a/b")).unwrap();
        assert_eq!(path.parent().unwrap(), dir.path());
        assert_eq!(path.file_name().unwrap(), "a_b.pdl");
    }

    #[test]
    fn test_load_missing() {
        let dir = TempDir::new().unwrap();
        let err = PresetCatalog::new(dir.path()).load("nope").unwrap_err();
        assert!(matches!(err, FxError::PresetNotFound { .. }));
    }
}
