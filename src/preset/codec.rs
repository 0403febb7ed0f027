//! Preset Codec
//!
//! A preset document is three lines:
//!
//! ```text
//! # <title>
//! [<descriptor>, <descriptor>, ...],
//! "<title>.wav"
//! ```
//!
//! Encoding is deterministic for a given timestamp. Decoding never evaluates
//! anything; see `parser` for the accepted grammar.

use std::fmt;
use std::path::Path;

use chrono::{Local, NaiveDateTime};
use log::{debug, info};
use serde::Serialize;

use super::parser::{locate, parse_list};
use crate::chain::{BuiltChain, EffectChain, EffectDescriptor};
use crate::error::Result;
use crate::registry::EffectRegistry;

/// Timestamp layout used in synthesized titles and output names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Extension of the output name when no hint supplies one
pub const DEFAULT_AUDIO_EXTENSION: &str = "wav";

/// Everything needed to encode a preset
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PresetRequest {
    /// Explicit title; blank means synthesize one
    pub title: Option<String>,
    pub descriptors: Vec<EffectDescriptor>,
    pub enabled_names: Vec<String>,
    /// Only the extension is used
    pub output_hint: Option<String>,
}

impl PresetRequest {
    pub fn from_built(built: &BuiltChain, title: Option<String>) -> Self {
        Self {
            title,
            descriptors: built.descriptors.clone(),
            enabled_names: built.enabled_names.clone(),
            output_hint: None,
        }
    }
}

/// Canonical text of an encoded preset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetDocument {
    title: String,
    text: String,
}

impl PresetDocument {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for PresetDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A decoded, executable preset
#[derive(Debug, Clone)]
pub struct DecodedPreset {
    /// Title from the leading `# ` line, if any
    pub title: Option<String>,
    pub descriptors: Vec<EffectDescriptor>,
    pub chain: EffectChain,
    pub output_name: String,
}

/// Characters that would break the document structure if left in a title
fn is_structural(c: char) -> bool {
    matches!(c, '[' | ']' | '"' | '\n' | '\r')
}

/// Pick the preset title
///
/// An explicit non-blank title wins (trimmed). Otherwise the enabled slot
/// names joined by `_` plus the timestamp, or `Preset_<timestamp>` when
/// nothing is enabled.
pub fn resolve_title(title: Option<&str>, enabled_names: &[String], timestamp: &NaiveDateTime) -> String {
    let stamp = timestamp.format(TIMESTAMP_FORMAT);
    let title = match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(explicit) => explicit.to_string(),
        None if enabled_names.is_empty() => format!("Preset_{}", stamp),
        None => format!("{}_{}", enabled_names.join("_"), stamp),
    };
    title
        .chars()
        .map(|c| if is_structural(c) { '_' } else { c })
        .collect()
}

/// Encode a preset with an explicit timestamp
pub fn encode(request: &PresetRequest, timestamp: &NaiveDateTime) -> PresetDocument {
    let title = resolve_title(request.title.as_deref(), &request.enabled_names, timestamp);
    let extension = request
        .output_hint
        .as_deref()
        .and_then(|hint| Path::new(hint).extension())
        .and_then(|ext| ext.to_str())
        .unwrap_or(DEFAULT_AUDIO_EXTENSION);

    let list = request
        .descriptors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    let text = format!("# {}\n[{}],\n\"{}.{}\"\n", title, list, title, extension);
    debug!("Encoded preset '{}' with {} effects", title, request.descriptors.len());
    PresetDocument { title, text }
}

/// Encode a preset stamped with the local clock
pub fn encode_now(request: &PresetRequest) -> PresetDocument {
    encode(request, &Local::now().naive_local())
}

/// Decode a preset document into an executable chain
///
/// Any structural, grammar or schema failure aborts the whole decode.
pub fn decode(registry: &EffectRegistry, text: &str) -> Result<DecodedPreset> {
    let parts = locate(text)?;
    let calls = parse_list(parts.list, parts.list_offset)?;

    let mut descriptors = Vec::with_capacity(calls.len());
    for call in &calls {
        let schema = registry.lookup(&call.name)?;
        descriptors.push(EffectDescriptor {
            kind: schema.kind,
            params: call.args.clone(),
        });
    }

    let chain = descriptors
        .iter()
        .map(|d| registry.construct_descriptor(d))
        .collect::<Result<EffectChain>>()?;

    info!(
        "Decoded preset {} with {} effects",
        parts.title.as_deref().unwrap_or("<untitled>"),
        chain.len()
    );

    Ok(DecodedPreset {
        title: parts.title,
        descriptors,
        chain,
        output_name: parts.output_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FxError;
    use crate::registry::{EffectKind, ParamValue};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_title_explicit() {
        assert_eq!(resolve_title(Some("  Warm Pad "), &names(&["Phaser"]), &ts()), "Warm Pad");
    }

    #[test]
    fn test_resolve_title_from_enabled_names() {
        assert_eq!(
            resolve_title(Some("   "), &names(&["Chorus Subtle", "Compressor"]), &ts()),
            "Chorus Subtle_Compressor_20240101_120000"
        );
    }

    #[test]
    fn test_resolve_title_fallback() {
        assert_eq!(resolve_title(None, &[], &ts()), "Preset_20240101_120000");
    }

    #[test]
    fn test_resolve_title_strips_structure() {
        assert_eq!(resolve_title(Some("a[b]\"c\nd"), &[], &ts()), "a_b__c_d");
    }

    #[test]
    fn test_encode_layout() {
        let request = PresetRequest {
            title: None,
            descriptors: vec![
                EffectDescriptor::new(EffectKind::Chorus)
                    .with_param("rate_hz", 1.0)
                    .with_param("depth", 0.25)
                    .with_param("mix", 0.3),
                EffectDescriptor::new(EffectKind::Compressor)
                    .with_param("threshold_db", -20)
                    .with_param("ratio", 4)
                    .with_param("attack_ms", 5)
                    .with_param("release_ms", 100),
            ],
            enabled_names: names(&["Chorus Subtle", "Compressor"]),
            output_hint: None,
        };
        let doc = encode(&request, &ts());
        assert_eq!(
            doc.as_str(),
            "# Chorus Subtle_Compressor_20240101_120000\n\
             [Chorus(rate_hz=1.0, depth=0.25, mix=0.3), Compressor(threshold_db=-20, ratio=4, attack_ms=5, release_ms=100)],\n\
             \"Chorus Subtle_Compressor_20240101_120000.wav\"\n"
        );
        assert_eq!(encode(&request, &ts()), doc);
    }

    #[test]
    fn test_encode_uses_hint_extension() {
        let request = PresetRequest {
            title: Some("Loop".to_string()),
            output_hint: Some("take.flac".to_string()),
            ..Default::default()
        };
        assert!(encode(&request, &ts()).as_str().ends_with("\"Loop.flac\"\n"));
    }

    #[test]
    fn test_decode_unknown_effect() {
        let registry = EffectRegistry::new();
        let err = decode(&registry, "[Chorus(), Flanger(rate_hz=1)],\n\"x.wav\"").unwrap_err();
        assert!(matches!(err, FxError::UnknownEffect { .. }));
    }

    #[test]
    fn test_decode_schema_error_aborts() {
        let registry = EffectRegistry::new();
        let err = decode(&registry, "[Chorus(), Delay(mix=2)],\n\"x.wav\"").unwrap_err();
        assert!(matches!(err, FxError::ParameterOutOfRange { .. }));
    }

    #[test]
    fn test_decode_keeps_literal_forms() {
        let registry = EffectRegistry::new();
        let decoded = decode(
            &registry,
            "# t\n[LadderFilter(mode=LadderFilter.Mode.BPF24, cutoff_hz=800)],\n\"t.wav\"\n",
        )
        .unwrap();
        assert_eq!(decoded.title.as_deref(), Some("t"));
        assert_eq!(decoded.descriptors[0].get("cutoff_hz"), Some(&ParamValue::Int(800)));
        assert_eq!(
            decoded.chain.units()[0].params().get("mode"),
            Some(&ParamValue::Mode("BPF24".to_string()))
        );
    }
}
