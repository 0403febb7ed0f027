//! Effect Registry
//!
//! Maps each effect kind to its parameter schema and a factory for its DSP
//! processor. The registry is built once at startup and passed explicitly to
//! whatever needs it; there is no global effect table.

mod kind;
mod schema;
mod unit;
mod value;

pub use kind::EffectKind;
pub use schema::{ParamSpec, ParamType, ParameterSchema};
pub use unit::{EffectUnit, ProcessorFactory, ResolvedParams};
pub use value::ParamValue;
pub(crate) use value::scan_number;

use std::collections::BTreeMap;

use log::debug;

use crate::chain::EffectDescriptor;
use crate::dsp::{
    Chorus, ChorusParams, Compressor, CompressorParams, Delay, DelayParams, Distortion, Effect,
    LadderFilter, LadderMode, LadderParams, Limiter, LimiterParams, PassFilter, Phaser,
    PhaserParams, PitchShift, Reverb, ReverbParams,
};
use crate::error::{FxError, Result};

struct RegistryEntry {
    schema: ParameterSchema,
    factory: ProcessorFactory,
}

/// Read-only table of every known effect kind
pub struct EffectRegistry {
    entries: BTreeMap<EffectKind, RegistryEntry>,
}

impl EffectRegistry {
    /// Registry holding every built-in effect kind
    pub fn new() -> Self {
        let entries = EffectKind::ALL
            .iter()
            .map(|&kind| {
                let (params, factory) = builtin(kind);
                (
                    kind,
                    RegistryEntry {
                        schema: ParameterSchema::new(kind, params),
                        factory,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Kinds in stable order
    pub fn kinds(&self) -> impl Iterator<Item = EffectKind> + '_ {
        self.entries.keys().copied()
    }

    /// Schemas in stable order
    pub fn schemas(&self) -> impl Iterator<Item = &ParameterSchema> {
        self.entries.values().map(|e| &e.schema)
    }

    /// Resolve a constructor name to its schema
    pub fn lookup(&self, name: &str) -> Result<&ParameterSchema> {
        let kind: EffectKind = name.parse()?;
        self.entry(kind).map(|e| &e.schema)
    }

    /// Validate parameters and build a unit of the named kind
    pub fn construct(&self, name: &str, params: &[(String, ParamValue)]) -> Result<EffectUnit> {
        let kind: EffectKind = name.parse()?;
        self.construct_kind(kind, params)
    }

    /// Build a unit from a typed descriptor
    pub fn construct_descriptor(&self, descriptor: &EffectDescriptor) -> Result<EffectUnit> {
        self.construct_kind(descriptor.kind, &descriptor.params)
    }

    /// Validate parameters and build a unit of a known kind
    pub fn construct_kind(&self, kind: EffectKind, params: &[(String, ParamValue)]) -> Result<EffectUnit> {
        let entry = self.entry(kind)?;
        let resolved = entry.schema.resolve(params)?;
        debug!("Constructed {} with {} explicit parameters", kind, params.len());
        Ok(EffectUnit::new(kind, ResolvedParams::new(resolved), entry.factory))
    }

    fn entry(&self, kind: EffectKind) -> Result<&RegistryEntry> {
        self.entries.get(&kind).ok_or_else(|| FxError::UnknownEffect {
            name: kind.to_string(),
        })
    }
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Built-in schemas and processor factories
// ============================================================================

fn f(v: f64) -> ParamValue {
    ParamValue::Float(v)
}

fn i(v: i64) -> ParamValue {
    ParamValue::Int(v)
}

fn builtin(kind: EffectKind) -> (Vec<ParamSpec>, ProcessorFactory) {
    match kind {
        EffectKind::Chorus => (
            vec![
                ParamSpec::float("rate_hz", 0.0, 100.0, f(1.0)),
                ParamSpec::float("depth", 0.0, 1.0, f(0.25)),
                ParamSpec::float("centre_delay_ms", 0.0, 100.0, f(7.0)),
                ParamSpec::float("feedback", -1.0, 1.0, f(0.0)),
                ParamSpec::float("mix", 0.0, 1.0, f(0.5)),
            ],
            build_chorus,
        ),
        EffectKind::Compressor => (
            vec![
                ParamSpec::float("threshold_db", -60.0, 0.0, i(0)),
                ParamSpec::float("ratio", 1.0, 100.0, i(1)),
                ParamSpec::float("attack_ms", 0.0, 1000.0, f(1.0)),
                ParamSpec::float("release_ms", 0.0, 5000.0, i(100)),
            ],
            build_compressor,
        ),
        EffectKind::Delay => (
            vec![
                ParamSpec::float("delay_seconds", 0.0, 10.0, f(0.5)),
                ParamSpec::float("feedback", 0.0, 1.0, f(0.0)),
                ParamSpec::float("mix", 0.0, 1.0, f(0.5)),
            ],
            build_delay,
        ),
        EffectKind::Distortion => (
            vec![ParamSpec::float("drive_db", 0.0, 100.0, i(25))],
            build_distortion,
        ),
        EffectKind::HighpassFilter => (
            vec![ParamSpec::float("cutoff_frequency_hz", 1.0, 24000.0, i(50))],
            build_highpass,
        ),
        EffectKind::LowpassFilter => (
            vec![ParamSpec::float("cutoff_frequency_hz", 1.0, 24000.0, i(50))],
            build_lowpass,
        ),
        EffectKind::Phaser => (
            vec![
                ParamSpec::float("rate_hz", 0.0, 100.0, f(1.0)),
                ParamSpec::float("depth", 0.0, 1.0, f(0.5)),
                ParamSpec::float("centre_frequency_hz", 1.0, 20000.0, i(1300)),
                ParamSpec::float("feedback", -1.0, 1.0, f(0.0)),
                ParamSpec::float("mix", 0.0, 1.0, f(0.5)),
            ],
            build_phaser,
        ),
        EffectKind::Reverb => (
            vec![
                ParamSpec::float("room_size", 0.0, 1.0, f(0.5)),
                ParamSpec::float("damping", 0.0, 1.0, f(0.5)),
                ParamSpec::float("wet_level", 0.0, 1.0, f(0.33)),
                ParamSpec::float("dry_level", 0.0, 1.0, f(0.4)),
                ParamSpec::float("width", 0.0, 1.0, f(1.0)),
                ParamSpec::float("freeze_mode", 0.0, 1.0, f(0.0)),
            ],
            build_reverb,
        ),
        EffectKind::PitchShift => (
            vec![ParamSpec::required("semitones", -72.0, 72.0)],
            build_pitch_shift,
        ),
        EffectKind::Limiter => (
            vec![
                ParamSpec::float("threshold_db", -60.0, 0.0, f(-10.0)),
                ParamSpec::float("release_ms", 0.0, 5000.0, i(100)),
            ],
            build_limiter,
        ),
        EffectKind::LadderFilter => (
            vec![
                ParamSpec::mode(
                    "mode",
                    LadderMode::ALL.iter().map(LadderMode::as_str).collect(),
                    LadderMode::Lpf12.as_str(),
                ),
                ParamSpec::float("cutoff_hz", 1.0, 24000.0, i(200)),
                ParamSpec::float("resonance", 0.0, 1.0, i(0)),
                ParamSpec::float("drive", 1.0, 100.0, f(1.0)),
            ],
            build_ladder,
        ),
    }
}

fn build_chorus(p: &ResolvedParams) -> Box<dyn Effect> {
    Box::new(Chorus::with_params(ChorusParams {
        rate_hz: p.float("rate_hz"),
        depth: p.float("depth"),
        centre_delay_ms: p.float("centre_delay_ms"),
        feedback: p.float("feedback"),
        mix: p.float("mix"),
    }))
}

fn build_compressor(p: &ResolvedParams) -> Box<dyn Effect> {
    Box::new(Compressor::with_params(CompressorParams {
        threshold_db: p.float("threshold_db"),
        ratio: p.float("ratio"),
        attack_ms: p.float("attack_ms"),
        release_ms: p.float("release_ms"),
    }))
}

fn build_delay(p: &ResolvedParams) -> Box<dyn Effect> {
    Box::new(Delay::with_params(DelayParams {
        delay_seconds: p.float("delay_seconds"),
        feedback: p.float("feedback"),
        mix: p.float("mix"),
    }))
}

fn build_distortion(p: &ResolvedParams) -> Box<dyn Effect> {
    Box::new(Distortion::new(p.float("drive_db")))
}

fn build_highpass(p: &ResolvedParams) -> Box<dyn Effect> {
    Box::new(PassFilter::highpass(p.float("cutoff_frequency_hz")))
}

fn build_lowpass(p: &ResolvedParams) -> Box<dyn Effect> {
    Box::new(PassFilter::lowpass(p.float("cutoff_frequency_hz")))
}

fn build_phaser(p: &ResolvedParams) -> Box<dyn Effect> {
    Box::new(Phaser::with_params(PhaserParams {
        rate_hz: p.float("rate_hz"),
        depth: p.float("depth"),
        centre_frequency_hz: p.float("centre_frequency_hz"),
        feedback: p.float("feedback"),
        mix: p.float("mix"),
    }))
}

fn build_reverb(p: &ResolvedParams) -> Box<dyn Effect> {
    Box::new(Reverb::with_params(ReverbParams {
        room_size: p.float("room_size"),
        damping: p.float("damping"),
        wet_level: p.float("wet_level"),
        dry_level: p.float("dry_level"),
        width: p.float("width"),
        freeze_mode: p.float("freeze_mode"),
    }))
}

fn build_pitch_shift(p: &ResolvedParams) -> Box<dyn Effect> {
    Box::new(PitchShift::new(p.float("semitones")))
}

fn build_limiter(p: &ResolvedParams) -> Box<dyn Effect> {
    Box::new(Limiter::with_params(LimiterParams {
        threshold_db: p.float("threshold_db"),
        release_ms: p.float("release_ms"),
    }))
}

fn build_ladder(p: &ResolvedParams) -> Box<dyn Effect> {
    Box::new(LadderFilter::with_params(LadderParams {
        // The schema only admits known mode names
        mode: p.mode("mode").parse().unwrap_or(LadderMode::Lpf12),
        cutoff_hz: p.float("cutoff_hz"),
        resonance: p.float("resonance"),
        drive: p.float("drive"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioBuffer;

    fn params(list: &[(&str, ParamValue)]) -> Vec<(String, ParamValue)> {
        list.iter().map(|(n, v)| (n.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_every_kind_registered() {
        let registry = EffectRegistry::new();
        assert_eq!(registry.kinds().count(), EffectKind::ALL.len());
        for kind in EffectKind::ALL {
            assert!(registry.lookup(kind.as_str()).is_ok());
        }
    }

    #[test]
    fn test_lookup_unknown() {
        let registry = EffectRegistry::new();
        assert!(matches!(
            registry.lookup("Bitcrusher"),
            Err(FxError::UnknownEffect { .. })
        ));
    }

    #[test]
    fn test_construct_rejects_bogus_parameter() {
        let registry = EffectRegistry::new();
        let err = registry
            .construct(
                "Compressor",
                &params(&[("threshold_db", i(-20)), ("bogus", i(1))]),
            )
            .unwrap_err();
        assert!(matches!(err, FxError::UnknownParameter { .. }));
        assert_eq!(err.param(), Some("bogus"));
    }

    #[test]
    fn test_construct_fills_defaults() {
        let registry = EffectRegistry::new();
        let unit = registry
            .construct("Compressor", &params(&[("threshold_db", i(-20)), ("ratio", i(3))]))
            .unwrap();
        assert_eq!(unit.kind(), EffectKind::Compressor);
        assert_eq!(unit.params().get("ratio"), Some(&i(3)));
        assert_eq!(unit.params().get("attack_ms"), Some(&f(1.0)));
        assert_eq!(unit.params().len(), 4);
    }

    #[test]
    fn test_pitch_shift_requires_semitones() {
        let registry = EffectRegistry::new();
        let err = registry.construct("PitchShift", &[]).unwrap_err();
        assert!(matches!(err, FxError::MissingParameter { .. }));
    }

    #[test]
    fn test_ladder_mode_validated() {
        let registry = EffectRegistry::new();
        assert!(registry
            .construct("LadderFilter", &params(&[("mode", ParamValue::from("HPF12"))]))
            .is_ok());
        let err = registry
            .construct("LadderFilter", &params(&[("mode", ParamValue::from("NOTCH"))]))
            .unwrap_err();
        assert!(matches!(err, FxError::InvalidParameterValue { .. }));
    }

    #[test]
    fn test_every_default_unit_processes_audio() {
        let registry = EffectRegistry::new();
        let input = AudioBuffer::sine_wave(440.0, 0.2, 22050);
        for kind in EffectKind::ALL {
            let explicit = if kind == EffectKind::PitchShift {
                params(&[("semitones", i(5))])
            } else {
                Vec::new()
            };
            let unit = registry.construct_kind(kind, &explicit).unwrap();
            let output = unit.apply(input.clone());
            assert_eq!(output.num_frames(), input.num_frames(), "{}", kind);
            assert!(output.samples().iter().all(|s| s.is_finite()), "{}", kind);
        }
    }

    #[test]
    fn test_every_unit_handles_tiny_sample_rates() {
        let registry = EffectRegistry::new();
        for sample_rate in [2, 40] {
            let input = AudioBuffer::from_mono(vec![0.1; 64], sample_rate).unwrap();
            for kind in EffectKind::ALL {
                let explicit = if kind == EffectKind::PitchShift {
                    params(&[("semitones", i(-3))])
                } else {
                    Vec::new()
                };
                let output = registry.construct_kind(kind, &explicit).unwrap().apply(input.clone());
                assert_eq!(output.num_frames(), 64, "{} at {} Hz", kind, sample_rate);
                assert!(
                    output.samples().iter().all(|s| s.is_finite()),
                    "{} at {} Hz",
                    kind,
                    sample_rate
                );
            }
        }
    }

    #[test]
    fn test_apply_is_repeatable() {
        let registry = EffectRegistry::new();
        let unit = registry
            .construct("Delay", &params(&[("delay_seconds", f(0.01)), ("feedback", f(0.5))]))
            .unwrap();
        let input = AudioBuffer::sine_wave(440.0, 0.1, 22050);
        assert!(unit.apply(input.clone()).is_identical_to(&unit.apply(input)));
    }
}
