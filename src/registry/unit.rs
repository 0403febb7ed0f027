//! Instantiated effect units

use std::fmt;

use super::kind::EffectKind;
use super::value::ParamValue;
use crate::audio::AudioBuffer;
use crate::dsp::Effect;

/// Builds a fresh DSP processor from resolved parameters
pub type ProcessorFactory = fn(&ResolvedParams) -> Box<dyn Effect>;

/// Full parameter set of a unit, in schema order, defaults filled in
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParams {
    values: Vec<(&'static str, ParamValue)>,
}

impl ResolvedParams {
    pub(crate) fn new(values: Vec<(&'static str, ParamValue)>) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Numeric parameter as `f32`
    ///
    /// Resolution guarantees every schema parameter is present, so a miss
    /// only happens for a name outside the schema and reads as 0.
    pub fn float(&self, name: &str) -> f32 {
        self.get(name).and_then(ParamValue::as_f64).unwrap_or(0.0) as f32
    }

    /// Mode parameter name, empty if absent
    pub fn mode(&self, name: &str) -> &str {
        self.get(name).and_then(ParamValue::as_mode).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> {
        self.values.iter().map(|(n, v)| (*n, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One instantiated, parameterized effect ready to process a buffer
///
/// A unit is immutable. Every `apply` builds a new processor, so the same
/// unit can be shared across threads and applied any number of times with
/// identical results.
#[derive(Clone)]
pub struct EffectUnit {
    kind: EffectKind,
    params: ResolvedParams,
    factory: ProcessorFactory,
}

impl EffectUnit {
    pub(crate) fn new(kind: EffectKind, params: ResolvedParams, factory: ProcessorFactory) -> Self {
        Self {
            kind,
            params,
            factory,
        }
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    pub fn params(&self) -> &ResolvedParams {
        &self.params
    }

    /// Build a fresh processor for this unit
    pub fn processor(&self) -> Box<dyn Effect> {
        (self.factory)(&self.params)
    }

    /// Run this unit over a whole buffer
    pub fn apply(&self, mut buffer: AudioBuffer) -> AudioBuffer {
        let mut processor = self.processor();
        processor.prepare(buffer.sample_rate(), buffer.channels() as usize);
        processor.process(&mut buffer);
        buffer
    }
}

impl PartialEq for EffectUnit {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.params == other.params
    }
}

impl fmt::Debug for EffectUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectUnit")
            .field("kind", &self.kind)
            .field("params", &self.params)
            .finish()
    }
}
