//! Effect chain
//!
//! Units run in chain order (index 0 first), each consuming the previous
//! unit's output. Order is preserved from build through storage and back.

use serde_json::json;

use super::descriptor::EffectDescriptor;
use crate::audio::AudioBuffer;
use crate::registry::{EffectKind, EffectUnit};

/// Ordered pipeline of effect units
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectChain {
    units: Vec<EffectUnit>,
}

impl EffectChain {
    /// Create a new empty effect chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a unit at the end of the signal path
    pub fn push(&mut self, unit: EffectUnit) {
        self.units.push(unit);
    }

    /// Run every unit left to right
    pub fn process(&self, buffer: AudioBuffer) -> AudioBuffer {
        self.units.iter().fold(buffer, |buf, unit| unit.apply(buf))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectUnit> {
        self.units.iter()
    }

    pub fn units(&self) -> &[EffectUnit] {
        &self.units
    }

    pub fn kinds(&self) -> Vec<EffectKind> {
        self.units.iter().map(EffectUnit::kind).collect()
    }

    /// Fully resolved descriptors, one per unit
    pub fn descriptors(&self) -> Vec<EffectDescriptor> {
        self.units.iter().map(EffectDescriptor::from_unit).collect()
    }

    /// Serialize chain state to JSON
    pub fn to_json(&self) -> serde_json::Value {
        let units: Vec<_> = self
            .units
            .iter()
            .map(|unit| {
                let params: serde_json::Map<_, _> = unit
                    .params()
                    .iter()
                    .map(|(name, value)| (name.to_string(), json!(value)))
                    .collect();
                json!({ "kind": unit.kind(), "params": params })
            })
            .collect();
        json!({ "units": units })
    }
}

impl From<Vec<EffectUnit>> for EffectChain {
    fn from(units: Vec<EffectUnit>) -> Self {
        Self { units }
    }
}

impl FromIterator<EffectUnit> for EffectChain {
    fn from_iter<I: IntoIterator<Item = EffectUnit>>(iter: I) -> Self {
        Self {
            units: iter.into_iter().collect(),
        }
    }
}
