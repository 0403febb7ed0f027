//! Typed effect descriptors
//!
//! A descriptor is the record form of one constructor expression. Its textual
//! form comes from `Display` and nowhere else, so preview output and stored
//! documents always agree.

use std::fmt;

use serde::Serialize;

use crate::registry::{EffectKind, EffectUnit, ParamValue};

/// One effect kind with its explicitly given parameters, in order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectDescriptor {
    pub kind: EffectKind,
    pub params: Vec<(String, ParamValue)>,
}

impl EffectDescriptor {
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            params: Vec::new(),
        }
    }

    /// Builder-style parameter; replaces an existing value of the same name
    pub fn with_param(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.set(name, value.into());
        self
    }

    /// Set a parameter in place, keeping its original position if present
    pub fn set(&mut self, name: &str, value: ParamValue) {
        match self.params.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.params.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Descriptor listing every resolved parameter of a unit
    pub fn from_unit(unit: &EffectUnit) -> Self {
        Self {
            kind: unit.kind(),
            params: unit
                .params()
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        }
    }
}

impl fmt::Display for EffectDescriptor {
    /// `Kind(name=value, ...)`, with mode constants written `Kind.Mode.NAME`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind)?;
        for (i, (name, value)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                ParamValue::Mode(mode) => write!(f, "{}={}.Mode.{}", name, self.kind, mode)?,
                other => write!(f, "{}={}", name, other)?,
            }
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_keeps_literal_forms() {
        let d = EffectDescriptor::new(EffectKind::Chorus)
            .with_param("rate_hz", 1.0)
            .with_param("depth", 0.25)
            .with_param("mix", 0.3);
        assert_eq!(d.to_string(), "Chorus(rate_hz=1.0, depth=0.25, mix=0.3)");

        let c = EffectDescriptor::new(EffectKind::Compressor)
            .with_param("threshold_db", -20)
            .with_param("ratio", 4);
        assert_eq!(c.to_string(), "Compressor(threshold_db=-20, ratio=4)");
    }

    #[test]
    fn test_display_mode_constant() {
        let d = EffectDescriptor::new(EffectKind::LadderFilter)
            .with_param("mode", "HPF12")
            .with_param("cutoff_hz", 1000);
        assert_eq!(
            d.to_string(),
            "LadderFilter(mode=LadderFilter.Mode.HPF12, cutoff_hz=1000)"
        );
    }

    #[test]
    fn test_display_without_params() {
        assert_eq!(EffectDescriptor::new(EffectKind::Reverb).to_string(), "Reverb()");
    }

    #[test]
    fn test_set_overrides_in_place() {
        let d = EffectDescriptor::new(EffectKind::Delay)
            .with_param("delay_seconds", 0.3)
            .with_param("mix", 0.4)
            .with_param("delay_seconds", 0.5);
        assert_eq!(d.params.len(), 2);
        assert_eq!(d.params[0], ("delay_seconds".to_string(), ParamValue::Float(0.5)));
    }

    #[test]
    fn test_scientific_values_stay_parseable() {
        let d = EffectDescriptor::new(EffectKind::Delay).with_param("delay_seconds", 1e-7);
        assert_eq!(d.to_string(), "Delay(delay_seconds=1e-7)");
    }
}
