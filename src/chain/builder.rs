//! Chain Builder
//!
//! Turns slot activation records into an ordered chain. Output order is the
//! catalog order, never the order activations arrive in.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::descriptor::EffectDescriptor;
use super::pipeline::EffectChain;
use super::slots::{EffectSlot, SlotCatalog};
use crate::error::{FxError, Result};
use crate::registry::{EffectRegistry, EffectUnit, ParamValue};

/// Enable flag and parameter overrides for one slot
///
/// Parameter keys are bare parameter names for single-unit slots and
/// `label.param` for multi-unit slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotActivation {
    pub slot_id: String,
    pub enabled: bool,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParamValue>,
}

impl SlotActivation {
    /// Enabled activation with the slot's default parameters
    pub fn enabled(slot_id: impl Into<String>) -> Self {
        Self {
            slot_id: slot_id.into(),
            enabled: true,
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

/// Result of building: three lists aligned in slot order
#[derive(Debug, Clone, Default)]
pub struct BuiltChain {
    /// One per unit
    pub descriptors: Vec<EffectDescriptor>,
    /// One per unit
    pub units: Vec<EffectUnit>,
    /// One per enabled slot
    pub enabled_names: Vec<String>,
}

impl BuiltChain {
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn chain(&self) -> EffectChain {
        self.units.iter().cloned().collect()
    }

    pub fn into_chain(self) -> EffectChain {
        self.units.into()
    }
}

/// Builds chains from activations against a slot catalog
pub struct ChainBuilder<'a> {
    registry: &'a EffectRegistry,
    catalog: &'a SlotCatalog,
}

impl<'a> ChainBuilder<'a> {
    pub fn new(registry: &'a EffectRegistry, catalog: &'a SlotCatalog) -> Self {
        Self { registry, catalog }
    }

    pub fn catalog(&self) -> &'a SlotCatalog {
        self.catalog
    }

    /// Every slot of the catalog, disabled
    pub fn default_activations(&self) -> Vec<SlotActivation> {
        self.catalog
            .iter()
            .map(|slot| SlotActivation {
                slot_id: slot.id.to_string(),
                enabled: false,
                parameters: BTreeMap::new(),
            })
            .collect()
    }

    /// Build the chain for a set of activations
    ///
    /// A slot activated more than once takes its last activation.
    pub fn build(&self, activations: &[SlotActivation]) -> Result<BuiltChain> {
        let mut by_position: BTreeMap<usize, &SlotActivation> = BTreeMap::new();
        for activation in activations {
            let position = self
                .catalog
                .position(&activation.slot_id)
                .ok_or_else(|| FxError::UnknownSlot {
                    slot: activation.slot_id.clone(),
                })?;
            by_position.insert(position, activation);
        }

        let mut built = BuiltChain::default();
        for (&position, activation) in &by_position {
            if !activation.enabled {
                continue;
            }
            let Some(slot) = self.catalog.iter().nth(position) else {
                continue;
            };
            for descriptor in self.slot_descriptors(slot, &activation.parameters)? {
                let unit = self.registry.construct_descriptor(&descriptor)?;
                built.descriptors.push(descriptor);
                built.units.push(unit);
            }
            built.enabled_names.push(slot.name.to_string());
        }

        debug!(
            "Built chain of {} units from {} enabled slots",
            built.units.len(),
            built.enabled_names.len()
        );
        Ok(built)
    }

    /// The chain a slot produces with its default parameters
    pub fn default_chain(&self, slot: &EffectSlot) -> Result<EffectChain> {
        slot.descriptors()
            .map(|d| self.registry.construct_descriptor(d))
            .collect()
    }

    /// Apply activation overrides to a slot's blueprints
    fn slot_descriptors(
        &self,
        slot: &EffectSlot,
        overrides: &BTreeMap<String, ParamValue>,
    ) -> Result<Vec<EffectDescriptor>> {
        let mut descriptors: Vec<EffectDescriptor> = slot.descriptors().cloned().collect();

        for (key, value) in overrides {
            let (index, param) = if slot.is_multi() {
                key.split_once('.')
                    .and_then(|(label, param)| {
                        slot.units
                            .iter()
                            .position(|u| u.label == label)
                            .map(|i| (i, param))
                    })
                    .ok_or_else(|| FxError::UnknownParameter {
                        effect: slot.name.to_string(),
                        param: key.clone(),
                    })?
            } else {
                (0, key.as_str())
            };
            if let Some(descriptor) = descriptors.get_mut(index) {
                descriptor.set(param, value.clone());
            }
        }

        Ok(descriptors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::EffectKind;

    fn fixtures() -> (EffectRegistry, SlotCatalog) {
        (EffectRegistry::new(), SlotCatalog::standard())
    }

    #[test]
    fn test_nothing_enabled() {
        let (registry, catalog) = fixtures();
        let builder = ChainBuilder::new(&registry, &catalog);
        let built = builder.build(&builder.default_activations()).unwrap();
        assert!(built.is_empty());
        assert!(built.descriptors.is_empty());
        assert!(built.enabled_names.is_empty());
    }

    #[test]
    fn test_overrides_single_unit_slot() {
        let (registry, catalog) = fixtures();
        let builder = ChainBuilder::new(&registry, &catalog);
        let built = builder
            .build(&[SlotActivation::enabled("compressor").with_param("ratio", 8)])
            .unwrap();
        assert_eq!(
            built.descriptors[0].to_string(),
            "Compressor(threshold_db=-20, ratio=8, attack_ms=5, release_ms=100)"
        );
    }

    #[test]
    fn test_overrides_multi_unit_slot() {
        let (registry, catalog) = fixtures();
        let builder = ChainBuilder::new(&registry, &catalog);
        let built = builder
            .build(&[SlotActivation::enabled("delay_multi").with_param("second.mix", 0.6)])
            .unwrap();
        assert_eq!(built.units.len(), 2);
        assert_eq!(built.descriptors[1].get("mix"), Some(&ParamValue::Float(0.6)));
        assert_eq!(built.descriptors[0].get("mix"), Some(&ParamValue::Float(0.3)));
    }

    #[test]
    fn test_multi_unit_key_needs_label() {
        let (registry, catalog) = fixtures();
        let builder = ChainBuilder::new(&registry, &catalog);
        let err = builder
            .build(&[SlotActivation::enabled("filters").with_param("cutoff_frequency_hz", 300)])
            .unwrap_err();
        assert!(matches!(err, FxError::UnknownParameter { .. }));
    }

    #[test]
    fn test_override_revalidated() {
        let (registry, catalog) = fixtures();
        let builder = ChainBuilder::new(&registry, &catalog);
        let err = builder
            .build(&[SlotActivation::enabled("phaser").with_param("mix", 1.5)])
            .unwrap_err();
        assert!(matches!(err, FxError::ParameterOutOfRange { .. }));
        assert_eq!(err.param(), Some("mix"));
    }

    #[test]
    fn test_unknown_slot() {
        let (registry, catalog) = fixtures();
        let builder = ChainBuilder::new(&registry, &catalog);
        let err = builder.build(&[SlotActivation::enabled("flanger")]).unwrap_err();
        assert!(matches!(err, FxError::UnknownSlot { .. }));
    }

    #[test]
    fn test_last_activation_wins() {
        let (registry, catalog) = fixtures();
        let builder = ChainBuilder::new(&registry, &catalog);
        let built = builder
            .build(&[
                SlotActivation::enabled("reverb_small"),
                SlotActivation {
                    slot_id: "Reverb Small".to_string(),
                    enabled: false,
                    parameters: BTreeMap::new(),
                },
            ])
            .unwrap();
        assert!(built.is_empty());
    }

    #[test]
    fn test_default_chain() {
        let (registry, catalog) = fixtures();
        let builder = ChainBuilder::new(&registry, &catalog);
        let slot = catalog.find("Filters").unwrap();
        let chain = builder.default_chain(slot).unwrap();
        assert_eq!(
            chain.kinds(),
            vec![EffectKind::HighpassFilter, EffectKind::LowpassFilter]
        );
    }
}
