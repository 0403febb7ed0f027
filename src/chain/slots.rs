//! Effect slot catalog
//!
//! Slots are the user-facing templates. Each one expands to a fixed, ordered
//! list of unit blueprints, and the catalog order is the signal-flow order
//! of any chain built from it.

use serde::Serialize;

use super::descriptor::EffectDescriptor;
use crate::registry::EffectKind;

/// One labelled unit inside a slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitBlueprint {
    /// Prefix for activation keys in multi-unit slots (`label.param`)
    pub label: &'static str,
    pub descriptor: EffectDescriptor,
}

/// A named, pre-configured effect template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectSlot {
    pub id: &'static str,
    pub name: &'static str,
    pub units: Vec<UnitBlueprint>,
    pub output_hint: &'static str,
}

impl EffectSlot {
    fn new(id: &'static str, name: &'static str, output_hint: &'static str) -> Self {
        Self {
            id,
            name,
            units: Vec::new(),
            output_hint,
        }
    }

    fn unit(mut self, label: &'static str, descriptor: EffectDescriptor) -> Self {
        self.units.push(UnitBlueprint { label, descriptor });
        self
    }

    pub fn is_multi(&self) -> bool {
        self.units.len() > 1
    }

    /// Default descriptors in internal order
    pub fn descriptors(&self) -> impl Iterator<Item = &EffectDescriptor> {
        self.units.iter().map(|u| &u.descriptor)
    }

    /// Case-insensitive, whitespace-trimmed match on id or display name
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        self.id.eq_ignore_ascii_case(query) || self.name.eq_ignore_ascii_case(query)
    }
}

/// Ordered set of effect slots
#[derive(Debug, Clone, Serialize)]
pub struct SlotCatalog {
    slots: Vec<EffectSlot>,
}

impl SlotCatalog {
    pub fn new(slots: Vec<EffectSlot>) -> Self {
        Self { slots }
    }

    /// The built-in fifteen slots
    pub fn standard() -> Self {
        use EffectKind::*;
        let d = EffectDescriptor::new;

        Self::new(vec![
            EffectSlot::new("chorus_subtle", "Chorus Subtle", "chorus_subtle.wav").unit(
                "chorus",
                d(Chorus)
                    .with_param("rate_hz", 1.0)
                    .with_param("depth", 0.25)
                    .with_param("mix", 0.3),
            ),
            EffectSlot::new("chorus_intense", "Chorus Intense", "chorus_intense.wav").unit(
                "chorus",
                d(Chorus)
                    .with_param("rate_hz", 3.0)
                    .with_param("depth", 0.8)
                    .with_param("mix", 0.7),
            ),
            EffectSlot::new("compressor", "Compressor", "compressed.wav").unit(
                "compressor",
                d(Compressor)
                    .with_param("threshold_db", -20)
                    .with_param("ratio", 4)
                    .with_param("attack_ms", 5)
                    .with_param("release_ms", 100),
            ),
            EffectSlot::new("delay_single", "Delay Single", "delay_single.wav").unit(
                "delay",
                d(Delay)
                    .with_param("delay_seconds", 0.3)
                    .with_param("feedback", 0.4)
                    .with_param("mix", 0.4),
            ),
            EffectSlot::new("delay_multi", "Delay Multi", "delay_multi.wav")
                .unit(
                    "first",
                    d(Delay)
                        .with_param("delay_seconds", 0.2)
                        .with_param("feedback", 0.3)
                        .with_param("mix", 0.3),
                )
                .unit(
                    "second",
                    d(Delay)
                        .with_param("delay_seconds", 0.4)
                        .with_param("feedback", 0.2)
                        .with_param("mix", 0.2),
                ),
            EffectSlot::new("distortion_mild", "Distortion Mild", "distortion_mild.wav")
                .unit("distortion", d(Distortion).with_param("drive_db", 10)),
            EffectSlot::new("distortion_heavy", "Distortion Heavy", "distortion_heavy.wav")
                .unit("distortion", d(Distortion).with_param("drive_db", 25)),
            EffectSlot::new("filters", "Filters", "filtered.wav")
                .unit("highpass", d(HighpassFilter).with_param("cutoff_frequency_hz", 500))
                .unit("lowpass", d(LowpassFilter).with_param("cutoff_frequency_hz", 5000)),
            EffectSlot::new("ladder_filter", "Ladder Filter", "ladder_filter.wav").unit(
                "ladder",
                d(LadderFilter)
                    .with_param("mode", "HPF12")
                    .with_param("cutoff_hz", 1000)
                    .with_param("resonance", 0.7)
                    .with_param("drive", 1.5),
            ),
            EffectSlot::new("phaser", "Phaser", "phaser.wav").unit(
                "phaser",
                d(Phaser)
                    .with_param("rate_hz", 1.0)
                    .with_param("depth", 0.5)
                    .with_param("feedback", 0.5)
                    .with_param("mix", 0.5),
            ),
            EffectSlot::new("reverb_small", "Reverb Small", "reverb_small.wav").unit(
                "reverb",
                d(Reverb)
                    .with_param("room_size", 0.3)
                    .with_param("damping", 0.5)
                    .with_param("width", 0.7)
                    .with_param("wet_level", 0.4),
            ),
            EffectSlot::new("reverb_large", "Reverb Large", "reverb_large.wav").unit(
                "reverb",
                d(Reverb)
                    .with_param("room_size", 0.9)
                    .with_param("damping", 0.2)
                    .with_param("width", 1.0)
                    .with_param("wet_level", 0.5),
            ),
            EffectSlot::new("pitch_shift_up", "Pitch Shift Up", "pitch_up.wav")
                .unit("pitch", d(PitchShift).with_param("semitones", 12)),
            EffectSlot::new("pitch_shift_down", "Pitch Shift Down", "pitch_down.wav")
                .unit("pitch", d(PitchShift).with_param("semitones", -12)),
            EffectSlot::new("combined_effects", "Combined Effects", "combined_effects.wav")
                .unit(
                    "compressor",
                    d(Compressor)
                        .with_param("threshold_db", -20)
                        .with_param("ratio", 3),
                )
                .unit(
                    "chorus",
                    d(Chorus)
                        .with_param("rate_hz", 1.0)
                        .with_param("depth", 0.25)
                        .with_param("mix", 0.3),
                )
                .unit(
                    "delay",
                    d(Delay)
                        .with_param("delay_seconds", 0.25)
                        .with_param("feedback", 0.3),
                )
                .unit(
                    "reverb",
                    d(Reverb)
                        .with_param("room_size", 0.6)
                        .with_param("damping", 0.4),
                )
                .unit("limiter", d(Limiter).with_param("threshold_db", -2.0)),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectSlot> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Find a slot by id or display name
    pub fn find(&self, query: &str) -> Option<&EffectSlot> {
        self.slots.iter().find(|s| s.matches(query))
    }

    /// Catalog position of a slot, used to order activations
    pub fn position(&self, query: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.matches(query))
    }
}

impl Default for SlotCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_order() {
        let catalog = SlotCatalog::standard();
        let names: Vec<_> = catalog.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "Chorus Subtle",
                "Chorus Intense",
                "Compressor",
                "Delay Single",
                "Delay Multi",
                "Distortion Mild",
                "Distortion Heavy",
                "Filters",
                "Ladder Filter",
                "Phaser",
                "Reverb Small",
                "Reverb Large",
                "Pitch Shift Up",
                "Pitch Shift Down",
                "Combined Effects",
            ]
        );
    }

    #[test]
    fn test_find_is_case_insensitive_and_trimmed() {
        let catalog = SlotCatalog::standard();
        assert_eq!(catalog.find("  delay multi ").unwrap().id, "delay_multi");
        assert_eq!(catalog.find("LADDER_FILTER").unwrap().name, "Ladder Filter");
        assert!(catalog.find("Flanger").is_none());
    }

    #[test]
    fn test_multi_unit_labels_are_unique() {
        for slot in SlotCatalog::standard().iter().filter(|s| s.is_multi()) {
            let mut labels: Vec<_> = slot.units.iter().map(|u| u.label).collect();
            labels.sort_unstable();
            labels.dedup();
            assert_eq!(labels.len(), slot.units.len(), "{}", slot.name);
        }
    }

    #[test]
    fn test_combined_effects_signal_flow() {
        let catalog = SlotCatalog::standard();
        let kinds: Vec<_> = catalog
            .find("Combined Effects")
            .unwrap()
            .descriptors()
            .map(|d| d.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EffectKind::Compressor,
                EffectKind::Chorus,
                EffectKind::Delay,
                EffectKind::Reverb,
                EffectKind::Limiter,
            ]
        );
    }
}
