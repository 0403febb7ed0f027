//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::{Path, PathBuf};

use log::{info, warn};

use super::ChainArgs;
use crate::chain::{ChainBuilder, SlotActivation, SlotCatalog};
use crate::config::Settings;
use crate::engine::Orchestrator;
use crate::error::Result;
use crate::preset::{decode, encode_now, PresetCatalog, PresetDocument, PresetRequest};
use crate::registry::{EffectRegistry, ParamType};

/// Shared state for one CLI invocation
pub struct Context {
    pub settings: Settings,
    pub registry: EffectRegistry,
    pub catalog: SlotCatalog,
}

impl Context {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            registry: EffectRegistry::new(),
            catalog: SlotCatalog::standard(),
        }
    }

    fn builder(&self) -> ChainBuilder<'_> {
        ChainBuilder::new(&self.registry, &self.catalog)
    }

    fn orchestrator(&self) -> Orchestrator<'_> {
        Orchestrator::new(&self.registry, &self.catalog, &self.settings)
    }

    fn presets(&self) -> PresetCatalog {
        PresetCatalog::new(&self.settings.preset_dir)
    }
}

/// Turn `--enable` and `--set` flags into activation records
pub fn activations(catalog: &SlotCatalog, args: &ChainArgs) -> Vec<SlotActivation> {
    let mut activations: Vec<SlotActivation> = args
        .enable
        .iter()
        .map(|slot| SlotActivation::enabled(slot.as_str()))
        .collect();

    for o in &args.set {
        let target = catalog.position(&o.slot);
        let existing = activations
            .iter_mut()
            .rev()
            .find(|a| target.is_some() && catalog.position(&a.slot_id) == target);
        match existing {
            Some(activation) => {
                activation.parameters.insert(o.key.clone(), o.value.clone());
            }
            None => {
                warn!("Slot '{}' is not enabled; ignoring {}={}", o.slot, o.key, o.value);
                activations.push(SlotActivation {
                    slot_id: o.slot.clone(),
                    enabled: false,
                    ..Default::default()
                });
            }
        }
    }

    activations
}

/// Build and encode the preset for a slot selection
pub fn build_document(ctx: &Context, args: &ChainArgs) -> Result<PresetDocument> {
    let built = ctx.builder().build(&activations(&ctx.catalog, args))?;
    if built.is_empty() {
        warn!("No slots enabled, encoding an empty chain");
    }
    let request = PresetRequest::from_built(&built, args.title.clone());
    Ok(encode_now(&request))
}

/// List catalog slots.
pub fn list_slots(ctx: &Context, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&ctx.catalog)?);
        return Ok(());
    }

    println!("Effect Slots:");
    println!("{:-<60}", "");
    for slot in ctx.catalog.iter() {
        println!("{:<18} {:<18} -> {}", slot.id, slot.name, slot.output_hint);
        for unit in &slot.units {
            if slot.is_multi() {
                println!("    {}: {}", unit.label, unit.descriptor);
            } else {
                println!("    {}", unit.descriptor);
            }
        }
    }
    Ok(())
}

/// List effect kinds with their parameter schemas.
pub fn list_effects(ctx: &Context, json: bool) -> Result<()> {
    if json {
        let schemas: Vec<_> = ctx.registry.schemas().collect();
        println!("{}", serde_json::to_string_pretty(&schemas)?);
        return Ok(());
    }

    for schema in ctx.registry.schemas() {
        println!("{}", schema.kind);
        for spec in &schema.params {
            let range = match &spec.ty {
                ParamType::Float { min, max } => format!("{}..{}", min, max),
                ParamType::Mode { variants } => variants.join("|"),
            };
            let default = spec
                .default
                .as_ref()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "required".to_string());
            println!("    {:<22} {:<28} {}", spec.name, range, default);
        }
    }
    Ok(())
}

/// List stored presets.
pub fn list_presets(ctx: &Context, dir: Option<&Path>) -> Result<()> {
    let catalog = match dir {
        Some(dir) => PresetCatalog::new(dir),
        None => ctx.presets(),
    };
    info!("Listing presets in: {}", catalog.dir().display());

    let names = catalog.list_presets()?;
    if names.is_empty() {
        println!("No presets in {}", catalog.dir().display());
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

/// Print the preset document for a selection.
pub fn preview(ctx: &Context, args: &ChainArgs) -> Result<()> {
    let document = build_document(ctx, args)?;
    print!("{}", document);
    Ok(())
}

/// Store the preset document for a selection.
pub fn save(ctx: &Context, args: &ChainArgs) -> Result<PathBuf> {
    let document = build_document(ctx, args)?;
    let path = ctx.presets().save(&document)?;
    println!("Preset saved: {}", path.display());
    Ok(path)
}

/// Decode a stored preset and apply it to a file.
pub fn apply(ctx: &Context, preset: &str, input: &Path) -> Result<PathBuf> {
    info!("Applying preset '{}' to {}", preset, input.display());

    let text = ctx.presets().load(preset)?;
    let decoded = decode(&ctx.registry, &text)?;
    let path = ctx
        .orchestrator()
        .apply_to_file(&decoded.chain, input, &decoded.output_name)?;

    println!("Processed audio: {}", path.display());
    Ok(path)
}

/// Apply one slot with its defaults.
pub fn process(ctx: &Context, effect: &str, input: &Path) -> Result<PathBuf> {
    let path = ctx.orchestrator().apply_slot(effect, input)?;
    println!("Processed audio: {}", path.display());
    Ok(path)
}

/// Render every slot.
pub fn demo(ctx: &Context, input: &Path) -> Result<Vec<PathBuf>> {
    info!("Rendering all slots from {}", input.display());

    let paths = ctx.orchestrator().render_all_slots(input)?;
    for path in &paths {
        println!("{}", path.display());
    }
    println!("Rendered {} files", paths.len());
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parse_override;
    use crate::registry::ParamValue;
    use tempfile::TempDir;

    fn args(enable: &[&str], set: &[&str], title: Option<&str>) -> ChainArgs {
        ChainArgs {
            enable: enable.iter().map(|s| s.to_string()).collect(),
            set: set.iter().map(|s| parse_override(s).unwrap()).collect(),
            title: title.map(str::to_string),
        }
    }

    #[test]
    fn test_overrides_follow_slot_aliases() {
        let catalog = SlotCatalog::standard();
        let acts = activations(&catalog, &args(&["Delay Multi"], &["delay_multi:first.mix=0.1"], None));
        assert_eq!(acts.len(), 1);
        assert_eq!(acts[0].parameters.get("first.mix"), Some(&ParamValue::Float(0.1)));
    }

    #[test]
    fn test_override_for_disabled_slot_is_inert() {
        let ctx = Context::new(Settings::default());
        let doc = build_document(&ctx, &args(&["phaser"], &["compressor:ratio=8"], Some("P"))).unwrap();
        assert_eq!(
            doc.as_str(),
            "# P\n[Phaser(rate_hz=1.0, depth=0.5, feedback=0.5, mix=0.5)],\n\"P.wav\"\n"
        );
    }

    #[test]
    fn test_save_writes_into_preset_dir() {
        let dir = TempDir::new().unwrap();
        let ctx = Context::new(Settings {
            preset_dir: dir.path().to_path_buf(),
            ..Default::default()
        });
        let path = save(&ctx, &args(&["Reverb Large"], &[], Some("Hall"))).unwrap();
        assert_eq!(path, dir.path().join("Hall.pdl"));
        assert!(ctx.presets().list_presets().unwrap().contains("Hall"));
    }
}
