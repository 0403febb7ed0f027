//! Chain composition
//!
//! - Typed effect descriptors and their canonical text form
//! - The slot catalog
//! - The builder mapping activations to an ordered chain

mod builder;
mod descriptor;
mod pipeline;
mod slots;

pub use builder::{BuiltChain, ChainBuilder, SlotActivation};
pub use descriptor::EffectDescriptor;
pub use pipeline::EffectChain;
pub use slots::{EffectSlot, SlotCatalog, UnitBlueprint};
