//! fxrack - effect-chain composition and preset engine
//!
//! fxrack turns a selection of effect slots into an ordered chain of effect
//! units, stores that chain as a small human-editable preset document and
//! reads such documents back into executable chains.
//!
//! # Architecture
//!
//! - `registry`: effect kinds, parameter schemas and unit construction
//! - `chain`: slot catalog, typed descriptors and the chain builder
//! - `preset`: document codec, closed-grammar parser and on-disk catalog
//! - `engine`: applies chains to audio and names the output
//! - `dsp` and `audio`: processors and WAV buffers used by the units
//!
//! Preset documents are parsed with a closed grammar. A document can only
//! name registered effects with literal numeric or mode values.

pub mod audio;
pub mod chain;
pub mod cli;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod preset;
pub mod registry;

pub use chain::{BuiltChain, ChainBuilder, EffectChain, EffectDescriptor, SlotActivation, SlotCatalog};
pub use error::{ErrorKind, FxError, Result};
pub use preset::{decode, encode, PresetCatalog, PresetDocument, PresetRequest};
pub use registry::{EffectKind, EffectRegistry, EffectUnit, ParamValue};
