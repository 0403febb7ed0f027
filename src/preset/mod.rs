//! Preset documents: text codec, closed-grammar parser and on-disk catalog

mod catalog;
mod codec;
mod parser;

pub use catalog::{PresetCatalog, PRESET_EXTENSION};
pub use codec::{
    decode, encode, encode_now, resolve_title, DecodedPreset, PresetDocument, PresetRequest,
    DEFAULT_AUDIO_EXTENSION, TIMESTAMP_FORMAT,
};
