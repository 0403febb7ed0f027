//! Error handling for fxrack
//!
//! Every failure surfaces as a typed `FxError`. Nothing is downgraded to a
//! default chain and nothing is retried.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for fxrack operations
pub type Result<T> = std::result::Result<T, FxError>;

/// Coarse error families exposed to front ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown effect kind, unknown slot or missing preset file
    NotFound,
    /// Missing, unknown, duplicated or out-of-range parameter
    Schema,
    /// Preset document lacks the required structural shape
    Format,
    /// Token outside the closed preset grammar
    Parse,
    /// File or audio read/write failure
    Io,
    /// Invalid runtime settings
    Config,
}

/// Main error type for fxrack operations
#[derive(Error, Debug)]
pub enum FxError {
    // Lookup errors
    #[error("Unknown effect: {name}")]
    UnknownEffect { name: String },

    #[error("Unknown effect slot: {slot}")]
    UnknownSlot { slot: String },

    #[error("Preset not found: {path}")]
    PresetNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    // Schema errors
    #[error("Unknown parameter '{param}' for {effect}")]
    UnknownParameter { effect: String, param: String },

    #[error("Missing required parameter '{param}' for {effect}")]
    MissingParameter { effect: String, param: String },

    #[error("Parameter '{param}' given more than once for {effect}")]
    DuplicateParameter { effect: String, param: String },

    #[error("Invalid effect parameter: {effect}.{param} = {value} (valid range: {min}..{max})")]
    ParameterOutOfRange {
        effect: String,
        param: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid value for {effect}.{param}: expected {expected}, got {value}")]
    InvalidParameterValue {
        effect: String,
        param: String,
        expected: String,
        value: String,
    },

    // Preset document errors
    #[error("Malformed preset document: {details}")]
    Format { details: String },

    #[error("Preset parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    // Audio errors
    #[error("Failed to read audio file: {path}")]
    AudioReadError {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("Failed to write audio file: {path}")]
    AudioWriteError {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("Unsupported audio format: {details}")]
    UnsupportedFormat { details: String },

    #[error("Audio buffer is empty")]
    EmptyBuffer,

    // Settings
    #[error("Configuration error: {details}")]
    Config { details: String },

    // Generic I/O
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FxError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            FxError::UnknownEffect { .. } => "UNKNOWN_EFFECT",
            FxError::UnknownSlot { .. } => "UNKNOWN_SLOT",
            FxError::PresetNotFound { .. } => "PRESET_NOT_FOUND",
            FxError::UnknownParameter { .. } => "UNKNOWN_PARAMETER",
            FxError::MissingParameter { .. } => "MISSING_PARAMETER",
            FxError::DuplicateParameter { .. } => "DUPLICATE_PARAMETER",
            FxError::ParameterOutOfRange { .. } => "PARAMETER_OUT_OF_RANGE",
            FxError::InvalidParameterValue { .. } => "INVALID_PARAMETER_VALUE",
            FxError::Format { .. } => "FORMAT_ERROR",
            FxError::Parse { .. } => "PARSE_ERROR",
            FxError::AudioReadError { .. } => "AUDIO_READ_ERROR",
            FxError::AudioWriteError { .. } => "AUDIO_WRITE_ERROR",
            FxError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            FxError::EmptyBuffer => "EMPTY_BUFFER",
            FxError::Config { .. } => "CONFIG_ERROR",
            FxError::Io(_) => "IO_ERROR",
            FxError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Map this error onto its coarse family
    pub fn kind(&self) -> ErrorKind {
        match self {
            FxError::UnknownEffect { .. }
            | FxError::UnknownSlot { .. }
            | FxError::PresetNotFound { .. } => ErrorKind::NotFound,
            FxError::UnknownParameter { .. }
            | FxError::MissingParameter { .. }
            | FxError::DuplicateParameter { .. }
            | FxError::ParameterOutOfRange { .. }
            | FxError::InvalidParameterValue { .. } => ErrorKind::Schema,
            FxError::Format { .. } => ErrorKind::Format,
            FxError::Parse { .. } => ErrorKind::Parse,
            FxError::Config { .. } => ErrorKind::Config,
            FxError::AudioReadError { .. }
            | FxError::AudioWriteError { .. }
            | FxError::UnsupportedFormat { .. }
            | FxError::EmptyBuffer
            | FxError::Io(_)
            | FxError::Serialization(_) => ErrorKind::Io,
        }
    }

    /// Name of the offending parameter, for schema errors
    pub fn param(&self) -> Option<&str> {
        match self {
            FxError::UnknownParameter { param, .. }
            | FxError::MissingParameter { param, .. }
            | FxError::DuplicateParameter { param, .. }
            | FxError::ParameterOutOfRange { param, .. }
            | FxError::InvalidParameterValue { param, .. } => Some(param),
            _ => None,
        }
    }

    /// Returns a suggested recovery action for this error
    pub fn recovery_hint(&self) -> &'static str {
        match self.kind() {
            ErrorKind::NotFound => "Run 'fxrack-cli slots' or 'fxrack-cli presets' to see what is available",
            ErrorKind::Schema => "Adjust the parameter to be within its valid range",
            ErrorKind::Format => "A preset needs a '[...]' effect list followed by a quoted file name",
            ErrorKind::Parse => "Only Effect(name=number, ...) calls are allowed in a preset",
            ErrorKind::Io => "Check that the file exists and is a readable WAV file",
            ErrorKind::Config => "Check fxrack.json and the FXRACK_* environment variables",
        }
    }
}
