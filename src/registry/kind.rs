//! Effect kind identities

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::FxError;

/// A named category of audio transformation
///
/// The textual name is the variant name and is what preset documents use
/// as the constructor identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EffectKind {
    Chorus,
    Compressor,
    Delay,
    Distortion,
    HighpassFilter,
    LowpassFilter,
    Phaser,
    Reverb,
    PitchShift,
    Limiter,
    LadderFilter,
}

impl EffectKind {
    pub const ALL: [EffectKind; 11] = [
        EffectKind::Chorus,
        EffectKind::Compressor,
        EffectKind::Delay,
        EffectKind::Distortion,
        EffectKind::HighpassFilter,
        EffectKind::LowpassFilter,
        EffectKind::Phaser,
        EffectKind::Reverb,
        EffectKind::PitchShift,
        EffectKind::Limiter,
        EffectKind::LadderFilter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::Chorus => "Chorus",
            EffectKind::Compressor => "Compressor",
            EffectKind::Delay => "Delay",
            EffectKind::Distortion => "Distortion",
            EffectKind::HighpassFilter => "HighpassFilter",
            EffectKind::LowpassFilter => "LowpassFilter",
            EffectKind::Phaser => "Phaser",
            EffectKind::Reverb => "Reverb",
            EffectKind::PitchShift => "PitchShift",
            EffectKind::Limiter => "Limiter",
            EffectKind::LadderFilter => "LadderFilter",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectKind {
    type Err = FxError;

    /// Exact, case-sensitive match on the constructor name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EffectKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| FxError::UnknownEffect {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in EffectKind::ALL {
            assert_eq!(kind.as_str().parse::<EffectKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(matches!(
            "chorus".parse::<EffectKind>(),
            Err(FxError::UnknownEffect { .. })
        ));
        assert!("Gain".parse::<EffectKind>().is_err());
    }
}
