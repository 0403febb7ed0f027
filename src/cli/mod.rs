//! CLI Module
//!
//! Command-line interface for the fxrack effect rack.

pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::registry::ParamValue;

/// fxrack - compose effect chains and store them as presets
#[derive(Parser, Debug)]
#[command(name = "fxrack-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (defaults to ./fxrack.json if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// One `--set slot:key=value` override
#[derive(Debug, Clone, PartialEq)]
pub struct ParamOverride {
    pub slot: String,
    pub key: String,
    pub value: ParamValue,
}

/// Parse `slot:key=value`; the slot may contain spaces, the key may be
/// `label.param` for multi-unit slots
pub fn parse_override(s: &str) -> Result<ParamOverride, String> {
    let (slot, assignment) = s
        .split_once(':')
        .ok_or_else(|| format!("expected slot:key=value, got '{}'", s))?;
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| format!("expected key=value after '{}:'", slot))?;
    let key = key.trim();
    if slot.trim().is_empty() || key.is_empty() {
        return Err(format!("expected slot:key=value, got '{}'", s));
    }
    Ok(ParamOverride {
        slot: slot.trim().to_string(),
        key: key.to_string(),
        value: value.parse()?,
    })
}

/// Slot selection shared by `preview` and `save`
#[derive(Args, Debug, Clone, Default)]
pub struct ChainArgs {
    /// Slot to enable, by id or display name (repeatable)
    #[arg(short, long = "enable", value_name = "SLOT")]
    pub enable: Vec<String>,

    /// Parameter override as slot:key=value (repeatable)
    #[arg(short, long = "set", value_name = "SLOT:KEY=VALUE", value_parser = parse_override)]
    pub set: Vec<ParamOverride>,

    /// Preset title; synthesized from the enabled slots when omitted
    #[arg(short, long)]
    pub title: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the effect slots and their units
    #[command(name = "slots")]
    Slots {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the parameter schema of every effect kind
    #[command(name = "effects")]
    Effects {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored presets
    #[command(name = "presets")]
    Presets {
        /// Preset directory (overrides settings)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Print the preset document for a slot selection
    #[command(name = "preview")]
    Preview {
        #[command(flatten)]
        chain: ChainArgs,
    },

    /// Store the preset document for a slot selection
    #[command(name = "save")]
    Save {
        #[command(flatten)]
        chain: ChainArgs,
    },

    /// Apply a stored preset to an audio file
    #[command(name = "apply")]
    Apply {
        /// Preset name
        #[arg(short, long)]
        preset: String,

        /// Input WAV file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Apply a single slot with its default parameters
    #[command(name = "process")]
    Process {
        /// Slot id or display name
        #[arg(short, long)]
        effect: String,

        /// Input WAV file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Render every slot into its own file
    #[command(name = "demo")]
    Demo {
        /// Input WAV file
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_override() {
        let o = parse_override("Delay Multi:second.mix=0.6").unwrap();
        assert_eq!(o.slot, "Delay Multi");
        assert_eq!(o.key, "second.mix");
        assert_eq!(o.value, ParamValue::Float(0.6));

        let o = parse_override("ladder_filter:mode=BPF24").unwrap();
        assert_eq!(o.value, ParamValue::Mode("BPF24".to_string()));
    }

    #[test]
    fn test_parse_override_rejects() {
        assert!(parse_override("compressor").is_err());
        assert!(parse_override("compressor:ratio").is_err());
        assert!(parse_override(":ratio=4").is_err());
        assert!(parse_override("compressor:ratio=4*2").is_err());
    }

    #[test]
    fn test_preview_arguments() {
        let cli = Cli::parse_from([
            "fxrack-cli",
            "preview",
            "--enable",
            "Compressor",
            "--set",
            "compressor:ratio=8",
            "--title",
            "Test",
        ]);
        match cli.command {
            Some(Commands::Preview { chain }) => {
                assert_eq!(chain.enable, vec!["Compressor"]);
                assert_eq!(chain.set[0].value, ParamValue::Int(8));
                assert_eq!(chain.title.as_deref(), Some("Test"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
