//! fxrack CLI - effect chain composer
//!
//! Command-line front end for building, storing and applying effect presets.

use anyhow::Context as _;
use clap::Parser;
use env_logger::Env;
use log::{info, warn};

use fxrack::cli::commands::{self, Context};
use fxrack::cli::{Cli, Commands};
use fxrack::config::Settings;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("fxrack v{}", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    let ctx = Context::new(settings);

    match cli.command {
        Some(cmd) => handle_command(&ctx, cmd),
        None => {
            println!("fxrack v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(ctx: &Context, cmd: Commands) -> anyhow::Result<()> {
    let result = match cmd {
        Commands::Slots { json } => commands::list_slots(ctx, json),
        Commands::Effects { json } => commands::list_effects(ctx, json),
        Commands::Presets { dir } => commands::list_presets(ctx, dir.as_deref()),
        Commands::Preview { chain } => commands::preview(ctx, &chain),
        Commands::Save { chain } => commands::save(ctx, &chain).map(|_| ()),
        Commands::Apply { preset, input } => commands::apply(ctx, &preset, &input).map(|_| ()),
        Commands::Process { effect, input } => commands::process(ctx, &effect, &input).map(|_| ()),
        Commands::Demo { input } => commands::demo(ctx, &input).map(|_| ()),
    };

    if let Err(e) = &result {
        warn!("{}: {}", e.error_code(), e.recovery_hint());
    }
    Ok(result?)
}
