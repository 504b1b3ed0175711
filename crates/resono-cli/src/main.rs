//! Resono CLI - render audio through the Hall and Plate reverb engines.

mod commands;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "resono")]
#[command(author, version, about = "Algorithmic reverb renderer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a WAV file through a reverb engine
    Render(commands::render::RenderArgs),

    /// Render an impulse response to a WAV file
    Impulse(commands::impulse::ImpulseArgs),

    /// List available engines and their controls
    Engines(commands::engines::EnginesArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Impulse(args) => commands::impulse::run(args),
        Commands::Engines(args) => commands::engines::run(args),
    }
}
