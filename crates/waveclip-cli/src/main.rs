//! Waveclip CLI - offline renderer and state tools for the waveclip waveshaper.

mod commands;
mod config;
mod error;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "waveclip")]
#[command(author, version, about = "Waveclip waveshaping distortion CLI", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a WAV file through the waveshaper
    Render(commands::render::RenderArgs),

    /// List the plugin parameters
    Params(commands::params::ParamsArgs),

    /// Inspect or write 16-byte state blobs
    State(commands::state::StateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Params(args) => commands::params::run(args),
        Commands::State(args) => commands::state::run(args),
    }
}
