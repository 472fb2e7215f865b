//! facegest CLI: replay and inspect face-landmark recordings.
//!
//! Usage:
//!   facegest replay <FRAMES>   Run a recording through the gesture pipeline
//!   facegest check <FRAMES>    Validate a recording
//!   facegest config            Show (or write) the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use facegest_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "facegest",
    about = "Blink, mouth and brow gesture detection from face landmarks",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the standard location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a landmark recording through a gesture session
    Replay {
        /// Landmark recording (JSONL)
        frames: PathBuf,

        /// Write every transition to this JSONL file
        #[arg(long)]
        events_out: Option<PathBuf>,

        /// Write one record per completed gesture to this JSONL file
        #[arg(long)]
        records_out: Option<PathBuf>,

        /// Override the sink debounce window (milliseconds)
        #[arg(long)]
        debounce_ms: Option<u64>,
    },

    /// Validate a landmark recording
    Check {
        /// Landmark recording (JSONL)
        frames: PathBuf,
    },

    /// Print the effective configuration
    Config {
        /// Save it to the standard config location
        #[arg(long)]
        write: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => AppConfig::load(),
    };

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    facegest_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Replay {
            frames,
            events_out,
            records_out,
            debounce_ms,
        } => commands::replay::run(config, frames, events_out, records_out, debounce_ms),
        Commands::Check { frames } => commands::check::run(&config, frames),
        Commands::Config { write } => commands::config::run(&config, write),
    }
}
