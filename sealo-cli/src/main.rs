//! SEALO CLI - peg solitaire in the terminal
//!
//! Commands:
//! - play: Play a board interactively
//! - solve: Find a winning line for a board or level
//! - simulate: Random playouts and win-rate statistics
//! - records: Show balance, streak and best times
//! - daily: Claim the daily coin prize

mod action;
mod config;
mod daily;
mod play;
mod records;
mod session;
mod simulate;
mod solve;
mod start;
mod stats;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::SealoConfig;
use records::{JsonRecordStore, MemoryRecordStore, RecordStore};

#[derive(Parser)]
#[command(name = "sealo")]
#[command(about = "Peg solitaire on cross and triangle boards")]
struct Cli {
    /// Configuration file (missing file means defaults)
    #[arg(long, global = true, default_value = "sealo.json")]
    config: PathBuf,

    /// User record file (overrides the configured path)
    #[arg(long, global = true)]
    records: Option<PathBuf>,

    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a board interactively
    Play(play::PlayArgs),
    /// Find a winning line for a board or level
    Solve(solve::SolveArgs),
    /// Play random games and report how often they win
    Simulate(simulate::SimulateArgs),
    /// Show the stored user record
    Records(stats::RecordsArgs),
    /// Claim the daily coin prize
    Daily,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = SealoConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;

    match cli.command {
        Commands::Play(args) if args.guest => {
            let saved = open_records(cli.records.as_deref(), &config)?;
            let mut store = MemoryRecordStore::new(saved.record().clone());
            play::run(args, &config, &mut store)
        }
        Commands::Play(args) => {
            let mut store = open_records(cli.records.as_deref(), &config)?;
            play::run(args, &config, &mut store)
        }
        Commands::Solve(args) => solve::run(args, &config),
        Commands::Simulate(args) => simulate::run(args, &config, cli.seed),
        Commands::Records(args) => {
            let store = open_records(cli.records.as_deref(), &config)?;
            stats::run(args, &store)
        }
        Commands::Daily => {
            let mut store = open_records(cli.records.as_deref(), &config)?;
            daily::run(&mut store)
        }
    }
}

fn open_records(path: Option<&Path>, config: &SealoConfig) -> Result<JsonRecordStore> {
    let path = path.unwrap_or(config.records_path.as_path());
    let store = JsonRecordStore::open(path)
        .with_context(|| format!("Failed to open records: {}", path.display()))?;
    tracing::debug!("Using records at {}", store.path().display());
    Ok(store)
}
