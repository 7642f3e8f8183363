//! Simulate command - random playouts to measure how forgiving a board is
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: simulate_games(), report_results()
//! - Level 3: play_one(), SimulationStats::from_playouts()
//! - Level 4: seeding, progress bar, formatting

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use sealo_core::{random_playout, BoardState, GameStatus, Playout, Topology};

use crate::config::SealoConfig;
use crate::start::starting_level;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    /// Board shape: cross, triangle or triangle:<rows>
    #[arg(long)]
    pub shape: Option<Topology>,

    /// Simulate from a level file instead of the standard layout
    #[arg(long, value_name = "FILE")]
    pub level: Option<PathBuf>,

    /// Number of playouts (defaults to the configured count)
    #[arg(long)]
    pub games: Option<usize>,

    /// Hide the progress bar
    #[arg(long)]
    pub quiet: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Aggregated playout results
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationStats {
    pub games: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub avg_pegs_left: f64,
    pub avg_moves: f64,
    /// Pegs left at the end -> number of games
    pub pegs_left: BTreeMap<usize, usize>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run simulate command
///
/// 1. Pick the level
/// 2. Play random games in parallel
/// 3. Summarise and print
pub fn run(args: SimulateArgs, config: &SealoConfig, seed: Option<u64>) -> Result<()> {
    let level = starting_level(args.shape, args.level.as_deref(), config.default_shape)?;
    let board = level.to_board()?;
    let games = args.games.unwrap_or(config.simulate_games);
    let base_seed = seed.unwrap_or_else(rand::random);

    tracing::info!(
        "Simulating {} random games on {} (seed {})",
        games,
        level.topology,
        base_seed
    );

    let progress = create_progress_bar(games, args.quiet || args.json);
    let timer = Instant::now();
    let playouts = simulate_games(&board, games, base_seed, &progress);
    progress.finish_and_clear();

    let stats = SimulationStats::from_playouts(&playouts);
    report_results(&level.name, level.topology, &stats, timer.elapsed(), args.json);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play `games` random games from `board`; game `i` uses seed `base_seed + i`
pub fn simulate_games(
    board: &BoardState,
    games: usize,
    base_seed: u64,
    progress: &ProgressBar,
) -> Vec<Playout> {
    (0..games)
        .into_par_iter()
        .map(|index| {
            let playout = play_one(board, base_seed.wrapping_add(index as u64));
            progress.inc(1);
            playout
        })
        .collect()
}

fn report_results(
    name: &str,
    topology: Topology,
    stats: &SimulationStats,
    elapsed: Duration,
    json: bool,
) {
    if json {
        print_json_results(name, topology, stats);
    } else {
        print_text_results(name, topology, stats, elapsed);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn play_one(board: &BoardState, seed: u64) -> Playout {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    random_playout(board, &mut rng)
}

impl SimulationStats {
    pub fn from_playouts(playouts: &[Playout]) -> Self {
        let games = playouts.len();
        let wins = playouts
            .iter()
            .filter(|p| p.status == GameStatus::Won)
            .count();

        let mut pegs_left = BTreeMap::new();
        for playout in playouts {
            *pegs_left.entry(playout.pegs_left).or_insert(0) += 1;
        }

        let total_pegs: usize = playouts.iter().map(|p| p.pegs_left).sum();
        let total_moves: usize = playouts.iter().map(|p| p.moves.len()).sum();

        Self {
            games,
            wins,
            win_rate: ratio(wins, games),
            avg_pegs_left: ratio(total_pegs, games),
            avg_moves: ratio(total_moves, games),
            pegs_left,
        }
    }
}

fn print_json_results(name: &str, topology: Topology, stats: &SimulationStats) {
    #[derive(Serialize)]
    struct JsonOutput<'a> {
        level: &'a str,
        topology: Topology,
        #[serde(flatten)]
        stats: &'a SimulationStats,
    }

    let output = JsonOutput {
        level: name,
        topology,
        stats,
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

fn print_text_results(name: &str, topology: Topology, stats: &SimulationStats, elapsed: Duration) {
    println!("\n=== Random play on '{}' ({}) ===", name, topology);
    println!("Games:          {}", stats.games);
    println!("Wins:           {} ({:.2}%)", stats.wins, stats.win_rate * 100.0);
    println!("Avg pegs left:  {:.2}", stats.avg_pegs_left);
    println!("Avg moves:      {:.2}", stats.avg_moves);
    println!(
        "Time:           {:.2}s ({:.0} games/s)\n",
        elapsed.as_secs_f64(),
        stats.games as f64 / elapsed.as_secs_f64().max(1e-9)
    );

    println!("{:>10} {:>8}  {}", "Pegs left", "Games", "Share");
    println!("{}", "-".repeat(50));
    for (&pegs, &count) in &stats.pegs_left {
        let share = ratio(count, stats.games);
        println!(
            "{:>10} {:>8}  {}",
            pegs,
            count,
            "#".repeat((share * 30.0).round() as usize)
        );
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn create_progress_bar(games: usize, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(games as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} games")
    {
        bar.set_style(style);
    }
    bar
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealo_core::Cell;

    #[test]
    fn test_simulation_is_seeded() {
        let board = BoardState::new(Topology::triangle()).unwrap();
        let a = simulate_games(&board, 64, 7, &ProgressBar::hidden());
        let b = simulate_games(&board, 64, 7, &ProgressBar::hidden());

        let moves_a: Vec<_> = a.iter().map(|p| p.moves.clone()).collect();
        let moves_b: Vec<_> = b.iter().map(|p| p.moves.clone()).collect();
        assert_eq!(moves_a, moves_b);
    }

    #[test]
    fn test_stats_add_up() {
        let board = BoardState::cross();
        let playouts = simulate_games(&board, 200, 1, &ProgressBar::hidden());
        let stats = SimulationStats::from_playouts(&playouts);

        assert_eq!(stats.games, 200);
        assert_eq!(stats.pegs_left.values().sum::<usize>(), 200);
        assert_eq!(stats.pegs_left.get(&1).copied().unwrap_or(0), stats.wins);
        assert!(stats.avg_pegs_left >= 1.0);
        assert!((0.0..=1.0).contains(&stats.win_rate));
    }

    #[test]
    fn test_forced_win_always_wins() {
        let board =
            BoardState::with_pegs(Topology::Cross, &[Cell::new(3, 2), Cell::new(3, 3)]).unwrap();
        let playouts = simulate_games(&board, 10, 0, &ProgressBar::hidden());
        let stats = SimulationStats::from_playouts(&playouts);

        assert_eq!(stats.wins, 10);
        assert_eq!(stats.win_rate, 1.0);
        assert_eq!(stats.avg_moves, 1.0);
    }

    #[test]
    fn test_empty_simulation() {
        let stats = SimulationStats::from_playouts(&[]);
        assert_eq!(stats.games, 0);
        assert_eq!(stats.win_rate, 0.0);
    }
}
