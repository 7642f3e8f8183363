//! Solve command - find a winning line for a board or level
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: solve_level(), report_solution()
//! - Level 3: print_json_solution(), print_text_solution()
//! - Level 4: formatting

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use sealo_core::{BoardState, Level, Move, SolveResult, Solver, Topology};

use crate::config::SealoConfig;
use crate::start::starting_level;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SolveArgs {
    /// Board shape: cross, triangle or triangle:<rows>
    #[arg(long)]
    pub shape: Option<Topology>,

    /// Solve a level file instead of the standard layout
    #[arg(long, value_name = "FILE")]
    pub level: Option<PathBuf>,

    /// Override the configured node budget
    #[arg(long)]
    pub budget: Option<u64>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Solver verdict plus what it cost
#[derive(Clone, Debug)]
pub struct SolveReport {
    pub level: String,
    pub topology: Topology,
    pub start: BoardState,
    pub result: SolveResult,
    pub elapsed: Duration,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run solve command
///
/// 1. Pick the level (file, flag, config)
/// 2. Search it
/// 3. Print the verdict
pub fn run(args: SolveArgs, config: &SealoConfig) -> Result<()> {
    let level = starting_level(args.shape, args.level.as_deref(), config.default_shape)?;
    let solver = Solver::new(args.budget.unwrap_or(config.solver_node_budget));

    tracing::info!(
        "Solving '{}' on {} (budget {} nodes)",
        level.name,
        level.topology,
        solver.node_budget
    );

    let report = solve_level(&level, &solver)?;
    report_solution(&report, args.json);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

pub fn solve_level(level: &Level, solver: &Solver) -> Result<SolveReport> {
    let start = level.to_board()?;

    let timer = Instant::now();
    let result = solver.solve(&start);
    let elapsed = timer.elapsed();

    tracing::debug!("Solve finished in {:.3}s", elapsed.as_secs_f64());

    Ok(SolveReport {
        level: level.name.clone(),
        topology: level.topology,
        start,
        result,
        elapsed,
    })
}

fn report_solution(report: &SolveReport, json: bool) {
    if json {
        print_json_solution(report);
    } else {
        print_text_solution(report);
    }
}

// ============================================================================
// LEVEL 3 - OUTPUT
// ============================================================================

fn print_json_solution(report: &SolveReport) {
    #[derive(Serialize)]
    struct JsonSolution<'a> {
        level: &'a str,
        topology: Topology,
        pegs: usize,
        verdict: &'static str,
        moves: Option<&'a [Move]>,
        elapsed_ms: f64,
    }

    let output = JsonSolution {
        level: &report.level,
        topology: report.topology,
        pegs: report.start.peg_count(),
        verdict: verdict(&report.result),
        moves: report.result.moves(),
        elapsed_ms: report.elapsed.as_secs_f64() * 1000.0,
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

fn print_text_solution(report: &SolveReport) {
    println!("\n=== {} ({}) ===", report.level, report.topology);
    print!("{}", report.start);
    println!("{} pegs\n", report.start.peg_count());

    match &report.result {
        SolveResult::Solved(moves) if moves.is_empty() => {
            println!("Already solved.");
        }
        SolveResult::Solved(moves) => {
            for (i, mv) in moves.iter().enumerate() {
                println!("{:>3}. {}", i + 1, mv);
            }
            println!("\nSolved in {} moves", moves.len());
        }
        SolveResult::Unsolvable => println!("No sequence of jumps leaves a single peg."),
        SolveResult::BudgetExhausted => {
            println!("Gave up: node budget exhausted. Try a larger --budget.")
        }
    }

    println!("Search time: {:.3}s", report.elapsed.as_secs_f64());
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn verdict(result: &SolveResult) -> &'static str {
    match result {
        SolveResult::Solved(_) => "solved",
        SolveResult::Unsolvable => "unsolvable",
        SolveResult::BudgetExhausted => "budget_exhausted",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealo_core::{Cell, MoveOutcome};

    #[test]
    fn test_solve_standard_triangle() {
        let level = Level::standard(Topology::triangle());
        let report = solve_level(&level, &Solver::default()).unwrap();

        let moves = report.result.moves().unwrap();
        assert_eq!(moves.len(), 13);

        let mut board = report.start.clone();
        let mut last = MoveOutcome::Invalid;
        for mv in moves {
            last = board.attempt_move(mv.from, mv.to);
        }
        assert_eq!(last, MoveOutcome::AppliedWin);
    }

    #[test]
    fn test_unsolvable_level() {
        let level = Level {
            name: "apart".to_string(),
            topology: Topology::Cross,
            pegs: Some(vec![Cell::new(0, 2), Cell::new(6, 4)]),
        };
        let report = solve_level(&level, &Solver::default()).unwrap();
        assert_eq!(report.result, SolveResult::Unsolvable);
        assert_eq!(verdict(&report.result), "unsolvable");
    }

    #[test]
    fn test_invalid_level_is_an_error() {
        let level = Level {
            name: "broken".to_string(),
            topology: Topology::Cross,
            pegs: Some(vec![Cell::new(0, 0)]),
        };
        assert!(solve_level(&level, &Solver::default()).is_err());
    }
}
