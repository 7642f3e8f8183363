//! Sealo Core - Peg solitaire engine
//!
//! This crate provides the rules engine behind Sealo:
//! - Board geometry (cross and triangle topologies, table-driven)
//! - Board state, selection and jump validation
//! - Win and stalemate detection
//! - Depth-first solver for hints
//! - Random playouts and level files

pub mod board;
pub mod error;
pub mod game;
pub mod level;
pub mod playout;
pub mod solver;

// Re-exports for convenient access
pub use board::{Cell, Topology, CROSS_JUMPS, TRIANGLE_JUMPS};
pub use error::{BoardError, Result};
pub use game::{BoardState, GameStatus, Move, MoveOutcome, TapOutcome};
pub use level::Level;
pub use playout::{random_playout, Playout};
pub use solver::{SolveResult, Solver};
