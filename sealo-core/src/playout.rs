//! Random playouts

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::game::{BoardState, GameStatus, Move, MoveOutcome};

/// Record of one random game
#[derive(Clone, Debug, Serialize)]
pub struct Playout {
    pub moves: Vec<Move>,
    pub status: GameStatus,
    pub pegs_left: usize,
}

/// Play uniformly random legal jumps from `start` until the game ends
pub fn random_playout<R: Rng + ?Sized>(start: &BoardState, rng: &mut R) -> Playout {
    let mut board = start.clone();
    let mut moves = Vec::with_capacity(board.peg_count());

    loop {
        let legal = board.legal_moves();
        let Some(&mv) = legal.choose(rng) else {
            break;
        };

        let outcome = board.attempt_move(mv.from, mv.to);
        debug_assert_ne!(outcome, MoveOutcome::Invalid);
        moves.push(mv);

        if outcome.is_terminal() {
            break;
        }
    }

    Playout {
        moves,
        status: board.status(),
        pegs_left: board.peg_count(),
    }
}
