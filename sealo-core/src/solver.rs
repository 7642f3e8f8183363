//! Depth-first solver used for hints and the `solve` command
//!
//! The search walks legal moves in [`BoardState::legal_moves`] order and
//! remembers positions already proven unwinnable, keyed by occupancy.

use rustc_hash::FxHashSet;

use crate::game::{BoardState, Move};

/// Nodes expanded before the search gives up
pub const DEFAULT_NODE_BUDGET: u64 = 5_000_000;

/// Outcome of a solve
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveResult {
    /// Moves that leave exactly one peg, starting from the given position
    Solved(Vec<Move>),
    /// Every line ends with more than one peg
    Unsolvable,
    /// Node budget spent before a verdict
    BudgetExhausted,
}

impl SolveResult {
    pub fn moves(&self) -> Option<&[Move]> {
        match self {
            SolveResult::Solved(moves) => Some(moves),
            _ => None,
        }
    }
}

/// Peg-solitaire solver
#[derive(Clone, Copy, Debug)]
pub struct Solver {
    pub node_budget: u64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            node_budget: DEFAULT_NODE_BUDGET,
        }
    }
}

impl Solver {
    pub fn new(node_budget: u64) -> Self {
        Self { node_budget }
    }

    /// Find a winning line from `state`
    pub fn solve(&self, state: &BoardState) -> SolveResult {
        let mut search = Search {
            dead: FxHashSet::default(),
            path: Vec::with_capacity(state.peg_count()),
            nodes: 0,
            budget: self.node_budget,
        };

        match search.dfs(state) {
            Step::Found => SolveResult::Solved(search.path),
            Step::DeadEnd => SolveResult::Unsolvable,
            Step::OutOfBudget => SolveResult::BudgetExhausted,
        }
    }

    /// First move of a winning line, if one is found within budget
    pub fn hint(&self, state: &BoardState) -> Option<Move> {
        match self.solve(state) {
            SolveResult::Solved(moves) => moves.first().copied(),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Found,
    DeadEnd,
    OutOfBudget,
}

struct Search {
    dead: FxHashSet<u128>,
    path: Vec<Move>,
    nodes: u64,
    budget: u64,
}

impl Search {
    fn dfs(&mut self, board: &BoardState) -> Step {
        if board.peg_count() == 1 {
            return Step::Found;
        }

        let key = board.occupancy_bits();
        if self.dead.contains(&key) {
            return Step::DeadEnd;
        }

        self.nodes += 1;
        if self.nodes > self.budget {
            return Step::OutOfBudget;
        }

        for mv in board.legal_moves() {
            let mut next = board.clone();
            next.apply_unchecked(mv);
            self.path.push(mv);

            match self.dfs(&next) {
                Step::DeadEnd => {
                    self.path.pop();
                }
                found_or_out => return found_or_out,
            }
        }

        self.dead.insert(key);
        Step::DeadEnd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, Topology};
    use crate::game::{GameStatus, MoveOutcome};

    fn replay(mut board: BoardState, moves: &[Move]) -> (BoardState, MoveOutcome) {
        let mut last = MoveOutcome::Invalid;
        for mv in moves {
            last = board.attempt_move(mv.from, mv.to);
            assert!(last.is_applied(), "solver produced illegal move {}", mv);
        }
        (board, last)
    }

    #[test]
    fn test_solves_cross() {
        let board = BoardState::cross();
        let result = Solver::default().solve(&board);
        let moves = result.moves().expect("cross board is solvable");
        assert_eq!(moves.len(), 31);

        let (end, last) = replay(board, moves);
        assert_eq!(last, MoveOutcome::AppliedWin);
        assert_eq!(end.peg_count(), 1);
    }

    #[test]
    fn test_solves_triangle() {
        let board = BoardState::new(Topology::triangle()).unwrap();
        let result = Solver::default().solve(&board);
        let moves = result.moves().expect("triangle board is solvable");
        assert_eq!(moves.len(), 13);

        let (end, last) = replay(board, moves);
        assert_eq!(last, MoveOutcome::AppliedWin);
        assert_eq!(end.status(), GameStatus::Won);
    }

    #[test]
    fn test_unsolvable_position() {
        let board = BoardState::with_pegs(
            Topology::Cross,
            &[Cell::new(0, 2), Cell::new(3, 3), Cell::new(6, 4)],
        )
        .unwrap();
        assert_eq!(Solver::default().solve(&board), SolveResult::Unsolvable);
        assert_eq!(Solver::default().hint(&board), None);
    }

    #[test]
    fn test_budget_exhausted() {
        let result = Solver::new(3).solve(&BoardState::cross());
        assert_eq!(result, SolveResult::BudgetExhausted);
    }

    #[test]
    fn test_hint_is_legal_and_keeps_state() {
        let board = BoardState::cross();
        let before = board.clone();
        let hint = Solver::default().hint(&board).unwrap();
        assert_eq!(board, before);
        assert!(board.is_legal(hint));
    }

    #[test]
    fn test_won_board_needs_no_moves() {
        let board = BoardState::with_pegs(Topology::Cross, &[Cell::new(3, 3)]).unwrap();
        assert_eq!(Solver::default().solve(&board), SolveResult::Solved(vec![]));
        assert_eq!(Solver::default().hint(&board), None);
    }
}
