//! Board state, move validation and terminal detection

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Cell, Topology};
use crate::error::{BoardError, Result};

// ============================================================================
// CORE TYPES
// ============================================================================

/// A jump request from one cell to another
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Cell,
    pub to: Cell,
}

impl Move {
    pub const fn new(from: Cell, to: Cell) -> Self {
        Self { from, to }
    }

    /// The jumped-over cell
    pub fn over(&self) -> Cell {
        self.from.midpoint(self.to)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Result of [`BoardState::attempt_move`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing changed except the selection being cleared
    Invalid,
    /// Move applied, game continues
    Applied { removed: Cell, from: Cell, to: Cell },
    /// Move applied and a single peg remains
    AppliedWin,
    /// Move applied and no further jump exists
    AppliedStalemate,
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, MoveOutcome::Invalid)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MoveOutcome::AppliedWin | MoveOutcome::AppliedStalemate)
    }
}

/// Result of [`BoardState::tap`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    /// Tap selected a peg
    Selected(Cell),
    /// Tap hit an empty or absent cell with nothing selected
    Ignored,
    /// Tap resolved the pending selection as a move attempt
    Moved(MoveOutcome),
}

/// Session state derived from the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won,
    Stalemated,
}

// ============================================================================
// BOARD STATE
// ============================================================================

/// Occupancy and selection for one game
///
/// Occupancy is a bitboard over the topology's grid. Bits outside `present`
/// are always clear.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardState {
    topology: Topology,
    present: u128,
    occupied: u128,
    selection: Option<Cell>,
}

impl BoardState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Standard starting layout: every present cell filled except the hole
    pub fn new(topology: Topology) -> Result<Self> {
        topology.validate()?;
        Ok(Self::standard(topology))
    }

    /// Standard cross board
    pub fn cross() -> Self {
        Self::standard(Topology::Cross)
    }

    fn standard(topology: Topology) -> Self {
        let present = present_mask(&topology);
        Self {
            topology,
            present,
            occupied: present & !cell_mask(&topology, topology.hole()),
            selection: None,
        }
    }

    /// Custom position with pegs on exactly the given cells
    pub fn with_pegs(topology: Topology, pegs: &[Cell]) -> Result<Self> {
        topology.validate()?;

        let mut occupied = 0u128;
        for &cell in pegs {
            let bit = topology.bit_index(cell).ok_or(BoardError::AbsentCell(cell))?;
            if occupied & (1u128 << bit) != 0 {
                return Err(BoardError::DuplicatePeg(cell));
            }
            occupied |= 1u128 << bit;
        }

        Ok(Self {
            topology,
            present: present_mask(&topology),
            occupied,
            selection: None,
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Currently selected peg
    pub fn selected_peg(&self) -> Option<Cell> {
        self.selection
    }

    pub fn is_present(&self, cell: Cell) -> bool {
        self.topology.is_present(cell)
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        match self.topology.bit_index(cell) {
            Some(bit) => self.occupied & (1u128 << bit) != 0,
            None => false,
        }
    }

    /// Occupied cells in row-major order
    pub fn pegs(&self) -> impl Iterator<Item = Cell> + '_ {
        self.topology
            .present_cells()
            .filter(move |&cell| self.is_occupied(cell))
    }

    /// Number of pegs on the board
    pub fn peg_count(&self) -> usize {
        self.occupied.count_ones() as usize
    }

    /// Raw occupancy word, used as a position key
    pub(crate) fn occupancy_bits(&self) -> u128 {
        self.occupied
    }

    /// Where the session stands
    pub fn status(&self) -> GameStatus {
        if self.peg_count() == 1 {
            GameStatus::Won
        } else if !self.has_any_legal_move() {
            GameStatus::Stalemated
        } else {
            GameStatus::InProgress
        }
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    /// Select a peg awaiting a destination
    ///
    /// Fails when the cell holds no peg or another peg is already selected;
    /// a second tap while selected is a move attempt, see [`Self::tap`].
    pub fn try_select(&mut self, cell: Cell) -> bool {
        if self.selection.is_some() || !self.is_occupied(cell) {
            return false;
        }
        self.selection = Some(cell);
        true
    }

    pub fn deselect(&mut self) {
        self.selection = None;
    }

    /// One tap from the player: select, or resolve the pending selection
    pub fn tap(&mut self, cell: Cell) -> TapOutcome {
        if let Some(from) = self.selection {
            TapOutcome::Moved(self.attempt_move(from, cell))
        } else if self.try_select(cell) {
            TapOutcome::Selected(cell)
        } else {
            TapOutcome::Ignored
        }
    }

    // ========================================================================
    // MOVE VALIDATION
    // ========================================================================

    /// Whether `from -> to` is a legal jump in the current position
    pub fn is_legal(&self, mv: Move) -> bool {
        if !self.is_occupied(mv.from) || !self.is_present(mv.to) || self.is_occupied(mv.to) {
            return false;
        }

        let delta = mv.from.delta_to(mv.to);
        let vector_ok = self
            .topology
            .jump_vectors()
            .iter()
            .any(|&(dr, dc)| (dr as i16, dc as i16) == delta);

        vector_ok && self.is_occupied(mv.over())
    }

    /// Check whether any occupied cell has a legal jump
    pub fn has_any_legal_move(&self) -> bool {
        self.pegs().any(|from| self.jumps_from(from).next().is_some())
    }

    /// All legal jumps, by source cell in row-major order then jump table order
    pub fn legal_moves(&self) -> Vec<Move> {
        self.pegs().flat_map(|from| self.jumps_from(from)).collect()
    }

    fn jumps_from(&self, from: Cell) -> impl Iterator<Item = Move> + '_ {
        self.topology
            .jump_vectors()
            .iter()
            .filter_map(move |&vector| from.offset(vector))
            .map(move |to| Move::new(from, to))
            .filter(move |&mv| self.is_legal(mv))
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Validate and execute a jump, then classify the resulting position
    ///
    /// Selection is cleared whatever the outcome.
    pub fn attempt_move(&mut self, from: Cell, to: Cell) -> MoveOutcome {
        self.selection = None;

        let mv = Move::new(from, to);
        if !self.is_legal(mv) {
            return MoveOutcome::Invalid;
        }

        self.apply_unchecked(mv);

        if self.peg_count() == 1 {
            MoveOutcome::AppliedWin
        } else if !self.has_any_legal_move() {
            MoveOutcome::AppliedStalemate
        } else {
            MoveOutcome::Applied {
                removed: mv.over(),
                from,
                to,
            }
        }
    }

    /// Flip the three cells of a move already known to be legal
    pub(crate) fn apply_unchecked(&mut self, mv: Move) {
        let from = cell_mask(&self.topology, mv.from);
        let over = cell_mask(&self.topology, mv.over());
        let to = cell_mask(&self.topology, mv.to);
        self.occupied = (self.occupied & !from & !over) | to;
        debug_assert_eq!(self.occupied & !self.present, 0);
    }
}

/// Single-bit mask for a present cell, zero for an absent one
fn cell_mask(topology: &Topology, cell: Cell) -> u128 {
    topology.bit_index(cell).map_or(0, |bit| 1u128 << bit)
}

fn present_mask(topology: &Topology) -> u128 {
    topology
        .present_cells()
        .filter_map(|cell| topology.bit_index(cell))
        .fold(0u128, |mask, bit| mask | (1u128 << bit))
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.topology.extent();

        write!(f, "   ")?;
        for c in 0..cols {
            write!(f, " {:>2}", c)?;
        }
        writeln!(f)?;

        for r in 0..rows as i8 {
            let mut line = format!("{:>2} ", r);
            for c in 0..cols as i8 {
                let cell = Cell::new(r, c);
                let glyph = if !self.is_present(cell) {
                    ' '
                } else if self.selection == Some(cell) {
                    '@'
                } else if self.is_occupied(cell) {
                    'o'
                } else {
                    '.'
                };
                line.push_str("  ");
                line.push(glyph);
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
