//! Board geometry: cell coordinates and per-topology shape tables

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};

/// Side length of the cross board grid
pub const CROSS_SIZE: u8 = 7;

/// Smallest triangle that has an opening move from its hole
pub const MIN_TRIANGLE_ROWS: u8 = 5;

/// Largest triangle that fits the 128-bit occupancy word
pub const MAX_TRIANGLE_ROWS: u8 = 11;

/// Rows of the standard triangle board
pub const DEFAULT_TRIANGLE_ROWS: u8 = 5;

/// Grid coordinates (0-indexed, row 0 at the top)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: i8,
    pub col: i8,
}

impl Cell {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Cell displaced by `(dr, dc)`, or `None` if the sum leaves `i8`
    pub fn offset(&self, (dr, dc): (i8, i8)) -> Option<Cell> {
        Some(Cell::new(self.row.checked_add(dr)?, self.col.checked_add(dc)?))
    }

    /// Displacement from `self` to `other`
    pub fn delta_to(&self, other: Cell) -> (i16, i16) {
        (
            other.row as i16 - self.row as i16,
            other.col as i16 - self.col as i16,
        )
    }

    /// Cell halfway between `self` and `other` (rounded toward `self`)
    pub fn midpoint(&self, other: Cell) -> Cell {
        let (dr, dc) = self.delta_to(other);
        Cell::new(
            (self.row as i16 + dr / 2) as i8,
            (self.col as i16 + dc / 2) as i8,
        )
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Orthogonal two-cell jumps (dr, dc)
pub const CROSS_JUMPS: &[(i8, i8)] = &[
    (-2, 0), // up
    (2, 0),  // down
    (0, -2), // left
    (0, 2),  // right
];

/// Orthogonal jumps plus the two lattice diagonals of a left-aligned triangle
pub const TRIANGLE_JUMPS: &[(i8, i8)] = &[
    (-2, 0),
    (2, 0),
    (0, -2),
    (0, 2),
    (-2, -2),
    (2, 2),
];

/// Board shape chosen for a session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Topology {
    /// 7x7 plus-shaped English board
    #[default]
    Cross,
    /// Triangle where row `r` holds columns `0..=r`
    Triangle { rows: u8 },
}

impl Topology {
    /// Standard 15-cell triangle
    pub const fn triangle() -> Self {
        Topology::Triangle { rows: DEFAULT_TRIANGLE_ROWS }
    }

    /// Reject parameters outside the supported set
    pub fn validate(&self) -> Result<()> {
        match *self {
            Topology::Cross => Ok(()),
            Topology::Triangle { rows } => {
                if (MIN_TRIANGLE_ROWS..=MAX_TRIANGLE_ROWS).contains(&rows) {
                    Ok(())
                } else {
                    Err(BoardError::InvalidTriangleRows { rows })
                }
            }
        }
    }

    /// Grid extent as (rows, cols)
    pub fn extent(&self) -> (u8, u8) {
        match *self {
            Topology::Cross => (CROSS_SIZE, CROSS_SIZE),
            Topology::Triangle { rows } => (rows, rows),
        }
    }

    /// Whether `cell` belongs to the playable shape
    pub fn is_present(&self, cell: Cell) -> bool {
        let (rows, cols) = self.extent();
        if cell.row < 0 || cell.col < 0 || cell.row as u8 >= rows || cell.col as u8 >= cols {
            return false;
        }
        match self {
            Topology::Cross => (2..=4).contains(&cell.row) || (2..=4).contains(&cell.col),
            Topology::Triangle { .. } => cell.col <= cell.row,
        }
    }

    /// The single present cell left empty at game start
    pub fn hole(&self) -> Cell {
        match *self {
            Topology::Cross => {
                let center = (CROSS_SIZE / 2) as i8;
                Cell::new(center, center)
            }
            Topology::Triangle { rows } => {
                Cell::new((rows / 2) as i8, (rows / 4).max(1) as i8)
            }
        }
    }

    /// Legal jump displacements
    pub fn jump_vectors(&self) -> &'static [(i8, i8)] {
        match self {
            Topology::Cross => CROSS_JUMPS,
            Topology::Triangle { .. } => TRIANGLE_JUMPS,
        }
    }

    /// All present cells in row-major order
    pub fn present_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let (rows, cols) = self.extent();
        (0..rows as i8)
            .flat_map(move |r| (0..cols as i8).map(move |c| Cell::new(r, c)))
            .filter(move |&cell| self.is_present(cell))
    }

    /// Number of present cells
    pub fn cell_count(&self) -> usize {
        self.present_cells().count()
    }

    /// Bit position of a present cell in the occupancy word
    pub(crate) fn bit_index(&self, cell: Cell) -> Option<u32> {
        if !self.is_present(cell) {
            return None;
        }
        let (_, cols) = self.extent();
        Some(cell.row as u32 * cols as u32 + cell.col as u32)
    }

    /// Key used for per-topology records (`cross`, `triangle:5`)
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topology::Cross => write!(f, "cross"),
            Topology::Triangle { rows } => write!(f, "triangle:{}", rows),
        }
    }
}

impl FromStr for Topology {
    type Err = BoardError;

    /// Parses `cross`, `triangle` or `triangle:<rows>`
    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        let topology = match lowered.split_once(':') {
            None if lowered == "cross" => Topology::Cross,
            None if lowered == "triangle" => Topology::triangle(),
            Some(("triangle", rows)) => {
                let rows = rows
                    .parse::<u8>()
                    .map_err(|_| BoardError::UnknownTopology(s.to_string()))?;
                Topology::Triangle { rows }
            }
            _ => return Err(BoardError::UnknownTopology(s.to_string())),
        };
        topology.validate()?;
        Ok(topology)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_shape() {
        let cross = Topology::Cross;
        assert!(cross.is_present(Cell::new(3, 3)));
        assert!(cross.is_present(Cell::new(0, 2)));
        assert!(cross.is_present(Cell::new(2, 0)));
        assert!(!cross.is_present(Cell::new(0, 0)));
        assert!(!cross.is_present(Cell::new(1, 5)));
        assert!(!cross.is_present(Cell::new(7, 3)));
        assert!(!cross.is_present(Cell::new(-1, 3)));
        assert_eq!(cross.cell_count(), 33);
        assert_eq!(cross.hole(), Cell::new(3, 3));
    }

    #[test]
    fn test_triangle_shape() {
        let tri = Topology::triangle();
        assert_eq!(tri.cell_count(), 15);
        assert!(tri.is_present(Cell::new(4, 4)));
        assert!(!tri.is_present(Cell::new(3, 4)));
        assert_eq!(tri.hole(), Cell::new(2, 1));
    }

    #[test]
    fn test_triangle_hole_is_interior() {
        for rows in MIN_TRIANGLE_ROWS..=MAX_TRIANGLE_ROWS {
            let hole = Topology::Triangle { rows }.hole();
            assert!(hole.col > 0 && hole.col < hole.row, "rows={}", rows);
            assert!((hole.row as u8) < rows - 1, "rows={}", rows);
        }
    }

    #[test]
    fn test_triangle_rows_validation() {
        assert!(Topology::Triangle { rows: 4 }.validate().is_err());
        assert!(Topology::Triangle { rows: 12 }.validate().is_err());
        assert!(Topology::Triangle { rows: 11 }.validate().is_ok());
    }

    #[test]
    fn test_bit_index_fits_word() {
        let big = Topology::Triangle { rows: MAX_TRIANGLE_ROWS };
        let max = big.present_cells().filter_map(|c| big.bit_index(c)).max().unwrap();
        assert!(max < 128);
        assert_eq!(Topology::Cross.bit_index(Cell::new(0, 0)), None);
    }

    #[test]
    fn test_parse_topology() {
        assert_eq!("cross".parse::<Topology>().unwrap(), Topology::Cross);
        assert_eq!("Triangle".parse::<Topology>().unwrap(), Topology::triangle());
        assert_eq!(
            "triangle:7".parse::<Topology>().unwrap(),
            Topology::Triangle { rows: 7 }
        );
        assert!("hexagon".parse::<Topology>().is_err());
        assert!("triangle:3".parse::<Topology>().is_err());
        assert!("triangle:x".parse::<Topology>().is_err());
    }

    #[test]
    fn test_default_is_cross() {
        assert_eq!(Topology::default(), Topology::Cross);
    }

    #[test]
    fn test_midpoint() {
        assert_eq!(Cell::new(1, 3).midpoint(Cell::new(3, 3)), Cell::new(2, 3));
        assert_eq!(Cell::new(0, 0).midpoint(Cell::new(2, 2)), Cell::new(1, 1));
    }
}
