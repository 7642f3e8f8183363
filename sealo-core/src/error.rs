use thiserror::Error;

use crate::board::Cell;

/// Board construction failures
///
/// Move legality is never reported through this type; illegal moves come back
/// as [`crate::MoveOutcome::Invalid`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("triangle boards need 5..=11 rows, got {rows}")]
    InvalidTriangleRows { rows: u8 },
    #[error("unknown board shape '{0}' (expected cross, triangle or triangle:<rows>)")]
    UnknownTopology(String),
    #[error("cell {0} is not part of the board")]
    AbsentCell(Cell),
    #[error("cell {0} listed twice")]
    DuplicatePeg(Cell),
}

pub type Result<T> = std::result::Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BoardError::InvalidTriangleRows { rows: 3 };
        assert_eq!(err.to_string(), "triangle boards need 5..=11 rows, got 3");

        let err = BoardError::AbsentCell(Cell::new(0, 0));
        assert_eq!(err.to_string(), "cell (0,0) is not part of the board");
    }
}
