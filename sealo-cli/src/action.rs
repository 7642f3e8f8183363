//! Player input parsed into explicit actions
//!
//! Every line typed at the `play` prompt becomes one [`Action`]; the play loop
//! dispatches on the enum and never on raw text.

use std::path::PathBuf;
use std::str::FromStr;

use sealo_core::{BoardError, Cell, Topology};

/// One player command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// `r c` - select a peg, or jump the selected peg to this cell
    Tap(Cell),
    /// `r c r c` - jump directly
    Move(Cell, Cell),
    Hint,
    Restart,
    /// `shape <cross|triangle|triangle:N>` - restart on another board
    Shape(Topology),
    /// `save <file>` - write the current position as a level
    Save(PathBuf),
    Board,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionParseError {
    #[error("empty input")]
    Empty,
    #[error("unknown command '{0}' (type 'help')")]
    UnknownCommand(String),
    #[error("'{0}' is not a coordinate")]
    BadCoordinate(String),
    #[error("expected 2 numbers (select) or 4 numbers (move), got {0}")]
    WrongArity(usize),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error(transparent)]
    BadShape(#[from] BoardError),
}

pub const HELP: &str = "\
Commands:
  r c            select the peg at row r, column c (or jump the selected peg there)
  r c r c        jump from the first cell to the second
  hint           suggest a move that still leads to a win
  board          redraw the board
  restart        start this board again
  shape S        start a new game on S (cross, triangle, triangle:N)
  save FILE      save the current position as a level file
  help           show this text
  quit           leave the game";

impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty() && *t != "->")
            .collect();

        let Some(&head) = tokens.first() else {
            return Err(ActionParseError::Empty);
        };

        if head.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
            return parse_coordinates(&tokens);
        }

        let rest = tokens.get(1).copied();
        match head.to_ascii_lowercase().as_str() {
            "hint" | "h" => Ok(Action::Hint),
            "restart" | "new" => Ok(Action::Restart),
            "board" | "b" => Ok(Action::Board),
            "help" | "?" => Ok(Action::Help),
            "quit" | "q" | "exit" => Ok(Action::Quit),
            "shape" => {
                let shape = rest.ok_or(ActionParseError::MissingArgument("shape"))?;
                Ok(Action::Shape(shape.parse()?))
            }
            "save" => {
                let file = rest.ok_or(ActionParseError::MissingArgument("save"))?;
                Ok(Action::Save(PathBuf::from(file)))
            }
            _ => Err(ActionParseError::UnknownCommand(head.to_string())),
        }
    }
}

fn parse_coordinates(tokens: &[&str]) -> Result<Action, ActionParseError> {
    let numbers = tokens
        .iter()
        .map(|t| {
            t.parse::<i8>()
                .map_err(|_| ActionParseError::BadCoordinate(t.to_string()))
        })
        .collect::<Result<Vec<i8>, _>>()?;

    match numbers.as_slice() {
        &[r, c] => Ok(Action::Tap(Cell::new(r, c))),
        &[r1, c1, r2, c2] => Ok(Action::Move(Cell::new(r1, c1), Cell::new(r2, c2))),
        other => Err(ActionParseError::WrongArity(other.len())),
    }
}
