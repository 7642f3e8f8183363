//! Level - starting position definition

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::board::{Cell, Topology};
use crate::game::BoardState;

/// A named starting position
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub topology: Topology,
    /// Peg cells; `None` means the standard layout with the topology's hole
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pegs: Option<Vec<Cell>>,
}

impl Level {
    /// Standard opening for a topology
    pub fn standard(topology: Topology) -> Self {
        Self {
            name: topology.to_string(),
            topology,
            pegs: None,
        }
    }

    /// Capture the current occupancy of a board
    pub fn from_board(name: &str, board: &BoardState) -> Self {
        Self {
            name: name.to_string(),
            topology: board.topology(),
            pegs: Some(board.pegs().collect()),
        }
    }

    /// Build the board this level describes
    pub fn to_board(&self) -> crate::Result<BoardState> {
        match &self.pegs {
            None => BoardState::new(self.topology),
            Some(pegs) => BoardState::with_pegs(self.topology, pegs),
        }
    }

    /// Load from JSON file (pegs as `{"row", "col"}` objects or `[row, col]` pairs)
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading level {}", path.display()))?;

        if let Ok(level) = serde_json::from_str::<Level>(&content) {
            return Ok(level);
        }

        #[derive(Deserialize)]
        struct PairLevel {
            name: Option<String>,
            topology: Topology,
            pegs: Vec<(i8, i8)>,
        }

        if let Ok(pl) = serde_json::from_str::<PairLevel>(&content) {
            return Ok(Level {
                name: pl.name.unwrap_or_else(|| "unnamed".to_string()),
                topology: pl.topology,
                pegs: Some(pl.pegs.into_iter().map(|(r, c)| Cell::new(r, c)).collect()),
            });
        }

        // re-parse to report the primary format's error
        let level: Level = serde_json::from_str(&content)
            .with_context(|| format!("parsing level {}", path.display()))?;
        Ok(level)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("writing level {}", path.display()))?;
        Ok(())
    }
}
