//! Starting-position selection shared by the board commands

use std::path::Path;

use anyhow::{Context, Result};
use sealo_core::{Level, Topology};

/// Pick the level: a level file wins over `--shape`, which wins over `fallback`
pub fn starting_level(
    shape: Option<Topology>,
    level_file: Option<&Path>,
    fallback: Topology,
) -> Result<Level> {
    if let Some(path) = level_file {
        let level = Level::load(path)
            .with_context(|| format!("Failed to load level: {}", path.display()))?;
        tracing::info!("Loaded level '{}' ({})", level.name, level.topology);
        return Ok(level);
    }

    Ok(Level::standard(shape.unwrap_or(fallback)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_overrides_fallback() {
        let level = starting_level(Some(Topology::triangle()), None, Topology::Cross).unwrap();
        assert_eq!(level.topology, Topology::triangle());
        assert!(level.pegs.is_none());

        let level = starting_level(None, None, Topology::Cross).unwrap();
        assert_eq!(level.topology, Topology::Cross);
    }

    #[test]
    fn test_level_file_overrides_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("l.json");
        Level::standard(Topology::Triangle { rows: 6 }).save(&path).unwrap();

        let level = starting_level(Some(Topology::Cross), Some(&path), Topology::Cross).unwrap();
        assert_eq!(level.topology, Topology::Triangle { rows: 6 });
    }

    #[test]
    fn test_missing_level_file_is_an_error() {
        let result = starting_level(None, Some(Path::new("/nonexistent/level.json")), Topology::Cross);
        assert!(result.is_err());
    }
}
