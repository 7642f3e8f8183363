//! CLI configuration
//!
//! Level 4 - Utilities and configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sealo_core::solver::DEFAULT_NODE_BUDGET;
use sealo_core::Topology;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Settings shared by all subcommands, loadable from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SealoConfig {
    /// User record file
    pub records_path: PathBuf,
    /// Board used when no `--shape` or `--level` is given
    pub default_shape: Topology,
    /// Solver node budget for hints and `solve`
    pub solver_node_budget: u64,
    /// Games per `simulate` run when `--games` is omitted
    pub simulate_games: usize,
}

impl Default for SealoConfig {
    fn default() -> Self {
        Self {
            records_path: PathBuf::from("sealo-records.json"),
            default_shape: Topology::Cross,
            solver_node_budget: DEFAULT_NODE_BUDGET,
            simulate_games: 1000,
        }
    }
}

impl SealoConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: SealoConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("config file {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.default_shape
            .validate()
            .map_err(|e| ConfigError::Validation(format!("default_shape: {}", e)))?;
        if self.solver_node_budget == 0 {
            return Err(ConfigError::Validation(
                "solver_node_budget must be > 0".into(),
            ));
        }
        if self.simulate_games == 0 {
            return Err(ConfigError::Validation(
                "simulate_games must be > 0".into(),
            ));
        }
        if self.records_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "records_path must not be empty".into(),
            ));
        }
        Ok(())
    }
}
