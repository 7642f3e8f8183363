//! Persistent user record
//!
//! The store is passed explicitly to whatever needs it; nothing holds a
//! global handle. Changes are buffered in memory until `commit`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sealo_core::Topology;

/// Coins granted to a fresh record
pub const STARTING_BALANCE: i64 = 500;

/// Errors that can occur while loading or committing the record.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("failed to access record file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse record file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Everything persisted about the player
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    pub balance: i64,
    pub daily_streak: u32,
    pub last_daily_prize: Option<NaiveDate>,
    /// Board picked last time in `play`
    pub preferred_shape: Option<Topology>,
    /// Best completion time per topology key; a missing entry means unset
    pub best_times: BTreeMap<String, Duration>,
}

impl Default for UserRecord {
    fn default() -> Self {
        Self {
            balance: STARTING_BALANCE,
            daily_streak: 0,
            last_daily_prize: None,
            preferred_shape: None,
            best_times: BTreeMap::new(),
        }
    }
}

/// Key/value access to the user record
pub trait RecordStore {
    fn record(&self) -> &UserRecord;

    fn record_mut(&mut self) -> &mut UserRecord;

    /// Persist buffered changes
    fn commit(&mut self) -> Result<(), RecordError>;

    fn best_time(&self, topology: Topology) -> Option<Duration> {
        self.record().best_times.get(&topology.key()).copied()
    }

    fn set_best_time(&mut self, topology: Topology, time: Duration) {
        self.record_mut().best_times.insert(topology.key(), time);
    }
}

// ============================================================================
// JSON FILE STORE
// ============================================================================

/// Record kept in a JSON file
#[derive(Debug)]
pub struct JsonRecordStore {
    path: PathBuf,
    record: UserRecord,
}

impl JsonRecordStore {
    /// Open the record at `path`, starting a fresh one if the file is missing
    pub fn open(path: &Path) -> Result<Self, RecordError> {
        let record = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| RecordError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_str(&content).map_err(|source| RecordError::Json {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            tracing::info!("No record at {}, starting a new one", path.display());
            UserRecord::default()
        };

        Ok(Self {
            path: path.to_path_buf(),
            record,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for JsonRecordStore {
    fn record(&self) -> &UserRecord {
        &self.record
    }

    fn record_mut(&mut self) -> &mut UserRecord {
        &mut self.record
    }

    fn commit(&mut self) -> Result<(), RecordError> {
        let io_err = |source: std::io::Error| RecordError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = serde_json::to_string_pretty(&self.record).map_err(|source| RecordError::Json {
            path: self.path.clone(),
            source,
        })?;

        // write a sibling file, then swap it in
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;

        tracing::debug!("Committed record to {}", self.path.display());
        Ok(())
    }
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// Record that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    record: UserRecord,
    pub commits: usize,
}

impl MemoryRecordStore {
    pub fn new(record: UserRecord) -> Self {
        Self { record, commits: 0 }
    }
}

impl RecordStore for MemoryRecordStore {
    fn record(&self) -> &UserRecord {
        &self.record
    }

    fn record_mut(&mut self) -> &mut UserRecord {
        &mut self.record
    }

    fn commit(&mut self) -> Result<(), RecordError> {
        self.commits += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let record = UserRecord::default();
        assert_eq!(record.balance, 500);
        assert_eq!(record.daily_streak, 0);
        assert!(record.best_times.is_empty());
    }

    #[test]
    fn test_best_time_is_unset_until_written() {
        let mut store = MemoryRecordStore::default();
        assert_eq!(store.best_time(Topology::Cross), None);

        store.set_best_time(Topology::Cross, Duration::from_millis(42_500));
        assert_eq!(store.best_time(Topology::Cross), Some(Duration::from_millis(42_500)));
        assert_eq!(store.best_time(Topology::triangle()), None);
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("records.json");

        let mut store = JsonRecordStore::open(&path).unwrap();
        assert_eq!(store.record(), &UserRecord::default());
        store.set_best_time(Topology::triangle(), Duration::from_secs(75));
        store.record_mut().balance = 620;
        store.commit().unwrap();

        let reopened = JsonRecordStore::open(&path).unwrap();
        assert_eq!(reopened.record().balance, 620);
        assert_eq!(reopened.best_time(Topology::triangle()), Some(Duration::from_secs(75)));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_uncommitted_changes_are_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let mut store = JsonRecordStore::open(&path).unwrap();
        store.record_mut().balance = 1;
        drop(store);

        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let err = JsonRecordStore::open(&path).unwrap_err();
        assert!(matches!(err, RecordError::Json { .. }));
    }
}
