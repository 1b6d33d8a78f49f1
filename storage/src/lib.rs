//! TapCoin Storage Layer - File-Based Ledger Snapshots
//!
//! The whole ledger lives in memory; a snapshot is written on an interval
//! and on shutdown, then reloaded on the next start:
//! - JSON copy for human-readable inspection
//! - Bincode copy for fast loading

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tapcoin_core::{Account, UserId};
use thiserror::Error;

/// Base file name of the ledger snapshot pair
pub const SNAPSHOT_NAME: &str = "ledger";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("snapshot not found: {0}")]
    SnapshotNotFound(String),
}

/// On-disk image of every account plus the instant it was taken
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub saved_at: DateTime<Utc>,
    pub accounts: BTreeMap<UserId, Account>,
}

impl LedgerSnapshot {
    pub fn new(saved_at: DateTime<Utc>, accounts: BTreeMap<UserId, Account>) -> Self {
        LedgerSnapshot { saved_at, accounts }
    }
}

/// File-based snapshot store rooted at one data directory
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    /// Open the storage directory, creating it if needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let data_dir = path.as_ref().to_path_buf();

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir)?;
        }

        Ok(Self { data_dir })
    }

    /// Save the snapshot as both JSON (readable backup) and Bincode (fast load)
    pub fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(self.json_path(), json)?;

        let bin = bincode::serialize(snapshot)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(self.bin_path(), bin)?;

        Ok(())
    }

    /// Load the snapshot (tries Bincode first, falls back to JSON)
    pub fn load(&self) -> Result<LedgerSnapshot, StorageError> {
        let bin_path = self.bin_path();
        if bin_path.exists() {
            let data = fs::read(&bin_path)?;
            return bincode::deserialize(&data)
                .map_err(|e| StorageError::Serialization(e.to_string()));
        }

        let json_path = self.json_path();
        if json_path.exists() {
            let data = fs::read_to_string(&json_path)?;
            return serde_json::from_str(&data)
                .map_err(|e| StorageError::Serialization(e.to_string()));
        }

        Err(StorageError::SnapshotNotFound(SNAPSHOT_NAME.to_string()))
    }

    /// Check whether any snapshot exists
    pub fn has_snapshot(&self) -> bool {
        self.bin_path().exists() || self.json_path().exists()
    }

    /// Get the storage directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn json_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", SNAPSHOT_NAME))
    }

    fn bin_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.bin", SNAPSHOT_NAME))
    }
}
