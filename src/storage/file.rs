use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Storage;

/// On-disk envelope for a stored value. The timestamp is diagnostic only;
/// values never expire on their own.
#[derive(Debug, Serialize, Deserialize)]
struct StoredValue {
    value: String,
    saved_at: DateTime<Utc>,
}

/// Durable key-value store, one JSON file per key.
///
/// Values survive restarts; this is where the bearer token and the
/// persistent user profile copy live.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create storage directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn read_entry(path: &Path) -> Result<StoredValue> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read storage file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse storage file {}", path.display()))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key);
        if !path.exists() {
            return None;
        }
        match Self::read_entry(&path) {
            Ok(stored) => Some(stored.value),
            Err(e) => {
                // A corrupt entry reads as absent rather than failing the caller.
                debug!(key, error = %e, "Discarding unreadable storage entry");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let stored = StoredValue {
            value: value.to_string(),
            saved_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&stored)?;
        let path = self.entry_path(key);
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write storage file {}", path.display()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove storage file {}", path.display()))?;
        }
        Ok(())
    }
}
