//! File-based history store: a single pretty-printed JSON array.
//!
//! The file holds `[{"user": .., "bot": ..}, ..]` and is rewritten in full
//! on every append (read, push, write). There is no rotation, size limit or
//! compaction.
//!
//! Appends from one process are serialized through `write_lock`, so two
//! concurrent requests cannot drop each other's turn. Two *processes*
//! sharing the same file still can: the rewrite is neither locked on disk
//! nor atomic.

use async_trait::async_trait;
use recallchat_core::error::HistoryError;
use recallchat_core::history::HistoryStore;
use recallchat_core::turn::Turn;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

/// A history store backed by one JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store at the given path. Nothing is read or written yet;
    /// the file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file. A missing file is an empty history.
    fn read_from_disk(&self) -> Result<Vec<Turn>, HistoryError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(HistoryError::Read {
                    path: self.path.clone(),
                    reason: e.to_string(),
                });
            }
        };

        // An empty file is treated like a missing one rather than a parse error.
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| HistoryError::Parse {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Rewrite the whole file from `turns`.
    fn write_to_disk(&self, turns: &[Turn]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| HistoryError::Write {
                    path: self.path.clone(),
                    reason: format!("Failed to create history directory: {e}"),
                })?;
            }
        }

        let content = serde_json::to_string_pretty(turns)
            .map_err(|e| HistoryError::Serialize(e.to_string()))?;

        std::fs::write(&self.path, content).map_err(|e| HistoryError::Write {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl HistoryStore for JsonFileStore {
    fn name(&self) -> &str {
        "json_file"
    }

    async fn try_load(&self) -> Result<Vec<Turn>, HistoryError> {
        let turns = self.read_from_disk()?;
        debug!(path = %self.path.display(), count = turns.len(), "History file loaded");
        Ok(turns)
    }

    async fn append(&self, turn: Turn) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock().await;

        // A corrupt file fails here, so it is never overwritten.
        let mut turns = self.read_from_disk()?;
        turns.push(turn);
        self.write_to_disk(&turns)?;

        debug!(path = %self.path.display(), count = turns.len(), "History file rewritten");
        Ok(())
    }
}
