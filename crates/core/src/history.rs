//! HistoryStore trait: persisted conversation turns.
//!
//! The store holds only turns produced by real exchanges; seed turns never
//! reach it. Implementations: JSON file, in-memory (for tests).

use async_trait::async_trait;
use crate::error::HistoryError;
use crate::turn::Turn;

/// The core HistoryStore trait.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// The backend name (e.g., "json_file", "in_memory").
    fn name(&self) -> &str;

    /// Read every persisted turn, in the order they were appended.
    ///
    /// A store that does not exist yet is empty, not an error.
    async fn try_load(&self) -> std::result::Result<Vec<Turn>, HistoryError>;

    /// Persist one more turn after all existing ones.
    async fn append(&self, turn: Turn) -> std::result::Result<(), HistoryError>;

    /// Infallible load: read failures are logged and treated as no history.
    async fn load(&self) -> Vec<Turn> {
        match self.try_load().await {
            Ok(turns) => turns,
            Err(e) => {
                tracing::warn!(store = self.name(), error = %e, "History unreadable, starting empty");
                Vec::new()
            }
        }
    }
}
