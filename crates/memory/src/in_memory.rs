//! In-memory history store: useful for testing and ephemeral sessions.

use async_trait::async_trait;
use recallchat_core::error::HistoryError;
use recallchat_core::history::HistoryStore;
use recallchat_core::turn::Turn;
use tokio::sync::RwLock;

/// A history store that keeps turns in a Vec and forgets them on exit.
#[derive(Default)]
pub struct InMemoryStore {
    turns: RwLock<Vec<Turn>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with turns already "persisted".
    pub fn with_turns(turns: Vec<Turn>) -> Self {
        Self {
            turns: RwLock::new(turns),
        }
    }
}

#[async_trait]
impl HistoryStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn try_load(&self) -> Result<Vec<Turn>, HistoryError> {
        Ok(self.turns.read().await.clone())
    }

    async fn append(&self, turn: Turn) -> Result<(), HistoryError> {
        self.turns.write().await.push(turn);
        Ok(())
    }
}
