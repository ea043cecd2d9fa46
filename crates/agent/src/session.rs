//! The conversation session: the buffer plus the store it mirrors.
//!
//! All callers share one session. It is passed explicitly into the
//! orchestrator so a per-user session would only mean handing a different
//! `ConversationSession` to each caller.

use std::sync::Arc;
use recallchat_core::history::HistoryStore;
use recallchat_core::turn::{Transcript, Turn};
use tracing::warn;

use crate::buffer::ConversationBuffer;
use crate::seed::seed_turns;

pub struct ConversationSession {
    buffer: ConversationBuffer,
    store: Arc<dyn HistoryStore>,
}

impl ConversationSession {
    /// Start a session from the built-in seed and everything in `store`.
    pub async fn start(store: Arc<dyn HistoryStore>) -> Self {
        Self::start_with_seed(&seed_turns(), store).await
    }

    /// Start a session with an explicit seed.
    pub async fn start_with_seed(seed: &[Turn], store: Arc<dyn HistoryStore>) -> Self {
        let buffer = ConversationBuffer::initialize(seed, store.as_ref()).await;
        Self { buffer, store }
    }

    pub fn buffer(&self) -> &ConversationBuffer {
        &self.buffer
    }

    pub fn store(&self) -> &Arc<dyn HistoryStore> {
        &self.store
    }

    pub async fn current_transcript(&self) -> Transcript {
        self.buffer.current_transcript().await
    }

    /// Record a successful exchange: buffer first, then the store.
    ///
    /// A store failure is logged and otherwise ignored; the turn stays in the
    /// buffer, so memory and disk disagree until the process restarts.
    pub async fn commit(&self, turn: Turn) {
        self.buffer.record(turn.clone()).await;

        if let Err(e) = self.store.append(turn).await {
            warn!(store = self.store.name(), error = %e, "Failed to persist turn");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recallchat_memory::{InMemoryStore, JsonFileStore};
    use std::io::Write;

    #[tokio::test]
    async fn commit_updates_buffer_and_store() {
        let store = Arc::new(InMemoryStore::new());
        let session = ConversationSession::start(store.clone()).await;

        session.commit(Turn::new("Hello", "Hi there!")).await;

        assert_eq!(session.current_transcript().await.len(), 4);
        assert_eq!(store.load().await, vec![Turn::new("Hello", "Hi there!")]);
    }

    #[tokio::test]
    async fn store_failure_keeps_turn_in_buffer() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "not json").unwrap();
        let store = Arc::new(JsonFileStore::new(tmp.path()));

        let session = ConversationSession::start(store).await;
        assert_eq!(session.current_transcript().await.len(), 3);

        session.commit(Turn::new("q", "a")).await;
        assert_eq!(session.current_transcript().await.len(), 4);
        assert_eq!(std::fs::read_to_string(tmp.path()).unwrap(), "not json");
    }
}
