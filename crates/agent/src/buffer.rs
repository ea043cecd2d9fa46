//! The in-process conversation buffer.

use recallchat_core::history::HistoryStore;
use recallchat_core::turn::{Transcript, Turn};
use tokio::sync::RwLock;
use tracing::info;

/// Every turn visible to prompt assembly: seed, then persisted, then new.
///
/// The lock only makes individual reads and appends safe. It does not make
/// an exchange atomic: two exchanges running at once can both render the
/// same transcript before either records its turn.
pub struct ConversationBuffer {
    transcript: RwLock<Transcript>,
    seed_len: usize,
}

impl ConversationBuffer {
    /// Build the buffer from `seed` followed by everything in `store`.
    ///
    /// Store read failures leave only the seed (see [`HistoryStore::load`]).
    pub async fn initialize(seed: &[Turn], store: &dyn HistoryStore) -> Self {
        let mut transcript: Transcript = seed.to_vec().into();
        let persisted = store.load().await;
        let persisted_len = persisted.len();
        transcript.extend(persisted);

        info!(
            seed = seed.len(),
            persisted = persisted_len,
            store = store.name(),
            "Conversation buffer initialized"
        );

        Self {
            transcript: RwLock::new(transcript),
            seed_len: seed.len(),
        }
    }

    /// Snapshot of all turns so far.
    pub async fn current_transcript(&self) -> Transcript {
        self.transcript.read().await.clone()
    }

    /// Append a turn from a successful exchange.
    pub async fn record(&self, turn: Turn) {
        self.transcript.write().await.push(turn);
    }

    /// The transcript as prompt text.
    pub async fn render(&self) -> String {
        self.transcript.read().await.render()
    }

    pub async fn len(&self) -> usize {
        self.transcript.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.transcript.read().await.is_empty()
    }

    /// How many leading turns came from the seed.
    pub fn seed_len(&self) -> usize {
        self.seed_len
    }
}
