//! Conversation memory and reply orchestration for RecallChat.
//!
//! Each exchange follows the same steps:
//!
//! 1. **Render** the session transcript (seed + persisted + new turns)
//! 2. **Format** it with the new message into one prompt
//! 3. **Send** the prompt to the configured provider
//! 4. **On success**: record the turn in the buffer and append it to the store
//! 5. **On failure**: record nothing and answer with a fixed fallback

pub mod buffer;
pub mod orchestrator;
pub mod prompt;
pub mod seed;
pub mod session;

#[cfg(test)]
mod test_helpers;

pub use buffer::ConversationBuffer;
pub use orchestrator::{FALLBACK_REPLY, ReplyOrchestrator, ReplyOutcome};
pub use prompt::{DEFAULT_SYSTEM_PROMPT, Prompt, PromptFormatter};
pub use seed::{SEED_TURNS, seed_turns};
pub use session::ConversationSession;
