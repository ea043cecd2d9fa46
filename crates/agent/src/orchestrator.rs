//! The reply orchestrator: one user message in, one reply out.

use std::sync::Arc;
use recallchat_core::error::ProviderError;
use recallchat_core::provider::{CompletionRequest, Provider};
use recallchat_core::turn::Turn;
use tracing::{debug, error, info};

use crate::prompt::PromptFormatter;
use crate::session::ConversationSession;

/// What the caller sees whenever the model invocation fails, whatever the cause.
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong.";

/// Result of one exchange.
///
/// Both variants carry the text to hand back to the user; only `Fallback`
/// keeps the underlying failure, for logs and tests.
#[derive(Debug)]
pub enum ReplyOutcome {
    Replied { reply: String },
    Fallback { error: ProviderError },
}

impl ReplyOutcome {
    pub fn reply(&self) -> &str {
        match self {
            Self::Replied { reply } => reply,
            Self::Fallback { .. } => FALLBACK_REPLY,
        }
    }

    pub fn into_reply(self) -> String {
        match self {
            Self::Replied { reply } => reply,
            Self::Fallback { .. } => FALLBACK_REPLY.to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

pub struct ReplyOrchestrator {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Max tokens per response
    max_tokens: Option<u32>,

    formatter: PromptFormatter,
}

impl ReplyOrchestrator {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            formatter: PromptFormatter::default(),
        }
    }

    /// Set the max tokens per model response.
    pub fn with_max_tokens(mut self, max: Option<u32>) -> Self {
        self.max_tokens = max;
        self
    }

    /// Replace the prompt framing.
    pub fn with_formatter(mut self, formatter: PromptFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one exchange against `session`.
    ///
    /// On success the new turn is recorded in the buffer and appended to the
    /// store. On any model failure nothing is recorded and the outcome is
    /// [`ReplyOutcome::Fallback`].
    pub async fn handle(&self, session: &ConversationSession, user_input: &str) -> ReplyOutcome {
        let rendered = session.buffer().render().await;
        let prompt = self.formatter.format(&rendered, user_input);

        let request = CompletionRequest {
            model: self.model.clone(),
            prompt: prompt.into_string(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        match self.invoke(request).await {
            Ok(reply) => {
                session.commit(Turn::new(user_input, reply.clone())).await;
                let turns = session.buffer().len().await;
                info!(
                    provider = self.provider.name(),
                    reply_len = reply.len(),
                    turns,
                    "Exchange completed"
                );
                ReplyOutcome::Replied { reply }
            }
            Err(e) => {
                error!(
                    provider = self.provider.name(),
                    model = %self.model,
                    kind = e.kind(),
                    error = %e,
                    "Model invocation failed, returning fallback reply"
                );
                ReplyOutcome::Fallback { error: e }
            }
        }
    }

    /// Like [`handle`](Self::handle), returning only the text.
    pub async fn reply(&self, session: &ConversationSession, user_input: &str) -> String {
        self.handle(session, user_input).await.into_reply()
    }

    /// Call the provider and trim the reply. Blank text counts as malformed.
    async fn invoke(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        debug!(prompt_len = request.prompt.len(), "Invoking model");

        let completion = self.provider.complete(request).await?;
        let reply = completion.text.trim();

        if reply.is_empty() {
            return Err(ProviderError::MalformedResponse("empty completion text".into()));
        }

        Ok(reply.to_string())
    }
}
