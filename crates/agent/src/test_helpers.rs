//! Shared mock providers for orchestrator tests.

use recallchat_core::error::ProviderError;
use recallchat_core::provider::{Completion, CompletionRequest, Provider, Usage};
use std::sync::Mutex;

/// Returns scripted replies in sequence and keeps every request it saw.
///
/// Panics if more calls are made than replies provided.
pub struct RecordingProvider {
    replies: Vec<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl RecordingProvider {
    pub fn new(replies: Vec<&str>) -> Self {
        Self {
            replies: replies.into_iter().map(String::from).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.prompt).collect()
    }
}

#[async_trait::async_trait]
impl Provider for RecordingProvider {
    fn name(&self) -> &str {
        "recording_mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let index = requests.len();
        let Some(text) = self.replies.get(index) else {
            panic!(
                "RecordingProvider: no more replies (call #{}, have {})",
                index,
                self.replies.len()
            );
        };
        let model = request.model.clone();
        requests.push(request);

        Ok(Completion {
            text: text.clone(),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model,
        })
    }
}

/// Fails every call with the same error.
pub struct FailingProvider {
    error: ProviderError,
}

impl FailingProvider {
    pub fn new(error: ProviderError) -> Self {
        Self { error }
    }
}

#[async_trait::async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        "failing_mock"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<Completion, ProviderError> {
        Err(self.error.clone())
    }
}
