//! LLM Provider implementations for RecallChat.
//!
//! All providers implement the `recallchat_core::Provider` trait.
//! The router selects the correct provider based on configuration.

pub mod gemini;
pub mod openai_compat;
pub mod router;

pub use gemini::GeminiProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use router::ProviderRouter;

use recallchat_core::error::ProviderError;

/// Overall request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Build the shared reqwest client for a provider.
fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_default()
}

/// Classify a transport-level reqwest failure.
fn map_send_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(e.to_string())
    } else {
        ProviderError::Network(e.to_string())
    }
}
