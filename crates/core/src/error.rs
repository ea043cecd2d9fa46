//! Error types for the RecallChat domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own enum; callers at the edges box them.

use std::path::PathBuf;
use thiserror::Error;

/// Why a model invocation failed.
///
/// Every variant collapses to the same user-facing fallback reply; the
/// variant itself only travels to the logs.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Short, stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ApiError { .. } => "api_error",
            Self::RateLimited { .. } => "rate_limited",
            Self::AuthenticationFailed(_) => "authentication_failed",
            Self::NotConfigured(_) => "not_configured",
            Self::Timeout(_) => "timeout",
            Self::Network(_) => "network",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }
}

/// Failures reading or rewriting the persisted history file.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to read history file at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse history file at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Failed to write history file at {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("Failed to serialize history: {0}")]
    Serialize(String),
}
