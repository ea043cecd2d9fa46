//! HTTP gateway for RecallChat.
//!
//! Serves the chat page, the `POST /chat` form endpoint, a read-only view
//! of the transcript, and a health check.
//!
//! Built on Axum for high performance async HTTP.

pub mod frontend;

use axum::extract::DefaultBodyLimit;
use axum::{
    Form, Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use recallchat_agent::{ConversationSession, PromptFormatter, ReplyOrchestrator};
use recallchat_config::AppConfig;
use recallchat_core::history::HistoryStore;
use recallchat_core::turn::Transcript;
use recallchat_memory::JsonFileStore;

/// Shared application state: one session, one orchestrator.
pub struct AppState {
    pub session: Arc<ConversationSession>,
    pub orchestrator: Arc<ReplyOrchestrator>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(session: Arc<ConversationSession>, orchestrator: Arc<ReplyOrchestrator>) -> Self {
        Self {
            session,
            orchestrator,
        }
    }

    /// Build provider, history store, session and orchestrator from config.
    ///
    /// Never fails: a missing API key or unreadable history file only shows
    /// up later, as a fallback reply or an empty history.
    pub async fn from_config(config: &AppConfig) -> Self {
        let store: Arc<dyn HistoryStore> = Arc::new(JsonFileStore::new(config.history.path.clone()));
        Self::from_config_with_store(config, store).await
    }

    /// Same as [`from_config`](Self::from_config) with an explicit store.
    pub async fn from_config_with_store(config: &AppConfig, store: Arc<dyn HistoryStore>) -> Self {
        let provider = recallchat_providers::router::default_from_config(config);

        let orchestrator = ReplyOrchestrator::new(
            provider,
            config.effective_model(),
            config.default_temperature,
        )
        .with_max_tokens(config.default_max_tokens)
        .with_formatter(PromptFormatter::new(config.prompt.system.clone()));

        let session = ConversationSession::start(store).await;

        Self::new(Arc::new(session), Arc::new(orchestrator))
    }
}

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .route("/history", get(history_handler))
        .with_state(state)
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB body limit
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let state = Arc::new(AppState::from_config(&config).await);
    info!(
        provider = state.orchestrator.provider_name(),
        model = state.orchestrator.model(),
        history = %config.history.path.display(),
        "Conversation session ready"
    );

    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

// --- Handlers ---

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub turns: usize,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        turns: state.session.buffer().len().await,
    })
}

#[derive(Deserialize)]
pub struct ChatForm {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub user: String,
    pub bot: String,
}

/// Always 200: model failures come back as the fallback text in `bot`.
async fn chat_handler(
    State(state): State<SharedState>,
    Form(form): Form<ChatForm>,
) -> Json<ChatResponse> {
    info!(message_len = form.message.len(), "Chat message received");

    let bot = state
        .orchestrator
        .reply(&state.session, &form.message)
        .await;

    Json(ChatResponse {
        user: form.message,
        bot,
    })
}

async fn history_handler(State(state): State<SharedState>) -> Json<Transcript> {
    Json(state.session.current_transcript().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use recallchat_core::error::ProviderError;
    use recallchat_core::provider::{Completion, CompletionRequest, Provider};
    use recallchat_memory::InMemoryStore;
    use tower::ServiceExt;

    struct FixedProvider(Result<&'static str, ProviderError>);

    #[async_trait::async_trait]
    impl Provider for FixedProvider {
        fn name(&self) -> &str {
            "fixed_mock"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError> {
            self.0.clone().map(|text| Completion {
                text: text.into(),
                usage: None,
                model: request.model,
            })
        }
    }

    async fn test_state(provider: FixedProvider) -> (SharedState, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let session = ConversationSession::start(store.clone()).await;
        let orchestrator = ReplyOrchestrator::new(Arc::new(provider), "mock-model", 0.7);
        (
            Arc::new(AppState::new(Arc::new(session), Arc::new(orchestrator))),
            store,
        )
    }

    fn chat_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (state, _) = test_state(FixedProvider(Ok("unused"))).await;
        let app = build_router(state);

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let health: HealthResponse = json_body(response).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.turns, 3);
    }

    #[tokio::test]
    async fn chat_echoes_user_and_returns_reply() {
        let (state, store) = test_state(FixedProvider(Ok("Hi there!"))).await;
        let app = build_router(state);

        let response = app.oneshot(chat_request("message=Hello")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = json_body(response).await;
        assert_eq!(body, serde_json::json!({"user": "Hello", "bot": "Hi there!"}));
        assert_eq!(store.load().await.len(), 1);
    }

    #[tokio::test]
    async fn chat_decodes_form_encoding() {
        let (state, _) = test_state(FixedProvider(Ok("ok"))).await;
        let app = build_router(state);

        let response = app
            .oneshot(chat_request("message=Who+won%3F+%C2%BFQui%C3%A9n%3F"))
            .await
            .unwrap();
        let body: ChatResponse = json_body(response).await;
        assert_eq!(body.user, "Who won? ¿Quién?");
    }

    #[tokio::test]
    async fn model_failure_is_still_200_with_fallback() {
        let (state, store) =
            test_state(FixedProvider(Err(ProviderError::Timeout("120s".into())))).await;
        let app = build_router(state.clone());

        let response = app.oneshot(chat_request("message=Hello")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: ChatResponse = json_body(response).await;
        assert_eq!(body.bot, recallchat_agent::FALLBACK_REPLY);
        assert!(store.load().await.is_empty());
        assert_eq!(state.session.buffer().len().await, 3);
    }

    #[tokio::test]
    async fn missing_message_field_is_rejected() {
        let (state, _) = test_state(FixedProvider(Ok("unused"))).await;
        let app = build_router(state);

        let response = app.oneshot(chat_request("text=Hello")).await.unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn history_lists_transcript() {
        let (state, _) = test_state(FixedProvider(Ok("Hi there!"))).await;
        let app = build_router(state);

        app.clone().oneshot(chat_request("message=Hello")).await.unwrap();

        let req = Request::builder()
            .uri("/history")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        let turns: Vec<serde_json::Value> = json_body(response).await;
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0]["user"], "My name is Mizan.");
        assert_eq!(turns[3], serde_json::json!({"user": "Hello", "bot": "Hi there!"}));
    }

    #[tokio::test]
    async fn from_config_without_key_still_starts() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.history.path = dir.path().join("chat_history.json");

        let state = AppState::from_config(&config).await;
        assert_eq!(state.orchestrator.provider_name(), "gemini");
        assert_eq!(state.session.buffer().len().await, 3);

        // No key: the exchange fails at request time and nothing is persisted.
        let outcome = state.orchestrator.handle(&state.session, "Hello").await;
        assert!(outcome.is_fallback());
        assert!(!config.history.path.exists());
    }
}
