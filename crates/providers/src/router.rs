//! Provider router: selects the correct LLM provider based on config.
//!
//! Handles provider creation and lookup by name.

use std::collections::HashMap;
use std::sync::Arc;
use recallchat_config::{AppConfig, ProviderConfig};
use recallchat_core::provider::Provider;
use crate::gemini::GeminiProvider;
use crate::openai_compat::OpenAiCompatProvider;

/// Routes LLM requests to the correct provider.
pub struct ProviderRouter {
    providers: HashMap<String, Arc<dyn Provider>>,
    default_provider: String,
}

impl ProviderRouter {
    /// Create a new router with a default provider.
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    /// Register a provider.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Get the default provider.
    pub fn default(&self) -> Option<Arc<dyn Provider>> {
        self.providers.get(&self.default_provider).cloned()
    }

    /// Get a specific provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    /// List all registered provider names.
    pub fn list(&self) -> Vec<&str> {
        self.providers.keys().map(|s| s.as_str()).collect()
    }
}

/// Build every configured provider.
///
/// The default provider is always registered, even without an API key:
/// a missing key only shows up as a failed invocation at request time.
pub fn build_from_config(config: &AppConfig) -> ProviderRouter {
    let mut router = ProviderRouter::new(&config.default_provider);

    for (name, provider_config) in &config.providers {
        router.register(name.clone(), provider_from_entry(config, name, Some(provider_config)));
    }

    if router.get(&config.default_provider).is_none() {
        router.register(config.default_provider.clone(), default_from_config(config));
    }

    router
}

/// Build only the default provider, using its `[providers.<name>]` entry
/// when one exists.
pub fn default_from_config(config: &AppConfig) -> Arc<dyn Provider> {
    let entry = config.providers.get(&config.default_provider);
    provider_from_entry(config, &config.default_provider, entry)
}

fn provider_from_entry(
    config: &AppConfig,
    name: &str,
    entry: Option<&ProviderConfig>,
) -> Arc<dyn Provider> {
    let api_key = entry
        .and_then(|p| p.api_key.clone())
        .or_else(|| config.api_key.clone())
        .unwrap_or_default();

    build_provider(
        name,
        entry.and_then(|p| p.api_url.as_deref()),
        &api_key,
        config.request_timeout_secs,
    )
}

fn build_provider(
    name: &str,
    api_url: Option<&str>,
    api_key: &str,
    timeout_secs: u64,
) -> Arc<dyn Provider> {
    if name == "gemini" {
        let mut p = GeminiProvider::new(api_key).with_timeout(timeout_secs);
        if let Some(url) = api_url {
            p = p.with_base_url(url);
        }
        Arc::new(p)
    } else {
        let base_url = api_url
            .map(str::to_string)
            .unwrap_or_else(|| default_base_url(name));
        Arc::new(OpenAiCompatProvider::new(name, base_url, api_key).with_timeout(timeout_secs))
    }
}

/// Get the default base URL for well-known OpenAI-compatible providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "gemini-openai" => "https://generativelanguage.googleapis.com/v1beta/openai".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn router_register_and_lookup() {
        let mut router = ProviderRouter::new("openrouter");
        let provider = Arc::new(OpenAiCompatProvider::openrouter("sk-test"));
        router.register("openrouter", provider);

        assert!(router.get("openrouter").is_some());
        assert!(router.get("nonexistent").is_none());
        assert!(router.default().is_some());
    }

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("openrouter").contains("openrouter.ai"));
        assert!(default_base_url("gemini-openai").contains("generativelanguage"));
        assert!(default_base_url("ollama").contains("localhost:11434"));
    }

    #[test]
    fn default_config_builds_gemini_without_key() {
        let router = build_from_config(&AppConfig::default());
        let provider = router.default().unwrap();
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn configured_providers_are_registered() {
        let mut config = AppConfig {
            default_provider: "ollama".into(),
            ..AppConfig::default()
        };
        config.providers.insert(
            "ollama".into(),
            ProviderConfig {
                api_key: Some("ollama".into()),
                api_url: Some("http://gpu-box:11434/v1".into()),
                default_model: None,
            },
        );
        let router = build_from_config(&config);
        assert_eq!(router.list().len(), 1);
        assert_eq!(router.default().unwrap().name(), "ollama");
    }

    #[test]
    fn default_from_config_matches_router_default() {
        let mut config = AppConfig {
            default_provider: "openai".into(),
            ..AppConfig::default()
        };
        config.providers.insert(
            "openai".into(),
            ProviderConfig {
                api_key: Some("sk-test".into()),
                api_url: Some("http://localhost:1234/v1".into()),
                default_model: None,
            },
        );
        config.providers.insert("ollama".into(), ProviderConfig::default());

        assert_eq!(default_from_config(&config).name(), "openai");
        let router = build_from_config(&config);
        assert_eq!(router.list().len(), 2);
        assert_eq!(router.default().unwrap().name(), "openai");
    }

    #[test]
    fn default_from_config_without_entry_is_gemini() {
        assert_eq!(default_from_config(&AppConfig::default()).name(), "gemini");
    }
}
