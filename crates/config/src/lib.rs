//! Configuration loading, validation, and management for RecallChat.
//!
//! Loads configuration from `~/.recallchat/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.recallchat/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Max tokens per model response (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_max_tokens: Option<u32>,

    /// Overall HTTP timeout for one model invocation
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Persisted history configuration
    #[serde(default)]
    pub history: HistoryConfig,

    /// Prompt template configuration
    #[serde(default)]
    pub prompt: PromptConfig,
}

fn default_provider() -> String {
    "gemini".into()
}
fn default_model() -> String {
    "gemini-2.5-pro".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_request_timeout_secs() -> u64 {
    120
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("providers", &self.providers)
            .field("gateway", &self.gateway)
            .field("history", &self.history)
            .field("prompt", &self.prompt)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    8000
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// History file; relative paths resolve against the working directory
    #[serde(default = "default_history_path")]
    pub path: PathBuf,
}

fn default_history_path() -> PathBuf {
    PathBuf::from("chat_history.json")
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_history_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Framing sentence placed above the rendered transcript
    #[serde(default = "default_system_prompt")]
    pub system: String,
}

fn default_system_prompt() -> String {
    "You are a helpful assistant.".into()
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system: default_system_prompt(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.recallchat/config.toml).
    ///
    /// Also checks environment variables for API keys:
    /// - `RECALLCHAT_API_KEY` (highest priority)
    /// - `GOOGLE_API_KEY`
    /// - `GEMINI_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        Self::load_with_env(&config_path)
    }

    /// Load from `path`, apply environment overrides, then validate.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_lookup(path, |key| std::env::var(key).ok())
    }

    /// [`load_with_env`](Self::load_with_env) with an injectable env lookup.
    fn load_with_lookup(
        path: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::read_file(path)?;
        config.apply_env(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`. Blank values are ignored.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if self.api_key.is_none() {
            self.api_key = var("RECALLCHAT_API_KEY")
                .or_else(|| var("GOOGLE_API_KEY"))
                .or_else(|| var("GEMINI_API_KEY"));
        }

        if let Some(provider) = var("RECALLCHAT_PROVIDER") {
            self.default_provider = provider;
        }

        if let Some(model) = var("RECALLCHAT_MODEL") {
            self.default_model = model;
        }

        if let Some(path) = var("RECALLCHAT_HISTORY_FILE") {
            self.history.path = PathBuf::from(path);
        }
    }

    /// Load configuration from a specific file path, without env overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse `path`, or return defaults when it does not exist. Not validated.
    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".recallchat")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be > 0".into(),
            ));
        }

        if self.history.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "history.path must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
            || self.providers.values().any(|p| p.api_key.is_some())
    }

    /// The model to request: the default provider's own `default_model`
    /// when set, otherwise the top-level `default_model`.
    pub fn effective_model(&self) -> &str {
        self.providers
            .get(&self.default_provider)
            .and_then(|p| p.default_model.as_deref())
            .unwrap_or(&self.default_model)
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: None,
            request_timeout_secs: default_request_timeout_secs(),
            providers: HashMap::new(),
            gateway: GatewayConfig::default(),
            history: HistoryConfig::default(),
            prompt: PromptConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.default_provider, "gemini");
        assert_eq!(config.default_model, "gemini-2.5-pro");
        assert_eq!(config.gateway.port, 8000);
        assert_eq!(config.history.path, PathBuf::from("chat_history.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.default_provider, config.default_provider);
        assert_eq!(parsed.gateway.port, config.gateway.port);
        assert_eq!(parsed.prompt.system, config.prompt.system);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            default_temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = AppConfig {
            request_timeout_secs: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().default_provider, "gemini");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            tmp,
            r#"
default_model = "gemini-2.5-flash"

[gateway]
port = 9001

[providers.openai]
api_url = "http://localhost:1234/v1"
"#
        )
        .unwrap();

        let config = AppConfig::load_from(tmp.path()).unwrap();
        assert_eq!(config.default_model, "gemini-2.5-flash");
        assert_eq!(config.gateway.port, 9001);
        assert_eq!(config.gateway.host, "127.0.0.1");
        assert_eq!(config.prompt.system, "You are a helpful assistant.");
        assert_eq!(
            config.providers["openai"].api_url.as_deref(),
            Some("http://localhost:1234/v1")
        );
    }

    #[test]
    fn unparsable_file_is_an_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "this is = = not toml").unwrap();
        let err = AppConfig::load_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn env_key_priority() {
        let mut config = AppConfig::default();
        config.apply_env(env_of(&[
            ("GOOGLE_API_KEY", "google"),
            ("RECALLCHAT_API_KEY", "own"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("own"));

        let mut config = AppConfig::default();
        config.apply_env(env_of(&[("GEMINI_API_KEY", "gem")]));
        assert_eq!(config.api_key.as_deref(), Some("gem"));
    }

    #[test]
    fn file_key_wins_over_env() {
        let mut config = AppConfig {
            api_key: Some("from-file".into()),
            ..AppConfig::default()
        };
        config.apply_env(env_of(&[("GOOGLE_API_KEY", "google")]));
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn blank_env_key_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_env(env_of(&[("GOOGLE_API_KEY", "  ")]));
        assert!(!config.has_api_key());
    }

    #[test]
    fn env_overrides_model_and_history() {
        let mut config = AppConfig::default();
        config.apply_env(env_of(&[
            ("RECALLCHAT_PROVIDER", "openai"),
            ("RECALLCHAT_MODEL", "gpt-4o-mini"),
            ("RECALLCHAT_HISTORY_FILE", "/tmp/other.json"),
        ]));
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.default_model, "gpt-4o-mini");
        assert_eq!(config.history.path, PathBuf::from("/tmp/other.json"));
    }

    #[test]
    fn blank_history_env_keeps_file_path() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "[history]\npath = \"mine.json\"").unwrap();

        let config = AppConfig::load_with_lookup(
            tmp.path(),
            env_of(&[("RECALLCHAT_HISTORY_FILE", ""), ("RECALLCHAT_MODEL", " ")]),
        )
        .unwrap();
        assert_eq!(config.history.path, PathBuf::from("mine.json"));
        assert_eq!(config.default_model, "gemini-2.5-pro");
    }

    #[test]
    fn validation_sees_env_overrides() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "[history]\npath = \"\"").unwrap();

        assert!(matches!(
            AppConfig::load_from(tmp.path()),
            Err(ConfigError::ValidationError(_))
        ));
        assert!(matches!(
            AppConfig::load_with_lookup(tmp.path(), env_of(&[("RECALLCHAT_HISTORY_FILE", "")])),
            Err(ConfigError::ValidationError(_))
        ));

        let config = AppConfig::load_with_lookup(
            tmp.path(),
            env_of(&[("RECALLCHAT_HISTORY_FILE", "from-env.json")]),
        )
        .unwrap();
        assert_eq!(config.history.path, PathBuf::from("from-env.json"));
    }

    #[test]
    fn provider_model_overrides_default_model() {
        let mut config = AppConfig::default();
        assert_eq!(config.effective_model(), "gemini-2.5-pro");

        config.providers.insert(
            "gemini".into(),
            ProviderConfig {
                default_model: Some("gemini-2.5-flash".into()),
                ..ProviderConfig::default()
            },
        );
        assert_eq!(config.effective_model(), "gemini-2.5-flash");
    }

    #[test]
    fn debug_redacts_keys() {
        let config = AppConfig {
            api_key: Some("super-secret".into()),
            ..AppConfig::default()
        };
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("gemini"));
        assert!(toml_str.contains("chat_history.json"));
    }
}
