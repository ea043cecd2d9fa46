//! Subcommand implementations.

pub mod chat;
pub mod doctor;
pub mod history;
pub mod init;
pub mod serve;

use std::path::{Path, PathBuf};

use recallchat_config::AppConfig;

/// The config file a command should read: `--config` or the default location.
pub fn config_path(override_path: Option<&Path>) -> PathBuf {
    override_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"))
}

/// Load config from the chosen path with environment overrides applied.
pub fn load_config(override_path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let path = config_path(override_path);
    AppConfig::load_with_env(&path).map_err(|e| format!("Failed to load config: {e}").into())
}
