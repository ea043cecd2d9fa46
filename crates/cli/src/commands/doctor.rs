//! `recallchat doctor`: diagnose configuration, providers and history file.

use std::path::Path;

use recallchat_core::error::ProviderError;
use recallchat_core::history::HistoryStore;
use recallchat_core::provider::Provider;
use recallchat_memory::JsonFileStore;
use recallchat_providers::router::build_from_config;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("RecallChat Doctor");
    println!("=================\n");

    let mut issues = 0;

    let path = super::config_path(config_path);
    if path.exists() {
        println!("  [ok]   Config file found: {}", path.display());
    } else {
        println!("  [info] No config file at {}, using defaults (`recallchat init` writes one)", path.display());
    }

    let config = match super::load_config(config_path) {
        Ok(config) => {
            println!("  [ok]   Config valid");
            config
        }
        Err(e) => {
            println!("  [fail] {e}");
            println!("\n  1 issue found. Fix the config file and run again.");
            return Ok(());
        }
    };

    println!("  [ok]   Provider: {}, model: {}", config.default_provider, config.effective_model());

    if config.has_api_key() {
        println!("  [ok]   API key configured");
    } else {
        println!("  [warn] No API key: set GOOGLE_API_KEY or add api_key to config.toml");
        issues += 1;
    }

    let router = build_from_config(&config);
    let mut names = router.list();
    names.sort_unstable();
    for name in names {
        let Some(provider) = router.get(name) else {
            continue;
        };
        let status = check_provider(provider.as_ref()).await;
        if !status.is_ok() {
            issues += 1;
        }
        println!("  {} Provider '{}': {}", status.tag(), name, status.describe());
    }

    let store = JsonFileStore::new(config.history.path.clone());
    if !store.path().exists() {
        println!("  [info] No history file yet at {} (created on first reply)", store.path().display());
    } else {
        match store.try_load().await {
            Ok(turns) => println!("  [ok]   History file readable: {} turn(s)", turns.len()),
            Err(e) => {
                println!("  [fail] {e}");
                println!("         The server starts with seed turns only and will not overwrite this file.");
                issues += 1;
            }
        }
    }

    println!();
    if issues == 0 {
        println!("  All checks passed!");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

/// Outcome of one provider health check.
#[derive(Debug)]
enum ProviderStatus {
    Reachable,
    /// The server answered, but not with success (bad key, wrong URL).
    Rejected,
    NotConfigured,
    Unreachable(ProviderError),
}

impl ProviderStatus {
    fn is_ok(&self) -> bool {
        matches!(self, Self::Reachable)
    }

    fn tag(&self) -> &'static str {
        match self {
            Self::Reachable => "[ok]  ",
            Self::NotConfigured => "[warn]",
            Self::Rejected | Self::Unreachable(_) => "[fail]",
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Reachable => "reachable".into(),
            Self::Rejected => "reachable, but the request was rejected (check key and api_url)".into(),
            Self::NotConfigured => "skipped, no API key".into(),
            Self::Unreachable(e) => format!("unreachable ({}: {e})", e.kind()),
        }
    }
}

async fn check_provider(provider: &dyn Provider) -> ProviderStatus {
    match provider.health_check().await {
        Ok(true) => ProviderStatus::Reachable,
        Ok(false) => ProviderStatus::Rejected,
        Err(ProviderError::NotConfigured(_)) => ProviderStatus::NotConfigured,
        Err(e) => ProviderStatus::Unreachable(e),
    }
}
