//! `recallchat serve`: start the HTTP chat server.

use std::path::Path;

pub async fn run(
    config_path: Option<&Path>,
    port_override: Option<u16>,
    host_override: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }
    if let Some(host) = host_override {
        config.gateway.host = host;
    }

    println!("RecallChat");
    println!("   Listening: http://{}:{}", config.gateway.host, config.gateway.port);
    println!("   Model:     {} ({})", config.effective_model(), config.default_provider);
    println!("   History:   {}", config.history.path.display());

    if !config.has_api_key() {
        tracing::warn!("No API key configured, every reply will be the fallback message");
    }

    recallchat_gateway::start(config).await?;

    Ok(())
}
