//! `recallchat init`: write a starter config file.

use std::path::Path;

use recallchat_config::AppConfig;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let path = super::config_path(config_path);

    println!("RecallChat Setup");
    println!("================\n");

    if path.exists() {
        println!("  Config already exists at: {}", path.display());
        println!("  Edit it manually or delete it and re-run init.");
        return Ok(());
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&path, AppConfig::default_toml())?;
    println!("  Created config at: {}", path.display());

    println!("\n  Next steps:");
    println!("    1. Set GOOGLE_API_KEY in your environment or a .env file");
    println!("    2. Run `recallchat serve` and open http://127.0.0.1:8000");

    Ok(())
}
