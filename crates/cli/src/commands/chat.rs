//! `recallchat chat`: interactive or single-message chat in the terminal.

use std::io::Write;
use std::path::Path;

use recallchat_config::AppConfig;
use recallchat_gateway::AppState;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(
    config_path: Option<&Path>,
    message: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;

    if !config.has_api_key() {
        print_missing_key_help(config_path);
        return Err("No API key found. See above for setup instructions.".into());
    }

    let state = AppState::from_config(&config).await;

    if let Some(msg) = message {
        eprint!("  Thinking...");
        let reply = state.orchestrator.reply(&state.session, &msg).await;
        eprint!("\r              \r");
        println!("{reply}");
        return Ok(());
    }

    println!();
    println!("  RecallChat (interactive)");
    println!();
    println!("  Provider:  {}", state.orchestrator.provider_name());
    println!("  Model:     {}", state.orchestrator.model());
    println!("  History:   {} ({} turns in memory)", config.history.path.display(), state.session.buffer().len().await);
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "exit" | "quit") {
            break;
        }

        eprint!("  ...");
        let reply = state.orchestrator.reply(&state.session, input).await;
        eprint!("\r     \r");
        println!("  Bot > {reply}");
        println!();
    }

    println!("  Bye!");
    Ok(())
}

fn print_missing_key_help(config_path: Option<&Path>) {
    eprintln!();
    eprintln!("  ERROR: No API key configured!");
    eprintln!();
    eprintln!("  Set one of these environment variables (or put it in .env):");
    eprintln!("    GOOGLE_API_KEY=...        (Gemini)");
    eprintln!("    RECALLCHAT_API_KEY=...    (generic, highest priority)");
    eprintln!();
    eprintln!("  Or add api_key to your config file:");
    eprintln!("    {}", super::config_path(config_path).display());
    eprintln!();
    eprintln!("  Config directory: {}", AppConfig::config_dir().display());
    eprintln!();
}
