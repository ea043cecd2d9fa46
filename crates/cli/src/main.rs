//! RecallChat CLI, the main entry point.
//!
//! Commands:
//! - `serve`    Start the HTTP chat server
//! - `chat`     Interactive or single-message chat in the terminal
//! - `history`  Print the persisted conversation
//! - `doctor`   Diagnose configuration and history file
//! - `init`     Write a starter config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "recallchat",
    about = "RecallChat: a conversational assistant that remembers",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of ~/.recallchat/config.toml
    #[arg(short, long, global = true, env = "RECALLCHAT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP chat server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,

        /// Override the bind address
        #[arg(long)]
        host: Option<String>,
    },

    /// Chat in the terminal
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Print the persisted conversation history
    History {
        /// Only show the most recent N turns
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Diagnose configuration and history file
    Doctor,

    /// Write a starter config file
    Init,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(config_path, port, host).await?,
        Commands::Chat { message } => commands::chat::run(config_path, message).await?,
        Commands::History { limit } => commands::history::run(config_path, limit).await?,
        Commands::Doctor => commands::doctor::run(config_path).await?,
        Commands::Init => commands::init::run(config_path).await?,
    }

    Ok(())
}
