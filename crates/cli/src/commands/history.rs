//! `recallchat history`: print the persisted conversation.

use std::path::Path;

use recallchat_core::history::HistoryStore;
use recallchat_core::turn::Turn;
use recallchat_memory::JsonFileStore;

pub async fn run(
    config_path: Option<&Path>,
    limit: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let store = JsonFileStore::new(config.history.path.clone());

    let turns = store.try_load().await?;
    if turns.is_empty() {
        println!("No conversation history at {}", store.path().display());
        return Ok(());
    }

    let shown = tail(&turns, limit);
    println!(
        "{} of {} turn(s) from {}\n",
        shown.len(),
        turns.len(),
        store.path().display()
    );
    for turn in shown {
        println!("  You > {}", turn.user);
        println!("  Bot > {}", turn.bot);
        println!();
    }

    Ok(())
}

/// The last `limit` turns, or all of them.
fn tail(turns: &[Turn], limit: Option<usize>) -> &[Turn] {
    match limit {
        Some(n) if n < turns.len() => &turns[turns.len() - n..],
        _ => turns,
    }
}
