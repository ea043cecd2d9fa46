//! Built-in seed turns.
//!
//! These establish what the assistant "knows" about the user before any
//! real exchange. They are prepended to the transcript on every start and
//! never written to the history store.

use recallchat_core::turn::Turn;

/// The fixed seed, in transcript order.
pub const SEED_TURNS: [(&str, &str); 3] = [
    ("My name is Mizan.", "Nice to meet you, Mizan!"),
    (
        "My favorite sport is football.",
        "That's great! Football is an exciting game.",
    ),
    (
        "I support Argentina.",
        "Argentina has a fantastic football team!",
    ),
];

/// The seed as owned turns.
pub fn seed_turns() -> Vec<Turn> {
    SEED_TURNS
        .iter()
        .map(|(user, bot)| Turn::new(*user, *bot))
        .collect()
}
