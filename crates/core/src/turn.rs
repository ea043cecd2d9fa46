//! Turn and Transcript value objects.
//!
//! A [`Turn`] is one user message paired with the bot's reply. A
//! [`Transcript`] is the ordered sequence of turns visible when a prompt is
//! assembled. Turns are only ever appended.

use serde::{Deserialize, Serialize};

/// One user-message / bot-reply pair.
///
/// The serialized shape (`{"user": .., "bot": ..}`) is also the on-disk
/// shape of the persisted history file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// What the user said
    pub user: String,

    /// What the bot answered
    pub bot: String,
}

impl Turn {
    pub fn new(user: impl Into<String>, bot: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            bot: bot.into(),
        }
    }

    /// Render this turn with role labels, newline-terminated.
    pub fn render(&self) -> String {
        format!("Human: {}\nAssistant: {}\n", self.user, self.bot)
    }
}

/// An ordered sequence of turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Append a turn at the end.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Append every turn from `turns`, keeping their order.
    pub fn extend<I: IntoIterator<Item = Turn>>(&mut self, turns: I) {
        self.turns.extend(turns);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Serialize the whole transcript as prompt text.
    ///
    /// Each turn becomes `Human: ..\nAssistant: ..\n`; turns are concatenated
    /// in order, so the same transcript always renders to the same string.
    pub fn render(&self) -> String {
        self.turns.iter().map(Turn::render).collect()
    }

    pub fn into_turns(self) -> Vec<Turn> {
        self.turns
    }
}

impl From<Vec<Turn>> for Transcript {
    fn from(turns: Vec<Turn>) -> Self {
        Self { turns }
    }
}

impl FromIterator<Turn> for Transcript {
    fn from_iter<I: IntoIterator<Item = Turn>>(iter: I) -> Self {
        Self {
            turns: iter.into_iter().collect(),
        }
    }
}
