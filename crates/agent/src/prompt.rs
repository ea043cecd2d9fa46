//! Prompt assembly.
//!
//! One fixed template, shared by every request:
//!
//! ```text
//! {system}
//!
//! {rendered transcript}Human: {input}
//! Assistant:
//! ```
//!
//! The rendered transcript is already newline-terminated per turn.

use std::fmt;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// A fully assembled prompt for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fills the template. The framing sentence is fixed at construction.
#[derive(Debug, Clone)]
pub struct PromptFormatter {
    system: String,
}

impl PromptFormatter {
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
        }
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn format(&self, rendered_transcript: &str, new_user_input: &str) -> Prompt {
        Prompt(format!(
            "{}\n\n{}Human: {}\nAssistant:",
            self.system, rendered_transcript, new_user_input
        ))
    }
}

impl Default for PromptFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recallchat_core::turn::{Transcript, Turn};

    #[test]
    fn empty_transcript() {
        let prompt = PromptFormatter::default().format("", "Hello");
        assert_eq!(prompt.as_str(), "You are a helpful assistant.\n\nHuman: Hello\nAssistant:");
    }

    #[test]
    fn transcript_sits_between_framing_and_input() {
        let transcript: Transcript = vec![Turn::new("My name is Mizan.", "Nice to meet you, Mizan!")].into();
        let prompt = PromptFormatter::default().format(&transcript.render(), "What is my name?");

        assert_eq!(
            prompt.to_string(),
            "You are a helpful assistant.\n\n\
             Human: My name is Mizan.\nAssistant: Nice to meet you, Mizan!\n\
             Human: What is my name?\nAssistant:"
        );
    }

    #[test]
    fn custom_framing() {
        let formatter = PromptFormatter::new("Be terse.");
        assert!(formatter.format("", "x").as_str().starts_with("Be terse.\n\n"));
        assert_eq!(formatter.system(), "Be terse.");
    }
}
