//! # RecallChat Core
//!
//! Domain types, traits, and error definitions for RecallChat.
//! This crate has **no framework dependencies**: it defines the conversation
//! model that every other crate implements against.
//!
//! ## Layout
//!
//! - [`turn`]: the `Turn` / `Transcript` value objects
//! - [`provider`]: the `Provider` trait over text-completion backends
//! - [`history`]: the `HistoryStore` trait over persisted turns
//! - [`error`]: bounded-context error enums

pub mod error;
pub mod history;
pub mod provider;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use error::{HistoryError, ProviderError};
pub use history::HistoryStore;
pub use provider::{Completion, CompletionRequest, Provider, Usage};
pub use turn::{Transcript, Turn};
