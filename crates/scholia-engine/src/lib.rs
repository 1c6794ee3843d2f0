//! Scholia engine
//!
//! Turns domain requests into prompts, sends them to the model (single-shot
//! or through a cached conversation) and parses the free-text reply into
//! typed results. Malformed replies degrade to fallback values; only invalid
//! input, provider failures and timeouts are errors.

pub mod builder;
pub mod clean;
pub mod engine;
pub mod error;
pub mod parse;
pub mod policy;
pub mod prompt;

pub use builder::EngineBuilder;
pub use clean::clean_response;
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use parse::{parse_categories, parse_description, parse_flashcards, FlashcardRules, ParseOutcome};
pub use policy::{DomainPolicy, KeyStrategy, Strictness, PHILOSOPHY_CARD_TYPES};
