//! # Scholia
//!
//! Scholia sends structured prompts to Gemini and turns whatever comes back
//! into typed results:
//! - category labels filtered against a caller-supplied vocabulary
//! - paragraph descriptions of text or video
//! - study flashcards for generic and philosophy domains
//!
//! Malformed model output never fails a request. It degrades to a fallback
//! value (substring-matched categories, a placeholder description or a single
//! error card).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scholia::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = ScholiaBuilder::new()
//!         .api_key(std::env::var("GEMINI_API_KEY")?)
//!         .build()?;
//!
//!     let result = engine
//!         .identify_categories(CategoryRequest::new(
//!             "The new chip doubles neural engine throughput.",
//!             vec!["Technology".into(), "Science".into(), "Business".into()],
//!         ))
//!         .await?;
//!     println!("{:?}", result.categories);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **scholia-llm**: Gemini client, chat channels, provider traits
//! - **scholia-types**: requests, results, flashcards, engine limits
//! - **scholia-session**: conversation keys and the session cache
//! - **scholia-engine**: prompts, response parsing, domain policies, orchestration
//!
//! The HTTP server lives in the `scholia-api` crate.

pub use scholia_engine as engine;
pub use scholia_llm as llm;
pub use scholia_session as session;
pub use scholia_types as types;

pub use scholia_engine::{DomainPolicy, Engine, EngineError};
pub use scholia_llm::{GeminiClient, GeminiConfig, GenerativeModel};
pub use scholia_session::{ConversationKey, SessionStore};
pub use scholia_types::{
    CategoryRequest, CategoryResult, DescriptionRequest, DescriptionResult, EngineConfig,
    Flashcard, FlashcardRequest, FlashcardSet, VideoRequest,
};

/// High-level builder wiring a Gemini client into an engine
pub mod builder;

/// Convenient prelude with commonly used types
pub mod prelude {
    pub use crate::builder::ScholiaBuilder;
    pub use crate::engine::{DomainPolicy, Engine, EngineError};
    pub use crate::types::{
        CategoryRequest, DescriptionRequest, EngineConfig, FlashcardRequest, VideoRequest,
    };
    pub use anyhow::Result;
}
