pub mod config;
pub mod flashcard;
pub mod requests;
pub mod results;

pub use config::EngineConfig;
pub use flashcard::{Flashcard, ERROR_CARD_TYPE};
pub use requests::{CategoryRequest, DescriptionRequest, FlashcardRequest, VideoRequest};
pub use results::{
    CategoryResult, DescriptionResult, FlashcardMetadata, FlashcardSet, PLACEHOLDER_DESCRIPTION,
};
