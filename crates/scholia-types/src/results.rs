use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::flashcard::Flashcard;

/// Placeholder used when a description could not be extracted
pub const PLACEHOLDER_DESCRIPTION: &str = "Unable to generate a description for this content.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CategoryResult {
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DescriptionResult {
    pub description: String,
    pub categories: Vec<String>,
}

impl DescriptionResult {
    pub fn placeholder(categories: Vec<String>) -> Self {
        Self {
            description: PLACEHOLDER_DESCRIPTION.to_string(),
            categories,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FlashcardSet {
    pub flashcards: Vec<Flashcard>,
    pub metadata: FlashcardMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FlashcardMetadata {
    pub request_id: Uuid,
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_key: Option<String>,
    /// Whether this request opened its conversation (system instruction sent)
    pub first_message: bool,
    pub requested_count: usize,
    pub card_count: usize,
    /// True when the cards come from a fallback (unparseable or empty output)
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work: Option<String>,
    pub generated_at: DateTime<Utc>,
}
