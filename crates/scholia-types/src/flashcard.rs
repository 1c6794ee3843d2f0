use serde::{Deserialize, Serialize};

/// Card type used for the synthetic card returned when generation fails
pub const ERROR_CARD_TYPE: &str = "Error";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Flashcard {
    #[serde(rename = "type")]
    pub card_type: String,
    pub front: String,
    pub back: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_logic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Flashcard {
    pub fn new(
        card_type: impl Into<String>,
        front: impl Into<String>,
        back: impl Into<String>,
    ) -> Self {
        Self {
            card_type: card_type.into(),
            front: front.into(),
            back: back.into(),
            context_logic: None,
            tags: None,
        }
    }

    pub fn with_context_logic(mut self, context_logic: impl Into<String>) -> Self {
        self.context_logic = Some(context_logic.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Synthetic card carrying a human-readable explanation of a failure
    pub fn error(explanation: impl Into<String>) -> Self {
        Self::new(
            ERROR_CARD_TYPE,
            "Flashcards could not be generated",
            explanation,
        )
        .with_tags(vec!["error".to_string()])
    }

    pub fn is_error(&self) -> bool {
        self.card_type == ERROR_CARD_TYPE
    }
}
