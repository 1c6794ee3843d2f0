use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Classify free text against a closed category vocabulary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CategoryRequest {
    pub content: String,
    pub categories: Vec<String>,
    /// Keep a multi-turn conversation with the model for repeated calls
    #[serde(default)]
    pub conversational: bool,
    /// Explicit conversation key; derived from instruction + metadata when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_key: Option<String>,
    /// Replaces the default classifier instruction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl CategoryRequest {
    pub fn new(content: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            content: content.into(),
            categories,
            ..Default::default()
        }
    }

    pub fn conversational(mut self) -> Self {
        self.conversational = true;
        self
    }

    pub fn with_conversation_key(mut self, key: impl Into<String>) -> Self {
        self.conversational = true;
        self.conversation_key = Some(key.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }
}

/// Describe and classify static data (free text, tables, listings)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DescriptionRequest {
    pub content: String,
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
}

impl DescriptionRequest {
    pub fn new(content: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            content: content.into(),
            categories,
            system_instruction: None,
        }
    }
}

/// Describe and classify a video the model fetches by URL
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct VideoRequest {
    pub video_url: String,
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
}

impl VideoRequest {
    pub fn new(video_url: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            video_url: video_url.into(),
            categories,
            system_instruction: None,
        }
    }
}

/// Generate flashcards from source material
///
/// `thinker` and `work` are required by the philosophy domains, where they
/// also identify the conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FlashcardRequest {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Closed vocabulary of card types (generic domain only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_key: Option<String>,
    /// Extra instructions appended to the domain context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_instructions: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl FlashcardRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_subject(mut self, thinker: impl Into<String>, work: impl Into<String>) -> Self {
        self.thinker = Some(thinker.into());
        self.work = Some(work.into());
        self
    }

    pub fn with_card_types(mut self, card_types: Vec<String>) -> Self {
        self.card_types = Some(card_types);
        self
    }

    pub fn with_conversation_key(mut self, key: impl Into<String>) -> Self {
        self.conversation_key = Some(key.into());
        self
    }

    pub fn with_domain_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.domain_instructions = Some(instructions.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
