//! Flashcard domain policies
//!
//! A domain is a plain value: prompt fragment, how its conversations are
//! keyed, which card types it accepts and how strictly cards are validated.

use scholia_session::ConversationKey;
use scholia_types::FlashcardRequest;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::parse::FlashcardRules;
use crate::prompt::{
    FLASHCARD_SYSTEM_INSTRUCTION, GENERIC_FRAGMENT, KANT_FRAGMENT, POLITICAL_PHILOSOPHY_FRAGMENT,
};

pub const PHILOSOPHY_CARD_TYPES: [&str; 4] = ["Concept", "Argument", "Context", "Contrast"];

/// How a domain derives the conversation key for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStrategy {
    /// Caller's `conversation_key`, or a fingerprint of instruction and metadata
    ExplicitOrFingerprint,
    /// `(domain, subject, work)`
    Subject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    Lenient,
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainPolicy {
    pub name: String,
    pub system_prompt_fragment: String,
    pub key: KeyStrategy,
    pub card_types: Option<Vec<String>>,
    pub strictness: Strictness,
    /// Drop conversations about the same subject's other works first
    pub evict_siblings: bool,
    /// Tag cards without tags as `[type, subject, work]`
    pub default_tags: bool,
    /// Subject used regardless of the request (single-thinker domains)
    #[serde(default)]
    pub fixed_subject: Option<String>,
}

impl DomainPolicy {
    pub fn generic() -> Self {
        Self {
            name: "generic".to_string(),
            system_prompt_fragment: GENERIC_FRAGMENT.to_string(),
            key: KeyStrategy::ExplicitOrFingerprint,
            card_types: None,
            strictness: Strictness::Lenient,
            evict_siblings: false,
            default_tags: false,
            fixed_subject: None,
        }
    }

    pub fn political_philosophy() -> Self {
        Self {
            name: "political_philosophy".to_string(),
            system_prompt_fragment: POLITICAL_PHILOSOPHY_FRAGMENT.to_string(),
            key: KeyStrategy::Subject,
            card_types: Some(PHILOSOPHY_CARD_TYPES.iter().map(|t| t.to_string()).collect()),
            strictness: Strictness::Strict,
            evict_siblings: true,
            default_tags: true,
            fixed_subject: None,
        }
    }

    pub fn kant() -> Self {
        Self {
            name: "kant".to_string(),
            system_prompt_fragment: KANT_FRAGMENT.to_string(),
            fixed_subject: Some("Immanuel Kant".to_string()),
            ..Self::political_philosophy()
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strictness == Strictness::Strict
    }

    /// Full instruction sent on the first message of a conversation
    pub fn system_instruction(&self) -> String {
        format!("{}\n\n{}", FLASHCARD_SYSTEM_INSTRUCTION, self.system_prompt_fragment)
    }

    /// Thinker the cards are about, if any
    pub fn subject_for(&self, request: &FlashcardRequest) -> Option<String> {
        self.fixed_subject
            .clone()
            .or_else(|| trimmed(request.thinker.as_deref()).map(str::to_string))
    }

    /// Card-type vocabulary: the domain's own, else the caller's
    pub fn card_types_for(&self, request: &FlashcardRequest) -> Option<Vec<String>> {
        self.card_types.clone().or_else(|| {
            request
                .card_types
                .clone()
                .filter(|types| types.iter().any(|t| !t.trim().is_empty()))
        })
    }

    /// Reject requests this domain cannot key or prompt for
    pub fn validate(&self, request: &FlashcardRequest) -> Result<()> {
        if self.key == KeyStrategy::Subject {
            if self.subject_for(request).is_none() {
                return Err(EngineError::validation(format!(
                    "{} flashcards require a thinker",
                    self.name
                )));
            }
            if trimmed(request.work.as_deref()).is_none() {
                return Err(EngineError::validation(format!(
                    "{} flashcards require a work",
                    self.name
                )));
            }
        }
        Ok(())
    }

    pub fn conversation_key(&self, request: &FlashcardRequest) -> Result<ConversationKey> {
        match self.key {
            KeyStrategy::ExplicitOrFingerprint => {
                if let Some(key) = trimmed(request.conversation_key.as_deref()) {
                    return Ok(ConversationKey::explicit(key));
                }
                let instruction = match trimmed(request.domain_instructions.as_deref()) {
                    Some(extra) => format!("{}\n\n{}", self.system_instruction(), extra),
                    None => self.system_instruction(),
                };
                Ok(ConversationKey::fingerprint(&instruction, &request.metadata))
            }
            KeyStrategy::Subject => {
                self.validate(request)?;
                let subject = self.subject_for(request).unwrap_or_default();
                let work = trimmed(request.work.as_deref()).unwrap_or_default();
                Ok(ConversationKey::subject(&self.name, subject, work))
            }
        }
    }

    pub fn rules(&self, request: &FlashcardRequest) -> FlashcardRules {
        let default_tags = if self.default_tags {
            let ids: Vec<String> = self
                .subject_for(request)
                .into_iter()
                .chain(trimmed(request.work.as_deref()).map(str::to_string))
                .collect();
            Some(ids)
        } else {
            None
        };

        FlashcardRules {
            strict: self.is_strict(),
            card_types: self.card_types_for(request),
            default_tags,
        }
    }
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
