//! Tolerant parsing of model output into typed results
//!
//! Every parser returns a value. When the structured path fails the result
//! comes from a fallback branch and is flagged `degraded`.

use scholia_types::{DescriptionResult, Flashcard};
use serde_json::{Map, Value};

use crate::clean::clean_response;

#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome<T> {
    pub value: T,
    pub degraded: bool,
}

impl<T> ParseOutcome<T> {
    pub fn parsed(value: T) -> Self {
        Self {
            value,
            degraded: false,
        }
    }

    pub fn fallback(value: T) -> Self {
        Self {
            value,
            degraded: true,
        }
    }
}

/// Validation rules for one flashcard domain
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlashcardRules {
    /// Require `context_logic` and a type from `card_types`; an empty deck
    /// degrades to an error card
    pub strict: bool,
    pub card_types: Option<Vec<String>>,
    /// Ids appended after the card type when a card carries no tags
    pub default_tags: Option<Vec<String>>,
}

impl FlashcardRules {
    pub fn lenient() -> Self {
        Self::default()
    }

    pub fn strict(card_types: Vec<String>) -> Self {
        Self {
            strict: true,
            card_types: Some(card_types),
            default_tags: None,
        }
    }

    pub fn with_card_types(mut self, card_types: Vec<String>) -> Self {
        self.card_types = Some(card_types);
        self
    }

    pub fn with_default_tags(mut self, tags: Vec<String>) -> Self {
        self.default_tags = Some(tags);
        self
    }

    fn allows_type(&self, card_type: &str) -> bool {
        match &self.card_types {
            Some(types) => types.iter().any(|allowed| allowed.trim() == card_type),
            None => !self.strict,
        }
    }
}

// ============================================================================
// CATEGORIES
// ============================================================================

/// Categories from `{"categories": [...]}` or a bare array
pub fn parse_categories(raw: &str, vocabulary: &[String]) -> ParseOutcome<Vec<String>> {
    let cleaned = clean_response(raw);

    let items = match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Array(items)) => Some(items),
        Ok(Value::Object(mut object)) => match object.remove("categories") {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    };

    match items {
        Some(items) => ParseOutcome::parsed(filter_vocabulary(&items, vocabulary)),
        None => {
            tracing::warn!(
                response_chars = raw.len(),
                "Category response is not structured, falling back to substring match"
            );
            ParseOutcome::fallback(substring_matches(raw, vocabulary))
        }
    }
}

/// Description plus categories from `{"description": "...", "categories": [...]}`
pub fn parse_description(raw: &str, vocabulary: &[String]) -> ParseOutcome<DescriptionResult> {
    let cleaned = clean_response(raw);

    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(&cleaned) {
        if let (Some(Value::String(description)), Some(Value::Array(items))) =
            (object.get("description"), object.get("categories"))
        {
            return ParseOutcome::parsed(DescriptionResult {
                description: description.trim().to_string(),
                categories: filter_vocabulary(items, vocabulary),
            });
        }
    }

    tracing::warn!(
        response_chars = raw.len(),
        "Description response is not structured, using placeholder"
    );
    ParseOutcome::fallback(DescriptionResult::placeholder(substring_matches(
        raw, vocabulary,
    )))
}

/// Exact trimmed members of the vocabulary, first occurrence wins
fn filter_vocabulary(items: &[Value], vocabulary: &[String]) -> Vec<String> {
    let mut matched: Vec<String> = Vec::new();

    for item in items {
        let Some(candidate) = item.as_str().map(str::trim) else {
            continue;
        };
        let known = vocabulary.iter().any(|entry| entry.trim() == candidate);
        if known && !matched.iter().any(|existing| existing == candidate) {
            matched.push(candidate.to_string());
        }
    }

    matched
}

/// Vocabulary entries found anywhere in the raw text, ignoring case
fn substring_matches(raw: &str, vocabulary: &[String]) -> Vec<String> {
    let haystack = raw.to_lowercase();
    let mut matched: Vec<String> = Vec::new();

    for entry in vocabulary.iter().map(|entry| entry.trim()) {
        if entry.is_empty() || matched.iter().any(|existing| existing == entry) {
            continue;
        }
        if haystack.contains(&entry.to_lowercase()) {
            matched.push(entry.to_string());
        }
    }

    matched
}

// ============================================================================
// FLASHCARDS
// ============================================================================

/// Flashcards from `{"flashcards": [...]}`
pub fn parse_flashcards(raw: &str, rules: &FlashcardRules) -> ParseOutcome<Vec<Flashcard>> {
    let cleaned = clean_response(raw);

    let items = match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Object(mut object)) => match object.remove("flashcards") {
            Some(Value::Array(items)) => items,
            _ => {
                tracing::warn!("Flashcard response has no flashcards array");
                return ParseOutcome::fallback(vec![Flashcard::error(
                    "The model response did not contain a flashcards array.",
                )]);
            }
        },
        Ok(_) => {
            tracing::warn!("Flashcard response is not a JSON object");
            return ParseOutcome::fallback(vec![Flashcard::error(
                "The model response did not contain a flashcards array.",
            )]);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Flashcard response is not valid JSON");
            return ParseOutcome::fallback(vec![Flashcard::error(
                "The model response could not be read as JSON.",
            )]);
        }
    };

    let total = items.len();
    let cards: Vec<Flashcard> = items
        .iter()
        .filter_map(|item| item.as_object())
        .filter_map(|object| card_from_object(object, rules))
        .collect();

    if cards.len() < total {
        tracing::warn!(
            kept = cards.len(),
            dropped = total - cards.len(),
            "Dropped invalid flashcards"
        );
    }

    if cards.is_empty() && rules.strict {
        return ParseOutcome::fallback(vec![Flashcard::error(
            "The model response contained no valid flashcards.",
        )]);
    }

    ParseOutcome::parsed(cards)
}

fn card_from_object(object: &Map<String, Value>, rules: &FlashcardRules) -> Option<Flashcard> {
    let card_type = non_empty_str(object, "type")?;
    let front = non_empty_str(object, "front")?;
    let back = non_empty_str(object, "back")?;
    let context_logic = non_empty_str(object, "context_logic");

    if rules.strict && context_logic.is_none() {
        return None;
    }
    if (rules.strict || rules.card_types.is_some()) && !rules.allows_type(card_type) {
        return None;
    }

    let tags = match object.get("tags") {
        Some(Value::Array(values)) => Some(
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect::<Vec<_>>(),
        ),
        _ => rules.default_tags.as_ref().map(|ids| {
            std::iter::once(card_type.to_string())
                .chain(ids.iter().cloned())
                .collect()
        }),
    };

    Some(Flashcard {
        card_type: card_type.to_string(),
        front: front.to_string(),
        back: back.to_string(),
        context_logic: context_logic.map(str::to_string),
        tags,
    })
}

fn non_empty_str<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
