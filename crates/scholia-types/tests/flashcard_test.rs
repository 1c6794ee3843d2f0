use scholia_types::{DescriptionResult, Flashcard, ERROR_CARD_TYPE, PLACEHOLDER_DESCRIPTION};

#[test]
fn test_flashcard_serializes_type_field() {
    let card = Flashcard::new("Concept", "What is the general will?", "The collective will aimed at the common good");
    let json = serde_json::to_value(&card).unwrap();

    assert_eq!(json["type"], "Concept");
    assert!(json.get("card_type").is_none());
    assert!(json.get("context_logic").is_none());
    assert!(json.get("tags").is_none());
}

#[test]
fn test_flashcard_deserializes_optional_fields() {
    let card: Flashcard = serde_json::from_str(
        r#"{"type": "Argument", "front": "f", "back": "b", "context_logic": "why", "tags": ["kant"]}"#,
    )
    .unwrap();

    assert_eq!(card.card_type, "Argument");
    assert_eq!(card.context_logic.as_deref(), Some("why"));
    assert_eq!(card.tags, Some(vec!["kant".to_string()]));
}

#[test]
fn test_error_card() {
    let card = Flashcard::error("The model returned an unreadable response.");
    assert!(card.is_error());
    assert_eq!(card.card_type, ERROR_CARD_TYPE);
    assert!(!card.front.trim().is_empty());
    assert!(!card.back.trim().is_empty());
}

#[test]
fn test_placeholder_description() {
    let result = DescriptionResult::placeholder(Vec::new());
    assert_eq!(result.description, PLACEHOLDER_DESCRIPTION);
    assert!(result.categories.is_empty());
}
