use scholia_engine::prompt::{CATEGORY_SYSTEM_INSTRUCTION, FLASHCARD_SYSTEM_INSTRUCTION};
use scholia_engine::{DomainPolicy, Engine, EngineError};
use scholia_llm::testing::ScriptedModel;
use scholia_llm::Attachment;
use scholia_session::ConversationKey;
use scholia_types::{
    CategoryRequest, DescriptionRequest, EngineConfig, FlashcardRequest, VideoRequest,
    PLACEHOLDER_DESCRIPTION,
};
use std::sync::Arc;
use std::time::Duration;

const TECH_PARAGRAPH: &str = "The new chip uses a 3nm process and doubles neural engine throughput.";

const CARDS: &str = r#"```json
{"flashcards": [
  {"type": "Concept", "front": "What is the general will?", "back": "The collective will aimed at the common good.", "context_logic": "Book II"},
  {"type": "Argument", "front": "Why is sovereignty inalienable?", "back": "Because the will cannot be represented.", "context_logic": "Book II, ch. 1"}
]}
```"#;

fn vocab(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn engine_with(model: &ScriptedModel, config: EngineConfig) -> Engine {
    Engine::builder()
        .model(Arc::new(model.clone()))
        .config(config)
        .build()
        .unwrap()
}

fn engine(model: &ScriptedModel) -> Engine {
    engine_with(model, EngineConfig::default())
}

fn rousseau(work: &str) -> FlashcardRequest {
    FlashcardRequest::new("Man is born free, and everywhere he is in chains.")
        .with_subject("Rousseau", work)
        .with_count(2)
}

#[tokio::test]
async fn test_categories_subset_of_vocabulary() {
    let model = ScriptedModel::new()
        .reply("```json\n{\"categories\": [\"Technology\", \"Science\", \"Gadgets\", \"Business\", \"Technology\"]}\n```");
    let engine = engine(&model);

    let result = engine
        .identify_categories(CategoryRequest::new(
            TECH_PARAGRAPH,
            vocab(&["Technology", "Science", "Business"]),
        ))
        .await
        .unwrap();

    assert_eq!(result.categories, vocab(&["Technology", "Science", "Business"]));
    assert_eq!(model.generate_calls(), 1);
    assert_eq!(model.channels_created(), 0);
    assert!(model.prompts()[0].starts_with(CATEGORY_SYSTEM_INSTRUCTION));
}

#[tokio::test]
async fn test_categories_capped_at_max() {
    let model = ScriptedModel::new().reply(r#"["A", "B", "C", "D"]"#);
    let engine = engine_with(&model, EngineConfig::new().with_max_categories(2));

    let result = engine
        .identify_categories(CategoryRequest::new(TECH_PARAGRAPH, vocab(&["A", "B", "C", "D"])))
        .await
        .unwrap();

    assert_eq!(result.categories, vocab(&["A", "B"]));
}

#[tokio::test]
async fn test_empty_vocabulary_is_rejected_before_model_call() {
    let model = ScriptedModel::new().always("{}");
    let engine = engine(&model);

    for categories in [vec![], vocab(&["", "  "])] {
        let error = engine
            .identify_categories(CategoryRequest::new(TECH_PARAGRAPH, categories))
            .await
            .unwrap_err();
        assert!(matches!(error, EngineError::Validation(_)));
    }

    assert_eq!(model.generate_calls(), 0);
    assert_eq!(model.sends(), 0);
}

#[tokio::test]
async fn test_conversational_categories_send_instruction_once() {
    let model = ScriptedModel::new().always(r#"{"categories": ["Science"]}"#);
    let engine = engine(&model);
    let request = CategoryRequest::new(TECH_PARAGRAPH, vocab(&["Science"]))
        .conversational()
        .with_metadata("user", "42");

    engine.identify_categories(request.clone()).await.unwrap();
    engine.identify_categories(request).await.unwrap();

    let prompts = model.prompts();
    assert_eq!(model.channels_created(), 1);
    assert_eq!(model.sends(), 2);
    assert!(prompts[0].starts_with(CATEGORY_SYSTEM_INSTRUCTION));
    assert!(!prompts[1].contains(CATEGORY_SYSTEM_INSTRUCTION));

    let key = ConversationKey::fingerprint(CATEGORY_SYSTEM_INSTRUCTION, [("user", "42")]);
    assert_eq!(engine.sessions().history(&key).await.len(), 4);
}

#[tokio::test]
async fn test_description_and_placeholder() {
    let model = ScriptedModel::new()
        .reply(r#"{"description": "A report on sleep and health.", "categories": ["Health", "Sport"]}"#)
        .reply("I'm sorry, this looks like Finance to me.");
    let engine = engine(&model);
    let request = DescriptionRequest::new(
        "Adults who sleep less than six hours report more illness.",
        vocab(&["Health", "Finance"]),
    );

    let parsed = engine.analyze_static_data(request.clone()).await.unwrap();
    assert_eq!(parsed.description, "A report on sleep and health.");
    assert_eq!(parsed.categories, vocab(&["Health"]));

    let fallback = engine.analyze_static_data(request).await.unwrap();
    assert_eq!(fallback.description, PLACEHOLDER_DESCRIPTION);
    assert_eq!(fallback.categories, vocab(&["Finance"]));
}

#[tokio::test]
async fn test_video_is_sent_as_attachment() {
    let model = ScriptedModel::new()
        .reply(r#"{"description": "A lecture on jazz harmony.", "categories": ["Music"]}"#);
    let engine = engine(&model);

    let result = engine
        .analyze_video(VideoRequest::new(
            "https://www.youtube.com/watch?v=abc123",
            vocab(&["Music", "Sports"]),
        ))
        .await
        .unwrap();

    assert_eq!(result.categories, vocab(&["Music"]));
    assert_eq!(
        model.attachments(),
        vec![Some(Attachment::video("https://www.youtube.com/watch?v=abc123"))]
    );
}

#[tokio::test]
async fn test_same_subject_reuses_one_conversation() {
    let model = ScriptedModel::new().always(CARDS);
    let engine = engine(&model);
    let policy = DomainPolicy::political_philosophy();

    let first = engine
        .generate_flashcards(&policy, rousseau("The Social Contract"))
        .await
        .unwrap();
    let second = engine
        .generate_flashcards(&policy, rousseau("The Social Contract"))
        .await
        .unwrap();

    assert_eq!(model.channels_created(), 1);
    assert_eq!(model.sends(), 2);
    assert!(first.metadata.first_message);
    assert!(!second.metadata.first_message);
    assert_eq!(first.flashcards.len(), 2);
    assert_eq!(
        first.flashcards[0].tags,
        Some(vocab(&["Concept", "Rousseau", "The Social Contract"]))
    );
    assert_eq!(
        first.metadata.conversation_key.as_deref(),
        Some("political_philosophy:Rousseau::The Social Contract")
    );

    let prompts = model.prompts();
    assert!(prompts[0].starts_with(FLASHCARD_SYSTEM_INSTRUCTION));
    assert!(!prompts[1].contains(FLASHCARD_SYSTEM_INSTRUCTION));
}

#[tokio::test]
async fn test_unparseable_reply_yields_error_card() {
    let model = ScriptedModel::new().reply("not json");
    let engine = engine(&model);

    let set = engine
        .generate_flashcards(&DomainPolicy::political_philosophy(), rousseau("Emile"))
        .await
        .unwrap();

    assert_eq!(set.flashcards.len(), 1);
    assert!(set.flashcards[0].is_error());
    assert!(set.metadata.degraded);
}

#[tokio::test]
async fn test_generic_domain_is_lenient() {
    let model = ScriptedModel::new().reply(r#"{"flashcards": []}"#).reply(
        r#"{"flashcards": [
            {"type": "Definition", "front": "Osmosis?", "back": "Diffusion of water."},
            {"type": "Definition", "front": "Mitosis?", "back": "Cell division."},
            {"type": "Definition", "front": "Meiosis?", "back": "Reductive division."}
        ]}"#,
    );
    let engine = engine(&model);
    let policy = DomainPolicy::generic();
    let request = FlashcardRequest::new("Cell biology for first-year students")
        .with_conversation_key("bio-deck")
        .with_count(2);

    let empty = engine.generate_flashcards(&policy, request.clone()).await.unwrap();
    assert!(empty.flashcards.is_empty());
    assert!(!empty.metadata.degraded);

    let capped = engine.generate_flashcards(&policy, request).await.unwrap();
    assert_eq!(capped.flashcards.len(), 2);
    assert_eq!(capped.metadata.requested_count, 2);
    assert_eq!(model.channels_created(), 1);
}

#[tokio::test]
async fn test_missing_work_is_rejected() {
    let model = ScriptedModel::new().always(CARDS);
    let engine = engine(&model);

    let request = FlashcardRequest {
        thinker: Some("Rousseau".to_string()),
        ..FlashcardRequest::new("Man is born free, and everywhere he is in chains.")
    };
    let error = engine
        .generate_flashcards(&DomainPolicy::political_philosophy(), request)
        .await
        .unwrap_err();

    assert!(error.is_validation());
    assert_eq!(model.channels_created(), 0);
}

#[tokio::test]
async fn test_send_failure_invalidates_conversation() {
    let model = ScriptedModel::new().reply(CARDS).fail("503 unavailable").reply(CARDS);
    let engine = engine(&model);
    let policy = DomainPolicy::political_philosophy();
    let key = ConversationKey::subject("political_philosophy", "Rousseau", "The Social Contract");

    engine
        .generate_flashcards(&policy, rousseau("The Social Contract"))
        .await
        .unwrap();

    let error = engine
        .generate_flashcards(&policy, rousseau("The Social Contract"))
        .await
        .unwrap_err();
    assert!(matches!(error, EngineError::Provider(_)));
    assert!(!engine.sessions().contains(&key).await);

    let retry = engine
        .generate_flashcards(&policy, rousseau("The Social Contract"))
        .await
        .unwrap();

    assert!(retry.metadata.first_message);
    assert_eq!(model.channels_created(), 2);
    assert!(model.prompts()[2].starts_with(FLASHCARD_SYSTEM_INSTRUCTION));
    assert!(model.seeded_histories()[1].is_empty());
}

#[tokio::test]
async fn test_timeout_invalidates_conversation() {
    let model = ScriptedModel::new()
        .always(CARDS)
        .with_delay(Duration::from_millis(200));
    let engine = engine_with(
        &model,
        EngineConfig::new().with_timeout(Duration::from_millis(20)),
    );

    let error = engine
        .generate_flashcards(&DomainPolicy::kant(), {
            FlashcardRequest::new("Synthetic a priori judgements extend our knowledge.")
                .with_subject("ignored", "Critique of Pure Reason")
        })
        .await
        .unwrap_err();

    assert!(matches!(error, EngineError::Timeout(d) if d == Duration::from_millis(20)));
    assert!(engine.sessions().is_empty().await);
}

#[tokio::test]
async fn test_switching_work_evicts_previous_conversation() {
    let model = ScriptedModel::new().always(CARDS);
    let engine = engine(&model);
    let policy = DomainPolicy::political_philosophy();

    engine
        .generate_flashcards(&policy, rousseau("The Social Contract"))
        .await
        .unwrap();
    engine
        .generate_flashcards(
            &policy,
            FlashcardRequest::new("Whatever is, is right in the state of nature.")
                .with_subject("Hobbes", "Leviathan"),
        )
        .await
        .unwrap();
    engine
        .generate_flashcards(&policy, rousseau("Emile"))
        .await
        .unwrap();

    let sessions = engine.sessions();
    assert!(
        !sessions
            .contains(&ConversationKey::subject("political_philosophy", "Rousseau", "The Social Contract"))
            .await
    );
    assert!(
        sessions
            .contains(&ConversationKey::subject("political_philosophy", "Rousseau", "Emile"))
            .await
    );
    assert!(
        sessions
            .contains(&ConversationKey::subject("political_philosophy", "Hobbes", "Leviathan"))
            .await
    );
    assert_eq!(model.channels_created(), 3);
}

#[tokio::test]
async fn test_concurrent_turns_on_one_key_send_instruction_once() {
    let model = ScriptedModel::new()
        .always(CARDS)
        .with_delay(Duration::from_millis(10));
    let engine = Arc::new(engine(&model));
    let policy = Arc::new(DomainPolicy::political_philosophy());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let policy = Arc::clone(&policy);
            tokio::spawn(async move {
                engine
                    .generate_flashcards(&policy, rousseau("The Social Contract"))
                    .await
            })
        })
        .collect();

    let mut first_messages = 0;
    for result in futures::future::join_all(handles).await {
        if result.unwrap().unwrap().metadata.first_message {
            first_messages += 1;
        }
    }

    assert_eq!(first_messages, 1);
    assert_eq!(model.channels_created(), 1);
    let with_instruction = model
        .prompts()
        .iter()
        .filter(|p| p.starts_with(FLASHCARD_SYSTEM_INSTRUCTION))
        .count();
    assert_eq!(with_instruction, 1);
}

#[tokio::test]
async fn test_cancelled_first_turn_resends_instruction() {
    let model = ScriptedModel::new()
        .always(CARDS)
        .with_delay(Duration::from_millis(200));
    let engine = engine(&model);
    let policy = DomainPolicy::political_philosophy();
    let key = ConversationKey::subject("political_philosophy", "Rousseau", "The Social Contract");

    // Caller gives up before the model answers
    let abandoned = tokio::time::timeout(
        Duration::from_millis(50),
        engine.generate_flashcards(&policy, rousseau("The Social Contract")),
    )
    .await;
    assert!(abandoned.is_err());

    // Cleanup holds the turn until the conversation is gone
    drop(engine.sessions().lock_turn(&key).await);
    assert!(!engine.sessions().contains(&key).await);

    let retry = engine
        .generate_flashcards(&policy, rousseau("The Social Contract"))
        .await
        .unwrap();

    assert!(retry.metadata.first_message);
    assert_eq!(model.channels_created(), 2);
    assert!(model.prompts()[1].starts_with(FLASHCARD_SYSTEM_INSTRUCTION));
    assert_eq!(engine.sessions().active_turns(), 0);
}
