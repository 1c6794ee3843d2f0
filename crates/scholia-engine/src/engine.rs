use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use scholia_llm::{Attachment, GenerativeModel, ModelReply};
use scholia_session::{ConversationKey, SessionStore, TurnLock};
use scholia_types::{
    CategoryRequest, CategoryResult, DescriptionRequest, DescriptionResult, EngineConfig,
    FlashcardMetadata, FlashcardRequest, FlashcardSet, VideoRequest,
};
use uuid::Uuid;

use crate::builder::EngineBuilder;
use crate::error::{EngineError, Result};
use crate::parse::{parse_categories, parse_description, parse_flashcards};
use crate::policy::DomainPolicy;
use crate::prompt::{
    category_prompt, compose, description_prompt, flashcard_prompt, DescriptionSource,
    CATEGORY_SYSTEM_INSTRUCTION, DESCRIPTION_SYSTEM_INSTRUCTION,
};

/// One completed conversational turn
struct Turn {
    reply: ModelReply,
    first_message: bool,
}

/// Turn in flight on a conversation
///
/// If the turn is dropped before [`PendingTurn::complete`] (caller went away
/// or an outer timeout fired), the conversation is invalidated before the
/// turn lock is released, so the next turn starts fresh and re-sends the
/// system instruction.
struct PendingTurn {
    sessions: Arc<SessionStore>,
    key: ConversationKey,
    lock: Option<TurnLock>,
}

impl PendingTurn {
    fn new(sessions: Arc<SessionStore>, key: ConversationKey, lock: TurnLock) -> Self {
        Self {
            sessions,
            key,
            lock: Some(lock),
        }
    }

    fn complete(mut self) {
        self.lock.take();
    }
}

impl Drop for PendingTurn {
    fn drop(&mut self) {
        let Some(lock) = self.lock.take() else {
            return;
        };

        tracing::warn!(conversation = %self.key, "Turn abandoned mid-flight");

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let sessions = Arc::clone(&self.sessions);
                let key = self.key.clone();
                handle.spawn(async move {
                    sessions.invalidate(&key).await;
                    drop(lock);
                });
            }
            Err(_) => {
                tracing::error!(
                    conversation = %self.key,
                    "No runtime to invalidate abandoned conversation"
                );
            }
        }
    }
}

/// Request orchestration: validate, prompt, call the model, parse
///
/// Single-shot operations go straight to [`GenerativeModel::generate`].
/// Conversational ones go through the [`SessionStore`], holding the
/// conversation's turn lock from the first-message check until the exchange
/// is recorded.
pub struct Engine {
    model: Arc<dyn GenerativeModel>,
    sessions: Arc<SessionStore>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        sessions: Arc<SessionStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            model,
            sessions,
            config,
        }
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    pub async fn identify_categories(&self, request: CategoryRequest) -> Result<CategoryResult> {
        self.validate_content(&request.content)?;
        validate_vocabulary(&request.categories)?;

        let instruction = instruction_or(
            request.system_instruction.as_deref(),
            CATEGORY_SYSTEM_INSTRUCTION,
        );
        let body = category_prompt(
            &request.content,
            &request.categories,
            self.config.max_categories,
        );

        let reply = if request.conversational {
            let key = match request
                .conversation_key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
            {
                Some(key) => ConversationKey::explicit(key),
                None => ConversationKey::fingerprint(instruction, &request.metadata),
            };
            self.converse(&key, instruction, &body).await?.reply
        } else {
            self.generate(&compose(Some(instruction), &body), None)
                .await?
        };

        let outcome = parse_categories(&reply.text, &request.categories);
        let mut categories = outcome.value;
        categories.truncate(self.config.max_categories);

        tracing::info!(
            categories = categories.len(),
            degraded = outcome.degraded,
            conversational = request.conversational,
            "Identified categories"
        );

        Ok(CategoryResult { categories })
    }

    pub async fn analyze_static_data(
        &self,
        request: DescriptionRequest,
    ) -> Result<DescriptionResult> {
        self.validate_content(&request.content)?;
        validate_vocabulary(&request.categories)?;

        let instruction = instruction_or(
            request.system_instruction.as_deref(),
            DESCRIPTION_SYSTEM_INSTRUCTION,
        );
        let body = description_prompt(
            DescriptionSource::Text(&request.content),
            &request.categories,
            self.config.max_categories,
        );

        let reply = self.generate(&compose(Some(instruction), &body), None).await?;
        Ok(self.finish_description(&reply.text, &request.categories))
    }

    pub async fn analyze_video(&self, request: VideoRequest) -> Result<DescriptionResult> {
        let url = request.video_url.trim();
        if url.is_empty() {
            return Err(EngineError::validation("video_url is empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(EngineError::validation(
                "video_url must be an http(s) URL",
            ));
        }
        validate_vocabulary(&request.categories)?;

        let instruction = instruction_or(
            request.system_instruction.as_deref(),
            DESCRIPTION_SYSTEM_INSTRUCTION,
        );
        let body = description_prompt(
            DescriptionSource::Video(url),
            &request.categories,
            self.config.max_categories,
        );

        let attachment = Attachment::video(url);
        let reply = self
            .generate(&compose(Some(instruction), &body), Some(&attachment))
            .await?;
        Ok(self.finish_description(&reply.text, &request.categories))
    }

    pub async fn generate_flashcards(
        &self,
        policy: &DomainPolicy,
        request: FlashcardRequest,
    ) -> Result<FlashcardSet> {
        self.validate_content(&request.content)?;
        let count = self.card_count(request.count)?;
        policy.validate(&request)?;

        let key = policy.conversation_key(&request)?;
        if policy.evict_siblings {
            self.sessions
                .evict_where(|existing| existing.is_sibling_of(&key))
                .await;
        }

        let instruction = policy.system_instruction();
        let body = flashcard_prompt(policy, &request, count);
        let turn = self.converse(&key, &instruction, &body).await?;

        let outcome = parse_flashcards(&turn.reply.text, &policy.rules(&request));
        let mut flashcards = outcome.value;
        flashcards.truncate(count);

        tracing::info!(
            domain = %policy.name,
            conversation = %key,
            cards = flashcards.len(),
            degraded = outcome.degraded,
            first_message = turn.first_message,
            "Generated flashcards"
        );

        let metadata = FlashcardMetadata {
            request_id: Uuid::new_v4(),
            domain: policy.name.clone(),
            conversation_key: Some(key.to_string()),
            first_message: turn.first_message,
            requested_count: count,
            card_count: flashcards.len(),
            degraded: outcome.degraded,
            thinker: policy.subject_for(&request),
            work: request
                .work
                .as_deref()
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(str::to_string),
            generated_at: Utc::now(),
        };

        Ok(FlashcardSet {
            flashcards,
            metadata,
        })
    }

    // ========================================================================
    // MODEL CALLS
    // ========================================================================

    async fn converse(
        &self,
        key: &ConversationKey,
        instruction: &str,
        body: &str,
    ) -> Result<Turn> {
        let turn = PendingTurn::new(
            Arc::clone(&self.sessions),
            key.clone(),
            self.sessions.lock_turn(key).await,
        );

        let channel = self.sessions.get_or_create(key).await;
        let first_message = self.sessions.is_first_message(key).await;

        let message = if first_message {
            compose(Some(instruction), body)
        } else {
            body.to_string()
        };

        tracing::debug!(
            conversation = %key,
            first_message,
            prompt_chars = message.len(),
            "Sending conversational message"
        );

        if first_message {
            self.sessions.mark_initialized(key).await;
        }

        match self.call(channel.send(&message)).await {
            Ok(reply) => {
                self.sessions
                    .record_exchange(key, &message, &reply.text)
                    .await;
                turn.complete();
                Ok(Turn {
                    reply,
                    first_message,
                })
            }
            Err(e) => {
                self.sessions.invalidate(key).await;
                turn.complete();
                Err(e)
            }
        }
    }

    async fn generate(&self, prompt: &str, attachment: Option<&Attachment>) -> Result<ModelReply> {
        tracing::debug!(
            prompt_chars = prompt.len(),
            attachment = ?attachment.map(Attachment::uri),
            "Sending single-shot prompt"
        );
        self.call(self.model.generate(prompt, attachment)).await
    }

    async fn call<F>(&self, request: F) -> Result<ModelReply>
    where
        F: Future<Output = anyhow::Result<ModelReply>>,
    {
        let timeout = self.config.request_timeout;
        match tokio::time::timeout(timeout, request).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => {
                tracing::error!(error = %format!("{:#}", e), "Model call failed");
                Err(EngineError::Provider(e))
            }
            Err(_) => {
                tracing::error!(timeout_ms = timeout.as_millis() as u64, "Model call timed out");
                Err(EngineError::Timeout(timeout))
            }
        }
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn finish_description(&self, text: &str, vocabulary: &[String]) -> DescriptionResult {
        let outcome = parse_description(text, vocabulary);
        let mut result = outcome.value;
        result.categories.truncate(self.config.max_categories);

        tracing::info!(
            categories = result.categories.len(),
            degraded = outcome.degraded,
            "Analyzed content"
        );
        result
    }

    fn validate_content(&self, content: &str) -> Result<()> {
        let chars = content.trim().chars().count();
        if chars == 0 {
            return Err(EngineError::validation("content is empty"));
        }
        if chars < self.config.min_content_chars {
            return Err(EngineError::validation(format!(
                "content must be at least {} characters",
                self.config.min_content_chars
            )));
        }
        Ok(())
    }

    fn card_count(&self, requested: Option<usize>) -> Result<usize> {
        let count = requested.unwrap_or(self.config.default_card_count);
        if count == 0 || count > self.config.max_card_count {
            return Err(EngineError::validation(format!(
                "count must be between 1 and {}",
                self.config.max_card_count
            )));
        }
        Ok(count)
    }
}

fn validate_vocabulary(categories: &[String]) -> Result<()> {
    if categories.iter().all(|c| c.trim().is_empty()) {
        return Err(EngineError::validation("categories must not be empty"));
    }
    Ok(())
}

fn instruction_or<'a>(custom: Option<&'a str>, default: &'a str) -> &'a str {
    custom
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
}
