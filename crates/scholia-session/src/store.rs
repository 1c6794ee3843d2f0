use scholia_llm::{push_exchange, ChatChannel, GenerativeModel, HistoryEntry};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::key::ConversationKey;
use crate::turn::{TurnLock, TurnLocks};

#[derive(Default)]
struct ConversationState {
    channel: Option<Arc<dyn ChatChannel>>,
    history: Vec<HistoryEntry>,
    initialized: bool,
}

/// Process-wide cache of open chat channels and their bounded history
///
/// Built once at start-up and shared behind an `Arc`. Each conversation holds
/// an optional channel, a history window of at most two exchanges (the first
/// one, which carried the system instruction, and the latest one) and an
/// initialized flag.
pub struct SessionStore {
    model: Arc<dyn GenerativeModel>,
    conversations: RwLock<HashMap<ConversationKey, ConversationState>>,
    turns: TurnLocks,
}

impl SessionStore {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            model,
            conversations: RwLock::new(HashMap::new()),
            turns: TurnLocks::default(),
        }
    }

    /// Existing channel for `key`, or a new one seeded with the stored history
    pub async fn get_or_create(&self, key: &ConversationKey) -> Arc<dyn ChatChannel> {
        let mut conversations = self.conversations.write().await;
        let state = conversations.entry(key.clone()).or_default();

        if let Some(channel) = &state.channel {
            return Arc::clone(channel);
        }

        let channel = self.model.create_channel(state.history.clone());
        tracing::info!(
            conversation = %key,
            seeded_entries = state.history.len(),
            "Opened chat channel"
        );

        state.channel = Some(Arc::clone(&channel));
        state.initialized = false;
        channel
    }

    /// True until the first message for `key` has been sent
    pub async fn is_first_message(&self, key: &ConversationKey) -> bool {
        let conversations = self.conversations.read().await;
        conversations
            .get(key)
            .map(|state| !state.initialized)
            .unwrap_or(true)
    }

    /// Mark the system instruction as sent for `key`
    pub async fn mark_initialized(&self, key: &ConversationKey) {
        let mut conversations = self.conversations.write().await;
        conversations.entry(key.clone()).or_default().initialized = true;
    }

    /// Append an exchange, keeping only the first and the newest pair
    pub async fn record_exchange(&self, key: &ConversationKey, user_text: &str, model_text: &str) {
        let mut conversations = self.conversations.write().await;
        let state = conversations.entry(key.clone()).or_default();
        push_exchange(&mut state.history, user_text, model_text);
    }

    /// Drop channel, history and flag for `key`
    pub async fn invalidate(&self, key: &ConversationKey) {
        let removed = self.conversations.write().await.remove(key).is_some();
        if removed {
            tracing::info!(conversation = %key, "Invalidated conversation");
        }
    }

    /// Remove every conversation whose key matches; returns how many went
    pub async fn evict_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&ConversationKey) -> bool,
    {
        let mut conversations = self.conversations.write().await;
        let before = conversations.len();
        conversations.retain(|key, _| !predicate(key));
        let evicted = before - conversations.len();

        if evicted > 0 {
            tracing::info!(evicted, "Evicted conversations");
        }
        evicted
    }

    /// Serialize turns on one conversation
    ///
    /// Hold the lock across check-first-message, send and record. Turns on
    /// different keys never wait on each other.
    pub async fn lock_turn(&self, key: &ConversationKey) -> TurnLock {
        self.turns.acquire(key).await
    }

    /// Keys with a turn in progress or queued
    pub fn active_turns(&self) -> usize {
        self.turns.len()
    }

    /// Stored history for `key` (empty when unknown)
    pub async fn history(&self, key: &ConversationKey) -> Vec<HistoryEntry> {
        self.conversations
            .read()
            .await
            .get(key)
            .map(|state| state.history.clone())
            .unwrap_or_default()
    }

    pub async fn contains(&self, key: &ConversationKey) -> bool {
        self.conversations.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }

    pub fn model(&self) -> &Arc<dyn GenerativeModel> {
        &self.model
    }
}
