use crate::types::{Attachment, HistoryEntry};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Stateful handle for a multi-turn exchange with the model
///
/// A channel is seeded with prior history when it is opened and keeps
/// appending to it after every successful send.
#[async_trait]
pub trait ChatChannel: Send + Sync {
    /// Send the next user message and wait for the model's reply
    async fn send(&self, text: &str) -> Result<ModelReply>;
}

/// Trait for the generative model behind the proxy
///
/// Provides channel creation for conversational use cases and a stateless
/// single-shot call for everything else.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Open a new channel seeded with `history`. Never touches the network.
    fn create_channel(&self, history: Vec<HistoryEntry>) -> Arc<dyn ChatChannel>;

    /// Single-shot generation, optionally with a URI-referenced attachment
    async fn generate(&self, prompt: &str, attachment: Option<&Attachment>) -> Result<ModelReply>;

    /// Model identifier (for logs and health reporting)
    fn model_name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelReply {
    pub text: String,
    pub usage: Option<TokenUsage>,
    pub finish_reason: Option<String>,
}

impl ModelReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
            finish_reason: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.max_output_tokens.is_none()
    }
}
