// Gemini-specific client implementation

use crate::gemini::channel::GeminiChannel;
use crate::gemini::wire::{self, Content, GenerateContentRequest, GenerateContentResponse};
use crate::traits::{ChatChannel, GenerationOptions, GenerativeModel, ModelReply};
use crate::types::{Attachment, HistoryEntry};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::sync::Arc;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Gemini client (HTTP direct, no SDK)
///
/// Cheap to clone: the underlying `reqwest::Client` is reference counted, so
/// every channel holds its own clone.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    options: GenerationOptions,
}

impl GeminiClient {
    /// Create new client with API key and the default model
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    pub fn builder() -> GeminiClientBuilder {
        GeminiClientBuilder::default()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// POST a generateContent request and convert it to a provider-agnostic reply
    pub(crate) async fn generate_content(&self, contents: Vec<Content>) -> Result<ModelReply> {
        let payload = GenerateContentRequest::new(contents, &self.options);
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .http_client
            .post(url)
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({}): {}", status, wire::error_message(&error_text));
        }

        let raw: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse response")?;

        let text = raw
            .text()
            .context("Gemini API returned no text in the response candidates")?;

        Ok(ModelReply {
            text,
            usage: raw.usage(),
            finish_reason: raw.finish_reason(),
        })
    }
}

// ============================================================================
// TRAIT IMPLEMENTATIONS
// ============================================================================

#[async_trait]
impl GenerativeModel for GeminiClient {
    fn create_channel(&self, history: Vec<HistoryEntry>) -> Arc<dyn ChatChannel> {
        Arc::new(GeminiChannel::new(self.clone(), history))
    }

    async fn generate(&self, prompt: &str, attachment: Option<&Attachment>) -> Result<ModelReply> {
        let mut content = Content::user_text(prompt);
        if let Some(attachment) = attachment {
            content = content.with_attachment(attachment);
        }

        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            has_attachment = attachment.is_some(),
            "Gemini single-shot generation"
        );

        self.generate_content(vec![content]).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// ============================================================================
// BUILDER
// ============================================================================

#[derive(Debug, Default)]
pub struct GeminiClientBuilder {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    options: GenerationOptions,
}

impl GeminiClientBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Model identifier, e.g. "gemini-2.0-flash"
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Override the API base URL (tests, proxies)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Result<GeminiClient> {
        let api_key = self.api_key.context("API key is required")?;
        if api_key.trim().is_empty() {
            anyhow::bail!("API key is required");
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| GEMINI_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&api_key).context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(GeminiClient {
            http_client,
            base_url,
            model: self.model.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            options: self.options,
        })
    }
}
