// Configuration layer for model client creation
// Single provider: everything here ends up as a GeminiClient

use crate::gemini::{GeminiClient, DEFAULT_GEMINI_MODEL};
use crate::traits::{GenerationOptions, GenerativeModel};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Configuration for the Gemini provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL for the Gemini API (optional, defaults to the public v1beta endpoint)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

fn default_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: default_model(),
            base_url: None,
            temperature: None,
            max_output_tokens: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        }
    }
}

/// Factory for creating model clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    /// Create a concrete Gemini client
    pub fn create_gemini_client(config: GeminiConfig) -> Result<GeminiClient> {
        let mut builder = GeminiClient::builder()
            .api_key(config.api_key.clone())
            .model(config.model.clone())
            .options(config.generation_options());

        if let Some(base_url) = config.base_url {
            builder = builder.base_url(base_url);
        }

        builder.build()
    }

    /// Create a model behind the provider-agnostic trait
    pub fn create_model(config: GeminiConfig) -> Result<Arc<dyn GenerativeModel>> {
        let client = Self::create_gemini_client(config)?;
        Ok(Arc::new(client))
    }
}
