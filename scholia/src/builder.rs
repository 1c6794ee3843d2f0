//! High-level builder API for creating an engine backed by Gemini

use crate::{Engine, EngineConfig, GeminiConfig, GenerativeModel};
use anyhow::{Context, Result};
use scholia_llm::ClientFactory;
use std::sync::Arc;
use std::time::Duration;

/// High-level builder for a Gemini-backed [`Engine`]
///
/// # Example
///
/// ```rust,no_run
/// use scholia::prelude::*;
///
/// # fn main() -> Result<()> {
/// let engine = ScholiaBuilder::new()
///     .api_key("AIza...")
///     .model("gemini-2.0-flash")
///     .temperature(0.4)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ScholiaBuilder {
    // Gemini
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    temperature: Option<f32>,

    // Engine limits
    engine_config: EngineConfig,

    // Pre-built model (tests, other providers)
    custom_model: Option<Arc<dyn GenerativeModel>>,
}

impl Default for ScholiaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScholiaBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            model: None,
            base_url: None,
            temperature: None,
            engine_config: EngineConfig::default(),
            custom_model: None,
        }
    }

    /// Set the Gemini API key (required unless a model is supplied)
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the Gemini model (default: gemini-2.0-flash)
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Per-call timeout for model requests (default: 60s)
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.engine_config.request_timeout = timeout;
        self
    }

    pub fn engine_config(mut self, config: EngineConfig) -> Self {
        self.engine_config = config;
        self
    }

    /// Use an already constructed model instead of a Gemini client
    pub fn with_model(mut self, model: Arc<dyn GenerativeModel>) -> Self {
        self.custom_model = Some(model);
        self
    }

    /// Build the engine
    ///
    /// # Errors
    ///
    /// Returns an error if no API key (and no custom model) is set, or if the
    /// engine limits are inconsistent.
    pub fn build(self) -> Result<Engine> {
        let model = match self.custom_model {
            Some(model) => model,
            None => {
                let api_key = self
                    .api_key
                    .context("Gemini API key is required. Call .api_key(key)")?;

                let mut config = GeminiConfig::new(api_key);
                if let Some(model) = self.model {
                    config = config.with_model(model);
                }
                if let Some(base_url) = self.base_url {
                    config = config.with_base_url(base_url);
                }
                if let Some(temperature) = self.temperature {
                    config = config.with_temperature(temperature);
                }

                ClientFactory::create_model(config).context("Failed to create Gemini client")?
            }
        };

        Engine::builder()
            .model(model)
            .config(self.engine_config)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scholia_llm::testing::ScriptedModel;

    #[test]
    fn test_api_key_required() {
        let error = ScholiaBuilder::new().build().err().unwrap();
        assert!(error.to_string().contains("API key is required"));
    }

    #[test]
    fn test_builds_gemini_engine() {
        let engine = ScholiaBuilder::new()
            .api_key("test-key")
            .model("gemini-1.5-pro")
            .request_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(engine.model_name(), "gemini-1.5-pro");
        assert_eq!(engine.config().request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_custom_model() {
        let engine = ScholiaBuilder::new()
            .with_model(Arc::new(ScriptedModel::new().always("[]")))
            .build()
            .unwrap();

        assert_eq!(engine.model_name(), "scripted");
    }

    #[test]
    fn test_custom_model_serves_requests() {
        let engine = ScholiaBuilder::new()
            .with_model(Arc::new(
                ScriptedModel::new().reply(r#"{"categories": ["Science", "Poetry"]}"#),
            ))
            .build()
            .unwrap();

        let result = tokio_test::block_on(engine.identify_categories(
            crate::CategoryRequest::new(
                "Photosynthesis turns light into chemical energy.",
                vec!["Science".to_string(), "Business".to_string()],
            ),
        ))
        .unwrap();

        assert_eq!(result.categories, vec!["Science".to_string()]);
    }
}
