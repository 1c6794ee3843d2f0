use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use scholia_llm::GenerativeModel;
use scholia_session::SessionStore;
use scholia_types::EngineConfig;

use crate::engine::Engine;

/// Builder for an [`Engine`]
///
/// Only the model is required. Without an explicit store the engine gets a
/// fresh [`SessionStore`] backed by the same model.
pub struct EngineBuilder {
    model: Option<Arc<dyn GenerativeModel>>,
    sessions: Option<Arc<SessionStore>>,
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            model: None,
            sessions: None,
            config: EngineConfig::default(),
        }
    }

    /// Set the generative model
    pub fn model(mut self, model: Arc<dyn GenerativeModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Share an existing session store
    pub fn sessions(mut self, sessions: Arc<SessionStore>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Build the Engine
    pub fn build(self) -> Result<Engine> {
        let model = self.model.ok_or_else(|| anyhow!("Generative model is required"))?;

        if self.config.default_card_count == 0
            || self.config.default_card_count > self.config.max_card_count
        {
            return Err(anyhow!(
                "default_card_count must be between 1 and max_card_count ({})",
                self.config.max_card_count
            ));
        }
        if self.config.max_categories == 0 {
            return Err(anyhow!("max_categories must be at least 1"));
        }

        let sessions = self
            .sessions
            .unwrap_or_else(|| Arc::new(SessionStore::new(Arc::clone(&model))));

        Ok(Engine::new(model, sessions, self.config))
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
