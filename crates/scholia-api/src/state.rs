use crate::config::Config;
use scholia_engine::Engine;
use std::sync::Arc;

/// Shared application state passed to all handlers
///
/// The engine owns the session store, so every request sees the same
/// conversation cache.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: Arc<Engine>,
}

impl AppState {
    pub fn new(config: Config, engine: Engine) -> Self {
        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
        }
    }
}
