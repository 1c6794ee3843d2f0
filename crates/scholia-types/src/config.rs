use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits and timeouts applied by the engine to every request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound for one model call; exceeding it counts as a send failure
    pub request_timeout: Duration,
    /// Minimum trimmed length of free-text content
    pub min_content_chars: usize,
    /// Cap on categories returned by category identification
    pub max_categories: usize,
    pub default_card_count: usize,
    pub max_card_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(60),
            min_content_chars: 10,
            max_categories: 3,
            default_card_count: 5,
            max_card_count: 20,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_min_content_chars(mut self, chars: usize) -> Self {
        self.min_content_chars = chars;
        self
    }

    pub fn with_max_categories(mut self, max: usize) -> Self {
        self.max_categories = max;
        self
    }

    pub fn with_card_counts(mut self, default_count: usize, max_count: usize) -> Self {
        self.default_card_count = default_count;
        self.max_card_count = max_count;
        self
    }
}
