use config::builder::DefaultState;
use config::{Config as ConfigLoader, ConfigBuilder, ConfigError, File, FileFormat};
use scholia_llm::GeminiConfig;
use scholia_types::EngineConfig;
use serde::Deserialize;
use std::time::Duration;

/// Environment variables that override single config keys
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("SERVER_TIMEOUT_SECS", "server.timeout_secs"),
    ("CORS_ENABLED", "cors.enabled"),
    ("LLM_MODEL", "llm.model"),
    ("LLM_BASE_URL", "llm.base_url"),
    ("LLM_TEMPERATURE", "llm.temperature"),
    ("LLM_MAX_OUTPUT_TOKENS", "llm.max_output_tokens"),
    ("ENGINE_REQUEST_TIMEOUT_SECS", "engine.request_timeout_secs"),
    ("ENGINE_MIN_CONTENT_CHARS", "engine.min_content_chars"),
    ("ENGINE_MAX_CATEGORIES", "engine.max_categories"),
    ("ENGINE_DEFAULT_CARD_COUNT", "engine.default_card_count"),
    ("ENGINE_MAX_CARD_COUNT", "engine.max_card_count"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub gemini_api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for a whole HTTP request
    #[serde(default = "default_server_timeout")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            timeout_secs: default_server_timeout(),
        }
    }
}

fn default_server_timeout() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    #[serde(default)]
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: scholia_llm::gemini::DEFAULT_GEMINI_MODEL.to_string(),
            base_url: None,
            temperature: None,
            max_output_tokens: None,
        }
    }
}

/// Engine limits as they appear in TOML (timeout in whole seconds)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub request_timeout_secs: u64,
    pub min_content_chars: usize,
    pub max_categories: usize,
    pub default_card_count: usize,
    pub max_card_count: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let defaults = EngineConfig::default();
        Self {
            request_timeout_secs: defaults.request_timeout.as_secs(),
            min_content_chars: defaults.min_content_chars,
            max_categories: defaults.max_categories,
            default_card_count: defaults.default_card_count,
            max_card_count: defaults.max_card_count,
        }
    }
}

impl From<&EngineSettings> for EngineConfig {
    fn from(settings: &EngineSettings) -> Self {
        EngineConfig::new()
            .with_timeout(Duration::from_secs(settings.request_timeout_secs))
            .with_min_content_chars(settings.min_content_chars)
            .with_max_categories(settings.max_categories)
            .with_card_counts(settings.default_card_count, settings.max_card_count)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (SERVER_, LLM_, ENGINE_, LOG_ prefixes)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        Self::finish(builder, |name| std::env::var(name).ok())
    }

    /// Load from TOML text with a custom variable lookup (useful for testing)
    pub fn from_toml_str<F>(toml: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let builder = ConfigLoader::builder().add_source(File::from_str(toml, FileFormat::Toml));
        Self::finish(builder, lookup)
    }

    fn finish<F>(mut builder: ConfigBuilder<DefaultState>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, lookup(var))?;
        }

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        cfg.gemini_api_key = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::Message("GEMINI_API_KEY environment variable is required".to_string())
            })?;

        Ok(cfg)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::from(&self.engine)
    }

    pub fn gemini_config(&self) -> GeminiConfig {
        let mut gemini = GeminiConfig::new(self.gemini_api_key.clone()).with_model(self.llm.model.clone());

        if let Some(base_url) = &self.llm.base_url {
            gemini = gemini.with_base_url(base_url.clone());
        }
        if let Some(temperature) = self.llm.temperature {
            gemini = gemini.with_temperature(temperature);
        }
        if let Some(tokens) = self.llm.max_output_tokens {
            gemini = gemini.with_max_output_tokens(tokens);
        }
        gemini
    }
}
