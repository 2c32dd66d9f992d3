//! Service settings loaded at startup.
//!
//! Sources, later wins: `config/default.yaml`, `config/{environment}.yaml`,
//! then `LEAD_ENGINE__*` environment variables with `__` as the section
//! separator (e.g. `LEAD_ENGINE__SERVER__PORT=8080`).

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Which sentiment provider handles `/api/sentiment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentProvider {
    #[default]
    Keyword,
    Llm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_enabled: bool,
    pub cors_origins: Vec<String>,
    /// Per-request timeout applied by the HTTP layer.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_enabled: true,
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
            request_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: SentimentProvider,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub recommend_model: String,
    pub sentiment_model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: SentimentProvider::Keyword,
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: None,
            recommend_model: "gpt-4o-mini".to_string(),
            sentiment_model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
            max_retries: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Recommendation cache TTL; clamped to [5, 15] minutes when applied.
    pub recommend_ttl_minutes: u64,
    pub sentiment_max_entries: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            recommend_ttl_minutes: 10,
            sentiment_max_entries: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub llm: LlmSettings,
    pub cache: CacheSettings,
    pub log: LogSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "port must be non-zero".to_string(),
            });
        }
        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.timeout_secs".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }
        if self.llm.provider == SentimentProvider::Llm && self.llm.api_key.is_none() {
            tracing::warn!(
                "llm sentiment provider configured without an api key; keyword fallback will serve all requests"
            );
        }
        if self.cache.sentiment_max_entries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cache.sentiment_max_entries".to_string(),
                message: "cache capacity must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Load settings for the named environment ("development", "production", ...).
pub fn load_settings(environment: &str) -> Result<Settings, ConfigError> {
    let settings: Settings = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{environment}")).required(false))
        .add_source(
            Environment::with_prefix("LEAD_ENGINE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    settings.validate()?;
    Ok(settings)
}
