//! Configuration for the lead engine.
//!
//! Two distinct things live here and should not be confused:
//!
//! - **Service settings** ([`Settings`]): host/port, CORS, LLM credentials,
//!   cache sizes. Loaded once at startup from YAML files layered under
//!   `LEAD_ENGINE__*` environment variables.
//! - **The scoring config document** ([`ScoringConfig`]): the runtime-mutable
//!   weights/prompt document the dashboard patches through the API, held in
//!   the versioned [`ConfigStore`] with a bounded history and rollback.

pub mod scoring;
pub mod settings;
pub mod store;

pub use scoring::ScoringConfig;
pub use settings::{
    load_settings, CacheSettings, LlmSettings, LogSettings, SentimentProvider, ServerConfig,
    Settings,
};
pub use store::{ConfigStore, ConfigVersion};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
