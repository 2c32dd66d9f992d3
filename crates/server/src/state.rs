//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use lead_engine_agent::{FeedbackStore, RecommendCache, RecommendationEngine};
use lead_engine_config::{ConfigStore, SentimentProvider, Settings};
use lead_engine_llm::{ChatBackend, LlmSentimentProvider, OpenAiBackend, OpenAiConfig};
use lead_engine_scoring::SentimentCache;
use lead_engine_tools::create_default_registry;

/// Everything the handlers share. Cheap to clone; all fields are Arcs.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub config_store: Arc<ConfigStore>,
    pub feedback: Arc<FeedbackStore>,
    pub sentiment_cache: Arc<SentimentCache>,
    pub recommend_cache: Arc<RecommendCache>,
    /// Tool-calling engine; `None` when no API key is configured and the
    /// deterministic fallback serves all recommendations.
    pub engine: Option<Arc<RecommendationEngine>>,
    /// LLM sentiment provider; `None` unless configured with a key.
    pub llm_sentiment: Option<Arc<LlmSentimentProvider>>,
}

fn backend_from(settings: &Settings, model: &str) -> Option<Arc<dyn ChatBackend>> {
    let api_key = settings.llm.api_key.clone()?;
    let config = OpenAiConfig {
        endpoint: settings.llm.endpoint.clone(),
        api_key: Some(api_key),
        model: model.to_string(),
        timeout: Duration::from_secs(settings.llm.timeout_secs),
        max_retries: settings.llm.max_retries,
        ..Default::default()
    };
    match OpenAiBackend::new(config) {
        Ok(backend) => Some(Arc::new(backend)),
        Err(err) => {
            tracing::error!(error = %err, "failed to build LLM backend");
            None
        }
    }
}

impl AppState {
    pub fn from_settings(settings: Settings) -> Self {
        let engine = backend_from(&settings, &settings.llm.recommend_model)
            .map(|backend| Arc::new(RecommendationEngine::new(backend, create_default_registry())));
        let llm_sentiment = (settings.llm.provider == SentimentProvider::Llm)
            .then(|| backend_from(&settings, &settings.llm.sentiment_model))
            .flatten()
            .map(|backend| Arc::new(LlmSentimentProvider::new(backend)));

        Self {
            sentiment_cache: Arc::new(SentimentCache::new(settings.cache.sentiment_max_entries)),
            recommend_cache: Arc::new(RecommendCache::new(settings.cache.recommend_ttl_minutes)),
            config_store: Arc::new(ConfigStore::default()),
            feedback: Arc::new(FeedbackStore::new()),
            engine,
            llm_sentiment,
            settings: Arc::new(settings),
        }
    }

    /// Name reported by the health endpoint.
    pub fn sentiment_provider_name(&self) -> &'static str {
        if self.llm_sentiment.is_some() {
            "llm"
        } else {
            "keyword"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_api_key_means_fallback_only() {
        let state = AppState::from_settings(Settings::default());
        assert!(state.engine.is_none());
        assert!(state.llm_sentiment.is_none());
        assert_eq!(state.sentiment_provider_name(), "keyword");
    }

    #[test]
    fn keyword_provider_ignores_api_key_for_sentiment() {
        let mut settings = Settings::default();
        settings.llm.api_key = Some("sk-test".into());
        let state = AppState::from_settings(settings);
        assert!(state.engine.is_some());
        assert!(state.llm_sentiment.is_none());
    }

    #[test]
    fn llm_provider_with_key_enables_llm_sentiment() {
        let mut settings = Settings::default();
        settings.llm.api_key = Some("sk-test".into());
        settings.llm.provider = SentimentProvider::Llm;
        let state = AppState::from_settings(settings);
        assert!(state.llm_sentiment.is_some());
        assert_eq!(state.sentiment_provider_name(), "llm");
    }
}
