//! OpenAI-compatible chat backend.
//!
//! Works against api.openai.com or any server speaking the same
//! chat/completions protocol. Transient failures (network errors, timeouts,
//! 5xx) are retried with exponential backoff; 4xx responses are not.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chat::{ChatBackend, ChatMessage, ChatOptions, ToolSpec};
use crate::LlmError;

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API endpoint (OpenAI: https://api.openai.com/v1, or a compatible server)
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
    /// Maximum retry attempts for transient failures.
    pub max_retries: u32,
    /// Initial backoff duration (doubles each retry).
    pub initial_backoff: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
            initial_backoff: Duration::from_millis(200),
        }
    }
}

pub struct OpenAiBackend {
    client: Client,
    config: OpenAiConfig,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolSpec]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: ChatMessage,
}

impl OpenAiBackend {
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'))
    }

    fn build_headers(&self) -> Result<HeaderMap, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.config.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|_| LlmError::Configuration("invalid api key".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    fn is_retryable(error: &LlmError) -> bool {
        matches!(
            error,
            LlmError::Network(_) | LlmError::Timeout | LlmError::Api(_)
        )
    }

    async fn execute_once(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatMessage, LlmError> {
        let response_format = options.json_response.then(|| {
            serde_json::json!({ "type": "json_object" })
        });
        let request = WireRequest {
            model: &self.config.model,
            messages,
            tools: options.tools.as_deref(),
            tool_choice: options.tools.is_some().then_some("auto"),
            temperature: options.temperature,
            response_format,
        };

        let response = self
            .client
            .post(self.chat_url())
            .headers(self.build_headers()?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // 5xx errors are retryable, 4xx are not
            return if status.is_server_error() {
                Err(LlmError::Api(format!("{status}: {body}")))
            } else {
                Err(LlmError::InvalidResponse(format!("{status}: {body}")))
            };
        }

        let parsed: WireResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| LlmError::InvalidResponse("no completion choice".to_string()))
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatMessage, LlmError> {
        let mut backoff = self.config.initial_backoff;
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::warn!(
                    attempt,
                    max = self.config.max_retries,
                    backoff_ms = backoff.as_millis() as u64,
                    "chat request failed, retrying"
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }

            match self.execute_once(messages, options).await {
                Ok(message) => return Ok(message),
                Err(e) if Self::is_retryable(&e) => {
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Api("retries exhausted".to_string())))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
