//! OpenAI-compatible chat-completions client.

use crate::backend::{ChatBackend, ChatRequest, ChatResponse};
use crate::error::LlmError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Default chat-completions endpoint.
pub const DEFAULT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Connection settings for [`OpenAiClient`].
#[derive(Debug, Clone)]
pub struct OpenAiClientConfig {
    /// Full URL of the chat-completions endpoint.
    pub url: String,
    /// Bearer token sent with every request.
    pub api_key: String,
    /// Timeout applied to connect, write and read.
    pub timeout: Duration,
}

impl OpenAiClientConfig {
    /// Creates a configuration for the public OpenAI endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            url: DEFAULT_COMPLETIONS_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(50),
        }
    }

    /// Overrides the endpoint URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Overrides the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Chat backend speaking the OpenAI chat-completions protocol over HTTPS.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl OpenAiClient {
    /// Builds a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::InvalidConfig`] if the API key is empty or the
    /// HTTP client cannot be constructed.
    pub fn new(config: OpenAiClientConfig) -> chat_relay_core::Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::InvalidConfig {
                reason: "api key is empty".to_string(),
            }
            .into());
        }

        let http = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::InvalidConfig {
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            url: config.url,
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl ChatBackend for OpenAiClient {
    #[instrument(skip(self, request), fields(model = %request.model, messages = request.messages.len()))]
    async fn complete(
        &self,
        request: &ChatRequest,
    ) -> chat_relay_core::Result<ChatResponse, LlmError> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| LlmError::from_transport(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::from_transport(&e))?;

        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::ResponseParseFailed {
                reason: e.to_string(),
            })?;

        debug!(
            choices = parsed.choices.len(),
            total_tokens = parsed.usage.total_tokens,
            "generation response received"
        );

        Ok(parsed)
    }
}
