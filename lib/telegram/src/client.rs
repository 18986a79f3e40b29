//! Bot API client.

use crate::error::TelegramError;
use crate::types::{ApiResponse, OutgoingMessage, Update};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

/// Public Bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Extra time granted to a long poll on top of its server-side timeout.
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Timeout for ordinary (non-polling) calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin client over the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TelegramClient {
    /// Creates a client for the public Bot API.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError::InvalidConfig`] if the token is empty or the
    /// HTTP client cannot be built.
    pub fn new(token: impl Into<String>) -> chat_relay_core::Result<Self, TelegramError> {
        Self::with_base_url(token, DEFAULT_API_URL)
    }

    /// Creates a client for a custom Bot API server.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError::InvalidConfig`] if the token is empty or the
    /// HTTP client cannot be built.
    pub fn with_base_url(
        token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> chat_relay_core::Result<Self, TelegramError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(TelegramError::InvalidConfig {
                reason: "bot token is empty".to_string(),
            }
            .into());
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TelegramError::InvalidConfig {
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Long-polls for updates newer than `offset`.
    #[instrument(skip(self))]
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> chat_relay_core::Result<Vec<Update>, TelegramError> {
        let body = serde_json::json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });
        let wait = Duration::from_secs(timeout_secs) + POLL_GRACE;
        let updates: Vec<Update> = self.call("getUpdates", &body, wait).await?;
        debug!(count = updates.len(), "received updates");
        Ok(updates)
    }

    /// Sends a message.
    #[instrument(skip(self, message), fields(chat_id = %message.chat_id))]
    pub async fn send_message(
        &self,
        message: &OutgoingMessage,
    ) -> chat_relay_core::Result<(), TelegramError> {
        let _sent: serde_json::Value = self.call("sendMessage", message, REQUEST_TIMEOUT).await?;
        Ok(())
    }

    async fn call<B, T>(
        &self,
        method: &str,
        body: &B,
        timeout: Duration,
    ) -> chat_relay_core::Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/bot{}/{}", self.base_url, self.token, method);
        let response = self
            .http
            .post(url)
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| TelegramError::RequestFailed {
                method: method.to_string(),
                reason: e.without_url().to_string(),
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TelegramError::RequestFailed {
                method: method.to_string(),
                reason: e.without_url().to_string(),
            })?;

        let parsed: ApiResponse<T> = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(TelegramError::Status {
                    method: method.to_string(),
                    status: status.as_u16(),
                    body: text,
                }
                .into());
            }
            Err(e) => {
                return Err(TelegramError::ResponseParseFailed {
                    method: method.to_string(),
                    reason: e.to_string(),
                }
                .into());
            }
        };

        match parsed {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse {
                ok: true,
                result: None,
                ..
            } => Err(TelegramError::ResponseParseFailed {
                method: method.to_string(),
                reason: "missing result".to_string(),
            }
            .into()),
            ApiResponse { description, .. } => Err(TelegramError::Api {
                method: method.to_string(),
                description: description.unwrap_or_else(|| format!("status {status}")),
            }
            .into()),
        }
    }
}
