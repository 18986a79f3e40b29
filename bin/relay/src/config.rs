//! Centralized bot configuration.
//!
//! Loaded via the `config` crate from an optional TOML file, overridden by
//! environment variables such as `RELAY__OPENAI__API_KEY`.

use chat_relay_ai::OpenAiClientConfig;
use chat_relay_conversation::{AccessPolicy, GenerationSettings};
use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Messaging platform settings.
    pub bot: BotConfig,

    /// Generation backend settings.
    pub openai: OpenAiConfig,
}

/// Telegram-side settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Bot API token.
    pub token: String,

    /// Bot username; group messages must mention `@name` to be answered.
    pub name: String,

    /// Text sent to the model when a user runs `/start`.
    #[serde(default = "default_presentation")]
    pub presentation: String,

    /// User first names or group titles allowed to talk to the bot.
    /// Empty means everyone. Accepts a list or a comma separated string.
    #[serde(default, deserialize_with = "comma_list")]
    pub whitelist: Vec<String>,

    /// Server-side long-poll timeout, in seconds.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
}

/// Generation backend settings.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// API key sent as a bearer token.
    pub api_key: String,

    /// Chat-completions endpoint.
    #[serde(default = "default_url")]
    pub url: String,

    /// Model identifier.
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum tokens to generate per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// System prompt placed first in every request.
    #[serde(default)]
    pub system_prompt: String,

    /// Number of turns kept per private conversation.
    #[serde(default = "default_max_message_pool_size")]
    pub max_message_pool_size: usize,

    /// Backend request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Seed examples in `"role:content"` form, in order.
    #[serde(default)]
    pub examples: Vec<String>,
}

fn default_presentation() -> String {
    "Introduce yourself briefly.".to_string()
}

fn default_poll_timeout_secs() -> u64 {
    30
}

fn default_url() -> String {
    chat_relay_ai::openai::DEFAULT_COMPLETIONS_URL.to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    500
}

fn default_max_message_pool_size() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    50
}

fn comma_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        String(String),
        List(Vec<String>),
    }

    let names = match StringOrList::deserialize(deserializer)? {
        StringOrList::String(s) => s.split(',').map(str::to_string).collect(),
        StringOrList::List(list) => list,
    };
    Ok(names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect())
}

impl RelayConfig {
    /// Loads configuration from an optional file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_from(path, None)
    }

    fn load_from(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder
            .add_source(
                config::Environment::with_prefix("RELAY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }

    /// Returns the allow-list as an access policy.
    #[must_use]
    pub fn access_policy(&self) -> AccessPolicy {
        AccessPolicy::from_names(&self.bot.whitelist)
    }

    /// Returns the model parameters for every request.
    #[must_use]
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            model: self.openai.model.clone(),
            temperature: self.openai.temperature,
            max_tokens: self.openai.max_tokens,
        }
    }

    /// Returns the backend client settings.
    #[must_use]
    pub fn backend_config(&self) -> OpenAiClientConfig {
        OpenAiClientConfig::new(self.openai.api_key.clone())
            .with_url(self.openai.url.clone())
            .with_timeout(Duration::from_secs(self.openai.timeout_secs))
    }
}
