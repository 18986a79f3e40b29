use chat_relay::{config::RelayConfig, relay::Relay};
use chat_relay_ai::OpenAiClient;
use chat_relay_conversation::{
    ContextStore, ConversationService, PromptComposer, parse_seed_examples,
};
use chat_relay_telegram::TelegramClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Optional config file path as the first argument
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = RelayConfig::load(config_path.as_deref()).expect("failed to load configuration");
    tracing::info!(
        model = %config.openai.model,
        history = config.openai.max_message_pool_size,
        restricted = config.access_policy().is_restricted(),
        "Loaded configuration"
    );

    let seeds = parse_seed_examples(&config.openai.examples);
    let backend =
        OpenAiClient::new(config.backend_config()).expect("failed to build generation client");
    let service = ConversationService::new(
        Arc::new(backend),
        config.generation_settings(),
        PromptComposer::new(config.openai.system_prompt.clone(), seeds),
        ContextStore::new(config.openai.max_message_pool_size),
    )
    .with_access(config.access_policy())
    .with_presentation(config.bot.presentation.clone());

    let client = TelegramClient::new(config.bot.token.clone()).expect("failed to build bot client");
    let relay = Relay::new(
        client,
        Arc::new(service),
        config.bot.name.clone(),
        config.bot.poll_timeout_secs,
    );

    relay
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await;
}
