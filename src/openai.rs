//! OpenAI client configuration.

use crate::config::AiSettings;
use crate::error::Result;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create an OpenAI client from the AI settings.
///
/// An unset `api_key` leaves the key to `OPENAI_API_KEY`.
pub fn create_client(settings: &AiSettings) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_seconds))
        .build()?;

    let mut config = OpenAIConfig::default();
    if let Some(key) = &settings.api_key {
        config = config.with_api_key(key);
    }
    if let Some(base) = &settings.api_base {
        config = config.with_api_base(base);
    }

    Ok(Client::with_config(config).with_http_client(http_client))
}

/// Check if an API key is available from settings or the environment.
pub fn is_api_key_configured(settings: &AiSettings) -> bool {
    settings.api_key.as_deref().is_some_and(|k| !k.is_empty())
        || std::env::var("OPENAI_API_KEY").is_ok()
}
