mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(&config_path).await?;
    let config = parse(&config_str, env::var("OPENAI_API_KEY").ok())?;

    Ok(config)
}

/// Parses YAML configuration. `fallback_api_key` fills in `llm.api_key` when
/// the file leaves it empty.
pub fn parse(config_str: &str, fallback_api_key: Option<String>) -> Result<Config> {
    let mut config: Config = serde_yaml::from_str(config_str)?;

    if config.llm.api_key.is_empty() {
        if let Some(key) = fallback_api_key.filter(|k| !k.is_empty()) {
            debug!("Using API key from OPENAI_API_KEY");
            config.llm.api_key = key;
        }
    }

    if config.llm.api_key.is_empty() {
        return Err(Error::config(
            "llm.api_key is empty and OPENAI_API_KEY is not set",
        ));
    }

    if config.pipeline.request_timeout_secs == 0 {
        return Err(Error::config(
            "pipeline.request_timeout_secs must be greater than zero",
        ));
    }

    Ok(config)
}
