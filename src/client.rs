//! HTTP client construction shared by every outbound service.

use crate::error::{Result, SpotterError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for outbound API requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Build a `reqwest` client with the given request timeout.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("spotter/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| SpotterError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Build an OpenAI client with an explicit key, API root and request timeout.
pub fn openai_client(api_key: &str, api_base: &str, timeout: Duration) -> Result<Client<OpenAIConfig>> {
    let config = OpenAIConfig::new()
        .with_api_key(api_key)
        .with_api_base(api_base.trim_end_matches('/'));
    Ok(Client::with_config(config).with_http_client(http_client(timeout)?))
}
