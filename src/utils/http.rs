// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::redirect::Policy;

use crate::error::Result;
use crate::models::CheckerConfig;

/// Create a configured asynchronous HTTP client for link probes.
pub fn create_async_client(config: &CheckerConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .redirect(Policy::limited(config.max_redirects))
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .build()?;
    Ok(client)
}
