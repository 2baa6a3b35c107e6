// src/services/links.rs

//! Link checker service.
//!
//! Probes project URLs concurrently and reports the ones that redirect or
//! fail outright. Any other response counts as reachable, including 4xx and
//! 5xx statuses.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::header::LOCATION;

use crate::error::{AppError, Result};
use crate::models::{CheckRequest, CheckerConfig, Problem};
use crate::utils::http;

/// Reason suffix used when a redirect carries no Location header.
const NO_LOCATION: &str = "(no location)";

/// Final response of a probe, after redirects were followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub location: Option<String>,
}

/// A reachability probe for a single URL.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str) -> Result<ProbeResponse>;
}

/// Probes URLs with HEAD requests.
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(config: &CheckerConfig) -> Result<Self> {
        Ok(Self {
            client: http::create_async_client(config)?,
        })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> Result<ProbeResponse> {
        let url = url::Url::parse(url)?;
        let response = self.client.head(url).send().await?;
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok(ProbeResponse {
            status: response.status().as_u16(),
            location,
        })
    }
}

/// Service for checking project links.
pub struct LinkChecker {
    prober: Arc<dyn Prober>,
    concurrency: usize,
}

impl LinkChecker {
    /// Create a checker that probes over HTTP.
    pub fn new(config: &CheckerConfig) -> Result<Self> {
        Ok(Self::with_prober(
            Arc::new(HttpProber::new(config)?),
            config.max_concurrent,
        ))
    }

    /// Create a checker around any prober.
    pub fn with_prober(prober: Arc<dyn Prober>, concurrency: usize) -> Self {
        Self {
            prober,
            concurrency: concurrency.max(1),
        }
    }

    /// Probe every request and return the problems found.
    ///
    /// All probes run to completion; results are in completion order.
    pub async fn check(&self, requests: Vec<CheckRequest>) -> Vec<Problem> {
        let total = requests.len();
        let problems: Vec<Problem> = stream::iter(requests)
            .map(|request| async move { self.check_one(request).await })
            .buffer_unordered(self.concurrency)
            .filter_map(|problem| async move { problem })
            .collect()
            .await;

        log::info!(
            "Checked {} links, {} with problems",
            total,
            problems.len()
        );
        problems
    }

    async fn check_one(&self, request: CheckRequest) -> Option<Problem> {
        let reason = match self.prober.probe(&request.url).await {
            Ok(response) => classify(&response)?,
            Err(error) => describe(&error),
        };
        log::debug!("{} ({}): {}", request.id, request.url, reason);
        Some(Problem {
            id: request.id,
            url: request.url,
            reason,
        })
    }
}

/// Problem reason for a completed probe, if any.
fn classify(response: &ProbeResponse) -> Option<String> {
    match response.status {
        301 | 302 => Some(format!(
            "Redirects to {}",
            response.location.as_deref().unwrap_or(NO_LOCATION)
        )),
        _ => None,
    }
}

/// Error message including its source chain.
fn describe(error: &AppError) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = std::error::Error::source(cause);
    }
    message
}
