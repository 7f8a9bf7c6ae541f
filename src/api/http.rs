//! Shared HTTP plumbing for the provider clients
//!
//! One reqwest client per provider, built the same way, and one retry loop
//! for rate limits. A 429 is retried up to `max_retries` times, waiting for
//! `Retry-After` (or exponential backoff) but never longer than the request
//! timeout.

use reqwest::header::{HeaderMap, ACCEPT, RETRY_AFTER};
use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::warn;

/// Per-request timeout unless a client overrides it
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_RETRIES: u32 = 3;

/// Why a request produced no usable response
#[derive(Debug)]
pub enum SendError {
    /// Still 429 after the last retry
    RateLimited,
    Request(reqwest::Error),
}

/// reqwest client plus its retry budget
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
    max_retries: u32,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            timeout,
            max_retries: MAX_RETRIES,
        }
    }

    /// Send the request `build` produces, rebuilding it for each retry.
    ///
    /// Any status other than 429 is handed back to the caller as-is.
    pub async fn send<F>(&self, service: &'static str, build: F) -> Result<Response, SendError>
    where
        F: Fn(&reqwest::Client) -> RequestBuilder,
    {
        let mut retries = 0;

        loop {
            let response = build(&self.client)
                .header(ACCEPT, "application/json")
                .send()
                .await
                .map_err(SendError::Request)?;

            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }

            retries += 1;
            if retries >= self.max_retries {
                return Err(SendError::RateLimited);
            }

            let wait = retry_wait(response.headers(), retries, self.timeout);
            warn!(
                service,
                retry = retries,
                wait_ms = wait.as_millis() as u64,
                "Rate limited (429), backing off"
            );
            tokio::time::sleep(wait).await;
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

/// `Retry-After` seconds, else 2^attempt, capped at `cap`
pub fn retry_wait(headers: &HeaderMap, attempt: u32, cap: Duration) -> Duration {
    let secs = headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or_else(|| 2u64.saturating_pow(attempt));

    Duration::from_secs(secs).min(cap)
}
