//! Client for the Marquee backend's own HTTP API
//!
//! Used by the terminal client and the CLI one-shots. Error bodies of the
//! form `{"error": "<code>"}` are surfaced as [`BackendError::Api`].

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use super::LookupKey;
use crate::models::{ErrorBody, MovieDetail, Pong, SearchResponse, SpikeReport, SuggestionItem};

/// Default backend address
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:3000";

/// Backend client error types
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Backend returned {status}: {code}")]
    Api { status: u16, code: String },

    #[error("Unexpected status: {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

impl BackendError {
    /// Whether the backend reported "no such movie"
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::Api { status: 404, .. })
    }

    /// Whether the request never got a usable answer from the backend
    pub fn is_network(&self) -> bool {
        matches!(self, BackendError::RequestFailed(_))
    }
}

/// Operations the terminal client needs from the backend
#[async_trait]
pub trait MovieBackend: Send + Sync {
    /// Type-ahead suggestions for a partial title
    async fn suggestions(&self, term: &str) -> Result<Vec<SuggestionItem>, BackendError>;

    /// Aggregated record by identifier or exact title
    async fn movie(&self, key: &LookupKey) -> Result<MovieDetail, BackendError>;

    /// Liveness probe
    async fn ping(&self) -> Result<Pong, BackendError>;
}

/// HTTP client for the backend API
pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
}

impl BackendClient {
    /// Create a client for the backend at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, BackendError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).query(params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::OK {
            return serde_json::from_str(&body)
                .map_err(|e| BackendError::InvalidResponse(format!("JSON parse error: {}", e)));
        }

        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(err) => Err(BackendError::Api {
                status: status.as_u16(),
                code: err.error,
            }),
            Err(_) => Err(BackendError::Status(status.as_u16())),
        }
    }

    /// Run the CPU spike diagnostic for roughly `ms` milliseconds
    pub async fn spike(&self, ms: u64) -> Result<SpikeReport, BackendError> {
        let ms = ms.to_string();
        self.get("/api/spike", &[("ms", ms.as_str())]).await
    }
}

#[async_trait]
impl MovieBackend for BackendClient {
    async fn suggestions(&self, term: &str) -> Result<Vec<SuggestionItem>, BackendError> {
        let response: SearchResponse = self.get("/api/search", &[("q", term)]).await?;
        Ok(response.results)
    }

    async fn movie(&self, key: &LookupKey) -> Result<MovieDetail, BackendError> {
        self.get("/api/movie", &[key.query_pair()]).await
    }

    async fn ping(&self) -> Result<Pong, BackendError> {
        self.get("/api/ping", &[]).await
    }
}
