//! OMDb (Open Movie Database) API client
//!
//! Primary metadata provider: movie search by title and full records by
//! IMDb id or exact title. Every call carries the `apikey` query parameter.
//! API docs: https://www.omdbapi.com/

use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::http::{HttpClient, SendError};
use super::{LookupKey, MetadataProvider};

const OMDB_BASE_URL: &str = "https://www.omdbapi.com";

/// OMDb API error types
#[derive(Error, Debug)]
pub enum OmdbError {
    #[error("API key rejected (401)")]
    Unauthorized,

    #[error("Rate limited (429), retries exhausted")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// OMDb API client
pub struct OmdbClient {
    api_key: String,
    base_url: String,
    http: HttpClient,
}

impl OmdbClient {
    /// Create a new OMDb client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, OMDB_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: HttpClient::default(),
        }
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = HttpClient::new(timeout);
        self
    }

    /// GET the API root with the key plus `params`.
    ///
    /// OMDb reports failures in the body (`"Response": "False"`), sometimes
    /// under a non-200 status such as 401 for a bad key or an exhausted quota.
    /// Such bodies are decoded like any other reply; the status only decides
    /// the error when the body is not an OMDb envelope.
    async fn get<T: for<'de> Deserialize<'de>>(&self, params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/", self.base_url);

        let response = self
            .http
            .send("omdb", |client| {
                client
                    .get(&url)
                    .query(&[("apikey", self.api_key.as_str())])
                    .query(params)
            })
            .await
            .map_err(OmdbError::from)?;

        let status = response.status();
        let body = response.text().await.map_err(OmdbError::from)?;

        if status == StatusCode::OK || reports_failure(&body) {
            if status != StatusCode::OK {
                warn!(status = status.as_u16(), "OMDb replied with an in-band error");
            }
            let parsed: T = serde_json::from_str(&body)
                .map_err(|e| OmdbError::InvalidResponse(format!("JSON parse error: {}", e)))?;
            return Ok(parsed);
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(OmdbError::Unauthorized.into()),
            status => Err(OmdbError::ServerError(status.as_u16()).into()),
        }
    }

    /// Search movies by title (first page). "No results" is an empty list.
    pub async fn search_titles(&self, query: &str) -> Result<Vec<OmdbTitle>> {
        let envelope: SearchEnvelope = self
            .get(&[("s", query), ("type", "movie"), ("page", "1")])
            .await?;

        if !envelope.is_success() {
            debug!(query, reason = ?envelope.error, "OMDb search returned no results");
            return Ok(Vec::new());
        }

        Ok(envelope.search.unwrap_or_default())
    }

    /// Fetch one movie (short plot) by id or exact title
    pub async fn find_movie(&self, key: &LookupKey) -> Result<Option<OmdbMovie>> {
        let (param, value) = match key {
            LookupKey::Id(id) => ("i", id.as_str()),
            LookupKey::Title(title) => ("t", title.as_str()),
        };

        let envelope: LookupEnvelope = self.get(&[(param, value), ("plot", "short")]).await?;

        if !envelope.is_success() {
            debug!(%key, reason = ?envelope.error, "OMDb lookup found nothing");
            return Ok(None);
        }

        Ok(Some(envelope.movie))
    }
}

#[async_trait]
impl MetadataProvider for OmdbClient {
    async fn search(&self, query: &str) -> Result<Vec<OmdbTitle>> {
        self.search_titles(query).await
    }

    async fn lookup(&self, key: &LookupKey) -> Result<Option<OmdbMovie>> {
        self.find_movie(key).await
    }
}

impl From<SendError> for OmdbError {
    fn from(err: SendError) -> Self {
        match err {
            SendError::RateLimited => OmdbError::RateLimited,
            SendError::Request(e) => OmdbError::RequestFailed(e),
        }
    }
}

// =============================================================================
// Response Structures
// =============================================================================

/// One hit of a title search, as OMDb sends it
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OmdbTitle {
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "imdbID", default)]
    pub imdb_id: String,
    /// URL or the `"N/A"` sentinel
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
}

/// Full movie record, as OMDb sends it
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OmdbMovie {
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Rated")]
    pub rated: Option<String>,
    #[serde(rename = "Runtime")]
    pub runtime: Option<String>,
    #[serde(rename = "Genre")]
    pub genre: Option<String>,
    /// Comma-separated top-billed names
    #[serde(rename = "Actors")]
    pub actors: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
    #[serde(rename = "imdbID", default)]
    pub imdb_id: String,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Search")]
    search: Option<Vec<OmdbTitle>>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl SearchEnvelope {
    fn is_success(&self) -> bool {
        !is_false(&self.response) && self.search.is_some()
    }
}

#[derive(Debug, Deserialize)]
struct LookupEnvelope {
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(flatten)]
    movie: OmdbMovie,
}

impl LookupEnvelope {
    fn is_success(&self) -> bool {
        !is_false(&self.response)
    }
}

fn is_false(response: &str) -> bool {
    response.eq_ignore_ascii_case("false")
}

/// Only the status flag, for bodies that arrive under an error status
#[derive(Debug, Deserialize)]
struct ResponseFlag {
    #[serde(rename = "Response")]
    response: String,
}

/// Whether `body` is an OMDb envelope reporting a failure
fn reports_failure(body: &str) -> bool {
    serde_json::from_str::<ResponseFlag>(body).is_ok_and(|flag| is_false(&flag.response))
}
