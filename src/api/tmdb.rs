//! TMDB (The Movie Database) API client
//!
//! Secondary provider used only for cast photos: cross-reference an IMDb id
//! to a TMDB movie, then read that movie's credits.
//! API docs: https://developer.themoviedb.org/docs

use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use super::http::{HttpClient, SendError};
use super::CastProvider;

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Image CDN prefix for profile photos (185px wide)
pub const TMDB_IMG_BASE: &str = "https://image.tmdb.org/t/p/w185";

/// TMDB API error types
#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Credentials rejected (401)")]
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

/// How the credential is presented to TMDB
#[derive(Debug, Clone, PartialEq, Eq)]
enum Auth {
    /// v3 key, sent as the `api_key` query parameter
    ApiKey(String),
    /// v4 read token, sent as a bearer header
    Bearer(String),
}

impl Auth {
    fn from_key(key: String) -> Self {
        if is_v4_token(&key) {
            Auth::Bearer(key)
        } else {
            Auth::ApiKey(key)
        }
    }
}

/// v4 tokens are long JWTs (they start with "ey")
pub fn is_v4_token(key: &str) -> bool {
    key.len() > 40 && key.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("ey"))
}

/// TMDB API client
pub struct TmdbClient {
    auth: Auth,
    base_url: String,
    http: HttpClient,
}

impl TmdbClient {
    /// Create a new TMDB client with a v3 key or v4 token
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, TMDB_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            auth: Auth::from_key(api_key.into()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: HttpClient::default(),
        }
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = HttpClient::new(timeout);
        self
    }

    /// Make an authenticated GET request
    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .http
            .send("tmdb", |client| {
                let request = client.get(&url).query(params);
                match &self.auth {
                    Auth::ApiKey(key) => request.query(&[("api_key", key.as_str())]),
                    Auth::Bearer(token) => request.bearer_auth(token),
                }
            })
            .await
            .map_err(TmdbError::from)?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await.map_err(TmdbError::from)?;
                let parsed: T = serde_json::from_str(&body)
                    .map_err(|e| TmdbError::InvalidResponse(format!("JSON parse error: {}", e)))?;
                Ok(parsed)
            }
            StatusCode::NOT_FOUND => Err(TmdbError::NotFound.into()),
            StatusCode::UNAUTHORIZED => Err(TmdbError::Unauthorized.into()),
            status => Err(TmdbError::ServerError(status.as_u16()).into()),
        }
    }

    /// Map an IMDb id to the first matching TMDB movie
    pub async fn find_movie(&self, imdb_id: &str) -> Result<Option<TmdbFindResult>> {
        let endpoint = format!("/find/{}", urlencoding::encode(imdb_id));
        let response: FindResponse = self
            .get(&endpoint, &[("external_source", "imdb_id")])
            .await?;
        Ok(response.movie_results.into_iter().next())
    }

    /// Billed cast for a TMDB movie id
    pub async fn movie_credits(&self, movie_id: u64) -> Result<Vec<TmdbCastMember>> {
        let endpoint = format!("/movie/{}/credits", movie_id);
        let response: CreditsResponse = self.get(&endpoint, &[]).await?;
        Ok(response.cast)
    }
}

#[async_trait]
impl CastProvider for TmdbClient {
    async fn find_by_imdb(&self, imdb_id: &str) -> Result<Option<TmdbFindResult>> {
        self.find_movie(imdb_id).await
    }

    async fn credits(&self, movie_id: u64) -> Result<Vec<TmdbCastMember>> {
        self.movie_credits(movie_id).await
    }
}

impl From<SendError> for TmdbError {
    fn from(err: SendError) -> Self {
        match err {
            SendError::RateLimited => TmdbError::RateLimited,
            SendError::Request(e) => TmdbError::RequestFailed(e),
        }
    }
}

// =============================================================================
// Response Structures
// =============================================================================

/// A movie matched by external id
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbFindResult {
    pub id: u64,
    pub title: Option<String>,
}

/// One cast credit
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbCastMember {
    pub name: String,
    pub character: Option<String>,
    /// Relative path under the image CDN, e.g. `/abc.jpg`
    pub profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    movie_results: Vec<TmdbFindResult>,
}

#[derive(Debug, Deserialize)]
struct CreditsResponse {
    #[serde(default)]
    cast: Vec<TmdbCastMember>,
}
