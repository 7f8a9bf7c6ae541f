//! API clients for external services
//!
//! - OMDb: primary metadata (title search, lookup by id or exact title)
//! - TMDB: secondary cast credits and profile photos
//! - Backend: this application's own HTTP API, used by the terminal client
//!
//! The provider traits are the seams the lookup services are written against,
//! so tests can swap in stubs without a network.

pub mod backend;
mod http;
pub mod omdb;
pub mod tmdb;

use anyhow::Result;
use async_trait::async_trait;

pub use backend::{BackendClient, BackendError, MovieBackend};
pub use omdb::{OmdbClient, OmdbError, OmdbMovie, OmdbTitle};
pub use tmdb::{TmdbCastMember, TmdbClient, TmdbError, TmdbFindResult};

/// How a single movie is addressed on the primary provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    /// Primary-provider identifier (e.g. `tt0133093`)
    Id(String),
    /// Exact title; the provider answers with its single best match
    Title(String),
}

impl LookupKey {
    /// Build a key from raw request parameters.
    ///
    /// Values are trimmed and blanks ignored; an identifier wins over a title.
    /// Returns `None` when neither is usable.
    pub fn from_params(id: Option<&str>, title: Option<&str>) -> Option<Self> {
        let id = id.map(str::trim).filter(|s| !s.is_empty());
        let title = title.map(str::trim).filter(|s| !s.is_empty());

        match (id, title) {
            (Some(id), _) => Some(LookupKey::Id(id.to_string())),
            (None, Some(title)) => Some(LookupKey::Title(title.to_string())),
            (None, None) => None,
        }
    }

    /// Query parameter name and value for this key
    pub fn query_pair(&self) -> (&'static str, &str) {
        match self {
            LookupKey::Id(id) => ("id", id),
            LookupKey::Title(title) => ("title", title),
        }
    }
}

impl std::fmt::Display for LookupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupKey::Id(id) => write!(f, "id={}", id),
            LookupKey::Title(title) => write!(f, "title={}", title),
        }
    }
}

/// Primary metadata provider
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Movie-type title search, first page. An empty list means "no results".
    async fn search(&self, query: &str) -> Result<Vec<OmdbTitle>>;

    /// Full record for one movie, `None` when the provider reports no match.
    async fn lookup(&self, key: &LookupKey) -> Result<Option<OmdbMovie>>;
}

/// Secondary provider offering cast credits keyed by the primary identifier
#[async_trait]
pub trait CastProvider: Send + Sync {
    /// Cross-reference a primary identifier to the provider's own movie.
    async fn find_by_imdb(&self, imdb_id: &str) -> Result<Option<TmdbFindResult>>;

    /// Billed cast of a movie, in billing order.
    async fn credits(&self, movie_id: u64) -> Result<Vec<TmdbCastMember>>;

    /// Absolute photo URL for a provider-relative profile path.
    fn photo_url(&self, profile_path: &str) -> String {
        format!("{}{}", tmdb::TMDB_IMG_BASE, profile_path)
    }
}
