//! Search proxy: partial title in, compact suggestion list out.

use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

use crate::api::{MetadataProvider, OmdbTitle};
use crate::models::{present_url, SuggestionItem};

/// Shortest query (in characters) that reaches the provider
pub const MIN_QUERY_CHARS: usize = 2;

/// Longest suggestion list returned
pub const MAX_SUGGESTIONS: usize = 8;

/// Whether a trimmed query is long enough to search
pub fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_CHARS
}

/// Forwards partial titles to the primary provider
#[derive(Clone)]
pub struct SearchProxy {
    provider: Arc<dyn MetadataProvider>,
}

impl SearchProxy {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self { provider }
    }

    /// Suggestions for `query`.
    ///
    /// Short queries and provider "no results" both give an empty list;
    /// only transport or parse failures are errors.
    pub async fn suggest(&self, query: &str) -> Result<Vec<SuggestionItem>> {
        let query = query.trim();
        if !is_searchable(query) {
            return Ok(Vec::new());
        }

        let hits = self.provider.search(query).await?;
        debug!(query, hits = hits.len(), "provider search complete");

        Ok(hits
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(to_suggestion)
            .collect())
    }
}

fn to_suggestion(hit: OmdbTitle) -> SuggestionItem {
    SuggestionItem {
        title: hit.title,
        year: hit.year,
        imdb_id: hit.imdb_id,
        poster: present_url(hit.poster),
    }
}
