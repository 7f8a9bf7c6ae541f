//! Data structures shared by the backend and the terminal client
//!
//! Organized by the wire contract:
//! - **Suggestions**: compact type-ahead entries from `/api/search`
//! - **Details**: the aggregated movie record from `/api/movie`
//! - **Service**: liveness and diagnostic payloads

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value OMDb puts in text fields it has no data for.
pub const MISSING_SENTINEL: &str = "N/A";

/// Role shown for a cast member when the provider gives none.
pub const DEFAULT_CHARACTER: &str = "Actor";

/// Normalize a provider image field: `None` for empty or sentinel values.
pub fn present_url(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && v != MISSING_SENTINEL
    })
}

// =============================================================================
// Suggestions
// =============================================================================

/// A lightweight candidate shown during incremental search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionItem {
    pub title: String,
    pub year: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    pub poster: Option<String>,
}

impl fmt::Display for SuggestionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) [{}]", self.title, self.year, self.imdb_id)
    }
}

/// Body of a successful `/api/search` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SuggestionItem>,
}

// =============================================================================
// Details
// =============================================================================

/// One billed cast member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorRef {
    pub name: String,
    pub character: String,
    pub photo: Option<String>,
}

impl ActorRef {
    /// Cast entry known only by name (no role, no photo)
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            character: DEFAULT_CHARACTER.to_string(),
            photo: None,
        }
    }
}

/// Full movie record returned by the detail endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub title: String,
    pub year: String,
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(default)]
    pub actors: Vec<ActorRef>,
}

impl fmt::Display for MovieDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.year)?;
        if let Some(runtime) = &self.runtime {
            write!(f, " - {}", runtime)?;
        }
        Ok(())
    }
}

// =============================================================================
// Service payloads
// =============================================================================

/// Error body: only a stable code, never upstream detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Liveness probe reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pong {
    pub ok: bool,
    pub time: String,
}

/// Result of a CPU spike run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpikeReport {
    #[serde(rename = "spikedMs")]
    pub spiked_ms: u64,
    pub dummy: f64,
}
