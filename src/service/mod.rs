//! Lookup services behind the HTTP endpoints
//!
//! - `search`: type-ahead suggestions from the primary provider
//! - `detail`: full movie record, enriched with cast photos when possible

pub mod detail;
pub mod search;

pub use detail::{CastSource, DetailAggregator, DetailOutcome};
pub use search::{SearchProxy, MAX_SUGGESTIONS, MIN_QUERY_CHARS};
