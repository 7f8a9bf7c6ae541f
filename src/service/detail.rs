//! Detail aggregator: one movie from the primary provider, with cast photos
//! overlaid from the secondary provider when it can supply them.
//!
//! The lookup runs in three steps:
//!
//! 1. Primary lookup by id or exact title. A provider "no match" becomes
//!    [`DetailOutcome::NotFound`]; transport and parse errors become
//!    [`DetailOutcome::Failed`].
//! 2. Enrichment: cross-reference the resolved IMDb id on the cast provider
//!    and take the first [`MAX_CAST`] credits. Errors here are logged and
//!    dropped; they never change the outcome of step 1.
//! 3. Fallback: if enrichment produced nobody, use the names from the
//!    primary record's comma-separated actor field.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::{CastProvider, LookupKey, MetadataProvider, OmdbMovie, TmdbCastMember};
use crate::models::{present_url, ActorRef, MovieDetail, DEFAULT_CHARACTER};

/// Most cast members attached to a record
pub const MAX_CAST: usize = 3;

/// Result of a detail lookup
#[derive(Debug)]
pub enum DetailOutcome {
    Found(MovieDetail),
    NotFound,
    Failed(anyhow::Error),
}

impl DetailOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, DetailOutcome::Found(_))
    }
}

/// Where the cast list of a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastSource {
    /// Secondary provider credits, possibly with photos
    Enriched,
    /// Names parsed from the primary record
    Fallback,
}

/// Builds [`MovieDetail`] records from both providers
#[derive(Clone)]
pub struct DetailAggregator {
    metadata: Arc<dyn MetadataProvider>,
    cast: Option<Arc<dyn CastProvider>>,
}

impl DetailAggregator {
    pub fn new(metadata: Arc<dyn MetadataProvider>, cast: Option<Arc<dyn CastProvider>>) -> Self {
        Self { metadata, cast }
    }

    /// The configured secondary provider, if any
    pub fn cast_provider(&self) -> Option<&Arc<dyn CastProvider>> {
        self.cast.as_ref()
    }

    /// Look up one movie and attach its top cast
    pub async fn lookup(&self, key: &LookupKey) -> DetailOutcome {
        let movie = match self.metadata.lookup(key).await {
            Ok(Some(movie)) => movie,
            Ok(None) => {
                debug!(%key, "primary provider has no match");
                return DetailOutcome::NotFound;
            }
            Err(e) => {
                warn!(%key, error = %e, "primary lookup failed");
                return DetailOutcome::Failed(e);
            }
        };

        let (actors, source) = self.resolve_cast(&movie).await;
        info!(
            %key,
            imdb_id = %movie.imdb_id,
            actors = actors.len(),
            cast_source = ?source,
            "movie detail assembled"
        );

        DetailOutcome::Found(into_detail(movie, actors))
    }

    async fn resolve_cast(&self, movie: &OmdbMovie) -> (Vec<ActorRef>, CastSource) {
        let enriched = self.enrich(&movie.imdb_id).await;
        if !enriched.is_empty() {
            return (enriched, CastSource::Enriched);
        }
        (fallback_cast(movie.actors.as_deref()), CastSource::Fallback)
    }

    /// Best-effort cast with photos; any failure yields an empty list
    async fn enrich(&self, imdb_id: &str) -> Vec<ActorRef> {
        let Some(provider) = &self.cast else {
            debug!("no cast provider configured, skipping photos");
            return Vec::new();
        };
        if imdb_id.trim().is_empty() {
            return Vec::new();
        }

        match top_cast(provider.as_ref(), imdb_id).await {
            Ok(actors) => actors,
            Err(e) => {
                warn!(imdb_id, error = %e, "cast enrichment failed, using fallback");
                Vec::new()
            }
        }
    }
}

/// First [`MAX_CAST`] credits of the movie cross-referenced by `imdb_id`
pub async fn top_cast(provider: &dyn CastProvider, imdb_id: &str) -> Result<Vec<ActorRef>> {
    let Some(movie) = provider
        .find_by_imdb(imdb_id)
        .await
        .context("cross-reference lookup failed")?
    else {
        debug!(imdb_id, "no secondary match for identifier");
        return Ok(Vec::new());
    };

    let credits = provider
        .credits(movie.id)
        .await
        .context("credits lookup failed")?;

    Ok(credits
        .into_iter()
        .take(MAX_CAST)
        .map(|member| to_actor(provider, member))
        .collect())
}

fn to_actor(provider: &dyn CastProvider, member: TmdbCastMember) -> ActorRef {
    let character = member
        .character
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CHARACTER.to_string());
    let photo = member
        .profile_path
        .filter(|p| !p.is_empty())
        .map(|p| provider.photo_url(&p));

    ActorRef {
        name: member.name,
        character,
        photo,
    }
}

/// Name-only cast from a comma-separated list: trimmed, blanks dropped, first three
pub fn fallback_cast(names: Option<&str>) -> Vec<ActorRef> {
    names
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .take(MAX_CAST)
        .map(ActorRef::named)
        .collect()
}

fn into_detail(movie: OmdbMovie, actors: Vec<ActorRef>) -> MovieDetail {
    MovieDetail {
        title: movie.title,
        year: movie.year,
        poster: present_url(movie.poster),
        genre: movie.genre,
        rated: movie.rated,
        runtime: movie.runtime,
        imdb_id: movie.imdb_id,
        actors,
    }
}
