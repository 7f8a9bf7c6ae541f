use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::api::LookupKey;
use crate::models::{MovieDetail, Pong, SearchResponse, SpikeReport};
use crate::server::{error::ApiError, AppContext};
use crate::service::DetailOutcome;

pub const SPIKE_DEFAULT_MS: u64 = 5_000;
pub const SPIKE_MIN_MS: u64 = 500;
pub const SPIKE_MAX_MS: u64 = 20_000;

/// Cast entries shown by the TMDB debug endpoint
const DEBUG_CAST_LIMIT: usize = 5;

pub fn api_routes() -> Router<AppContext> {
    Router::new()
        .route("/ping", get(ping))
        .route("/search", get(search))
        .route("/movie", get(movie))
        .route("/spike", get(spike))
        .route("/debug-tmdb/:imdb_id", get(debug_tmdb))
}

async fn ping() -> Json<Pong> {
    Json(Pong {
        ok: true,
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

async fn search(
    State(ctx): State<AppContext>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let q = params.q.unwrap_or_default();

    match ctx.search.suggest(&q).await {
        Ok(results) => Ok(Json(SearchResponse { results })),
        Err(e) => {
            warn!(query = %q.trim(), error = %e, "search failed");
            Err(ApiError::SearchFailed)
        }
    }
}

#[derive(Deserialize)]
struct MovieQuery {
    id: Option<String>,
    title: Option<String>,
}

async fn movie(
    State(ctx): State<AppContext>,
    Query(params): Query<MovieQuery>,
) -> Result<Json<MovieDetail>, ApiError> {
    let key = LookupKey::from_params(params.id.as_deref(), params.title.as_deref())
        .ok_or(ApiError::MissingIdOrTitle)?;

    match ctx.detail.lookup(&key).await {
        DetailOutcome::Found(detail) => Ok(Json(detail)),
        DetailOutcome::NotFound => Err(ApiError::NotFound),
        DetailOutcome::Failed(_) => Err(ApiError::MovieFailed),
    }
}

#[derive(Deserialize)]
struct SpikeQuery {
    ms: Option<String>,
}

/// Requested spike length: default when absent or not a number, then clamped
pub fn clamp_spike_ms(raw: Option<&str>) -> u64 {
    let requested = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(SPIKE_DEFAULT_MS as f64);

    requested.clamp(SPIKE_MIN_MS as f64, SPIKE_MAX_MS as f64) as u64
}

/// Busy-loop on the current thread for `duration`, returning a throwaway sum
pub fn burn_cpu(duration: Duration) -> f64 {
    let end = Instant::now() + duration;
    let mut x = 0.0_f64;
    let mut i: u64 = 0;

    while Instant::now() < end {
        i = i.wrapping_add(1);
        let a = (i % 1_000) as f64 / 1_000.0;
        x += a.sqrt() * (1.0 - a).sqrt();
    }
    x
}

async fn spike(Query(params): Query<SpikeQuery>) -> Result<Json<SpikeReport>, ApiError> {
    let ms = clamp_spike_ms(params.ms.as_deref());
    info!(ms, "starting CPU spike");

    // Runs on the blocking pool so request handling elsewhere keeps going
    let dummy = tokio::task::spawn_blocking(move || burn_cpu(Duration::from_millis(ms)))
        .await
        .map_err(|e| {
            warn!(error = %e, "spike worker failed");
            ApiError::SpikeFailed
        })?;

    Ok(Json(SpikeReport {
        spiked_ms: ms,
        dummy,
    }))
}

async fn debug_tmdb(State(ctx): State<AppContext>, Path(imdb_id): Path<String>) -> Json<Value> {
    let Some(provider) = ctx.detail.cast_provider() else {
        return Json(json!({ "error": "No TMDB key configured" }));
    };

    let movie = match provider.find_by_imdb(&imdb_id).await {
        Ok(Some(movie)) => movie,
        Ok(None) => return Json(json!({ "error": "No movie found in TMDB" })),
        Err(e) => return Json(json!({ "error": format!("TMDB find failed: {}", e) })),
    };

    let cast = match provider.credits(movie.id).await {
        Ok(cast) => cast,
        Err(e) => return Json(json!({ "error": format!("TMDB credits failed: {}", e) })),
    };

    let cast: Vec<Value> = cast
        .into_iter()
        .take(DEBUG_CAST_LIMIT)
        .map(|c| {
            let full_photo_url = c.profile_path.as_deref().map(|p| provider.photo_url(p));
            json!({
                "name": c.name,
                "character": c.character,
                "profile_path": c.profile_path,
                "full_photo_url": full_photo_url,
            })
        })
        .collect();

    Json(json!({
        "imdbID": imdb_id,
        "tmdbMovie": { "id": movie.id, "title": movie.title },
        "cast": cast,
    }))
}
