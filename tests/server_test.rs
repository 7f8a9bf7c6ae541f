//! HTTP API integration tests
//!
//! Drives the router with axum's test utilities and stub providers, so no
//! network is involved.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use marquee::api::{
    CastProvider, LookupKey, MetadataProvider, OmdbMovie, OmdbTitle, TmdbCastMember,
    TmdbFindResult,
};
use marquee::server::{create_router, AppContext};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

// =============================================================================
// Stub providers
// =============================================================================

#[derive(Default)]
struct StubMetadata {
    titles: Vec<OmdbTitle>,
    movie: Option<OmdbMovie>,
    fail: bool,
    searches: AtomicUsize,
    lookups: AtomicUsize,
}

#[async_trait]
impl MetadataProvider for StubMetadata {
    async fn search(&self, _query: &str) -> Result<Vec<OmdbTitle>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow!("connection reset by upstream 10.0.0.7"));
        }
        Ok(self.titles.clone())
    }

    async fn lookup(&self, _key: &LookupKey) -> Result<Option<OmdbMovie>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow!("connection reset by upstream 10.0.0.7"));
        }
        Ok(self.movie.clone())
    }
}

#[derive(Default)]
struct StubCast {
    found: Option<TmdbFindResult>,
    credits: Vec<TmdbCastMember>,
}

#[async_trait]
impl CastProvider for StubCast {
    async fn find_by_imdb(&self, _imdb_id: &str) -> Result<Option<TmdbFindResult>> {
        Ok(self.found.clone())
    }

    async fn credits(&self, _movie_id: u64) -> Result<Vec<TmdbCastMember>> {
        Ok(self.credits.clone())
    }
}

fn title(n: usize, poster: &str) -> OmdbTitle {
    OmdbTitle {
        title: format!("India {}", n),
        year: format!("{}", 1990 + n),
        imdb_id: format!("tt{:07}", n),
        poster: Some(poster.to_string()),
    }
}

fn lagaan() -> OmdbMovie {
    OmdbMovie {
        title: "Lagaan".into(),
        year: "2001".into(),
        rated: Some("PG".into()),
        runtime: Some("224 min".into()),
        genre: Some("Drama, Musical, Sport".into()),
        actors: Some("Aamir Khan, Gracy Singh, Rachel Shelley".into()),
        poster: Some("N/A".into()),
        imdb_id: "tt0169102".into(),
    }
}

fn member(name: &str, character: Option<&str>, path: Option<&str>) -> TmdbCastMember {
    TmdbCastMember {
        name: name.into(),
        character: character.map(String::from),
        profile_path: path.map(String::from),
    }
}

fn router(metadata: Arc<StubMetadata>, cast: Option<StubCast>) -> Router {
    let cast = cast.map(|c| Arc::new(c) as Arc<dyn CastProvider>);
    create_router(AppContext::new(metadata, cast))
}

/// Send a GET and return status plus parsed JSON body
async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, bytes) = get_raw(app, uri).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_raw(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

// =============================================================================
// Ping
// =============================================================================

#[tokio::test]
async fn test_ping() {
    let app = router(Arc::new(StubMetadata::default()), None);
    let (status, json) = get(app, "/api/ping").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    let time = json["time"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(time).is_ok());
    assert!(time.ends_with('Z'));
}

#[tokio::test]
async fn test_request_id_and_cors_headers() {
    let app = router(Arc::new(StubMetadata::default()), None);
    let response = app
        .oneshot(
            Request::get("/api/ping")
                .header("origin", "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = router(Arc::new(StubMetadata::default()), None);
    let (status, _) = get_raw(app, "/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_short_query_skips_provider() {
    let metadata = Arc::new(StubMetadata {
        titles: vec![title(1, "N/A")],
        ..Default::default()
    });

    for uri in ["/api/search", "/api/search?q=", "/api/search?q=a", "/api/search?q=%20i%20"] {
        let (status, json) = get(router(metadata.clone(), None), uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(json, serde_json::json!({ "results": [] }), "{}", uri);
    }

    assert_eq!(metadata.searches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_search_caps_results_and_nulls_missing_posters() {
    let titles = (0..10)
        .map(|n| {
            let poster = if n % 2 == 0 { "N/A" } else { "https://img/p.jpg" };
            title(n, poster)
        })
        .collect();
    let metadata = Arc::new(StubMetadata {
        titles,
        ..Default::default()
    });

    let (status, json) = get(router(metadata.clone(), None), "/api/search?q=india").await;

    assert_eq!(status, StatusCode::OK);
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 8);
    assert_eq!(results[0]["title"], "India 0");
    assert_eq!(results[0]["imdbID"], "tt0000000");
    assert!(results[0]["poster"].is_null());
    assert_eq!(results[1]["poster"], "https://img/p.jpg");
    assert_eq!(metadata.searches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_search_failure_hides_upstream_detail() {
    let metadata = Arc::new(StubMetadata {
        fail: true,
        ..Default::default()
    });

    let (status, bytes) = get_raw(router(metadata, None), "/api/search?q=india").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = String::from_utf8(bytes).unwrap();
    assert_eq!(body, r#"{"error":"search_failed"}"#);
}

// =============================================================================
// Movie
// =============================================================================

#[tokio::test]
async fn test_movie_requires_id_or_title() {
    let metadata = Arc::new(StubMetadata {
        movie: Some(lagaan()),
        ..Default::default()
    });

    for uri in ["/api/movie", "/api/movie?id=%20&title="] {
        let (status, json) = get(router(metadata.clone(), None), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "missing_id_or_title");
    }
    assert_eq!(metadata.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_movie_not_found() {
    let metadata = Arc::new(StubMetadata::default());
    let (status, json) = get(router(metadata, None), "/api/movie?id=tt0000000").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn test_movie_upstream_failure() {
    let metadata = Arc::new(StubMetadata {
        fail: true,
        ..Default::default()
    });
    let (status, json) = get(router(metadata, None), "/api/movie?id=tt0169102").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "movie_failed");
}

#[tokio::test]
async fn test_movie_enriched_cast() {
    let metadata = Arc::new(StubMetadata {
        movie: Some(lagaan()),
        ..Default::default()
    });
    let cast = StubCast {
        found: Some(TmdbFindResult {
            id: 19666,
            title: Some("Lagaan: Once Upon a Time in India".into()),
        }),
        credits: vec![
            member("Aamir Khan", Some("Bhuvan"), Some("/aamir.jpg")),
            member("Gracy Singh", None, None),
            member("Rachel Shelley", Some(""), Some("/rachel.jpg")),
            member("Paul Blackthorne", Some("Captain Russell"), None),
        ],
    };

    let (status, json) = get(router(metadata, Some(cast)), "/api/movie?id=tt0169102").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Lagaan");
    assert_eq!(json["imdbID"], "tt0169102");
    assert!(json["poster"].is_null());
    assert_eq!(json["genre"], "Drama, Musical, Sport");
    assert_eq!(json["rated"], "PG");
    assert_eq!(json["runtime"], "224 min");

    let actors = json["actors"].as_array().unwrap();
    assert_eq!(actors.len(), 3);
    assert_eq!(actors[0]["name"], "Aamir Khan");
    assert_eq!(actors[0]["character"], "Bhuvan");
    assert_eq!(actors[0]["photo"], "https://image.tmdb.org/t/p/w185/aamir.jpg");
    assert_eq!(actors[1]["character"], "Actor");
    assert!(actors[1]["photo"].is_null());
    assert_eq!(actors[2]["character"], "Actor");
}

#[tokio::test]
async fn test_movie_zero_credits_falls_back_to_names() {
    let metadata = Arc::new(StubMetadata {
        movie: Some(lagaan()),
        ..Default::default()
    });
    let cast = StubCast {
        found: Some(TmdbFindResult {
            id: 19666,
            title: None,
        }),
        credits: Vec::new(),
    };

    let (_, json) = get(router(metadata, Some(cast)), "/api/movie?id=tt0169102").await;

    let actors = json["actors"].as_array().unwrap();
    let names: Vec<&str> = actors.iter().map(|a| a["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Aamir Khan", "Gracy Singh", "Rachel Shelley"]);
    assert!(actors
        .iter()
        .all(|a| a["character"] == "Actor" && a["photo"].is_null()));
}

#[tokio::test]
async fn test_movie_by_id_and_title_agree_and_repeat() {
    let metadata = Arc::new(StubMetadata {
        movie: Some(lagaan()),
        ..Default::default()
    });

    let (_, by_id) = get_raw(router(metadata.clone(), None), "/api/movie?id=tt0169102").await;
    let (_, by_title) = get_raw(router(metadata.clone(), None), "/api/movie?title=Lagaan").await;
    let (_, again) = get_raw(router(metadata.clone(), None), "/api/movie?id=tt0169102").await;

    assert_eq!(by_id, by_title);
    assert_eq!(by_id, again);
}

// =============================================================================
// Spike and diagnostics
// =============================================================================

#[tokio::test]
async fn test_spike_clamps_to_minimum() {
    let app = router(Arc::new(StubMetadata::default()), None);
    let (status, json) = get(app, "/api/spike?ms=10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["spikedMs"], 500);
    assert!(json["dummy"].is_number());
}

#[tokio::test]
async fn test_debug_tmdb_without_key() {
    let app = router(Arc::new(StubMetadata::default()), None);
    let (status, json) = get(app, "/api/debug-tmdb/tt0169102").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["error"], "No TMDB key configured");
}

#[tokio::test]
async fn test_debug_tmdb_reports_raw_cast() {
    let cast = StubCast {
        found: Some(TmdbFindResult {
            id: 19666,
            title: Some("Lagaan".into()),
        }),
        credits: vec![member("Aamir Khan", Some("Bhuvan"), Some("/aamir.jpg"))],
    };
    let app = router(Arc::new(StubMetadata::default()), Some(cast));
    let (status, json) = get(app, "/api/debug-tmdb/tt0169102").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["imdbID"], "tt0169102");
    assert_eq!(json["tmdbMovie"]["id"], 19666);
    assert_eq!(json["cast"][0]["profile_path"], "/aamir.jpg");
    assert_eq!(
        json["cast"][0]["full_photo_url"],
        "https://image.tmdb.org/t/p/w185/aamir.jpg"
    );
}

#[tokio::test]
async fn test_debug_tmdb_no_match() {
    let app = router(Arc::new(StubMetadata::default()), Some(StubCast::default()));
    let (_, json) = get(app, "/api/debug-tmdb/tt0000000").await;
    assert_eq!(json["error"], "No movie found in TMDB");
}

// =============================================================================
// OMDb in-band errors
// =============================================================================

/// Router backed by a real OMDb client pointed at a mock server answering
/// every request with 401 and an OMDb error envelope
async fn quota_exhausted_router() -> (mockito::ServerGuard, Router) {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(mockito::Matcher::Any)
        .with_status(401)
        .with_body(r#"{"Response":"False","Error":"Request limit reached!"}"#)
        .create_async()
        .await;

    let omdb = marquee::OmdbClient::with_base_url("k", server.url());
    let app = create_router(AppContext::new(Arc::new(omdb), None));
    (server, app)
}

#[tokio::test]
async fn test_omdb_in_band_error_search_is_empty() {
    let (_server, app) = quota_exhausted_router().await;
    let (status, json) = get(app, "/api/search?q=matrix").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({ "results": [] }));
}

#[tokio::test]
async fn test_omdb_in_band_error_movie_is_not_found() {
    let (_server, app) = quota_exhausted_router().await;
    let (status, json) = get(app, "/api/movie?title=Matrix").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}
