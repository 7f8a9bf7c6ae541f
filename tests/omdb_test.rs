//! OMDb API client tests
//!
//! Tests search, lookup by id/title, the "Response: False" envelope and
//! HTTP error handling.

use marquee::api::{LookupKey, OmdbClient, OmdbError};
use mockito::{Matcher, Server};
use std::time::{Duration, Instant};

// =============================================================================
// Search Tests
// =============================================================================

#[tokio::test]
async fn test_search_sends_key_and_movie_filter() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apikey".into(), "test_key".into()),
            Matcher::UrlEncoded("s".into(), "the matrix".into()),
            Matcher::UrlEncoded("type".into(), "movie".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "Search": [
                    {"Title": "The Matrix", "Year": "1999", "imdbID": "tt0133093", "Type": "movie", "Poster": "https://m.media-amazon.com/matrix.jpg"},
                    {"Title": "The Matrix Reloaded", "Year": "2003", "imdbID": "tt0234215", "Type": "movie", "Poster": "N/A"}
                ],
                "totalResults": "2",
                "Response": "True"
            }"#,
        )
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("test_key", server.url());
    let results = client.search_titles("the matrix").await.unwrap();

    mock.assert_async().await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "The Matrix");
    assert_eq!(results[0].imdb_id, "tt0133093");
    assert_eq!(results[1].poster.as_deref(), Some("N/A"));
}

#[tokio::test]
async fn test_search_false_response_is_empty() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"Response": "False", "Error": "Movie not found!"}"#)
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("test_key", server.url());
    let results = client.search_titles("zzqqxx").await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_search_too_many_results_is_empty() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"Response": "False", "Error": "Too many results."}"#)
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("test_key", server.url());
    assert!(client.search_titles("th").await.unwrap().is_empty());
}

// =============================================================================
// Lookup Tests
// =============================================================================

const MATRIX: &str = r#"{
    "Title": "The Matrix",
    "Year": "1999",
    "Rated": "R",
    "Runtime": "136 min",
    "Genre": "Action, Sci-Fi",
    "Actors": "Keanu Reeves, Laurence Fishburne, Carrie-Anne Moss",
    "Plot": "A computer hacker learns...",
    "Poster": "https://m.media-amazon.com/matrix.jpg",
    "imdbID": "tt0133093",
    "Type": "movie",
    "Response": "True"
}"#;

#[tokio::test]
async fn test_find_by_id() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("i".into(), "tt0133093".into()),
            Matcher::UrlEncoded("plot".into(), "short".into()),
        ]))
        .with_status(200)
        .with_body(MATRIX)
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("test_key", server.url());
    let movie = client
        .find_movie(&LookupKey::Id("tt0133093".into()))
        .await
        .unwrap()
        .unwrap();

    mock.assert_async().await;

    assert_eq!(movie.title, "The Matrix");
    assert_eq!(movie.rated.as_deref(), Some("R"));
    assert_eq!(movie.runtime.as_deref(), Some("136 min"));
    assert_eq!(
        movie.actors.as_deref(),
        Some("Keanu Reeves, Laurence Fishburne, Carrie-Anne Moss")
    );
}

#[tokio::test]
async fn test_find_by_title_uses_t_param() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("t".into(), "The Matrix".into()),
            Matcher::UrlEncoded("plot".into(), "short".into()),
        ]))
        .with_status(200)
        .with_body(MATRIX)
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("test_key", server.url());
    let movie = client
        .find_movie(&LookupKey::Title("The Matrix".into()))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(movie.map(|m| m.imdb_id).as_deref(), Some("tt0133093"));
}

#[tokio::test]
async fn test_find_not_found_is_none() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"Response": "False", "Error": "Incorrect IMDb ID."}"#)
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("test_key", server.url());
    let movie = client
        .find_movie(&LookupKey::Id("tt0000000".into()))
        .await
        .unwrap();
    assert!(movie.is_none());
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[tokio::test]
async fn test_in_band_error_under_401_is_no_results() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"Response": "False", "Error": "Invalid API key!"}"#)
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("bad_key", server.url());
    assert!(client.search_titles("matrix").await.unwrap().is_empty());
    assert!(client
        .find_movie(&LookupKey::Title("Matrix".into()))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_unauthorized_without_envelope_is_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body("Unauthorized")
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("bad_key", server.url());
    let err = client.search_titles("matrix").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<OmdbError>(),
        Some(OmdbError::Unauthorized)
    ));
}

#[tokio::test]
async fn test_server_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("test_key", server.url());
    let err = client
        .find_movie(&LookupKey::Id("tt0133093".into()))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<OmdbError>(),
        Some(OmdbError::ServerError(503))
    ));
}

#[tokio::test]
async fn test_malformed_json() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>oops</html>")
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("test_key", server.url());
    let err = client.search_titles("matrix").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<OmdbError>(),
        Some(OmdbError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_rate_limit_exhausts_retries() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_header("Retry-After", "0")
        .expect(3)
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("test_key", server.url());
    let err = client.search_titles("matrix").await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(
        err.downcast_ref::<OmdbError>(),
        Some(OmdbError::RateLimited)
    ));
}

#[tokio::test]
async fn test_retry_after_capped_by_timeout() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_header("Retry-After", "86400")
        .expect(3)
        .create_async()
        .await;

    let client =
        OmdbClient::with_base_url("test_key", server.url()).with_timeout(Duration::from_millis(200));
    let started = Instant::now();
    let err = client.search_titles("matrix").await.unwrap_err();

    mock.assert_async().await;
    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(matches!(
        err.downcast_ref::<OmdbError>(),
        Some(OmdbError::RateLimited)
    ));
}
