//! HTTP backend: search proxy and detail aggregator behind a small JSON API

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request},
    Router,
};
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::api::{CastProvider, MetadataProvider, OmdbClient, TmdbClient};
use crate::config::Config;
use crate::service::{DetailAggregator, SearchProxy};

pub mod error;
pub mod routes;

pub use error::ApiError;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub search: SearchProxy,
    pub detail: DetailAggregator,
}

impl AppContext {
    pub fn new(
        metadata: Arc<dyn MetadataProvider>,
        cast: Option<Arc<dyn CastProvider>>,
    ) -> Self {
        Self {
            search: SearchProxy::new(metadata.clone()),
            detail: DetailAggregator::new(metadata, cast),
        }
    }

    /// Build the live provider clients from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = config.request_timeout();
        let omdb = OmdbClient::new(config.omdb_key()?).with_timeout(timeout);

        let tmdb = config.tmdb_key().map(|key| {
            Arc::new(TmdbClient::new(key).with_timeout(timeout)) as Arc<dyn CastProvider>
        });
        if tmdb.is_none() {
            tracing::info!("No TMDB key configured, cast photos disabled");
        }

        Ok(Self::new(Arc::new(omdb), tmdb))
    }
}

/// Stamps each request with a fresh UUID in `x-request-id`
#[derive(Clone, Copy, Default)]
struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    Router::new()
        .nest("/api", routes::api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                .layer(trace)
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors),
        )
        .with_state(ctx)
}

/// Start the HTTP server and run until Ctrl+C or SIGTERM
pub async fn start_server(config: Config) -> Result<()> {
    let addr = config.listen_addr()?;
    let ctx = AppContext::from_config(&config)?;
    let app = create_router(ctx);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
