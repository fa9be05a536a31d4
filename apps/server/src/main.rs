// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Eshant Engine Server - manufacturability analysis over HTTP.
//!
//! Accepts STL, OBJ and 3MF uploads, computes geometry metrics (bounding
//! box, volume, area, mass, feature count, complexity, overhangs, wall
//! thickness) and caches them by content hash.
//!
//! # Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `POST /api/v1/analyze` - Analyze an uploaded mesh (multipart `file`)
//! - `POST /api/v1/feasibility` - Feasibility verdict (query parameters)
//! - `GET /api/v1/cache/:key` - Retrieve a cached analysis

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use eshant_processing::{FeasibilityChecker, GeometryPipeline, StubFeasibilityChecker};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod routes;
mod services;
mod types;

use config::Config;
use routes::analyze::CONTENT_HASH_HEADER;
use services::DiskCache;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<DiskCache>,
    pub config: Arc<Config>,
    pub pipeline: Arc<GeometryPipeline>,
    pub feasibility: Arc<dyn FeasibilityChecker>,
}

impl AppState {
    pub async fn new(config: Config) -> Self {
        let cache = Arc::new(DiskCache::new(&config.cache_dir).await);
        Self {
            cache,
            config: Arc::new(config),
            pipeline: Arc::new(GeometryPipeline::new()),
            feasibility: Arc::new(StubFeasibilityChecker),
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,eshant_server=debug"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.json_logs {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_permissive() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .expose_headers([CONTENT_HASH_HEADER])
}

/// Build the application router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        // Root endpoint - API information
        .route("/", get(routes::health::info))
        // Health check
        .route("/api/v1/health", get(routes::health::check))
        // Analysis endpoints
        .route("/api/v1/analyze", post(routes::analyze::analyze))
        .route("/api/v1/feasibility", post(routes::feasibility::check))
        // Cache endpoints
        .route("/api/v1/cache/:key", get(routes::cache::get_cached))
        // Middleware
        .layer(DefaultBodyLimit::max(config.max_file_size_bytes()))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing(&config);

    tracing::info!(
        port = config.port,
        cache_dir = %config.cache_dir,
        max_file_size_mb = config.max_file_size_mb,
        request_timeout_secs = config.request_timeout_secs,
        worker_threads = config.worker_threads,
        "Starting Eshant Engine Server"
    );

    // Analysis stages fan out on the global rayon pool
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build_global()
        .context("Failed to initialize rayon thread pool")?;

    let port = config.port;
    let app = build_router(AppState::new(config).await);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests;
