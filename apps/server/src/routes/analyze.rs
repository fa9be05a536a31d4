// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Analysis endpoint for uploaded mesh files.

use crate::error::ApiError;
use crate::services::DiskCache;
use crate::types::CachedAnalysis;
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use eshant_processing::GeometryMetrics;

pub const CONTENT_HASH_HEADER: HeaderName = HeaderName::from_static("x-content-hash");
pub const CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-cache");

/// Extract the `file` field and its declared filename.
async fn extract_file(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        tracing::debug!(field_name = %field_name, "Processing multipart field");

        if field_name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await?;
            tracing::debug!(size = bytes.len(), file_name = %file_name, "Extracted file from multipart");
            return Ok((file_name, bytes.to_vec()));
        }
    }

    tracing::warn!("No 'file' field found in multipart request");
    Err(ApiError::MissingFile)
}

fn metrics_response(
    metrics: GeometryMetrics,
    content_hash: &str,
    cache_status: &'static str,
) -> Result<Response, ApiError> {
    let hash = HeaderValue::from_str(content_hash)
        .map_err(|e| ApiError::Internal(format!("Invalid content hash header: {}", e)))?;

    Ok((
        [
            (CONTENT_HASH_HEADER, hash),
            (CACHE_STATUS_HEADER, HeaderValue::from_static(cache_status)),
        ],
        Json(metrics),
    )
        .into_response())
}

/// POST /api/v1/analyze - Compute manufacturability metrics for one file.
pub async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let (file_name, data) = extract_file(&mut multipart).await?;

    if data.len() > state.config.max_file_size_bytes() {
        return Err(ApiError::FileTooLarge {
            max_mb: state.config.max_file_size_mb,
        });
    }

    let content_hash = DiskCache::generate_key(&data);

    if let Some(cached) = state.cache.get::<CachedAnalysis>(&content_hash).await? {
        tracing::info!(content_hash = %content_hash, "Cache HIT");
        return metrics_response(cached.metrics, &content_hash, "HIT");
    }

    tracing::info!(
        content_hash = %content_hash,
        file_name = %file_name,
        size = data.len(),
        "Cache MISS - analyzing"
    );

    // CPU-bound parse and analysis run off the async workers
    let pipeline = state.pipeline.clone();
    let name = file_name.clone();
    let result = tokio::task::spawn_blocking(move || pipeline.analyze(&data, &name)).await??;

    let record = CachedAnalysis {
        content_hash: content_hash.clone(),
        file_name,
        metrics: result.metrics,
        stats: result.stats,
    };
    let metrics = record.metrics.clone();

    let cache = state.cache.clone();
    let key = content_hash.clone();
    tokio::spawn(async move {
        if let Err(e) = cache.set(&key, &record).await {
            tracing::error!(error = %e, "Failed to cache analysis");
        }
    });

    metrics_response(metrics, &content_hash, "MISS")
}
