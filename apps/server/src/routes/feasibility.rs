// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Feasibility endpoint.

use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use eshant_processing::{FeasibilityRequest, FeasibilityResult};

/// POST /api/v1/feasibility - Verdict for a previously analyzed file.
///
/// Parameters come from the query string: `fileHash`, `processId`,
/// `materialId`, `toleranceClass`.
pub async fn check(
    State(state): State<AppState>,
    Query(request): Query<FeasibilityRequest>,
) -> Json<FeasibilityResult> {
    if !state.cache.has(&request.file_hash).await {
        tracing::debug!(file_hash = %request.file_hash, "Feasibility requested for unknown file");
    }

    Json(state.feasibility.check(&request))
}
