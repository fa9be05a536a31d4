// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Health check endpoint.

use crate::types::{ApiInfoResponse, EndpointInfo, HealthResponse};
use axum::Json;

const SERVICE: &str = "eshant-engine";

/// GET /api/v1/health - Health check endpoint.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        service: SERVICE,
    })
}

/// GET / - API information endpoint.
pub async fn info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        service: SERVICE,
        version: env!("CARGO_PKG_VERSION"),
        description: "Geometry analysis and manufacturability metrics",
        endpoints: vec![
            EndpointInfo {
                method: "GET",
                path: "/api/v1/health",
                description: "Health check endpoint",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/analyze",
                description: "Analyze an STL, OBJ or 3MF upload (multipart field `file`)",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/feasibility",
                description: "Feasibility verdict for a process, material and tolerance class",
            },
            EndpointInfo {
                method: "GET",
                path: "/api/v1/cache/:key",
                description: "Retrieve a cached analysis by content hash",
            },
        ],
    })
}
