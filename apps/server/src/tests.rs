// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Router-level tests driven through `tower::ServiceExt::oneshot`.

use super::*;
use crate::types::CachedAnalysis;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
};
use eshant_processing::{BoundingBox, GeometryMetrics, MeshSource, ProcessingStats};
use serde_json::Value;
use tower::ServiceExt;

const BOUNDARY: &str = "eshant-test-boundary";

const CUBE_FACES: [[usize; 3]; 12] = [
    [0, 2, 1],
    [0, 3, 2],
    [4, 5, 6],
    [4, 6, 7],
    [0, 1, 5],
    [0, 5, 4],
    [3, 7, 6],
    [3, 6, 2],
    [0, 4, 7],
    [0, 7, 3],
    [1, 2, 6],
    [1, 6, 5],
];

fn cube_stl(edge: f32) -> Vec<u8> {
    let corners = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0f32],
    ];
    let mut data = vec![0u8; 80];
    data.extend_from_slice(&(CUBE_FACES.len() as u32).to_le_bytes());
    for face in CUBE_FACES {
        data.extend_from_slice(&[0u8; 12]);
        for index in face {
            for c in corners[index] {
                data.extend_from_slice(&(c * edge).to_le_bytes());
            }
        }
        data.extend_from_slice(&[0u8; 2]);
    }
    data
}

fn multipart_body(field: &str, file_name: &str, data: &[u8]) -> Body {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}

fn upload(field: &str, file_name: &str, data: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/analyze")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(multipart_body(field, file_name, data))
        .unwrap()
}

async fn test_state(dir: &tempfile::TempDir) -> AppState {
    let mut config = Config::from_env();
    config.cache_dir = dir.path().to_string_lossy().into_owned();
    config.max_file_size_mb = 1;
    AppState::new(config).await
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(&dir).await);

    let response = app
        .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn test_analyze_stl_upload() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(&dir).await);
    let data = cube_stl(20.0);

    let response = app.oneshot(upload("file", "cube.stl", &data)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_HASH_HEADER],
        DiskCache::generate_key(&data).as_str()
    );
    assert_eq!(response.headers()["x-cache"], "MISS");

    let json = json_body(response).await;
    assert_eq!(json["featureCount"], 1);
    assert_eq!(json["boundingBox"]["x"], 20.0);
    assert!((json["volume"].as_f64().unwrap() - 8.0).abs() < 1e-6);
    assert!(json["warnings"].is_array());
}

#[tokio::test]
async fn test_cached_analysis_is_served() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let data = cube_stl(20.0);
    let hash = DiskCache::generate_key(&data);

    let record = CachedAnalysis {
        content_hash: hash.clone(),
        file_name: "cube.stl".into(),
        metrics: GeometryMetrics {
            bounding_box: BoundingBox {
                x: 1.0,
                y: 2.0,
                z: 3.0,
            },
            volume: 42.0,
            surface_area: 1.0,
            estimated_mass: 52.08,
            feature_count: 7,
            complexity_index: 0.1,
            has_overhangs: false,
            min_wall_thickness: 1.0,
            warnings: Vec::new(),
        },
        stats: ProcessingStats {
            source: MeshSource::Loader,
            body_count: 1,
            vertex_count: 8,
            triangle_count: 12,
            unit_scaled: false,
            parse_time_ms: 0,
            analysis_time_ms: 0,
            total_time_ms: 0,
        },
    };
    state.cache.set(&hash, &record).await.unwrap();
    let app = build_router(state);

    let response = app
        .clone()
        .oneshot(upload("file", "cube.stl", &data))
        .await
        .unwrap();
    assert_eq!(response.headers()["x-cache"], "HIT");
    assert_eq!(json_body(response).await["featureCount"], 7);

    let response = app
        .oneshot(
            Request::get(format!("/api/v1/cache/{hash}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["contentHash"], hash.as_str());
    assert_eq!(json["metrics"]["volume"], 42.0);
}

#[tokio::test]
async fn test_unknown_cache_key_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(&dir).await);

    let response = app
        .oneshot(
            Request::get("/api/v1/cache/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_bad_geometry_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(&dir).await);

    let response = app
        .oneshot(upload("file", "part.stl", b"not a mesh at all"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["code"], "BAD_GEOMETRY");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Unable to parse geometry"));
}

#[tokio::test]
async fn test_missing_file_field() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(&dir).await);

    let response = app
        .oneshot(upload("attachment", "cube.stl", &cube_stl(20.0)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "MISSING_FILE");
}

#[tokio::test]
async fn test_feasibility_stub() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(&dir).await);

    let response = app
        .clone()
        .oneshot(
            Request::post(
                "/api/v1/feasibility?fileHash=abc&processId=fdm&materialId=pla&toleranceClass=TIGHT",
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["feasible"], true);
    assert_eq!(json["recommendedOrientation"]["z"], 1.0);
    assert_eq!(json["estimatedSupportVolume"], 45000.0);

    let response = app
        .oneshot(
            Request::post("/api/v1/feasibility?fileHash=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
