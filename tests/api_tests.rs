// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Boundary data backend route tests.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use france_map::models::RegionCollection;
use serde_json::Value;
use tower::ServiceExt;

mod common;
use common::THREE_REGIONS;

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn data_dir_with(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    for (name, contents) in files {
        std::fs::write(dir.path().join(name), contents).expect("write data file");
    }
    dir
}

#[tokio::test]
async fn test_health() {
    let dir = data_dir_with(&[]);
    let (status, body) = get(common::create_test_app(dir.path()), "/health").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_regions_served_as_collection() {
    let dir = data_dir_with(&[("france-regions.geojson", THREE_REGIONS)]);
    let (status, body) = get(common::create_test_app(dir.path()), "/api/v1/regions").await;

    assert_eq!(status, StatusCode::OK);
    let collection =
        RegionCollection::from_json(std::str::from_utf8(&body).unwrap()).expect("valid collection");
    assert_eq!(collection.len(), 3);
}

#[tokio::test]
async fn test_regions_missing_file_is_404() {
    let dir = data_dir_with(&[]);
    let (status, body) = get(common::create_test_app(dir.path()), "/api/v1/regions").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "not_found");
    assert_eq!(json["detail"], "Regions GeoJSON file not found");
}

#[tokio::test]
async fn test_regions_broken_file_is_500() {
    let dir = data_dir_with(&[("france-regions.geojson", "{ broken")]);
    let (status, body) = get(common::create_test_app(dir.path()), "/api/v1/regions").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "data_error");
}

#[tokio::test]
async fn test_cities_served() {
    let cities = r#"{ "type": "FeatureCollection", "features": [
        { "type": "Feature", "geometry": { "type": "Point", "coordinates": [2.3522, 48.8566] },
          "properties": { "nom": "Paris", "code": "75056" } }
    ] }"#;
    let dir = data_dir_with(&[("france-cities.geojson", cities)]);
    let (status, body) = get(common::create_test_app(dir.path()), "/api/v1/cities").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["features"][0]["properties"]["nom"], "Paris");
}

#[tokio::test]
async fn test_static_data_file() {
    let dir = data_dir_with(&[("france-regions.geojson", THREE_REGIONS)]);
    let (status, body) = get(
        common::create_test_app(dir.path()),
        "/data/france-regions.geojson",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, THREE_REGIONS.as_bytes());
}

#[tokio::test]
async fn test_cors_allows_frontend() {
    let dir = data_dir_with(&[("france-regions.geojson", THREE_REGIONS)]);
    let response = common::create_test_app(dir.path())
        .oneshot(
            Request::builder()
                .uri("/api/v1/regions")
                .header(header::ORIGIN, "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:5173"
    );
}
