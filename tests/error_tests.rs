// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use france_map::error::AppError;
use serde_json::Value;

async fn render(err: AppError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_not_found_response() {
    let (status, json) = render(AppError::NotFound("Regions GeoJSON file not found".to_string())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
    assert_eq!(json["detail"], "Regions GeoJSON file not found");
}

#[tokio::test]
async fn test_data_error_response() {
    let (status, json) = render(AppError::Data("Error parsing GeoJSON file".to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "data_error");
    assert_eq!(json["detail"], "Error parsing GeoJSON file");
}

#[tokio::test]
async fn test_internal_error_hides_detail() {
    let (status, json) = render(AppError::from(anyhow::anyhow!("disk on fire"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "internal_error");
    assert!(json.get("detail").is_none());
}
