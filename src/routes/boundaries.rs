// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Boundary data routes: regions and cities GeoJSON.

use crate::error::{AppError, Result};
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/regions", get(get_regions))
        .route("/api/v1/cities", get(get_cities))
}

/// GeoJSON FeatureCollection of all French administrative regions.
async fn get_regions(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    read_geojson(&state.config.regions_file(), "Regions").await
}

/// GeoJSON FeatureCollection of French cities (served, not rendered).
async fn get_cities(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    read_geojson(&state.config.cities_file(), "Cities").await
}

async fn read_geojson(path: &Path, what: &str) -> Result<Json<Value>> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "GeoJSON file missing");
            return Err(AppError::NotFound(format!("{} GeoJSON file not found", what)));
        }
        Err(e) => {
            return Err(AppError::Internal(anyhow::anyhow!(
                "reading {}: {}",
                path.display(),
                e
            )))
        }
    };

    let data: Value = serde_json::from_str(&raw).map_err(|e| {
        AppError::Data(format!("Error parsing GeoJSON file {}: {}", path.display(), e))
    })?;
    Ok(Json(data))
}
