// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! France Map boundary data server.
//!
//! Serves the GeoJSON FeatureCollections of French administrative regions
//! (and cities) that the map client renders.

use anyhow::Context;
use france_map::{config::Config, models::RegionCollection, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(port = config.port, data_dir = %config.data_dir.display(), "Starting France Map API");

    // Check the regions file up front; the route still reports errors per request
    let regions_file = config.regions_file();
    match tokio::fs::read_to_string(&regions_file).await {
        Ok(raw) => match RegionCollection::from_json(&raw) {
            Ok(collection) => {
                tracing::info!(count = collection.len(), "Region boundaries available")
            }
            Err(e) => tracing::warn!(path = %regions_file.display(), error = %e, "Region file is not valid"),
        },
        Err(e) => tracing::warn!(path = %regions_file.display(), error = %e, "Region file unreadable"),
    }

    let state = Arc::new(AppState {
        config: config.clone(),
    });

    // Build router
    let app = france_map::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive("france_map=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
