// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Headless preview of the France map.
//!
//! Mounts the map component on the in-memory engine, fetches the regions from
//! `API_URL`, and logs what would be drawn.

use anyhow::Context;
use france_map::component::{FranceMap, MapEvent, MapOptions, MapStatus};
use france_map::config::ClientConfig;
use france_map::services::{HeadlessEngine, RegionsClient};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("france_map=info".parse()?),
        )
        .init();

    let config = ClientConfig::from_env().context("Failed to load configuration")?;
    let client = RegionsClient::from_config(&config).context("Failed to build HTTP client")?;
    tracing::info!(url = %client.url(), "Previewing region boundaries");

    let options = MapOptions {
        surface_id: config.surface_id.clone(),
        ..MapOptions::default()
    };
    let engine = HeadlessEngine::with_surface(&options.surface_id);
    let mut map = FranceMap::new(engine, client, options);

    if let Some(ticket) = map.mount() {
        let completion = ticket.run().await;
        map.on_fetch_complete(completion);
    }

    let overlay = match map.status() {
        MapStatus::Ready { overlay, shapes } => {
            tracing::info!(%overlay, shapes, "Boundaries rendered");
            overlay
        }
        MapStatus::Failed(e) => {
            tracing::error!(error = %e, "Boundaries failed to load; base map only");
            map.unmount();
            return Ok(());
        }
        status => {
            tracing::warn!(?status, "Boundaries not rendered");
            map.unmount();
            return Ok(());
        }
    };

    let codes: Vec<String> = map
        .controller()
        .overlay(overlay)
        .map(|layer| layer.shapes().iter().map(|s| s.code().to_string()).collect())
        .unwrap_or_default();
    for code in codes {
        if let Some(popup) = map.handle_event(MapEvent::Click { overlay, code })? {
            println!("{}\n", popup.text());
        }
    }

    map.unmount();
    Ok(())
}
