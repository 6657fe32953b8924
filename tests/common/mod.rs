// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::{routing::get, Router};
use france_map::config::Config;
use france_map::models::{BoundaryStyle, MapViewState, RegionCollection, TileLayerConfig};
use france_map::routes::create_router;
use france_map::services::layer::{OverlayId, OverlayLayer, PopupContent};
use france_map::services::{BoundarySource, FetchError, HeadlessEngine, MapEngine, MapError, MapHandle};
use france_map::AppState;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A single region with a population, as served by the backend.
#[allow(dead_code)]
pub const BRETAGNE: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "properties": { "name": "Bretagne", "code": "53", "population": 3364000 },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-4.8, 47.3], [-1.0, 47.3], [-1.0, 48.9], [-4.8, 48.9], [-4.8, 47.3]]]
            }
        }
    ]
}"#;

/// Three regions: a polygon, a multipolygon, and one without population.
#[allow(dead_code)]
pub const THREE_REGIONS: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "properties": { "name": "Île-de-France", "code": "11", "population": 12317279 },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[1.4, 48.1], [3.6, 48.1], [3.6, 49.2], [1.4, 49.2], [1.4, 48.1]]]
            }
        },
        {
            "type": "Feature",
            "properties": { "name": "Corse", "code": "94" },
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [
                    [[[8.5, 41.3], [9.6, 41.3], [9.6, 43.0], [8.5, 43.0], [8.5, 41.3]]],
                    [[[9.3, 42.9], [9.4, 42.9], [9.4, 43.0], [9.3, 42.9]]]
                ]
            }
        },
        {
            "type": "Feature",
            "properties": { "name": "Bretagne", "code": "53", "population": 3364000 },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-4.8, 47.3], [-1.0, 47.3], [-1.0, 48.9], [-4.8, 48.9], [-4.8, 47.3]]]
            }
        }
    ]
}"#;

#[allow(dead_code)]
pub fn parse(json: &str) -> RegionCollection {
    RegionCollection::from_json(json).expect("fixture should parse")
}

/// Source returning a fixed result and counting calls.
#[allow(dead_code)]
pub struct StaticSource {
    result: Result<RegionCollection, FetchError>,
    pub calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl StaticSource {
    pub fn ok(json: &str) -> Self {
        Self {
            result: Ok(parse(json)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn err(error: FetchError) -> Self {
        Self {
            result: Err(error),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl BoundarySource for StaticSource {
    async fn fetch_regions(&self) -> Result<RegionCollection, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// One call into the map engine.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    CreateMap(String),
    AddTileLayer(String),
    AddOverlay(OverlayId, usize),
    RemoveOverlay(OverlayId),
    SetShapeStyle(OverlayId, String, f64),
    OpenPopup(OverlayId, String),
    RemoveMap,
}

/// Headless engine that records every call for later inspection.
#[allow(dead_code)]
pub struct SpyEngine {
    inner: HeadlessEngine,
    pub calls: Arc<Mutex<Vec<EngineCall>>>,
    /// When set, `add_overlay` fails after recording the call
    pub fail_overlays: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl SpyEngine {
    pub fn with_surface(surface_id: &str) -> Self {
        Self {
            inner: HeadlessEngine::with_surface(surface_id),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_overlays: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn without_surface() -> Self {
        Self {
            inner: HeadlessEngine::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_overlays: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn headless(&self) -> &HeadlessEngine {
        &self.inner
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Count calls matching a predicate.
#[allow(dead_code)]
pub fn count_calls(calls: &Arc<Mutex<Vec<EngineCall>>>, pred: impl Fn(&EngineCall) -> bool) -> usize {
    calls.lock().unwrap().iter().filter(|c| pred(c)).count()
}

impl MapEngine for SpyEngine {
    fn create_map(&mut self, surface_id: &str, view: &MapViewState) -> Result<MapHandle, MapError> {
        self.record(EngineCall::CreateMap(surface_id.to_string()));
        self.inner.create_map(surface_id, view)
    }

    fn add_tile_layer(&mut self, map: MapHandle, tiles: &TileLayerConfig) -> Result<(), MapError> {
        self.record(EngineCall::AddTileLayer(tiles.url_template.clone()));
        self.inner.add_tile_layer(map, tiles)
    }

    fn add_overlay(
        &mut self,
        map: MapHandle,
        id: OverlayId,
        overlay: &OverlayLayer,
    ) -> Result<(), MapError> {
        self.record(EngineCall::AddOverlay(id, overlay.len()));
        if self.fail_overlays.load(Ordering::SeqCst) {
            return Err(MapError::Engine("renderer out of memory".to_string()));
        }
        self.inner.add_overlay(map, id, overlay)
    }

    fn remove_overlay(&mut self, map: MapHandle, overlay: OverlayId) {
        self.record(EngineCall::RemoveOverlay(overlay));
        self.inner.remove_overlay(map, overlay)
    }

    fn set_shape_style(&mut self, map: MapHandle, overlay: OverlayId, code: &str, style: &BoundaryStyle) {
        self.record(EngineCall::SetShapeStyle(overlay, code.to_string(), style.fill_opacity));
        self.inner.set_shape_style(map, overlay, code, style)
    }

    fn open_popup(&mut self, map: MapHandle, overlay: OverlayId, code: &str, popup: &PopupContent) {
        self.record(EngineCall::OpenPopup(overlay, code.to_string()));
        self.inner.open_popup(map, overlay, code, popup)
    }

    fn remove_map(&mut self, map: MapHandle) {
        self.record(EngineCall::RemoveMap);
        self.inner.remove_map(map)
    }
}

/// Create a backend router serving files from `data_dir`.
#[allow(dead_code)]
pub fn create_test_app(data_dir: &Path) -> axum::Router {
    let config = Config {
        data_dir: data_dir.to_path_buf(),
        ..Config::default()
    };
    create_router(Arc::new(AppState { config }))
}

/// Serve `body` with `status` at `/api/v1/regions` on a loopback port.
/// Returns the API base URL and a counter of requests served.
#[allow(dead_code)]
pub async fn spawn_regions_server(status: StatusCode, body: &'static str) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let app = Router::new().route(
        "/api/v1/regions",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (status, body)
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });

    (format!("http://{}/api/v1", addr), hits)
}
