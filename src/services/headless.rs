// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory map engine.
//!
//! Keeps track of surfaces, maps, layers, shape styles and popups without
//! drawing anything. Used by the preview binary and by tests.

use crate::models::{BoundaryStyle, MapViewState, TileLayerConfig};
use crate::services::controller::{MapEngine, MapError, MapHandle};
use crate::services::layer::{OverlayId, OverlayLayer, PopupContent};
use std::collections::{BTreeMap, HashMap, HashSet};

/// What one headless map currently shows.
#[derive(Debug, Clone)]
pub struct HeadlessMap {
    pub surface_id: String,
    pub view: MapViewState,
    pub tile_layers: Vec<TileLayerConfig>,
    /// Shape styles per attached overlay, keyed by feature code.
    pub overlays: BTreeMap<OverlayId, BTreeMap<String, BoundaryStyle>>,
    /// (overlay, code, popup) of the open popup, if any
    pub popup: Option<(OverlayId, String, PopupContent)>,
}

impl HeadlessMap {
    /// Total shapes drawn across all overlays.
    pub fn shape_count(&self) -> usize {
        self.overlays.values().map(BTreeMap::len).sum()
    }
}

#[derive(Debug, Default)]
pub struct HeadlessEngine {
    surfaces: HashSet<String>,
    maps: HashMap<MapHandle, HeadlessMap>,
    next_handle: u64,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with one mounted host surface.
    pub fn with_surface(surface_id: &str) -> Self {
        let mut engine = Self::new();
        engine.mount_surface(surface_id);
        engine
    }

    pub fn mount_surface(&mut self, surface_id: &str) {
        self.surfaces.insert(surface_id.to_string());
    }

    pub fn map(&self, handle: MapHandle) -> Option<&HeadlessMap> {
        self.maps.get(&handle)
    }

    /// The map bound to a surface, if any.
    pub fn map_on(&self, surface_id: &str) -> Option<&HeadlessMap> {
        self.maps.values().find(|m| m.surface_id == surface_id)
    }

    pub fn live_maps(&self) -> usize {
        self.maps.len()
    }

    fn map_mut(&mut self, handle: MapHandle) -> Result<&mut HeadlessMap, MapError> {
        self.maps
            .get_mut(&handle)
            .ok_or_else(|| MapError::Engine(format!("unknown map {:?}", handle)))
    }
}

impl MapEngine for HeadlessEngine {
    fn create_map(&mut self, surface_id: &str, view: &MapViewState) -> Result<MapHandle, MapError> {
        if !self.surfaces.contains(surface_id) {
            return Err(MapError::SurfaceNotFound(surface_id.to_string()));
        }
        if self.map_on(surface_id).is_some() {
            return Err(MapError::SurfaceInUse(surface_id.to_string()));
        }

        self.next_handle += 1;
        let handle = MapHandle(self.next_handle);
        self.maps.insert(
            handle,
            HeadlessMap {
                surface_id: surface_id.to_string(),
                view: view.clone(),
                tile_layers: Vec::new(),
                overlays: BTreeMap::new(),
                popup: None,
            },
        );
        Ok(handle)
    }

    fn add_tile_layer(&mut self, map: MapHandle, tiles: &TileLayerConfig) -> Result<(), MapError> {
        self.map_mut(map)?.tile_layers.push(tiles.clone());
        Ok(())
    }

    fn add_overlay(
        &mut self,
        map: MapHandle,
        id: OverlayId,
        overlay: &OverlayLayer,
    ) -> Result<(), MapError> {
        let shapes = overlay
            .shapes()
            .iter()
            .map(|s| (s.code().to_string(), s.style().clone()))
            .collect();
        self.map_mut(map)?.overlays.insert(id, shapes);
        Ok(())
    }

    fn remove_overlay(&mut self, map: MapHandle, overlay: OverlayId) {
        if let Ok(m) = self.map_mut(map) {
            m.overlays.remove(&overlay);
            if matches!(&m.popup, Some((id, _, _)) if *id == overlay) {
                m.popup = None;
            }
        }
    }

    fn set_shape_style(
        &mut self,
        map: MapHandle,
        overlay: OverlayId,
        code: &str,
        style: &BoundaryStyle,
    ) {
        if let Some(shape) = self
            .maps
            .get_mut(&map)
            .and_then(|m| m.overlays.get_mut(&overlay))
            .and_then(|shapes| shapes.get_mut(code))
        {
            *shape = style.clone();
        }
    }

    fn open_popup(&mut self, map: MapHandle, overlay: OverlayId, code: &str, popup: &PopupContent) {
        if let Some(m) = self.maps.get_mut(&map) {
            m.popup = Some((overlay, code.to_string(), popup.clone()));
        }
    }

    fn remove_map(&mut self, map: MapHandle) {
        self.maps.remove(&map);
    }
}
