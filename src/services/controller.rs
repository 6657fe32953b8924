// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map lifecycle controller.
//!
//! The controller is the only owner of the map instance. Everything else talks
//! to the map through `attach_overlay` / `detach_overlay` / the interaction
//! methods; the rendering engine itself sits behind [`MapEngine`].

use crate::models::{BoundaryStyle, MapViewState, TileLayerConfig};
use crate::services::layer::{OverlayId, OverlayLayer, PopupContent};

/// Default id of the host surface the map binds to.
pub const DEFAULT_SURFACE_ID: &str = "map";

/// Handle to a map instance created by an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapHandle(pub u64);

/// The rendering engine (tiles, projection, drawing) the controller drives.
pub trait MapEngine {
    /// Create a map bound to the surface `surface_id` with the initial view.
    fn create_map(&mut self, surface_id: &str, view: &MapViewState) -> Result<MapHandle, MapError>;

    fn add_tile_layer(&mut self, map: MapHandle, tiles: &TileLayerConfig) -> Result<(), MapError>;

    /// Draw every shape of `overlay` under the id `id`.
    fn add_overlay(
        &mut self,
        map: MapHandle,
        id: OverlayId,
        overlay: &OverlayLayer,
    ) -> Result<(), MapError>;

    fn remove_overlay(&mut self, map: MapHandle, overlay: OverlayId);

    /// Repaint one shape of an attached overlay.
    fn set_shape_style(
        &mut self,
        map: MapHandle,
        overlay: OverlayId,
        code: &str,
        style: &BoundaryStyle,
    );

    /// Show a popup anchored to one shape of an attached overlay.
    fn open_popup(&mut self, map: MapHandle, overlay: OverlayId, code: &str, popup: &PopupContent);

    /// Destroy the map instance and everything still attached to it.
    fn remove_map(&mut self, map: MapHandle);
}

/// Controller lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Initializing,
    Ready,
    TornDown,
}

/// Owns one map instance from mount to unmount.
pub struct MapController<E: MapEngine> {
    engine: E,
    view: MapViewState,
    surface_id: String,
    state: LifecycleState,
    map: Option<MapHandle>,
    overlays: Vec<OverlayLayer>,
    next_overlay_id: u64,
    last_error: Option<MapError>,
}

impl<E: MapEngine> MapController<E> {
    pub fn new(engine: E, view: MapViewState, surface_id: impl Into<String>) -> Self {
        Self {
            engine,
            view,
            surface_id: surface_id.into(),
            state: LifecycleState::Uninitialized,
            map: None,
            overlays: Vec::new(),
            next_overlay_id: 1,
            last_error: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == LifecycleState::Ready
    }

    pub fn view(&self) -> &MapViewState {
        &self.view
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Why initialization failed, if it did.
    pub fn last_error(&self) -> Option<&MapError> {
        self.last_error.as_ref()
    }

    pub fn overlays(&self) -> &[OverlayLayer] {
        &self.overlays
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&OverlayLayer> {
        self.overlays.iter().find(|o| o.id() == Some(id))
    }

    /// Create the map and its base layer. Only the first call does anything.
    ///
    /// On failure the controller stays in `Initializing`; only a fresh
    /// controller (remount) can try again.
    pub fn initialize(&mut self) -> Result<(), MapError> {
        if self.state != LifecycleState::Uninitialized {
            tracing::debug!(state = ?self.state, "Map already initialized");
            return Ok(());
        }
        self.state = LifecycleState::Initializing;

        let map = match self.engine.create_map(&self.surface_id, &self.view) {
            Ok(map) => map,
            Err(e) => return Err(self.fail_initialization(e)),
        };
        if let Err(e) = self.engine.add_tile_layer(map, &self.view.tiles) {
            self.engine.remove_map(map);
            return Err(self.fail_initialization(e));
        }

        self.map = Some(map);
        self.state = LifecycleState::Ready;
        tracing::info!(
            surface = %self.surface_id,
            lat = self.view.center.lat,
            lon = self.view.center.lon,
            zoom = self.view.zoom,
            "Map initialized"
        );
        Ok(())
    }

    fn fail_initialization(&mut self, e: MapError) -> MapError {
        tracing::error!(surface = %self.surface_id, error = %e, "Error initializing map");
        self.last_error = Some(e.clone());
        e
    }

    fn ready_map(&self) -> Result<MapHandle, ControllerError> {
        match (self.state, self.map) {
            (LifecycleState::Ready, Some(map)) => Ok(map),
            (state, _) => Err(ControllerError::NotReady(state)),
        }
    }

    /// Attach an overlay. Attaching an already attached overlay is a no-op;
    /// an attached overlay of the same kind is detached first.
    ///
    /// A layer keeps the id it was given on its first attach here, so a
    /// detached layer comes back under the same id.
    pub fn attach_overlay(&mut self, mut layer: OverlayLayer) -> Result<OverlayId, ControllerError> {
        let map = self.ready_map()?;

        if let Some(id) = layer.id().filter(|id| self.overlay(*id).is_some()) {
            tracing::debug!(overlay = %id, "Overlay already attached");
            return Ok(id);
        }

        let stale: Vec<OverlayId> = self
            .overlays
            .iter()
            .filter(|o| o.kind() == layer.kind())
            .filter_map(|o| o.id())
            .collect();
        for stale_id in stale {
            tracing::debug!(overlay = %stale_id, "Replacing stale overlay");
            self.detach_overlay(stale_id);
        }

        let id = match layer.id() {
            Some(id) if id.get() < self.next_overlay_id => id,
            _ => {
                let id = OverlayId::new(self.next_overlay_id);
                self.next_overlay_id += 1;
                layer.assign_id(id);
                id
            }
        };

        self.engine.add_overlay(map, id, &layer)?;
        tracing::info!(overlay = %id, shapes = layer.len(), "Boundary overlay attached");
        self.overlays.push(layer);
        Ok(id)
    }

    /// Detach an overlay, handing it back so it can be attached again.
    /// Hover highlights are cleared; the layer comes back at rest.
    pub fn detach_overlay(&mut self, id: OverlayId) -> Option<OverlayLayer> {
        let map = self.ready_map().ok()?;
        let index = self.overlays.iter().position(|o| o.id() == Some(id))?;
        self.engine.remove_overlay(map, id);
        tracing::debug!(overlay = %id, "Overlay detached");
        let mut layer = self.overlays.remove(index);
        layer.clear_hover();
        Some(layer)
    }

    fn shape_event(
        &mut self,
        overlay: OverlayId,
        code: &str,
        apply: impl FnOnce(&mut crate::services::layer::BoundaryShape),
    ) -> Result<(), ControllerError> {
        let map = self.ready_map()?;
        let layer = self
            .overlays
            .iter_mut()
            .find(|o| o.id() == Some(overlay))
            .ok_or(ControllerError::UnknownOverlay(overlay))?;
        let shape = layer
            .shape_mut(code)
            .ok_or_else(|| ControllerError::UnknownShape(code.to_string()))?;
        apply(shape);
        self.engine.set_shape_style(map, overlay, code, shape.style());
        Ok(())
    }

    pub fn pointer_enter(&mut self, overlay: OverlayId, code: &str) -> Result<(), ControllerError> {
        self.shape_event(overlay, code, |shape| shape.pointer_enter())
    }

    pub fn pointer_leave(&mut self, overlay: OverlayId, code: &str) -> Result<(), ControllerError> {
        self.shape_event(overlay, code, |shape| shape.pointer_leave())
    }

    /// Open the popup of a shape and return its content.
    pub fn click(&mut self, overlay: OverlayId, code: &str) -> Result<PopupContent, ControllerError> {
        let map = self.ready_map()?;
        let popup = self
            .overlay(overlay)
            .ok_or(ControllerError::UnknownOverlay(overlay))?
            .shape(code)
            .ok_or_else(|| ControllerError::UnknownShape(code.to_string()))?
            .popup()
            .clone();
        self.engine.open_popup(map, overlay, code, &popup);
        Ok(popup)
    }

    /// Release every overlay and the map. Safe from any state; terminal.
    pub fn teardown(&mut self) {
        if self.state == LifecycleState::TornDown {
            return;
        }
        if let Some(map) = self.map.take() {
            for id in self.overlays.drain(..).filter_map(|o| o.id()) {
                self.engine.remove_overlay(map, id);
            }
            self.engine.remove_map(map);
        }
        self.overlays.clear();
        tracing::info!(from = ?self.state, "Map torn down");
        self.state = LifecycleState::TornDown;
    }
}

impl<E: MapEngine> Drop for MapController<E> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Map engine errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MapError {
    #[error("Host surface not found: {0}")]
    SurfaceNotFound(String),

    #[error("Host surface already has a map: {0}")]
    SurfaceInUse(String),

    #[error("Map engine error: {0}")]
    Engine(String),
}

/// Errors from controller operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ControllerError {
    #[error("Map is not ready (state: {0:?})")]
    NotReady(LifecycleState),

    #[error("Overlay not attached: {0}")]
    UnknownOverlay(OverlayId),

    #[error("No shape with code {0}")]
    UnknownShape(String),

    #[error(transparent)]
    Map(#[from] MapError),
}
