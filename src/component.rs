// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! France map component: joins map readiness and boundary data.
//!
//! Two independent signals feed one action. The controller becomes Ready on
//! mount; the provider's data arrives whenever the fetch completes. [`sync`]
//! is called after every change to either and attaches the overlay once per
//! successful arrival, whichever signal came last.
//!
//! [`sync`]: FranceMap::sync

use crate::models::{BoundaryStyle, MapViewState};
use crate::services::controller::{ControllerError, MapController, MapEngine, DEFAULT_SURFACE_ID};
use crate::services::layer::{
    FailurePolicy, LayerBuilder, LayerError, OverlayId, PopupContent, PopupLocale,
};
use crate::services::provider::{BoundaryDataProvider, FetchCompletion, FetchTicket};
use crate::services::regions::{BoundarySource, FetchError};

/// Immutable settings handed to the component at construction.
#[derive(Debug, Clone)]
pub struct MapOptions {
    pub view: MapViewState,
    pub style: BoundaryStyle,
    pub locale: PopupLocale,
    /// What to do with features whose geometry cannot be rendered
    pub policy: FailurePolicy,
    pub surface_id: String,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            view: MapViewState::default(),
            style: BoundaryStyle::region(),
            locale: PopupLocale::default(),
            policy: FailurePolicy::default(),
            surface_id: DEFAULT_SURFACE_ID.to_string(),
        }
    }
}

/// Pointer input routed from the host to a shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapEvent {
    PointerEnter { overlay: OverlayId, code: String },
    PointerLeave { overlay: OverlayId, code: String },
    Click { overlay: OverlayId, code: String },
}

/// What the host page should render around the map.
#[derive(Debug, PartialEq)]
pub enum MapStatus<'a> {
    /// Map not ready, or ready with no fetch started yet
    Idle,
    /// Loading indicator
    Loading,
    /// Error banner; the base map stays usable
    Failed(&'a FetchError),
    /// Data loaded but rejected by the strict failure policy
    Unrenderable(&'a LayerError),
    /// Boundaries shown
    Ready { overlay: OverlayId, shapes: usize },
}

/// The interactive map of France with region boundaries.
pub struct FranceMap<E: MapEngine, S: BoundarySource> {
    controller: MapController<E>,
    provider: BoundaryDataProvider<S>,
    builder: LayerBuilder,
    overlay: Option<OverlayId>,
    build_error: Option<LayerError>,
    /// Last fetch generation turned into an overlay (or rejected)
    handled_generation: Option<u64>,
}

impl<E: MapEngine, S: BoundarySource> FranceMap<E, S> {
    pub fn new(engine: E, source: S, options: MapOptions) -> Self {
        let builder = LayerBuilder::new(options.style)
            .with_locale(options.locale)
            .with_policy(options.policy);
        Self {
            controller: MapController::new(engine, options.view, options.surface_id),
            provider: BoundaryDataProvider::new(source),
            builder,
            overlay: None,
            build_error: None,
            handled_generation: None,
        }
    }

    pub fn controller(&self) -> &MapController<E> {
        &self.controller
    }

    pub fn provider(&self) -> &BoundaryDataProvider<S> {
        &self.provider
    }

    /// Currently attached boundary overlay.
    pub fn overlay(&self) -> Option<OverlayId> {
        self.overlay
    }

    /// Initialize the map and start the boundary fetch.
    ///
    /// The returned ticket must be run and its completion passed to
    /// [`on_fetch_complete`](Self::on_fetch_complete). The two halves do not
    /// depend on each other: a map failure still fetches, and the fetch may
    /// finish before or after the map is ready.
    pub fn mount(&mut self) -> Option<FetchTicket<S>> {
        self.init_map();
        self.start_fetch()
    }

    /// Create the map and base layer. A failure is logged and leaves the
    /// component without boundaries, never panics.
    pub fn init_map(&mut self) {
        if let Err(e) = self.controller.initialize() {
            tracing::error!(error = %e, "Map unavailable, boundaries will not be shown");
        }
        self.sync();
    }

    /// Start a boundary fetch; also used to retry from the error banner.
    /// Returns `None` while a fetch is pending or after unmount.
    pub fn start_fetch(&mut self) -> Option<FetchTicket<S>> {
        let ticket = self.provider.start_fetch();
        self.sync();
        ticket
    }

    /// Hand a finished fetch to the provider. Returns `false` if it was stale
    /// (e.g. the component was unmounted meanwhile) and nothing changed.
    pub fn on_fetch_complete(&mut self, completion: FetchCompletion) -> bool {
        if !self.provider.complete(completion) {
            return false;
        }
        self.sync();
        true
    }

    /// Re-evaluate the map-ready / data-ready join.
    pub fn sync(&mut self) {
        if !self.controller.is_ready() {
            return;
        }

        if self.provider.error().is_some() {
            if let Some(id) = self.overlay.take() {
                self.controller.detach_overlay(id);
                tracing::info!(overlay = %id, "Boundary overlay removed after failed reload");
            }
            return;
        }

        let generation = self.provider.generation();
        if self.handled_generation == Some(generation) {
            return;
        }
        let Some(collection) = self.provider.loaded() else {
            return;
        };

        let layer = match self.builder.build(collection) {
            Ok(layer) => layer,
            Err(e) => {
                tracing::error!(error = %e, "Boundary data rejected, not rendering");
                if let Some(id) = self.overlay.take() {
                    self.controller.detach_overlay(id);
                }
                self.build_error = Some(e);
                self.handled_generation = Some(generation);
                return;
            }
        };
        self.build_error = None;

        match self.controller.attach_overlay(layer) {
            Ok(id) => {
                self.overlay = Some(id);
                self.handled_generation = Some(generation);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to attach boundary overlay");
                // The stale overlay may already have been replaced
                let controller = &self.controller;
                self.overlay = self.overlay.filter(|id| controller.overlay(*id).is_some());
            }
        }
    }

    /// Route pointer input to the controller. Returns the popup on click.
    pub fn handle_event(&mut self, event: MapEvent) -> Result<Option<PopupContent>, ControllerError> {
        match event {
            MapEvent::PointerEnter { overlay, code } => {
                self.controller.pointer_enter(overlay, &code)?;
                Ok(None)
            }
            MapEvent::PointerLeave { overlay, code } => {
                self.controller.pointer_leave(overlay, &code)?;
                Ok(None)
            }
            MapEvent::Click { overlay, code } => self.controller.click(overlay, &code).map(Some),
        }
    }

    /// Status for the host page: loading indicator, error banner, or map.
    pub fn status(&self) -> MapStatus<'_> {
        if let Some(e) = self.provider.error() {
            return MapStatus::Failed(e);
        }
        if self.provider.loading() {
            return MapStatus::Loading;
        }
        if let Some(e) = &self.build_error {
            return MapStatus::Unrenderable(e);
        }
        self.overlay
            .and_then(|id| {
                self.controller.overlay(id).map(|layer| MapStatus::Ready {
                    overlay: id,
                    shapes: layer.len(),
                })
            })
            .unwrap_or(MapStatus::Idle)
    }

    /// Cancel pending work and release the map. Safe to call more than once.
    pub fn unmount(&mut self) {
        self.provider.cancel();
        self.controller.teardown();
        self.overlay = None;
        self.build_error = None;
    }
}
