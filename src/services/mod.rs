// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - boundary loading, layer building and map lifecycle.

pub mod controller;
pub mod headless;
pub mod layer;
pub mod provider;
pub mod regions;

pub use controller::{ControllerError, LifecycleState, MapController, MapEngine, MapError, MapHandle};
pub use headless::HeadlessEngine;
pub use layer::{build, LayerBuilder, LayerError, OverlayId, OverlayLayer, PopupContent, PopupLocale};
pub use provider::{BoundaryDataProvider, FetchCompletion, FetchTicket};
pub use regions::{BoundarySource, FetchError, GeoJsonFile, RegionsClient};
