// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod geography;
pub mod style;
pub mod view;

pub use geography::{GeographyError, RegionCollection, RegionFeature, RegionProperties};
pub use style::BoundaryStyle;
pub use view::{LatLng, MapViewState, TileLayerConfig};
