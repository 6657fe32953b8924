// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! France Map: an interactive map of France with region boundaries.
//!
//! The core is the boundary-rendering subsystem: a lifecycle controller that
//! owns the map instance, a provider that fetches region boundaries, and a
//! builder that turns them into styled, interactive overlay layers. The crate
//! also ships the small backend that serves the boundary data.

pub mod component;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;

/// Shared backend state.
pub struct AppState {
    pub config: Config,
}
