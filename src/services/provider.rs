// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Boundary data provider: loading/error/data state around one source.
//!
//! A fetch is split in three so the caller never holds the provider across
//! the network await:
//! 1. `start_fetch()` flips to loading and hands out a [`FetchTicket`]
//! 2. `FetchTicket::run()` performs the read
//! 3. `complete()` applies the result, unless the ticket is stale or the
//!    provider was cancelled in the meantime

use crate::models::RegionCollection;
use crate::services::regions::{BoundarySource, FetchError};
use std::sync::Arc;

/// Owns the fetched collection and its loading state.
pub struct BoundaryDataProvider<S> {
    source: Arc<S>,
    data: Option<Arc<RegionCollection>>,
    loading: bool,
    error: Option<FetchError>,
    generation: u64,
    pending: Option<u64>,
    cancelled: bool,
}

/// Detached half of a fetch, safe to await while the provider is borrowed
/// elsewhere (or gone).
pub struct FetchTicket<S> {
    generation: u64,
    source: Arc<S>,
}

/// Result of a fetch, tagged with the generation that requested it.
#[derive(Debug)]
pub struct FetchCompletion {
    generation: u64,
    result: Result<RegionCollection, FetchError>,
}

impl FetchCompletion {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn result(&self) -> &Result<RegionCollection, FetchError> {
        &self.result
    }
}

impl<S: BoundarySource> FetchTicket<S> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Perform the read. This is the only suspension point of the core.
    pub async fn run(self) -> FetchCompletion {
        let result = self.source.fetch_regions().await;
        FetchCompletion {
            generation: self.generation,
            result,
        }
    }
}

impl<S: BoundarySource> BoundaryDataProvider<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            data: None,
            loading: false,
            error: None,
            generation: 0,
            pending: None,
            cancelled: false,
        }
    }

    pub fn data(&self) -> Option<&Arc<RegionCollection>> {
        self.data.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// Generation of the most recent fetch (0 before the first one).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Data that is safe to render: not loading, no error, data present.
    pub fn loaded(&self) -> Option<&Arc<RegionCollection>> {
        if self.loading || self.error.is_some() {
            return None;
        }
        self.data.as_ref()
    }

    /// Begin a fetch. Returns `None` if one is already in flight or the
    /// provider has been cancelled.
    pub fn start_fetch(&mut self) -> Option<FetchTicket<S>> {
        if self.cancelled {
            tracing::debug!("Provider cancelled, not starting fetch");
            return None;
        }
        if self.pending.is_some() {
            tracing::debug!(generation = self.generation, "Fetch already in flight");
            return None;
        }

        self.generation += 1;
        self.pending = Some(self.generation);
        self.loading = true;
        self.error = None;
        tracing::debug!(generation = self.generation, "Fetching boundaries");

        Some(FetchTicket {
            generation: self.generation,
            source: Arc::clone(&self.source),
        })
    }

    /// Apply a finished fetch. Returns `false` (and changes nothing) when the
    /// completion is stale or the provider was cancelled.
    pub fn complete(&mut self, completion: FetchCompletion) -> bool {
        if self.cancelled || self.pending != Some(completion.generation) {
            tracing::debug!(
                generation = completion.generation,
                cancelled = self.cancelled,
                "Ignoring stale fetch result"
            );
            return false;
        }

        self.pending = None;
        self.loading = false;
        match completion.result {
            Ok(collection) => {
                tracing::info!(count = collection.len(), "Boundary data loaded");
                self.data = Some(Arc::new(collection));
                self.error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load region boundaries");
                self.data = None;
                self.error = Some(e);
            }
        }
        true
    }

    /// Run a whole fetch in place.
    pub async fn fetch_all(&mut self) -> bool {
        let Some(ticket) = self.start_fetch() else {
            return false;
        };
        let completion = ticket.run().await;
        self.complete(completion)
    }

    /// Stop acting on any result, now or later.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.pending = None;
        self.loading = false;
    }
}
