// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Boundary data sources.
//!
//! Handles:
//! - Fetching the regions FeatureCollection from the backend API
//! - Fetching the static `france-regions.geojson` file
//! - Reading a GeoJSON file from local disk
//! - Request timeout and a single retry on transport failures

use crate::config::{BoundaryEndpoint, ClientConfig};
use crate::models::{GeographyError, RegionCollection};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);
/// One initial attempt plus one retry.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Anything that can produce a region FeatureCollection.
pub trait BoundarySource: Send + Sync + 'static {
    fn fetch_regions(&self) -> impl Future<Output = Result<RegionCollection, FetchError>> + Send;
}

/// HTTP client for the regions endpoint.
#[derive(Clone)]
pub struct RegionsClient {
    http: reqwest::Client,
    url: String,
    max_attempts: u32,
}

impl RegionsClient {
    /// Create a client for the given endpoint with the default timeout.
    pub fn new(endpoint: &BoundaryEndpoint) -> Result<Self, FetchError> {
        Self::with_timeout(endpoint, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a client from the map client configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, FetchError> {
        Ok(Self::with_timeout(&config.endpoint, config.http_timeout)?
            .with_max_attempts(config.fetch_attempts))
    }

    pub fn with_timeout(endpoint: &BoundaryEndpoint, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("failed building HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: endpoint.url(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    /// Total number of attempts for transport failures (minimum 1).
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_once(&self) -> Result<RegionCollection, FetchError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(FetchError::from_transport)?;
        Ok(RegionCollection::from_json(&body)?)
    }
}

impl BoundarySource for RegionsClient {
    async fn fetch_regions(&self) -> Result<RegionCollection, FetchError> {
        let mut attempt = 1;
        loop {
            match self.fetch_once().await {
                Ok(collection) => {
                    tracing::info!(
                        url = %self.url,
                        count = collection.len(),
                        "Fetched region boundaries"
                    );
                    return Ok(collection);
                }
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    tracing::warn!(url = %self.url, attempt, error = %e, "Retrying boundary fetch");
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(url = %self.url, attempt, error = %e, "Error fetching regions");
                    return Err(e);
                }
            }
        }
    }
}

/// Region boundaries stored in a local GeoJSON file.
#[derive(Debug, Clone)]
pub struct GeoJsonFile {
    path: PathBuf,
}

impl GeoJsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BoundarySource for GeoJsonFile {
    async fn fetch_regions(&self) -> Result<RegionCollection, FetchError> {
        let json_data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| FetchError::Io(format!("{}: {}", self.path.display(), e)))?;
        let collection = RegionCollection::from_json(&json_data)?;
        tracing::info!(path = %self.path.display(), count = collection.len(), "Loaded region boundaries");
        Ok(collection)
    }
}

/// Why boundary data could not be loaded.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP error! status: {status}")]
    Status { status: u16, body: String },

    #[error("Malformed boundary data: {0}")]
    Malformed(#[from] GeographyError),

    #[error("Failed to read file: {0}")]
    Io(String),
}

impl FetchError {
    fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(e.to_string())
        }
    }

    /// Transport failures that a retry may fix.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Network(_) | FetchError::Timeout)
    }
}
