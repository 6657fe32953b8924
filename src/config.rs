//! Application configuration loaded from environment variables.
//!
//! The map client needs only the API base URL (`API_URL`); it must be set,
//! there is no silent default. The boundary backend reads its port, the
//! frontend origin allowed by CORS, and the data directory.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::services::controller::DEFAULT_SURFACE_ID;
use crate::services::regions::{DEFAULT_HTTP_TIMEOUT, DEFAULT_MAX_ATTEMPTS};

/// Where the map client reads the regions FeatureCollection from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryEndpoint {
    /// Dynamic backend: `GET {base_url}/regions`
    Api { base_url: String },
    /// Static file: `GET {origin}/data/france-regions.geojson`
    StaticFile { origin: String },
}

impl BoundaryEndpoint {
    pub fn url(&self) -> String {
        match self {
            BoundaryEndpoint::Api { base_url } => {
                format!("{}/regions", base_url.trim_end_matches('/'))
            }
            BoundaryEndpoint::StaticFile { origin } => {
                format!("{}/data/france-regions.geojson", origin.trim_end_matches('/'))
            }
        }
    }
}

/// Map client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: BoundaryEndpoint,
    /// Host surface the map binds to
    pub surface_id: String,
    pub http_timeout: Duration,
    /// Attempts for transport failures (initial attempt included)
    pub fetch_attempts: u32,
}

impl ClientConfig {
    pub fn new(endpoint: BoundaryEndpoint) -> Self {
        Self {
            endpoint,
            surface_id: DEFAULT_SURFACE_ID.to_string(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            fetch_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Load from the environment. `API_URL` is required.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_url = env::var("API_URL").map_err(|_| ConfigError::Missing("API_URL"))?;
        Self::from_api_url(&api_url)
    }

    /// Build from an API base URL, validating it.
    pub fn from_api_url(api_url: &str) -> Result<Self, ConfigError> {
        let api_url = api_url.trim();
        if api_url.is_empty() {
            return Err(ConfigError::Missing("API_URL"));
        }
        let parsed = reqwest::Url::parse(api_url)
            .map_err(|e| ConfigError::Invalid("API_URL", e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(
                "API_URL",
                format!("unsupported scheme {}", parsed.scheme()),
            ));
        }

        Ok(Self::new(BoundaryEndpoint::Api {
            base_url: api_url.to_string(),
        }))
    }
}

/// Boundary backend configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Directory holding `france-regions.geojson` and `france-cities.geojson`
    pub data_dir: PathBuf,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8000,
            frontend_url: "http://localhost:5173".to_string(),
            data_dir: PathBuf::from("data"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port = match env::var("BACKEND_PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("BACKEND_PORT", raw))?,
            Err(_) => 8000,
        };

        Ok(Self {
            port,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
        })
    }

    pub fn regions_file(&self) -> PathBuf {
        self.data_dir.join("france-regions.geojson")
    }

    pub fn cities_file(&self) -> PathBuf {
        self.data_dir.join("france-cities.geojson")
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
