//! Startup configuration
//!
//! Settings come from defaults, then an optional `.env` file, then the
//! process environment. The binary layers its command-line flags on top.
//! A missing API key is reported as [`FinderError::ConfigurationMissing`].

use crate::{
    error::{FinderError, FinderResult},
    location::{ip::DEFAULT_LOCATION_URL, FixedLocation, IpLocationProvider},
    providers::gemini::{GeminiConfig, GeminiService, DEFAULT_BASE_URL, DEFAULT_MODEL},
    types::{Coordinates, LocationProvider},
};
use std::env;
use std::path::Path;
use std::sync::Arc;

/// Primary credential variable
pub const API_KEY_VAR: &str = "API_KEY";
/// Fallback credential variable
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "GEMINI_MODEL";
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";
pub const LATITUDE_VAR: &str = "FINDER_LATITUDE";
pub const LONGITUDE_VAR: &str = "FINDER_LONGITUDE";
pub const LOCATION_URL_VAR: &str = "FINDER_LOCATION_URL";
pub const TIMEOUT_VAR: &str = "FINDER_TIMEOUT_MS";

/// Where coordinates come from
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    Fixed(Coordinates),
    Ip { url: String },
}

impl Default for LocationSource {
    fn default() -> Self {
        LocationSource::Ip {
            url: DEFAULT_LOCATION_URL.to_string(),
        }
    }
}

/// Everything needed to start a session
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_ms: Option<u64>,
    pub location: LocationSource,
}

impl Config {
    /// Load `.env` from the working directory (if present), then read the environment
    pub fn load() -> FinderResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self::from_env()
    }

    /// Load a specific `.env` file, then read the environment
    pub fn load_from(path: &Path) -> FinderResult<Self> {
        dotenvy::from_path(path).map_err(|e| {
            FinderError::ConfigError(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_env()
    }

    /// Read settings from the process environment only
    pub fn from_env() -> FinderResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> FinderResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_VAR)
            .or_else(|| get(GEMINI_API_KEY_VAR))
            .ok_or_else(|| FinderError::ConfigurationMissing(API_KEY_VAR.to_string()))?;

        let timeout_ms = get(TIMEOUT_VAR)
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|_| {
                    FinderError::ConfigError(format!("{TIMEOUT_VAR} must be a number, got {raw:?}"))
                })
            })
            .transpose()?;

        let location = match (get(LATITUDE_VAR), get(LONGITUDE_VAR)) {
            (Some(lat), Some(lon)) => {
                LocationSource::Fixed(parse_coordinates(&lat, &lon)?)
            }
            (None, None) => LocationSource::Ip {
                url: get(LOCATION_URL_VAR).unwrap_or_else(|| DEFAULT_LOCATION_URL.to_string()),
            },
            _ => {
                return Err(FinderError::ConfigError(format!(
                    "{LATITUDE_VAR} and {LONGITUDE_VAR} must be set together"
                )))
            }
        };

        Ok(Self {
            api_key: api_key.trim().to_string(),
            model: get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: get(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_ms,
            location,
        })
    }

    /// Construct the Gemini backend from these settings
    pub fn gemini_service(&self) -> FinderResult<GeminiService> {
        GeminiService::with_config(GeminiConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout_ms: self.timeout_ms,
        })
    }

    /// Construct the configured location provider
    pub fn location_provider(&self) -> FinderResult<Arc<dyn LocationProvider>> {
        Ok(match &self.location {
            LocationSource::Fixed(coords) => Arc::new(FixedLocation::from(*coords)),
            LocationSource::Ip { url } => Arc::new(IpLocationProvider::with_url(url)?),
        })
    }
}

/// Parse a latitude/longitude pair given as text
pub fn parse_coordinates(lat: &str, lon: &str) -> FinderResult<Coordinates> {
    let parse = |name: &str, raw: &str| {
        raw.trim().parse::<f64>().map_err(|_| {
            FinderError::ConfigError(format!("{name} must be a number, got {raw:?}"))
        })
    };
    Coordinates::new(parse("latitude", lat)?, parse("longitude", lon)?)
        .map_err(|e| FinderError::ConfigError(e.to_string()))
}
