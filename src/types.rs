//! Core types and traits for the business finder

use crate::error::{FinderError, FinderResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A local establishment returned by the AI backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    /// Business name
    pub name: String,
    /// Full street address
    pub address: String,
    /// Phone number, when the backend knows one
    pub phone: Option<String>,
    /// Direct Google Maps link
    #[serde(rename = "mapsUrl")]
    pub maps_url: Option<String>,
    /// Website listed for the business; always empty in finder results
    pub website: Option<String>,
}

impl Business {
    /// True when the business lists no usable website
    pub fn lacks_website(&self) -> bool {
        self.website
            .as_deref()
            .map_or(true, |site| site.trim().is_empty())
    }
}

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Create coordinates, rejecting values outside the valid ranges
    pub fn new(latitude: f64, longitude: f64) -> FinderResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(FinderError::InvalidInput(format!(
                "Latitude must be between -90 and 90, got {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(FinderError::InvalidInput(format!(
                "Longitude must be between -180 and 180, got {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lat: {:.2}, Lon: {:.2}", self.latitude, self.longitude)
    }
}

/// Debug options for the finder
#[derive(Debug, Clone, Default)]
pub struct DebugOptions {
    /// Enable verbose logging
    pub enabled: bool,
    /// Log request details (URLs, prompts, etc.)
    pub log_requests: bool,
    /// Log full responses
    pub log_responses: bool,
}

/// A backend that can find businesses lacking a website near a location
#[async_trait::async_trait]
pub trait BusinessFinder: Send + Sync + fmt::Debug {
    /// Name of the backend
    fn name(&self) -> &str;

    /// Single attempt; results keep backend order and never list a website
    async fn find_businesses_without_website(
        &self,
        business_type: &str,
        location: Coordinates,
    ) -> FinderResult<Vec<Business>>;

    /// Get backend configuration (for debugging/logging)
    fn config(&self) -> HashMap<String, String> {
        HashMap::new()
    }
}

/// Source of the user's current position
#[async_trait::async_trait]
pub trait LocationProvider: Send + Sync + fmt::Debug {
    /// Name of the location source
    fn name(&self) -> &str;

    /// One-shot position lookup, failing with `LocationUnavailable`
    async fn current_location(&self) -> FinderResult<Coordinates>;
}

/// Provider configuration trait for consistent configuration patterns
pub trait ProviderConfig {
    /// Validate the configuration
    fn validate(&self) -> Result<(), FinderError>;

    /// Get the base URL for API requests
    fn base_url(&self) -> &str;

    /// Get API key if required
    fn api_key(&self) -> Option<&str> {
        None
    }
}
