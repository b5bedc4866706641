//! IP geolocation lookup
//!
//! Understands both the ip-api.com shape (`status`, `lat`, `lon`) and the
//! ipapi.co shape (`latitude`, `longitude`, `error`, `reason`).

use crate::{
    error::{FinderError, FinderResult},
    types::{Coordinates, LocationProvider},
    utils::http::HttpClient,
};
use serde::Deserialize;

/// Default lookup endpoint
pub const DEFAULT_LOCATION_URL: &str = "http://ip-api.com/json";

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: Option<String>,
    message: Option<String>,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
    #[serde(alias = "latitude")]
    lat: Option<f64>,
    #[serde(alias = "longitude")]
    lon: Option<f64>,
}

impl IpLookupResponse {
    fn into_coordinates(self) -> FinderResult<Coordinates> {
        if self.error || self.status.as_deref() == Some("fail") {
            let reason = self
                .message
                .or(self.reason)
                .unwrap_or_else(|| "lookup failed".to_string());
            return Err(FinderError::LocationUnavailable(reason));
        }

        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon)
                .map_err(|e| FinderError::LocationUnavailable(e.to_string())),
            _ => Err(FinderError::LocationUnavailable(
                "lookup response had no coordinates".to_string(),
            )),
        }
    }
}

/// Looks up the approximate position of this machine's public IP
#[derive(Debug, Clone)]
pub struct IpLocationProvider {
    url: String,
    http_client: HttpClient,
}

impl IpLocationProvider {
    /// Create a provider using the default lookup endpoint
    pub fn new() -> FinderResult<Self> {
        Self::with_url(DEFAULT_LOCATION_URL)
    }

    /// Create a provider using a custom lookup endpoint
    pub fn with_url(url: &str) -> FinderResult<Self> {
        url::Url::parse(url)?;
        Ok(Self {
            url: url.to_string(),
            http_client: HttpClient::with_timeout(10_000)?,
        })
    }

    /// Lookup endpoint in use
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl LocationProvider for IpLocationProvider {
    fn name(&self) -> &str {
        "ip"
    }

    async fn current_location(&self) -> FinderResult<Coordinates> {
        log::debug!("Looking up location via {}", self.url);

        let response: IpLookupResponse = self
            .http_client
            .get_json(&self.url)
            .await
            .map_err(|e| FinderError::LocationUnavailable(e.to_string()))?;

        let coordinates = response.into_coordinates()?;
        log::info!("Location resolved: {coordinates}");
        Ok(coordinates)
    }
}
