//! Gemini `generateContent` backend with Google Maps grounding
//!
//! The model is given the `googleMaps` tool and the caller's coordinates as
//! the retrieval location, so its answer is biased toward places near the
//! user. The raw reply text is handed to [`crate::reply::parse_reply`].

use crate::{
    error::{FinderError, FinderResult},
    prompt::build_prompt,
    reply::parse_reply,
    types::{Business, BusinessFinder, Coordinates, DebugOptions, ProviderConfig},
    utils::http::{extract_api_error_message, join_url, HttpClient},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    tools: Vec<Tool>,
    tool_config: ToolConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_maps: GoogleMaps,
}

#[derive(Debug, Serialize)]
struct GoogleMaps {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolConfig {
    retrieval_config: RetrievalConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalConfig {
    lat_lng: LatLng,
}

#[derive(Debug, Serialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Text of the first candidate; empty when the model produced none
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Gemini backend configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Gemini API key
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Base URL for the API
    pub base_url: String,
    /// Optional request timeout in milliseconds
    pub timeout_ms: Option<u64>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: None,
        }
    }
}

impl ProviderConfig for GeminiConfig {
    fn validate(&self) -> Result<(), FinderError> {
        if self.api_key.trim().is_empty() {
            return Err(FinderError::ConfigurationMissing("API_KEY".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(FinderError::ConfigError(
                "Gemini model name is required".to_string(),
            ));
        }
        url::Url::parse(&self.base_url)?;
        Ok(())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_key(&self) -> Option<&str> {
        Some(&self.api_key)
    }
}

/// Business finder backed by Gemini with Google Maps grounding
#[derive(Debug)]
pub struct GeminiService {
    config: GeminiConfig,
    http_client: HttpClient,
    debug: Option<DebugOptions>,
}

impl GeminiService {
    /// Create a service with the given API key and default settings
    pub fn new(api_key: &str) -> FinderResult<Self> {
        Self::with_config(GeminiConfig {
            api_key: api_key.to_string(),
            ..Default::default()
        })
    }

    /// Create a service with custom configuration
    pub fn with_config(config: GeminiConfig) -> FinderResult<Self> {
        config.validate()?;

        let http_client = match config.timeout_ms {
            Some(ms) => HttpClient::with_timeout(ms)?,
            None => HttpClient::new()?,
        };

        Ok(Self {
            config,
            http_client,
            debug: None,
        })
    }

    /// Set custom base URL (for testing or proxies)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.to_string();
        self
    }

    /// Use a different model
    pub fn with_model(mut self, model: &str) -> Self {
        self.config.model = model.to_string();
        self
    }

    /// Enable request/response debug logging
    pub fn with_debug(mut self, debug: DebugOptions) -> Self {
        self.debug = Some(debug);
        self
    }

    fn traces_requests(&self) -> bool {
        self.debug
            .as_ref()
            .is_some_and(|d| d.enabled && d.log_requests)
    }

    fn traces_responses(&self) -> bool {
        self.debug
            .as_ref()
            .is_some_and(|d| d.enabled && d.log_responses)
    }

    fn endpoint(&self) -> FinderResult<String> {
        join_url(
            self.config.base_url(),
            &format!("models/{}:generateContent", self.config.model),
        )
    }

    fn build_request(&self, business_type: &str, location: Coordinates) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(build_prompt(business_type, location)),
                }],
            }],
            tools: vec![Tool {
                google_maps: GoogleMaps {},
            }],
            tool_config: ToolConfig {
                retrieval_config: RetrievalConfig {
                    lat_lng: LatLng {
                        latitude: location.latitude,
                        longitude: location.longitude,
                    },
                },
            },
        }
    }
}

#[async_trait::async_trait]
impl BusinessFinder for GeminiService {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn find_businesses_without_website(
        &self,
        business_type: &str,
        location: Coordinates,
    ) -> FinderResult<Vec<Business>> {
        let url = self.endpoint()?;
        let request = self.build_request(business_type, location);

        if self.traces_requests() {
            log::debug!(
                "Gemini generateContent {url} model={} query={business_type:?} at {location}",
                self.config.model
            );
        }

        let mut headers = HashMap::new();
        if let Some(api_key) = self.config.api_key() {
            headers.insert("x-goog-api-key".to_string(), api_key.to_string());
        }

        let response: GenerateContentResponse = self
            .http_client
            .post_json_with_headers(&url, &request, headers)
            .await
            .map_err(|error| {
                if let FinderError::ServiceUnavailable {
                    status_code,
                    response_body,
                    ..
                } = &error
                {
                    let detail = response_body
                        .as_deref()
                        .and_then(extract_api_error_message)
                        .unwrap_or_default();
                    log::warn!(
                        "Gemini request failed ({}): {} {detail}",
                        status_code.map_or("no status".to_string(), |c| c.to_string()),
                        troubleshooting_hint(*status_code),
                    );
                }
                error
            })?;

        let text = response.text();
        if self.traces_responses() {
            log::debug!("Gemini reply: {text}");
        }

        let reply = parse_reply(&text).map_err(|error| {
            log::warn!("Failed to parse Gemini reply: {error}");
            error
        })?;

        if self.traces_responses() {
            log::debug!("Parsed Gemini reply: {reply:?}");
        }
        log::info!(
            "Gemini returned {} businesses without a website for {business_type:?} ({} with website, {} invalid dropped)",
            reply.businesses.len(),
            reply.dropped_with_website,
            reply.dropped_invalid
        );

        Ok(reply.businesses)
    }

    fn config(&self) -> HashMap<String, String> {
        let mut config = HashMap::new();
        config.insert("provider".to_string(), "gemini".to_string());
        config.insert("api_key".to_string(), "***".to_string());
        config.insert("base_url".to_string(), self.config.base_url.clone());
        config.insert("model".to_string(), self.config.model.clone());
        config.insert(
            "timeout_ms".to_string(),
            self.http_client
                .timeout()
                .map(|t| t.as_millis())
                .map_or("none".to_string(), |ms| ms.to_string()),
        );
        config
    }
}

/// Likely cause of a failed Gemini call, for the logs
fn troubleshooting_hint(status_code: Option<u16>) -> &'static str {
    match status_code {
        Some(400) => "Check the API key and the request parameters.",
        Some(401 | 403) => "This is likely an authentication issue. Check your API key and that the Gemini API is enabled.",
        Some(404) => "The model name may be wrong or unavailable for this key.",
        Some(429) => "You've exceeded the quota for this API. Try again later.",
        Some(500..=599) => "Gemini is experiencing server issues. Try again later.",
        Some(_) => "Unexpected response from Gemini.",
        None => "Could not reach Gemini. Check your network connection.",
    }
}
