//! Error types for the business finder

use thiserror::Error;

/// Result type alias for finder operations
pub type FinderResult<T> = std::result::Result<T, FinderError>;

/// Banner text shown when the AI backend could not be reached
pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "Failed to fetch business data. Please try again later.";

/// Banner text shown when the AI reply could not be understood
pub const MALFORMED_RESPONSE_MESSAGE: &str =
    "Failed to parse the response from the AI. The format was invalid.";

/// Banner text shown when the location provider fails
pub const LOCATION_UNAVAILABLE_MESSAGE: &str =
    "Unable to retrieve your location. Please enable location services.";

/// Every failure the finder can surface
#[derive(Error, Debug, Clone)]
pub enum FinderError {
    /// A required setting (the API key) is absent at startup
    #[error("Missing configuration: {0} environment variable not set")]
    ConfigurationMissing(String),

    /// A setting is present but unusable
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The device location could not be determined
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    /// The AI backend could not be invoked or answered with an error status
    #[error("Service unavailable: {message}")]
    ServiceUnavailable {
        message: String,
        status_code: Option<u16>,
        response_body: Option<String>,
    },

    /// The AI reply was not a JSON array
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl FinderError {
    /// Shorthand for a transport failure without an HTTP status
    pub fn service(message: impl Into<String>) -> Self {
        FinderError::ServiceUnavailable {
            message: message.into(),
            status_code: None,
            response_body: None,
        }
    }

    /// The single human-readable message shown in the error banner
    pub fn user_message(&self) -> String {
        match self {
            FinderError::ConfigurationMissing(_) | FinderError::ConfigError(_) => self.to_string(),
            FinderError::InvalidInput(msg) => msg.clone(),
            FinderError::LocationUnavailable(_) => LOCATION_UNAVAILABLE_MESSAGE.to_string(),
            FinderError::ServiceUnavailable { .. } => SERVICE_UNAVAILABLE_MESSAGE.to_string(),
            FinderError::MalformedResponse(_) => MALFORMED_RESPONSE_MESSAGE.to_string(),
        }
    }

    /// Whether the user can recover by retrying an action
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            FinderError::ConfigurationMissing(_) | FinderError::ConfigError(_)
        )
    }
}

impl From<reqwest::Error> for FinderError {
    fn from(error: reqwest::Error) -> Self {
        FinderError::ServiceUnavailable {
            message: error.to_string(),
            status_code: error.status().map(|s| s.as_u16()),
            response_body: None,
        }
    }
}

impl From<serde_json::Error> for FinderError {
    fn from(error: serde_json::Error) -> Self {
        FinderError::MalformedResponse(format!("JSON parsing failed: {error}"))
    }
}

impl From<url::ParseError> for FinderError {
    fn from(error: url::ParseError) -> Self {
        FinderError::ConfigError(format!("Invalid URL: {error}"))
    }
}
