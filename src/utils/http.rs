//! HTTP utilities for talking to the AI backend and location services

use crate::error::{FinderError, FinderResult};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("bizfinder/", env!("CARGO_PKG_VERSION"));

/// HTTP client wrapper shared by the backends
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Option<Duration>,
}

impl HttpClient {
    /// Create a client without a request timeout
    pub fn new() -> FinderResult<Self> {
        Self::build(None)
    }

    /// Create a client that gives up after `timeout_ms`
    pub fn with_timeout(timeout_ms: u64) -> FinderResult<Self> {
        Self::build(Some(Duration::from_millis(timeout_ms)))
    }

    fn build(timeout: Option<Duration>) -> FinderResult<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FinderError::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, timeout })
    }

    /// Configured request timeout, if any
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Make a GET request and deserialize the JSON response
    pub async fn get_json<T>(&self, url: &str) -> FinderResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.client.get(url).send().await?;
        let text = self.handle_response_text(response).await?;
        serde_json::from_str(&text).map_err(|e| {
            FinderError::MalformedResponse(format!("Failed to parse response from {url}: {e}"))
        })
    }

    /// POST a JSON body with extra headers and deserialize the JSON response
    pub async fn post_json_with_headers<B, T>(
        &self,
        url: &str,
        body: &B,
        headers: HashMap<String, String>,
    ) -> FinderResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = with_headers(self.client.post(url).json(body), headers);
        let response = request.send().await?;
        let text = self.handle_response_text(response).await?;
        serde_json::from_str(&text).map_err(|e| {
            FinderError::service(format!("Unexpected response envelope from {url}: {e}"))
        })
    }

    /// Return the body as text, mapping error statuses to `ServiceUnavailable`
    async fn handle_response_text(&self, response: Response) -> FinderResult<String> {
        let status = response.status();

        if status.is_success() {
            let text = response.text().await?;
            Ok(text)
        } else {
            let status_code = status.as_u16();
            let response_body = response.text().await.ok();

            Err(FinderError::ServiceUnavailable {
                message: format!("Request failed with status: {status}"),
                status_code: Some(status_code),
                response_body,
            })
        }
    }
}

fn with_headers(mut request: RequestBuilder, headers: HashMap<String, String>) -> RequestBuilder {
    for (key, value) in headers {
        request = request.header(key, value);
    }
    request
}

/// Join a path onto a base URL, keeping any path already on the base
pub fn join_url(base_url: &str, path: &str) -> FinderResult<String> {
    let trimmed = base_url.trim_end_matches('/');
    let url = Url::parse(&format!("{trimmed}/{}", path.trim_start_matches('/')))?;
    Ok(url.to_string())
}

/// Extract the `error.message` field Google APIs put in error bodies
pub fn extract_api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value["error"]["message"].as_str().map(str::to_string)
}
