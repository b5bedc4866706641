//! End-to-end session tests: a search session wired to the real Gemini
//! backend (against a mock server) and a fixed location.

use bizfinder::{
    error::FinderError,
    location::FixedLocation,
    providers::gemini::GeminiService,
    render::{self, OutputFormat},
    session::{SearchSession, SessionPhase, EMPTY_QUERY_MESSAGE},
    types::{BusinessFinder, LocationProvider},
};
use serde_json::json;
use std::sync::Arc;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const ENDPOINT: &str = "/models/gemini-2.5-flash:generateContent";

fn session_for(server: &MockServer) -> SearchSession {
    let finder: Arc<dyn BusinessFinder> = Arc::new(
        GeminiService::new("test-key")
            .unwrap()
            .with_base_url(&server.uri()),
    );
    let locator: Arc<dyn LocationProvider> = Arc::new(FixedLocation::new(37.77, -122.41).unwrap());
    SearchSession::new(finder, locator)
}

#[tokio::test]
async fn test_coffee_shops_example() {
    colored::control::set_override(false);
    let server = MockServer::start().await;

    let text = "```json\n[{\"name\": \"Corner Cafe\", \"address\": \"1 Mission St\", \"phone\": \"555-0100\", \"mapsUrl\": null, \"website\": null}, {\"name\": \"Chain Coffee\", \"address\": \"2 Market St\", \"phone\": null, \"mapsUrl\": null, \"website\": \"http://x.com\"}]\n```";
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": text}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    session.mount().await.unwrap();
    assert_eq!(session.phase(), SessionPhase::LocationReady);

    let results = session.submit("coffee shops").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Corner Cafe");

    let view = render::session_view(&session, OutputFormat::Table);
    assert!(view.contains("Results for \"coffee shops\""));
    assert!(view.contains("Corner Cafe"));
    assert!(!view.contains("Chain Coffee"));
    assert!(view.contains("No Website Listed"));
}

#[tokio::test]
async fn test_empty_query_never_reaches_backend() {
    colored::control::set_override(false);
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    session.mount().await.unwrap();

    let err = session.submit("   ").await.unwrap_err();
    assert!(matches!(err, FinderError::InvalidInput(_)));

    let view = render::session_view(&session, OutputFormat::Table);
    assert!(view.contains(EMPTY_QUERY_MESSAGE));
    assert!(view.contains("Ready to Discover?"));
}

#[tokio::test]
async fn test_backend_failure_shows_generic_message() {
    colored::control::set_override(false);
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    session.mount().await.unwrap();
    assert!(session.submit("plumbers").await.is_err());

    assert_eq!(session.phase(), SessionPhase::Error);
    let view = render::session_view(&session, OutputFormat::Table);
    assert!(view.contains("Failed to fetch business data. Please try again later."));
    assert!(!view.contains("Results for"));
}

#[tokio::test]
async fn test_empty_result_panel() {
    colored::control::set_override(false);
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "[]"}]}}]
        })))
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    session.mount().await.unwrap();
    assert!(session.submit("lighthouses").await.unwrap().is_empty());

    let view = render::session_view(&session, OutputFormat::Table);
    assert!(view.contains("No businesses without websites found for your search."));
}
