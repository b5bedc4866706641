//! Search session: the only stateful part of the client
//!
//! [`SearchSession`] owns the query, the current coordinates and the
//! loading/error/result state, and wires user actions to a
//! [`LocationProvider`] and a [`BusinessFinder`]. All mutation happens
//! through `&mut self`, so one search is in flight at most.

use crate::{
    error::{FinderError, FinderResult},
    types::{Business, BusinessFinder, Coordinates, LocationProvider},
};
use std::sync::Arc;

/// Shown when a search is submitted without a business type
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a business type.";

/// Shown when a search is submitted before a location is known
pub const LOCATION_REQUIRED_MESSAGE: &str =
    "Could not get your location. Please allow location access and try again.";

/// Where the session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    LocationPending,
    LocationReady,
    Searching,
    Results,
    Error,
}

/// State and orchestration for one interactive session
#[derive(Debug)]
pub struct SearchSession {
    finder: Arc<dyn BusinessFinder>,
    locator: Arc<dyn LocationProvider>,
    phase: SessionPhase,
    query: String,
    location: Option<Coordinates>,
    loading: bool,
    error: Option<String>,
    results: Vec<Business>,
    has_searched: bool,
    /// The last search succeeded and its results are still held
    showing_results: bool,
}

impl SearchSession {
    pub fn new(finder: Arc<dyn BusinessFinder>, locator: Arc<dyn LocationProvider>) -> Self {
        Self {
            finder,
            locator,
            phase: SessionPhase::Idle,
            query: String::new(),
            location: None,
            loading: false,
            error: None,
            results: Vec::new(),
            has_searched: false,
            showing_results: false,
        }
    }

    /// Session start: fetch the initial location
    pub async fn mount(&mut self) -> FinderResult<Coordinates> {
        self.refresh_location().await
    }

    /// Re-run the location lookup; search results are left alone
    pub async fn refresh_location(&mut self) -> FinderResult<Coordinates> {
        if !self.showing_results {
            self.phase = SessionPhase::LocationPending;
        }

        match self.locator.current_location().await {
            Ok(coordinates) => {
                log::debug!("Location from {}: {coordinates}", self.locator.name());
                self.location = Some(coordinates);
                self.error = None;
                self.phase = if self.showing_results {
                    SessionPhase::Results
                } else {
                    SessionPhase::LocationReady
                };
                Ok(coordinates)
            }
            Err(error) => {
                log::warn!("Location lookup via {} failed: {error}", self.locator.name());
                self.error = Some(error.user_message());
                self.phase = SessionPhase::Error;
                Err(error)
            }
        }
    }

    /// Validate and run a search for `query` at the current location
    pub async fn submit(&mut self, query: &str) -> FinderResult<&[Business]> {
        let query = query.trim();
        if query.is_empty() {
            return Err(self.fail(FinderError::InvalidInput(EMPTY_QUERY_MESSAGE.to_string())));
        }

        let Some(location) = self.location else {
            // The lookup's own outcome is superseded by the message below.
            let _ = self.refresh_location().await;
            self.error = Some(LOCATION_REQUIRED_MESSAGE.to_string());
            self.phase = SessionPhase::Error;
            return Err(FinderError::LocationUnavailable(
                LOCATION_REQUIRED_MESSAGE.to_string(),
            ));
        };

        self.error = None;
        self.results.clear();
        self.showing_results = false;
        self.has_searched = true;
        self.query = query.to_string();
        self.loading = true;
        self.phase = SessionPhase::Searching;

        log::info!(
            "Searching {} for {query:?} near {location}",
            self.finder.name()
        );
        let outcome = self
            .finder
            .find_businesses_without_website(query, location)
            .await;
        self.loading = false;

        match outcome {
            Ok(businesses) => {
                self.results = businesses;
                self.showing_results = true;
                self.phase = SessionPhase::Results;
                Ok(self.results.as_slice())
            }
            Err(error) => {
                log::warn!("Search for {query:?} failed: {error}");
                self.results.clear();
                Err(self.fail(error))
            }
        }
    }

    fn fail(&mut self, error: FinderError) -> FinderError {
        self.error = Some(error.user_message());
        self.phase = SessionPhase::Error;
        error
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Query of the last search that was actually issued
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn location(&self) -> Option<Coordinates> {
        self.location
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn results(&self) -> &[Business] {
        &self.results
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SERVICE_UNAVAILABLE_MESSAGE;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct MockFinder {
        outcome: Result<Vec<Business>, FinderError>,
        calls: Mutex<Vec<(String, Coordinates)>>,
    }

    impl MockFinder {
        fn returning(outcome: Result<Vec<Business>, FinderError>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl BusinessFinder for MockFinder {
        fn name(&self) -> &str {
            "mock"
        }

        async fn find_businesses_without_website(
            &self,
            business_type: &str,
            location: Coordinates,
        ) -> FinderResult<Vec<Business>> {
            self.calls
                .lock()
                .unwrap()
                .push((business_type.to_string(), location));
            self.outcome.clone()
        }
    }

    /// Fails until `failures` lookups have been made, then succeeds
    #[derive(Debug)]
    struct MockLocator {
        failures: usize,
        calls: Mutex<usize>,
    }

    impl MockLocator {
        fn failing_first(failures: usize) -> Arc<Self> {
            Arc::new(Self {
                failures,
                calls: Mutex::new(0),
            })
        }

        fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl LocationProvider for MockLocator {
        fn name(&self) -> &str {
            "mock"
        }

        async fn current_location(&self) -> FinderResult<Coordinates> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if *calls <= self.failures {
                Err(FinderError::LocationUnavailable("denied".to_string()))
            } else {
                Coordinates::new(37.77, -122.41)
            }
        }
    }

    fn business(name: &str) -> Business {
        Business {
            name: name.to_string(),
            address: "1 Main St".to_string(),
            phone: None,
            maps_url: None,
            website: None,
        }
    }

    #[tokio::test]
    async fn test_mount_success_sets_location() {
        let finder = MockFinder::returning(Ok(vec![]));
        let locator = MockLocator::failing_first(0);
        let mut session = SearchSession::new(finder, locator);

        assert_eq!(session.phase(), SessionPhase::Idle);
        session.mount().await.unwrap();

        assert_eq!(session.phase(), SessionPhase::LocationReady);
        assert_eq!(session.location(), Some(Coordinates::new(37.77, -122.41).unwrap()));
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_mount_failure_sets_error() {
        let finder = MockFinder::returning(Ok(vec![]));
        let locator = MockLocator::failing_first(1);
        let mut session = SearchSession::new(finder, locator);

        assert!(session.mount().await.is_err());
        assert_eq!(session.phase(), SessionPhase::Error);
        assert!(session.location().is_none());
        assert_eq!(
            session.error(),
            Some(crate::error::LOCATION_UNAVAILABLE_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_empty_query_never_calls_backend() {
        let finder = MockFinder::returning(Ok(vec![business("A")]));
        let locator = MockLocator::failing_first(0);
        let mut session = SearchSession::new(finder.clone(), locator);
        session.mount().await.unwrap();

        for query in ["", "   ", "\t\n"] {
            let err = session.submit(query).await.unwrap_err();
            assert!(matches!(err, FinderError::InvalidInput(_)));
        }

        assert_eq!(finder.call_count(), 0);
        assert_eq!(session.phase(), SessionPhase::Error);
        assert_eq!(session.error(), Some(EMPTY_QUERY_MESSAGE));
        assert!(session.location().is_some());
        assert!(!session.has_searched());
    }

    #[tokio::test]
    async fn test_missing_location_retriggers_lookup_without_backend_call() {
        let finder = MockFinder::returning(Ok(vec![business("A")]));
        let locator = MockLocator::failing_first(1);
        let mut session = SearchSession::new(finder.clone(), locator.clone());
        assert!(session.mount().await.is_err());

        let err = session.submit("coffee shops").await.unwrap_err();
        assert!(matches!(err, FinderError::LocationUnavailable(_)));
        assert_eq!(finder.call_count(), 0);
        assert_eq!(locator.call_count(), 2);
        assert_eq!(session.error(), Some(LOCATION_REQUIRED_MESSAGE));
        assert_eq!(session.phase(), SessionPhase::Error);

        // The retried lookup succeeded, so the next submission goes through.
        assert!(session.location().is_some());
        session.submit("coffee shops").await.unwrap();
        assert_eq!(finder.call_count(), 1);
    }

    #[tokio::test]
    async fn test_successful_search() {
        let finder = MockFinder::returning(Ok(vec![business("A"), business("B")]));
        let locator = MockLocator::failing_first(0);
        let mut session = SearchSession::new(finder.clone(), locator);
        session.mount().await.unwrap();

        let results = session.submit("  coffee shops ").await.unwrap();
        assert_eq!(results.len(), 2);

        assert_eq!(session.phase(), SessionPhase::Results);
        assert_eq!(session.query(), "coffee shops");
        assert!(session.has_searched());
        assert!(!session.is_loading());
        assert!(session.error().is_none());

        let calls = finder.calls.lock().unwrap();
        assert_eq!(calls[0].0, "coffee shops");
        assert_eq!(calls[0].1, Coordinates::new(37.77, -122.41).unwrap());
    }

    #[tokio::test]
    async fn test_empty_results_are_not_an_error() {
        let finder = MockFinder::returning(Ok(vec![]));
        let locator = MockLocator::failing_first(0);
        let mut session = SearchSession::new(finder, locator);
        session.mount().await.unwrap();

        assert!(session.submit("bookstores").await.unwrap().is_empty());
        assert_eq!(session.phase(), SessionPhase::Results);
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_failed_search_clears_results() {
        let finder = MockFinder::returning(Err(FinderError::service("connection refused")));
        let locator = MockLocator::failing_first(0);
        let mut session = SearchSession::new(finder, locator);
        session.mount().await.unwrap();

        assert!(session.submit("plumbers").await.is_err());
        assert_eq!(session.phase(), SessionPhase::Error);
        assert_eq!(session.error(), Some(SERVICE_UNAVAILABLE_MESSAGE));
        assert!(session.results().is_empty());
        assert!(!session.is_loading());
        assert!(session.has_searched());
    }

    #[tokio::test]
    async fn test_refresh_keeps_results() {
        let finder = MockFinder::returning(Ok(vec![business("A")]));
        let locator = MockLocator::failing_first(0);
        let mut session = SearchSession::new(finder, locator.clone());
        session.mount().await.unwrap();
        session.submit("bakeries").await.unwrap();

        session.refresh_location().await.unwrap();
        assert_eq!(locator.call_count(), 2);
        assert_eq!(session.phase(), SessionPhase::Results);
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.query(), "bakeries");
    }

    /// Succeeds, then fails on the listed call numbers
    #[derive(Debug)]
    struct FlakyLocator {
        failing_calls: Vec<usize>,
        calls: Mutex<usize>,
    }

    #[async_trait::async_trait]
    impl LocationProvider for FlakyLocator {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn current_location(&self) -> FinderResult<Coordinates> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if self.failing_calls.contains(&*calls) {
                Err(FinderError::LocationUnavailable("timeout".to_string()))
            } else {
                Coordinates::new(37.77, -122.41)
            }
        }
    }

    #[tokio::test]
    async fn test_failed_then_successful_refresh_returns_to_results() {
        let finder = MockFinder::returning(Ok(vec![business("A")]));
        let locator = Arc::new(FlakyLocator {
            failing_calls: vec![2],
            calls: Mutex::new(0),
        });
        let mut session = SearchSession::new(finder, locator);
        session.mount().await.unwrap();
        session.submit("bakeries").await.unwrap();

        assert!(session.refresh_location().await.is_err());
        assert_eq!(session.phase(), SessionPhase::Error);
        assert_eq!(session.results().len(), 1);

        session.refresh_location().await.unwrap();
        assert_eq!(session.phase(), SessionPhase::Results);
        assert_eq!(session.results().len(), 1);
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_refresh_after_failed_search_is_location_ready() {
        let finder = MockFinder::returning(Err(FinderError::service("down")));
        let locator = MockLocator::failing_first(0);
        let mut session = SearchSession::new(finder, locator);
        session.mount().await.unwrap();
        assert!(session.submit("bakeries").await.is_err());

        session.refresh_location().await.unwrap();
        assert_eq!(session.phase(), SessionPhase::LocationReady);
        assert!(session.results().is_empty());
    }

    #[tokio::test]
    async fn test_new_search_clears_previous_error() {
        let finder = MockFinder::returning(Ok(vec![business("A")]));
        let locator = MockLocator::failing_first(0);
        let mut session = SearchSession::new(finder, locator);
        session.mount().await.unwrap();

        assert!(session.submit("").await.is_err());
        assert!(session.error().is_some());

        session.submit("florists").await.unwrap();
        assert!(session.error().is_none());
        assert_eq!(session.phase(), SessionPhase::Results);
    }
}
