//! Labs Test Utilities
//!
//! Shared test infrastructure for the Labs workspace:
//! - Mock search, summarization, classification and market providers
//! - Proptest generators for identifiers and payloads
//! - Fixtures for common scenarios
//! - Assertions over `LabsResult`

// Re-export core types for convenience
pub use labs_core::{
    InvalidityClassifier, LabsError, LabsResult, LlmError, Market, MarketError, MarketId,
    MarketInsightResult, MarketInsightsResponse, MarketInvalidResponse, MarketLookup,
    QuestionInvalidResponse, SearchOptions, SearchProvider, SearchResponse, SearchResult,
    SummarizationProvider, Timestamp, ValidationError,
};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// CALL COUNTING
// ============================================================================

/// Shared call counter; clones observe the same count.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

fn mock_failure(provider: &str) -> LabsError {
    LlmError::RequestFailed {
        provider: provider.to_string(),
        status: 503,
        message: "mock provider configured to fail".to_string(),
    }
    .into()
}

// ============================================================================
// MOCK PROVIDERS
// ============================================================================

/// Mock web search returning canned results for every query.
#[derive(Debug, Clone)]
pub struct MockSearchProvider {
    results: Vec<SearchResult>,
    fail: bool,
    calls: CallCounter,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockSearchProvider {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            fail: false,
            calls: CallCounter::new(),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A provider whose searches find nothing.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// A provider whose searches always fail.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::empty()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Queries received so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

impl Default for MockSearchProvider {
    fn default() -> Self {
        Self::new(vec![fixtures::search_result(1), fixtures::search_result(2)])
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(&self, query: &str, options: &SearchOptions) -> LabsResult<SearchResponse> {
        self.calls.hit();
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.to_string());
        }
        if self.fail {
            return Err(mock_failure("mock-search"));
        }

        Ok(SearchResponse {
            query: query.to_string(),
            answer: None,
            results: self
                .results
                .iter()
                .take(options.max_results as usize)
                .cloned()
                .collect(),
            response_time: 0.0,
        })
    }
}

/// Mock summarizer echoing the question behind a prefix.
#[derive(Debug, Clone)]
pub struct MockSummarizationProvider {
    prefix: String,
    fail: bool,
    calls: CallCounter,
}

impl MockSummarizationProvider {
    pub fn new() -> Self {
        Self::with_prefix("Summary: ")
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            fail: false,
            calls: CallCounter::new(),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Default for MockSummarizationProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SummarizationProvider for MockSummarizationProvider {
    async fn summarize(&self, question: &str, contents: &[&str]) -> LabsResult<String> {
        self.calls.hit();
        if self.fail {
            return Err(mock_failure("mock-summarizer"));
        }
        Ok(format!(
            "{}{} ({} sources)",
            self.prefix,
            question,
            contents.len()
        ))
    }
}

/// Mock classifier with a fixed verdict.
#[derive(Debug, Clone)]
pub struct MockInvalidityClassifier {
    verdict: Option<bool>,
    calls: CallCounter,
}

impl MockInvalidityClassifier {
    /// Classifier that always answers `invalid`.
    pub fn answering(invalid: bool) -> Self {
        Self {
            verdict: Some(invalid),
            calls: CallCounter::new(),
        }
    }

    /// Classifier whose every call fails.
    pub fn failing() -> Self {
        Self {
            verdict: None,
            calls: CallCounter::new(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[async_trait]
impl InvalidityClassifier for MockInvalidityClassifier {
    async fn is_invalid(&self, _question: &str) -> LabsResult<bool> {
        self.calls.hit();
        self.verdict.ok_or_else(|| mock_failure("mock-classifier"))
    }
}

/// Mock market indexer backed by a map.
#[derive(Debug, Clone, Default)]
pub struct MockMarketLookup {
    markets: HashMap<MarketId, Market>,
    fail: bool,
    calls: CallCounter,
}

impl MockMarketLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup knowing exactly the given markets.
    pub fn with_markets(markets: impl IntoIterator<Item = Market>) -> Self {
        Self {
            markets: markets.into_iter().map(|m| (m.id.clone(), m)).collect(),
            ..Self::default()
        }
    }

    /// Lookup whose every call fails with a transport error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[async_trait]
impl MarketLookup for MockMarketLookup {
    async fn get_market(&self, id: &MarketId) -> LabsResult<Market> {
        self.calls.hit();
        if self.fail {
            return Err(MarketError::LookupFailed {
                market_id: id.to_string(),
                reason: "mock indexer configured to fail".to_string(),
            }
            .into());
        }
        self.markets.get(id).cloned().ok_or_else(|| {
            MarketError::NotFound {
                market_id: id.to_string(),
            }
            .into()
        })
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for Labs identifiers and payloads.

    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    /// Generate a valid, normalized market id.
    pub fn arb_market_id() -> impl Strategy<Value = MarketId> {
        "0x[0-9a-f]{40}".prop_map(|raw| {
            MarketId::parse(&raw).unwrap_or_else(|_| fixtures::market_id(0))
        })
    }

    /// Generate a Timestamp (DateTime<Utc>) with sub-second precision.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        // Generate timestamps within a reasonable range (2020-2030)
        (1577836800i64..1893456000i64, 0u32..1_000_000_000u32).prop_map(|(secs, nanos)| {
            chrono::DateTime::from_timestamp(secs, nanos).unwrap_or_else(Utc::now)
        })
    }

    /// Generate a free-text question, already normalized.
    pub fn arb_question() -> impl Strategy<Value = String> {
        prop_oneof![
            "Will [A-Z][a-z]{2,12} (win|reach|launch) [a-z ]{3,40}\\?",
            "[A-Za-z0-9 ,.'\"-]{1,120}\\?",
            Just("Will BTC hit 100k by the end of 2025?".to_string()),
            // Non-ASCII
            Just("Le PSG gagnera-t-il la Ligue des champions en 2025 ?".to_string()),
        ]
        .prop_map(|q| q.trim().to_string())
        .prop_filter("question must not be blank", |q| !q.is_empty())
    }

    pub fn arb_insight_result() -> impl Strategy<Value = MarketInsightResult> {
        ("[a-z]{3,12}", "[A-Z][a-z ]{3,40}").prop_map(|(host, title)| MarketInsightResult {
            url: format!("https://{}.example/article", host),
            title,
        })
    }

    pub fn arb_market_insights_response() -> impl Strategy<Value = MarketInsightsResponse> {
        (
            arb_market_id(),
            arb_timestamp(),
            proptest::option::of("[A-Za-z0-9 .,!?#@]{0,280}"),
            proptest::collection::vec(arb_insight_result(), 0..6),
        )
            .prop_map(|(market_id, created_at, summary, results)| MarketInsightsResponse {
                market_id,
                created_at,
                summary,
                results,
            })
    }

    pub fn arb_market_invalid_response() -> impl Strategy<Value = MarketInvalidResponse> {
        (
            arb_market_id(),
            arb_timestamp(),
            proptest::option::of(any::<bool>()),
        )
            .prop_map(|(market_id, created_at, invalid)| MarketInvalidResponse {
                market_id,
                created_at,
                invalid,
            })
    }

    pub fn arb_question_invalid_response() -> impl Strategy<Value = QuestionInvalidResponse> {
        (
            arb_question(),
            arb_timestamp(),
            proptest::option::of(any::<bool>()),
        )
            .prop_map(|(question, created_at, invalid)| QuestionInvalidResponse {
                question,
                created_at,
                invalid,
            })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Deterministic values for example-based tests.

    use super::*;
    use chrono::{TimeZone, Utc};

    /// Market id whose last bytes encode `n`.
    pub fn market_id(n: u64) -> MarketId {
        let raw = format!("0x{:040x}", n);
        match MarketId::parse(&raw) {
            Ok(id) => id,
            Err(e) => panic!("fixture market id {} is invalid: {}", raw, e),
        }
    }

    /// A fixed reference instant, 2024-09-01T12:00:00Z.
    pub fn reference_time() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    pub fn market(n: u64, question_title: &str) -> Market {
        Market {
            id: market_id(n),
            question_title: question_title.to_string(),
        }
    }

    pub fn search_result(n: u32) -> SearchResult {
        SearchResult {
            title: format!("Article {}", n),
            url: format!("https://news.example/article-{}", n),
            content: format!("Background reporting number {}.", n),
            score: 1.0 / f64::from(n.max(1)),
        }
    }

    /// Insights payload with a summary and no results.
    pub fn insights(
        market_id: MarketId,
        created_at: Timestamp,
        summary: &str,
    ) -> MarketInsightsResponse {
        MarketInsightsResponse {
            market_id,
            created_at,
            summary: Some(summary.to_string()),
            results: Vec::new(),
        }
    }

    /// Insights payload that carries nothing worth caching.
    pub fn empty_insights(market_id: MarketId, created_at: Timestamp) -> MarketInsightsResponse {
        MarketInsightsResponse {
            market_id,
            created_at,
            summary: None,
            results: Vec::new(),
        }
    }

    pub fn market_invalid(
        market_id: MarketId,
        created_at: Timestamp,
        invalid: Option<bool>,
    ) -> MarketInvalidResponse {
        MarketInvalidResponse {
            market_id,
            created_at,
            invalid,
        }
    }

    pub fn question_invalid(
        question: &str,
        created_at: Timestamp,
        invalid: Option<bool>,
    ) -> QuestionInvalidResponse {
        QuestionInvalidResponse {
            question: question.to_string(),
            created_at,
            invalid,
        }
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions over `LabsResult` variants.

    use super::*;

    /// Assert that a LabsResult is Ok.
    #[track_caller]
    pub fn assert_ok<T: std::fmt::Debug>(result: &LabsResult<T>) {
        assert!(result.is_ok(), "Expected Ok, got Err: {:?}", result);
    }

    /// Assert that a LabsResult is a storage error.
    #[track_caller]
    pub fn assert_storage_error<T: std::fmt::Debug>(result: &LabsResult<T>) {
        match result {
            Err(LabsError::Storage(_)) => {}
            other => panic!("Expected Storage error, got: {:?}", other),
        }
    }

    /// Assert that a LabsResult is a market not-found error.
    #[track_caller]
    pub fn assert_market_not_found<T: std::fmt::Debug>(result: &LabsResult<T>) {
        match result {
            Err(LabsError::Market(MarketError::NotFound { .. })) => {}
            other => panic!("Expected market NotFound error, got: {:?}", other),
        }
    }

    /// Assert that a LabsResult is an LLM error.
    #[track_caller]
    pub fn assert_llm_error<T: std::fmt::Debug>(result: &LabsResult<T>) {
        match result {
            Err(LabsError::Llm(_)) => {}
            other => panic!("Expected LLM error, got: {:?}", other),
        }
    }

    /// Assert that a LabsResult is a validation error.
    #[track_caller]
    pub fn assert_validation_error<T: std::fmt::Debug>(result: &LabsResult<T>) {
        match result {
            Err(LabsError::Validation(_)) => {}
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_market_ids_are_distinct_and_valid() {
        assert_ne!(fixtures::market_id(1), fixtures::market_id(2));
        assert_eq!(
            fixtures::market_id(255).as_str(),
            "0x00000000000000000000000000000000000000ff"
        );
    }

    #[test]
    fn test_mock_counters_are_shared_between_clones() {
        let lookup = MockMarketLookup::with_markets([fixtures::market(1, "Q?")]);
        let clone = lookup.clone();
        clone.calls.hit();
        assert_eq!(lookup.calls(), 1);
    }
}
