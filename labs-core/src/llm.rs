//! Search and LLM provider contracts.
//!
//! Pure data types plus the traits producers call. Concrete HTTP clients live
//! in `labs-llm`; mocks live in `labs-test-utils`.

use crate::error::LabsResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ============================================================================
// SEARCH TYPES
// ============================================================================

/// Search depth requested from the web-search provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    #[default]
    Basic,
    Advanced,
}

/// Options for one web search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub depth: SearchDepth,
    pub include_answer: bool,
    pub max_results: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            depth: SearchDepth::Basic,
            include_answer: true,
            max_results: 5,
        }
    }
}

/// A single web-search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub content: String,
    pub score: f64,
}

/// Web-search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    #[serde(default)]
    pub answer: Option<String>,
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub response_time: f64,
}

impl SearchResponse {
    /// Page contents of every hit, in rank order.
    pub fn contents(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.content.as_str()).collect()
    }
}

// ============================================================================
// PROVIDER TRAITS
// ============================================================================

/// Web search over a query string.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, options: &SearchOptions) -> LabsResult<SearchResponse>;
}

/// Writes a short context summary for a prediction-market question.
#[async_trait]
pub trait SummarizationProvider: Send + Sync {
    async fn summarize(&self, question: &str, contents: &[&str]) -> LabsResult<String>;
}

/// Decides whether a question is invalid for a prediction market.
#[async_trait]
pub trait InvalidityClassifier: Send + Sync {
    async fn is_invalid(&self, question: &str) -> LabsResult<bool>;
}
