//! Tavily API request and response types

use labs_core::{SearchDepth, SearchOptions, SearchResponse, SearchResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest<'a> {
    pub api_key: &'a str,
    pub query: &'a str,
    pub search_depth: SearchDepth,
    pub include_answer: bool,
    pub max_results: u32,
}

impl<'a> SearchRequest<'a> {
    pub fn new(api_key: &'a str, query: &'a str, options: &SearchOptions) -> Self {
        Self {
            api_key,
            query,
            search_depth: options.depth,
            include_answer: options.include_answer,
            max_results: options.max_results,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TavilyResponse {
    pub query: String,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub results: Vec<TavilyResult>,
    #[serde(default)]
    pub response_time: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TavilyResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: f64,
}

impl From<TavilyResult> for SearchResult {
    fn from(result: TavilyResult) -> Self {
        Self {
            title: result.title,
            url: result.url,
            content: result.content,
            score: result.score,
        }
    }
}

impl From<TavilyResponse> for SearchResponse {
    fn from(response: TavilyResponse) -> Self {
        Self {
            query: response.query,
            answer: response.answer,
            results: response.results.into_iter().map(SearchResult::from).collect(),
            response_time: response.response_time,
        }
    }
}

/// Error body returned on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct TavilyError {
    pub detail: TavilyErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TavilyErrorDetail {
    Message { error: String },
    Text(String),
}

impl TavilyErrorDetail {
    pub fn message(self) -> String {
        match self {
            Self::Message { error } => error,
            Self::Text(text) => text,
        }
    }
}
