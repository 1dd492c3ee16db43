//! Tavily HTTP client with rate limiting

use super::types::{SearchRequest, TavilyError, TavilyResponse};
use crate::providers::rate_limit::RateLimiter;
use crate::providers::{invalid_response, parse_retry_after_ms, rate_limited, request_failed};
use async_trait::async_trait;
use labs_core::{LabsResult, SearchOptions, SearchProvider, SearchResponse};
use reqwest::{Client, StatusCode};
use std::time::Duration;

const PROVIDER: &str = "tavily";
const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

/// Tavily API client with rate limiting.
#[derive(Clone)]
pub struct TavilyClient {
    client: Client,
    api_key: String,
    base_url: String,
    rate_limiter: RateLimiter,
}

impl TavilyClient {
    pub fn new(api_key: impl Into<String>, requests_per_minute: u32) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            rate_limiter: RateLimiter::per_minute(PROVIDER, requests_per_minute),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Run one search.
    pub async fn search(&self, query: &str, options: &SearchOptions) -> LabsResult<TavilyResponse> {
        let _permit = self.rate_limiter.acquire().await?;

        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&SearchRequest::new(&self.api_key, query, options))
            .send()
            .await
            .map_err(|e| request_failed(PROVIDER, 0, format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let retry_after_ms = parse_retry_after_ms(response.headers()).unwrap_or(0);

        if status.is_success() {
            return response.json().await.map_err(|e| {
                invalid_response(PROVIDER, format!("Failed to parse response: {}", e))
            });
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let error_msg = match serde_json::from_str::<TavilyError>(&error_text) {
            Ok(error) => error.detail.message(),
            Err(_) => error_text,
        };

        tracing::warn!(status = status.as_u16(), error = %error_msg, "Tavily search failed");
        Err(match status {
            StatusCode::TOO_MANY_REQUESTS => rate_limited(PROVIDER, retry_after_ms),
            _ => request_failed(PROVIDER, i32::from(status.as_u16()), error_msg),
        })
    }
}

impl std::fmt::Debug for TavilyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilyClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// [`SearchProvider`] backed by Tavily.
#[derive(Debug, Clone)]
pub struct TavilySearchProvider {
    client: TavilyClient,
}

impl TavilySearchProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(TavilyClient::new(api_key, 60))
    }

    pub fn with_client(client: TavilyClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SearchProvider for TavilySearchProvider {
    async fn search(&self, query: &str, options: &SearchOptions) -> LabsResult<SearchResponse> {
        let response = self.client.search(query, options).await?;
        tracing::debug!(
            query,
            results = response.results.len(),
            response_time = response.response_time,
            "Tavily search completed"
        );
        Ok(response.into())
    }
}
