//! Result payloads served by the API.
//!
//! Each payload kind answers one question about a subject (a market or a raw
//! question) and is cached in its own table. Payloads are plain data; the
//! cache wiring lives in `labs-storage`.

use crate::identity::{MarketId, Timestamp};
use crate::llm::{SearchResponse, SearchResult};
use serde::{Deserialize, Serialize};

// ============================================================================
// MARKET INSIGHTS
// ============================================================================

/// One search hit backing a market insight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MarketInsightResult {
    pub url: String,
    pub title: String,
}

impl From<&SearchResult> for MarketInsightResult {
    fn from(result: &SearchResult) -> Self {
        Self {
            url: result.url.clone(),
            title: result.title.clone(),
        }
    }
}

/// Background information about a market's question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MarketInsightsResponse {
    pub market_id: MarketId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub created_at: Timestamp,
    /// Short LLM-written summary, absent when summarization failed.
    pub summary: Option<String>,
    pub results: Vec<MarketInsightResult>,
}

impl MarketInsightsResponse {
    /// Build a response from a search outcome and an optional summary.
    pub fn from_search_response(
        market_id: MarketId,
        created_at: Timestamp,
        summary: Option<String>,
        search: Option<&SearchResponse>,
    ) -> Self {
        let results = search
            .map(|response| response.results.iter().map(MarketInsightResult::from).collect())
            .unwrap_or_default();

        Self {
            market_id,
            created_at,
            summary,
            results,
        }
    }

    /// True when there is a non-empty summary or at least one result.
    pub fn has_insights(&self) -> bool {
        self.summary.as_deref().is_some_and(|s| !s.is_empty()) || !self.results.is_empty()
    }
}

// ============================================================================
// INVALIDITY
// ============================================================================

/// Whether a market's question is invalid under prediction-market rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MarketInvalidResponse {
    pub market_id: MarketId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub created_at: Timestamp,
    pub invalid: Option<bool>,
}

impl MarketInvalidResponse {
    pub fn has_invalid(&self) -> bool {
        self.invalid.is_some()
    }
}

/// Invalidity verdict for a free-text question that is not (yet) a market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct QuestionInvalidResponse {
    pub question: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub created_at: Timestamp,
    /// Absent when the classifier could not produce a verdict.
    pub invalid: Option<bool>,
}

impl QuestionInvalidResponse {
    pub fn has_invalid(&self) -> bool {
        self.invalid.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn market_id() -> MarketId {
        MarketId::parse("0x00000000000000000000000000000000000000a1").unwrap()
    }

    fn search_response() -> SearchResponse {
        SearchResponse {
            query: "Will it rain?".to_string(),
            answer: Some("Probably".to_string()),
            results: vec![SearchResult {
                title: "Forecast".to_string(),
                url: "https://weather.example/forecast".to_string(),
                content: "Rain expected".to_string(),
                score: 0.9,
            }],
            response_time: 0.4,
        }
    }

    #[test]
    fn test_insights_from_search_response_keeps_url_and_title() {
        let created_at = Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap();
        let response = MarketInsightsResponse::from_search_response(
            market_id(),
            created_at,
            None,
            Some(&search_response()),
        );

        assert_eq!(
            response.results,
            vec![MarketInsightResult {
                url: "https://weather.example/forecast".to_string(),
                title: "Forecast".to_string(),
            }]
        );
        assert!(response.has_insights());
    }

    #[test]
    fn test_insights_without_search_has_no_results() {
        let response =
            MarketInsightsResponse::from_search_response(market_id(), Utc::now(), None, None);
        assert!(response.results.is_empty());
        assert!(!response.has_insights());
    }

    #[test]
    fn test_has_insights_ignores_empty_summary() {
        let mut response =
            MarketInsightsResponse::from_search_response(market_id(), Utc::now(), None, None);
        response.summary = Some(String::new());
        assert!(!response.has_insights());

        response.summary = Some("Context".to_string());
        assert!(response.has_insights());
    }

    #[test]
    fn test_has_invalid() {
        let mut response = MarketInvalidResponse {
            market_id: market_id(),
            created_at: Utc::now(),
            invalid: None,
        };
        assert!(!response.has_invalid());

        response.invalid = Some(false);
        assert!(response.has_invalid());
    }

    #[test]
    fn test_insights_json_shape() {
        let created_at = Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap();
        let response = MarketInsightsResponse {
            market_id: market_id(),
            created_at,
            summary: Some("s".to_string()),
            results: vec![],
        };
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["market_id"], "0x00000000000000000000000000000000000000a1");
        assert_eq!(value["created_at"], "2024-09-01T12:00:00Z");
        assert_eq!(value["summary"], "s");
        assert!(value["results"].as_array().unwrap().is_empty());
    }
}
