//! Cacheable payload trait.
//!
//! This module defines what a payload kind must provide so that a
//! [`ResponseCache`](super::ResponseCache) can persist it: a table of its
//! own, a subject key, a timestamp, a worth-keeping predicate and a text
//! encoding.

use labs_core::{
    MarketInsightsResponse, MarketInvalidResponse, QuestionInvalidResponse, Timestamp,
};
use serde::{de::DeserializeOwned, Serialize};

/// A result kind that can be stored in a response cache.
///
/// # Implementation Requirements
///
/// - `TABLE` must be unique per kind; two kinds never share a table
/// - `subject_id()` is the lookup key and must be stable for equal subjects
/// - `created_at()` becomes the record's `stored_at` and drives freshness
/// - `encode`/`decode` must round-trip every field losslessly
pub trait CacheablePayload: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name of the backing table. Must be a plain SQL identifier.
    const TABLE: &'static str;

    /// The cache key of this payload.
    fn subject_id(&self) -> &str;

    /// When the payload was computed.
    fn created_at(&self) -> Timestamp;

    /// Whether the payload carries a usable result worth persisting.
    fn has_value(&self) -> bool;

    /// Serialize the payload for the `json_dump` column.
    fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize a payload previously produced by [`encode`](Self::encode).
    fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

// ============================================================================
// IMPLEMENTATIONS FOR LABS PAYLOADS
// ============================================================================

impl CacheablePayload for MarketInsightsResponse {
    const TABLE: &'static str = "market_insights_response_cache";

    fn subject_id(&self) -> &str {
        self.market_id.as_str()
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn has_value(&self) -> bool {
        self.has_insights()
    }
}

impl CacheablePayload for MarketInvalidResponse {
    const TABLE: &'static str = "market_invalid_response_cache";

    fn subject_id(&self) -> &str {
        self.market_id.as_str()
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn has_value(&self) -> bool {
        self.has_invalid()
    }
}

impl CacheablePayload for QuestionInvalidResponse {
    const TABLE: &'static str = "question_invalid_response_cache";

    fn subject_id(&self) -> &str {
        &self.question
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn has_value(&self) -> bool {
        self.has_invalid()
    }
}
