//! Provider implementations
//!
//! Concrete implementations of the `SearchProvider`, `SummarizationProvider`
//! and `InvalidityClassifier` traits, plus the error constructors they share.

pub mod openai;
pub mod rate_limit;
pub mod tavily;

pub use openai::{
    OpenAIClient, OpenAIInvalidityClassifier, OpenAISummarizationProvider, DEFAULT_OPENAI_MODEL,
};
pub use rate_limit::RateLimiter;
pub use tavily::{TavilyClient, TavilySearchProvider};

use labs_core::{LabsError, LlmError};

/// A request that reached the provider (or failed to) without success.
pub fn request_failed(provider: &str, status: i32, message: impl Into<String>) -> LabsError {
    LlmError::RequestFailed {
        provider: provider.to_string(),
        status,
        message: message.into(),
    }
    .into()
}

/// The provider asked us to back off.
pub fn rate_limited(provider: &str, retry_after_ms: i64) -> LabsError {
    LlmError::RateLimited {
        provider: provider.to_string(),
        retry_after_ms,
    }
    .into()
}

/// The provider answered with something we cannot use.
pub fn invalid_response(provider: &str, reason: impl Into<String>) -> LabsError {
    LlmError::InvalidResponse {
        provider: provider.to_string(),
        reason: reason.into(),
    }
    .into()
}

/// No provider is configured for `capability`.
pub fn not_configured(capability: &str) -> LabsError {
    LlmError::ProviderNotConfigured {
        capability: capability.to_string(),
    }
    .into()
}

/// Parse a `Retry-After` header given in (possibly fractional) seconds.
pub(crate) fn parse_retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<i64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
        .map(|seconds| (seconds * 1000.0) as i64)
}
