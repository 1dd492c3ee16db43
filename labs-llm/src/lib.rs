//! Labs LLM - Search and LLM Providers
//!
//! HTTP clients implementing the provider traits from `labs-core`:
//! - [`OpenAISummarizationProvider`]: short market-context summaries
//! - [`OpenAIInvalidityClassifier`]: invalid-question verdicts
//! - [`TavilySearchProvider`]: web search
//!
//! Every client rate limits itself and maps HTTP failures onto
//! [`labs_core::LlmError`].

pub mod providers;

pub use providers::{
    invalid_response, not_configured, rate_limited, request_failed, OpenAIClient,
    OpenAIInvalidityClassifier, OpenAISummarizationProvider, TavilyClient, TavilySearchProvider,
    DEFAULT_OPENAI_MODEL,
};
