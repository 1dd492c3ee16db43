//! Labs Core - Data Types
//!
//! Identifiers, payloads, provider contracts and the error taxonomy shared by
//! every other crate in the workspace. No I/O happens here.

pub mod error;
pub mod identity;
pub mod llm;
pub mod market;
pub mod payload;

pub use error::{
    ConfigError, LabsError, LabsResult, LlmError, MarketError, StorageError, ValidationError,
};
pub use identity::{
    normalize_question, MarketId, Timestamp, MAX_QUESTION_BYTES, MAX_QUESTION_CHARS,
};
pub use llm::{
    InvalidityClassifier, SearchDepth, SearchOptions, SearchProvider, SearchResponse,
    SearchResult, SummarizationProvider,
};
pub use market::{Market, MarketLookup};
pub use payload::{
    MarketInsightResult, MarketInsightsResponse, MarketInvalidResponse, QuestionInvalidResponse,
};
