//! OpenAI provider implementation
//!
//! Chat-completion based summarization and invalid-question classification.

pub mod classifier;
pub mod client;
pub mod summarization;
pub mod types;

pub use classifier::OpenAIInvalidityClassifier;
pub use client::OpenAIClient;
pub use summarization::OpenAISummarizationProvider;

/// Model used when none is configured.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-2024-08-06";
