//! OpenAI summarization provider implementation

use super::client::OpenAIClient;
use super::types::{CompletionRequest, CompletionResponse, Message};
use super::DEFAULT_OPENAI_MODEL;
use crate::providers::invalid_response;
use async_trait::async_trait;
use labs_core::{LabsResult, SummarizationProvider};

const SUMMARY_MAX_TOKENS: i32 = 1024;

/// Writes tweet-length context for a prediction-market question from search
/// result contents. The summary never answers the question.
#[derive(Debug, Clone)]
pub struct OpenAISummarizationProvider {
    client: OpenAIClient,
    model: String,
}

impl OpenAISummarizationProvider {
    /// Create a new OpenAI summarization provider.
    ///
    /// # Arguments
    /// * `api_key` - OpenAI API key
    /// * `model` - Model name (e.g., "gpt-4o-2024-08-06")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_client(OpenAIClient::new(api_key, 60), model)
    }

    /// Create provider with the default model.
    pub fn with_default_model(api_key: impl Into<String>) -> Self {
        Self::new(api_key, DEFAULT_OPENAI_MODEL)
    }

    pub fn with_client(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, question: &str, contents: &[&str]) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: vec![Message::user(build_prompt(question, contents))],
            max_tokens: Some(SUMMARY_MAX_TOKENS),
            temperature: Some(0.0),
        }
    }
}

fn build_prompt(question: &str, contents: &[&str]) -> String {
    let information = contents
        .iter()
        .map(|content| format!("- {}", content.trim()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Based on the information provided, write a very brief, tweet-like summary about the \
current situation relevant for the prediction market question.

In the summary:
- include the most important information relevant for the prediction market question
- never answer the question, only provide the context for the reader
- don't include any hashtags or links
- always end by politely guiding the reader to do their own research and make their own \
decision before placing any bets in the prediction market

Prediction Market question: {question}

Information:
{information}
"
    )
}

#[async_trait]
impl SummarizationProvider for OpenAISummarizationProvider {
    async fn summarize(&self, question: &str, contents: &[&str]) -> LabsResult<String> {
        let request = self.build_request(question, contents);
        let response: CompletionResponse = self.client.request("chat/completions", request).await?;

        let summary = response
            .first_content()
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| invalid_response("openai", "No completion in response"))?;

        Ok(summary)
    }
}
