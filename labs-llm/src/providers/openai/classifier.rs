//! OpenAI invalid-question classifier

use super::client::OpenAIClient;
use super::types::{CompletionRequest, CompletionResponse, Message};
use super::DEFAULT_OPENAI_MODEL;
use crate::providers::invalid_response;
use async_trait::async_trait;
use labs_core::{InvalidityClassifier, LabsResult};

const SYSTEM_PROMPT: &str = "You are an expert reviewer of prediction market questions. \
A question is INVALID if any of the following holds:
- it is about the death or injury of a person, or incentivizes violence or other harm
- it can only be resolved by someone's subjective opinion
- it does not have a clear yes/no answer
- it has no clear time frame or deadline for resolution
- it depends on information that will never become publicly available
Otherwise the question is valid. Answer with exactly one word: `yes` if the question is invalid, \
`no` if it is valid.";

/// Asks a chat model whether a question breaks prediction-market rules.
#[derive(Debug, Clone)]
pub struct OpenAIInvalidityClassifier {
    client: OpenAIClient,
    model: String,
}

impl OpenAIInvalidityClassifier {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_client(OpenAIClient::new(api_key, 60), model)
    }

    pub fn with_default_model(api_key: impl Into<String>) -> Self {
        Self::new(api_key, DEFAULT_OPENAI_MODEL)
    }

    pub fn with_client(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    fn build_request(&self, question: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message::system(SYSTEM_PROMPT),
                Message::user(format!("Question: {}", question)),
            ],
            max_tokens: Some(4),
            temperature: Some(0.0),
        }
    }
}

/// Read a `yes`/`no` verdict, tolerating case, whitespace and punctuation.
fn parse_verdict(answer: &str) -> Option<bool> {
    let word = answer
        .trim()
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    match word.as_str() {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}

#[async_trait]
impl InvalidityClassifier for OpenAIInvalidityClassifier {
    async fn is_invalid(&self, question: &str) -> LabsResult<bool> {
        let response: CompletionResponse = self
            .client
            .request("chat/completions", self.build_request(question))
            .await?;

        let answer = response
            .first_content()
            .ok_or_else(|| invalid_response("openai", "No completion in response"))?;

        parse_verdict(&answer).ok_or_else(|| {
            invalid_response("openai", format!("Expected yes/no verdict, got `{}`", answer))
        })
    }
}
