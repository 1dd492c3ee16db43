//! Invalidity producers for markets and free-text questions.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use labs_core::{
    InvalidityClassifier, MarketId, MarketInvalidResponse, MarketLookup, QuestionInvalidResponse,
};
use labs_storage::Producer;

use crate::error::{ApiError, ApiResult};

/// Classifies the question of an Omen market.
///
/// Every failure is an error, so a market verdict is only ever cached
/// when the classifier actually answered.
pub struct MarketInvalidProducer {
    markets: Arc<dyn MarketLookup>,
    classifier: Arc<dyn InvalidityClassifier>,
}

impl MarketInvalidProducer {
    pub fn new(markets: Arc<dyn MarketLookup>, classifier: Arc<dyn InvalidityClassifier>) -> Self {
        Self {
            markets,
            classifier,
        }
    }
}

#[async_trait]
impl Producer<MarketInvalidResponse> for MarketInvalidProducer {
    type Subject = MarketId;
    type Error = ApiError;

    async fn produce(&self, market_id: &MarketId) -> ApiResult<MarketInvalidResponse> {
        let market = self.markets.get_market(market_id).await?;

        let invalid = self
            .classifier
            .is_invalid(&market.question_title)
            .await
            .map_err(|e| {
                tracing::error!(%market_id, error = %e, "Failed to classify market question");
                ApiError::upstream_error("Failed to classify market question")
            })?;

        Ok(MarketInvalidResponse {
            market_id: market_id.clone(),
            created_at: Utc::now(),
            invalid: Some(invalid),
        })
    }
}

/// Classifies an arbitrary question.
///
/// A classifier failure yields `invalid: None`, which the cache does not
/// persist, so the next request asks again.
pub struct QuestionInvalidProducer {
    classifier: Arc<dyn InvalidityClassifier>,
}

impl QuestionInvalidProducer {
    pub fn new(classifier: Arc<dyn InvalidityClassifier>) -> Self {
        Self { classifier }
    }
}

#[async_trait]
impl Producer<QuestionInvalidResponse> for QuestionInvalidProducer {
    type Subject = str;
    type Error = ApiError;

    async fn produce(&self, question: &str) -> ApiResult<QuestionInvalidResponse> {
        let invalid = match self.classifier.is_invalid(question).await {
            Ok(invalid) => Some(invalid),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to classify question, returning no verdict");
                None
            }
        };

        Ok(QuestionInvalidResponse {
            question: question.to_string(),
            created_at: Utc::now(),
            invalid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use labs_test_utils::{fixtures, MockInvalidityClassifier, MockMarketLookup};

    fn markets() -> Arc<MockMarketLookup> {
        Arc::new(MockMarketLookup::with_markets(vec![fixtures::market(
            7,
            "Will the sun rise tomorrow?",
        )]))
    }

    #[tokio::test]
    async fn test_market_invalid_verdict() {
        let producer = MarketInvalidProducer::new(
            markets(),
            Arc::new(MockInvalidityClassifier::answering(true)),
        );
        let response = producer.produce(&fixtures::market_id(7)).await.unwrap();

        assert_eq!(response.market_id, fixtures::market_id(7));
        assert_eq!(response.invalid, Some(true));
    }

    #[tokio::test]
    async fn test_market_invalid_classifier_failure_is_an_error() {
        let producer =
            MarketInvalidProducer::new(markets(), Arc::new(MockInvalidityClassifier::failing()));
        let err = producer.produce(&fixtures::market_id(7)).await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_market_lookup_failure_is_500_and_skips_classifier() {
        let classifier = MockInvalidityClassifier::answering(false);
        let producer = MarketInvalidProducer::new(
            Arc::new(MockMarketLookup::failing()),
            Arc::new(classifier.clone()),
        );
        let err = producer.produce(&fixtures::market_id(7)).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::UpstreamError);
        assert_eq!(classifier.calls(), 0);
    }

    #[tokio::test]
    async fn test_question_invalid_verdict() {
        let producer =
            QuestionInvalidProducer::new(Arc::new(MockInvalidityClassifier::answering(false)));
        let response = producer.produce("Will it rain in Berlin?").await.unwrap();

        assert_eq!(response.question, "Will it rain in Berlin?");
        assert_eq!(response.invalid, Some(false));
    }

    #[tokio::test]
    async fn test_question_classifier_failure_degrades() {
        let producer = QuestionInvalidProducer::new(Arc::new(MockInvalidityClassifier::failing()));
        let response = producer.produce("Will it rain in Berlin?").await.unwrap();

        assert_eq!(response.invalid, None);
        assert!(!response.has_invalid());
    }
}
