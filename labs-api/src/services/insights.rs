//! Market insights producer.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use labs_core::{
    MarketId, MarketInsightsResponse, MarketLookup, SearchOptions, SearchProvider,
    SummarizationProvider,
};
use labs_storage::Producer;

use crate::error::{ApiError, ApiResult};

/// Searches the web for a market's question and summarizes what it finds.
///
/// Market lookup and search failures are errors. A summarization failure
/// only drops the summary; the search results are still returned.
pub struct MarketInsightsProducer {
    markets: Arc<dyn MarketLookup>,
    search: Arc<dyn SearchProvider>,
    summarizer: Arc<dyn SummarizationProvider>,
    options: SearchOptions,
}

impl MarketInsightsProducer {
    pub fn new(
        markets: Arc<dyn MarketLookup>,
        search: Arc<dyn SearchProvider>,
        summarizer: Arc<dyn SummarizationProvider>,
    ) -> Self {
        Self {
            markets,
            search,
            summarizer,
            options: SearchOptions::default(),
        }
    }

    pub fn with_search_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }
}

#[async_trait]
impl Producer<MarketInsightsResponse> for MarketInsightsProducer {
    type Subject = MarketId;
    type Error = ApiError;

    async fn produce(&self, market_id: &MarketId) -> ApiResult<MarketInsightsResponse> {
        let market = self.markets.get_market(market_id).await?;

        let search = self
            .search
            .search(&market.question_title, &self.options)
            .await
            .map_err(|e| {
                tracing::error!(%market_id, error = %e, "Failed to search for market insights");
                ApiError::upstream_error("Failed to search for market insights")
            })?;

        let contents = search.contents();
        let summary = match self
            .summarizer
            .summarize(&market.question_title, &contents)
            .await
        {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::warn!(%market_id, error = %e, "Failed to summarize market insights");
                None
            }
        };

        Ok(MarketInsightsResponse::from_search_response(
            market_id.clone(),
            Utc::now(),
            summary,
            Some(&search),
        ))
    }
}
