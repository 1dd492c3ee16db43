//! Shared application state for Axum routers.

use std::sync::Arc;

use labs_core::{
    LabsResult, MarketInsightsResponse, MarketInvalidResponse, QuestionInvalidResponse,
};
use labs_storage::{CachedProducer, RecordStore, ResponseCache};

use crate::config::ApiConfig;
use crate::services::{
    MarketInsightsProducer, MarketInvalidProducer, Providers, QuestionInvalidProducer,
};

/// Cached market insights.
pub type InsightsService = CachedProducer<MarketInsightsResponse, MarketInsightsProducer>;

/// Cached market invalidity verdicts.
pub type MarketInvalidService = CachedProducer<MarketInvalidResponse, MarketInvalidProducer>;

/// Cached question invalidity verdicts.
pub type QuestionInvalidService = CachedProducer<QuestionInvalidResponse, QuestionInvalidProducer>;

/// Application-wide state shared across all routes.
///
/// Built once at startup. Every cache shares the same record store, so the
/// whole process holds a single connection pool.
#[derive(Clone)]
pub struct AppState {
    pub insights: InsightsService,
    pub market_invalid: MarketInvalidService,
    pub question_invalid: QuestionInvalidService,
    /// Backing store, probed by the readiness check.
    pub store: Arc<dyn RecordStore>,
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create the caches over `store` and pair them with their producers.
    ///
    /// Fails when any cache table cannot be created.
    pub async fn new(
        store: Arc<dyn RecordStore>,
        config: &ApiConfig,
        providers: Providers,
    ) -> LabsResult<Self> {
        let insights_cache =
            ResponseCache::with_store(Arc::clone(&store), config.insights_freshness).await?;
        let market_invalid_cache =
            ResponseCache::with_store(Arc::clone(&store), config.invalid_freshness).await?;
        let question_invalid_cache =
            ResponseCache::with_store(Arc::clone(&store), config.invalid_freshness).await?;

        let Providers {
            markets,
            search,
            summarizer,
            classifier,
        } = providers;

        Ok(Self {
            insights: CachedProducer::new(
                insights_cache,
                MarketInsightsProducer::new(Arc::clone(&markets), search, summarizer),
            ),
            market_invalid: CachedProducer::new(
                market_invalid_cache,
                MarketInvalidProducer::new(markets, Arc::clone(&classifier)),
            ),
            question_invalid: CachedProducer::new(
                question_invalid_cache,
                QuestionInvalidProducer::new(classifier),
            ),
            store,
            start_time: std::time::Instant::now(),
        })
    }
}

crate::impl_from_ref!(InsightsService, insights);
crate::impl_from_ref!(MarketInvalidService, market_invalid);
crate::impl_from_ref!(QuestionInvalidService, question_invalid);
