//! Response cache behaviour against the in-memory record store.
//!
//! Covers lookups, freshness, ordering and the cached-producer wrapper's
//! persist-only-valued-results rule.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use labs_core::{
    LabsError, LabsResult, LlmError, MarketId, MarketInsightsResponse, MarketInvalidResponse,
    QuestionInvalidResponse,
};
use labs_storage::{
    get_or_compute, producer_fn, CachedProducer, Freshness, InMemoryRecordStore, Producer,
    RecordStore, ResponseCache,
};
use labs_test_utils::{assertions::assert_storage_error, fixtures, CallCounter};

// ============================================================================
// HELPERS
// ============================================================================

const THREE_DAYS: StdDuration = StdDuration::from_secs(3 * 24 * 60 * 60);

async fn insights_cache(freshness: Freshness) -> ResponseCache<MarketInsightsResponse> {
    ResponseCache::with_store(Arc::new(InMemoryRecordStore::new()), freshness)
        .await
        .unwrap()
}

/// Insights producer returning a fixed summary, or nothing when `summary` is None.
struct StaticInsights {
    summary: Option<&'static str>,
    calls: CallCounter,
}

#[async_trait]
impl Producer<MarketInsightsResponse> for StaticInsights {
    type Subject = MarketId;
    type Error = LabsError;

    async fn produce(&self, market_id: &MarketId) -> LabsResult<MarketInsightsResponse> {
        self.calls.hit();
        Ok(MarketInsightsResponse {
            market_id: market_id.clone(),
            created_at: Utc::now(),
            summary: self.summary.map(str::to_string),
            results: Vec::new(),
        })
    }
}

// ============================================================================
// LOOKUP SCENARIOS
// ============================================================================

#[tokio::test]
async fn test_empty_table_finds_nothing() {
    let cache = insights_cache(Freshness::max_age(THREE_DAYS)).await;
    assert_eq!(cache.find("0x00").await.unwrap(), None);
}

#[tokio::test]
async fn test_fresh_record_is_found() {
    let cache = insights_cache(Freshness::max_age(THREE_DAYS)).await;
    let t = fixtures::reference_time();
    let payload = fixtures::insights(fixtures::market_id(1), t, "s");

    cache.save(&payload).await.unwrap();

    let found = cache
        .find_as_of(payload.market_id.as_str(), t + Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(found, Some(payload));
}

#[tokio::test]
async fn test_expired_record_is_not_found() {
    let cache = insights_cache(Freshness::max_age(THREE_DAYS)).await;
    let t = fixtures::reference_time();
    let payload = fixtures::insights(fixtures::market_id(1), t, "s");

    cache.save(&payload).await.unwrap();

    let found = cache
        .find_as_of(payload.market_id.as_str(), t + Duration::days(5))
        .await
        .unwrap();
    assert_eq!(found, None);
    // Expiry filters reads only
    assert_eq!(cache.row_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_most_recent_record_wins() {
    let cache = insights_cache(Freshness::max_age(THREE_DAYS)).await;
    let t = fixtures::reference_time();
    let market_id = fixtures::market_id(1);

    cache
        .save(&fixtures::insights(market_id.clone(), t, "older"))
        .await
        .unwrap();
    cache
        .save(&fixtures::insights(market_id.clone(), t + Duration::days(1), "newer"))
        .await
        .unwrap();

    let found = cache
        .find_as_of(market_id.as_str(), t + Duration::days(1) + Duration::minutes(1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.summary.as_deref(), Some("newer"));
}

#[tokio::test]
async fn test_most_recent_wins_regardless_of_insert_order() {
    let cache = insights_cache(Freshness::unbounded()).await;
    let t = fixtures::reference_time();
    let market_id = fixtures::market_id(1);

    cache
        .save(&fixtures::insights(market_id.clone(), t + Duration::days(1), "newer"))
        .await
        .unwrap();
    cache
        .save(&fixtures::insights(market_id.clone(), t, "older"))
        .await
        .unwrap();

    let found = cache.find(market_id.as_str()).await.unwrap().unwrap();
    assert_eq!(found.summary.as_deref(), Some("newer"));
}

#[tokio::test]
async fn test_unbounded_cache_returns_year_old_record() {
    let cache: ResponseCache<MarketInvalidResponse> =
        ResponseCache::with_store(Arc::new(InMemoryRecordStore::new()), Freshness::unbounded())
            .await
            .unwrap();
    let payload = fixtures::market_invalid(
        fixtures::market_id(7),
        Utc::now() - Duration::days(365),
        Some(true),
    );

    cache.save(&payload).await.unwrap();
    assert_eq!(cache.find(payload.market_id.as_str()).await.unwrap(), Some(payload));
}

#[tokio::test]
async fn test_no_cross_subject_leakage() {
    let cache = insights_cache(Freshness::unbounded()).await;
    let t = fixtures::reference_time();

    cache
        .save(&fixtures::insights(fixtures::market_id(1), t, "one"))
        .await
        .unwrap();

    assert_eq!(cache.find(fixtures::market_id(2).as_str()).await.unwrap(), None);
}

#[tokio::test]
async fn test_saves_append_rows() {
    let cache = insights_cache(Freshness::unbounded()).await;
    let market_id = fixtures::market_id(3);
    let t = fixtures::reference_time();

    for i in 0..5 {
        cache
            .save(&fixtures::insights(market_id.clone(), t, &format!("v{}", i)))
            .await
            .unwrap();
    }

    assert_eq!(cache.row_count_for(market_id.as_str()).await.unwrap(), 5);
    // Same stored_at for every row: the last inserted wins
    let found = cache.find(market_id.as_str()).await.unwrap().unwrap();
    assert_eq!(found.summary.as_deref(), Some("v4"));
}

#[tokio::test]
async fn test_kinds_do_not_share_tables() {
    let store = Arc::new(InMemoryRecordStore::new());
    let insights: ResponseCache<MarketInsightsResponse> =
        ResponseCache::with_store(store.clone(), Freshness::unbounded())
            .await
            .unwrap();
    let invalid: ResponseCache<MarketInvalidResponse> =
        ResponseCache::with_store(store.clone(), Freshness::unbounded())
            .await
            .unwrap();
    let market_id = fixtures::market_id(4);

    insights
        .save(&fixtures::insights(market_id.clone(), Utc::now(), "s"))
        .await
        .unwrap();

    assert_eq!(invalid.find(market_id.as_str()).await.unwrap(), None);
    assert_eq!(store.tables().await.len(), 2);
}

#[tokio::test]
async fn test_repeated_construction_keeps_rows() {
    let store = Arc::new(InMemoryRecordStore::new());
    let first: ResponseCache<MarketInsightsResponse> =
        ResponseCache::with_store(store.clone(), Freshness::unbounded())
            .await
            .unwrap();
    first
        .save(&fixtures::insights(fixtures::market_id(5), Utc::now(), "s"))
        .await
        .unwrap();

    let second: ResponseCache<MarketInsightsResponse> =
        ResponseCache::with_store(store, Freshness::unbounded())
            .await
            .unwrap();
    assert_eq!(second.row_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_construction_fails_when_store_is_down() {
    let store = Arc::new(InMemoryRecordStore::new());
    store.set_unavailable(true);

    let result =
        ResponseCache::<MarketInsightsResponse>::with_store(store, Freshness::unbounded()).await;
    assert_storage_error(&result.map(|_| ()));
}

// ============================================================================
// CACHED PRODUCER
// ============================================================================

#[tokio::test]
async fn test_miss_then_hit_runs_producer_once() {
    let calls = CallCounter::new();
    let cached = CachedProducer::new(
        insights_cache(Freshness::max_age(THREE_DAYS)).await,
        StaticInsights {
            summary: Some("context"),
            calls: calls.clone(),
        },
    );
    let market_id = fixtures::market_id(10);

    let first = cached.read(&market_id).await.unwrap();
    let second = cached.read(&market_id).await.unwrap();

    assert!(first.was_persisted());
    assert!(second.was_cache_hit());
    assert_eq!(first.value(), second.value());
    assert_eq!(calls.get(), 1);
}

#[tokio::test]
async fn test_no_value_result_is_returned_but_not_persisted() {
    let calls = CallCounter::new();
    let cached = CachedProducer::new(
        insights_cache(Freshness::max_age(THREE_DAYS)).await,
        StaticInsights {
            summary: None,
            calls: calls.clone(),
        },
    );
    let market_id = fixtures::market_id(11);

    let first = cached.get(&market_id).await.unwrap();
    assert_eq!(first.summary, None);
    assert_eq!(cached.cache().row_count().await.unwrap(), 0);

    cached.get(&market_id).await.unwrap();
    assert_eq!(calls.get(), 2);
}

#[tokio::test]
async fn test_producer_failure_mapped_to_no_value_is_retried() {
    let cache: ResponseCache<QuestionInvalidResponse> =
        ResponseCache::with_store(Arc::new(InMemoryRecordStore::new()), Freshness::unbounded())
            .await
            .unwrap();
    let calls = CallCounter::new();
    let counter = calls.clone();
    let degrading = producer_fn(move |question: String| {
        counter.hit();
        async move {
            // Classifier outage degrades to an unknown verdict
            Ok::<_, LabsError>(fixtures::question_invalid(&question, Utc::now(), None))
        }
    });

    get_or_compute(&cache, "Will it rain?", &degrading).await.unwrap();
    assert_eq!(cache.row_count().await.unwrap(), 0);

    get_or_compute(&cache, "Will it rain?", &degrading).await.unwrap();
    assert_eq!(calls.get(), 2);
}

#[tokio::test]
async fn test_producer_error_is_not_persisted() {
    let cache = insights_cache(Freshness::unbounded()).await;
    let failing = producer_fn(|_: String| async {
        Err::<MarketInsightsResponse, _>(LabsError::from(LlmError::RequestFailed {
            provider: "search".to_string(),
            status: 500,
            message: "down".to_string(),
        }))
    });

    let result = get_or_compute(&cache, fixtures::market_id(12).as_str(), &failing).await;
    assert!(matches!(result, Err(LabsError::Llm(_))));
    assert_eq!(cache.row_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_expired_record_triggers_recompute() {
    let store = Arc::new(InMemoryRecordStore::new());
    let cache: ResponseCache<MarketInsightsResponse> =
        ResponseCache::with_store(store, Freshness::max_age(THREE_DAYS))
            .await
            .unwrap();
    let market_id = fixtures::market_id(13);
    cache
        .save(&fixtures::insights(
            market_id.clone(),
            Utc::now() - Duration::days(4),
            "stale",
        ))
        .await
        .unwrap();

    let calls = CallCounter::new();
    let cached = CachedProducer::new(
        cache,
        StaticInsights {
            summary: Some("fresh"),
            calls: calls.clone(),
        },
    );

    let read = cached.read(&market_id).await.unwrap();
    assert!(read.was_cache_miss());
    assert_eq!(read.value().summary.as_deref(), Some("fresh"));
    assert_eq!(cached.cache().row_count_for(market_id.as_str()).await.unwrap(), 2);
}

#[tokio::test]
async fn test_concurrent_misses_each_run_producer() {
    let calls = CallCounter::new();
    let cached = CachedProducer::new(
        insights_cache(Freshness::unbounded()).await,
        StaticInsights {
            summary: Some("context"),
            calls: calls.clone(),
        },
    );
    let market_id = fixtures::market_id(14);

    let store = cached.cache().store().clone();
    assert_eq!(store.count(cached.cache().table(), None).await.unwrap(), 0);

    let (a, b) = tokio::join!(cached.read(&market_id), cached.read(&market_id));
    let (a, b) = (a.unwrap(), b.unwrap());

    let persisted = [a.was_persisted(), b.was_persisted()]
        .iter()
        .filter(|p| **p)
        .count() as u64;
    assert!(calls.get() >= 1);
    assert_eq!(
        cached.cache().row_count_for(market_id.as_str()).await.unwrap(),
        persisted
    );
}

#[tokio::test]
async fn test_store_failure_on_lookup_skips_producer() {
    let store = Arc::new(InMemoryRecordStore::new());
    let calls = CallCounter::new();
    let cached = CachedProducer::new(
        ResponseCache::with_store(store.clone(), Freshness::unbounded())
            .await
            .unwrap(),
        StaticInsights {
            summary: Some("context"),
            calls: calls.clone(),
        },
    );
    store.set_unavailable(true);

    assert!(cached.get(&fixtures::market_id(15)).await.is_err());
    assert_eq!(calls.get(), 0);
}
