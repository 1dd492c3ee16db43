//! Persistence-backed, time-bounded response cache.
//!
//! Every expensive external call sits behind a [`ResponseCache<P>`], one per
//! payload kind `P`, each with its own append-only table. Lookups return the
//! most recent record for a subject whose `stored_at` is inside the cache's
//! [`Freshness`] window; expiry is a read-time filter, rows are never deleted.
//!
//! # Example
//!
//! ```ignore
//! let cache: ResponseCache<MarketInsightsResponse> =
//!     ResponseCache::connect(&database_url, Freshness::from_days(Some(3))).await?;
//!
//! let insights = CachedProducer::new(cache, InsightsProducer::new(/* ... */));
//! let response = insights.get(&market_id).await?;
//! ```

pub mod freshness;
pub mod memory_backend;
pub mod postgres_backend;
pub mod read_through;
pub mod record;
pub mod response_cache;
pub mod traits;

pub use freshness::{CacheRead, Freshness, ReadSource};
pub use memory_backend::InMemoryRecordStore;
pub use postgres_backend::{PostgresConfig, PostgresRecordStore, DEFAULT_DATABASE_URL};
pub use read_through::{
    get_or_compute, get_or_compute_read, producer_fn, CachedProducer, Producer, ProducerFn,
};
pub use record::{CacheRecord, NewRecord, RecordStore};
pub use response_cache::ResponseCache;
pub use traits::CacheablePayload;
