//! Labs Storage - Response Cache
//!
//! Generic, persistence-backed memoization for the results of slow external
//! calls. Payload kinds plug in through [`CacheablePayload`]; rows live in a
//! [`RecordStore`], either PostgreSQL or in memory.

pub mod cache;

// Re-export cache types for API integration
pub use cache::{
    get_or_compute, get_or_compute_read, producer_fn, CacheRead, CacheRecord, CacheablePayload,
    CachedProducer, Freshness, InMemoryRecordStore, NewRecord, PostgresConfig,
    PostgresRecordStore, Producer, ProducerFn, ReadSource, RecordStore, ResponseCache,
    DEFAULT_DATABASE_URL,
};
