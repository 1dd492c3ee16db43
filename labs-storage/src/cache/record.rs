//! Persisted record model and the record store trait.
//!
//! A record store holds one append-only table per payload kind. It knows
//! nothing about payload shapes: it stores an opaque serialized payload next
//! to the subject key and the timestamp that drives freshness.

use async_trait::async_trait;
use labs_core::{LabsResult, Timestamp};

/// A row read back from a cache table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    /// Surrogate key, increasing in insertion order.
    pub row_id: i64,
    pub subject_id: String,
    pub stored_at: Timestamp,
    pub serialized_payload: String,
}

/// A row about to be inserted. The store assigns `row_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub subject_id: String,
    pub stored_at: Timestamp,
    pub serialized_payload: String,
}

/// Backing storage for response caches.
///
/// Implementations must order candidates by `stored_at` descending, then
/// `row_id` descending, and must never update or delete rows.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create `table` and its indexes if absent. Never alters an existing table.
    async fn ensure_table(&self, table: &'static str) -> LabsResult<()>;

    /// Most recent record for `subject_id` with `stored_at >= not_before`.
    async fn latest(
        &self,
        table: &'static str,
        subject_id: &str,
        not_before: Option<Timestamp>,
    ) -> LabsResult<Option<CacheRecord>>;

    /// Append a record and return its assigned `row_id`.
    ///
    /// The record must be durably committed when this returns.
    async fn insert(&self, table: &'static str, record: NewRecord) -> LabsResult<i64>;

    /// Number of rows in `table`, optionally restricted to one subject.
    async fn count(&self, table: &'static str, subject_id: Option<&str>) -> LabsResult<u64>;

    /// Check the backing store is reachable.
    async fn health_check(&self) -> LabsResult<()>;
}
