//! Generic response cache.
//!
//! `ResponseCache<P>` persists payloads of one kind `P` in that kind's table
//! and returns the most recent fresh one for a subject.

use super::freshness::{CacheRead, Freshness};
use super::postgres_backend::{PostgresConfig, PostgresRecordStore};
use super::record::{NewRecord, RecordStore};
use super::traits::CacheablePayload;
use chrono::Utc;
use labs_core::{LabsResult, StorageError, Timestamp};
use std::marker::PhantomData;
use std::sync::Arc;

/// Time-bounded, append-only cache of payloads of kind `P`.
///
/// Cheap to clone; clones share the same record store.
pub struct ResponseCache<P: CacheablePayload> {
    store: Arc<dyn RecordStore>,
    freshness: Freshness,
    _payload: PhantomData<fn() -> P>,
}

impl<P: CacheablePayload> Clone for ResponseCache<P> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            freshness: self.freshness,
            _payload: PhantomData,
        }
    }
}

impl<P: CacheablePayload> std::fmt::Debug for ResponseCache<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("table", &P::TABLE)
            .field("freshness", &self.freshness)
            .finish()
    }
}

impl<P: CacheablePayload> ResponseCache<P> {
    /// Connect to the PostgreSQL database at `locator` and ensure `P`'s table.
    ///
    /// Fails if the database is unreachable or the table cannot be created.
    pub async fn connect(locator: &str, freshness: Freshness) -> LabsResult<Self> {
        let store = PostgresRecordStore::connect(&PostgresConfig::new(locator)).await?;
        Self::with_store(Arc::new(store), freshness).await
    }

    /// Build a cache over an existing record store and ensure `P`'s table.
    ///
    /// Safe to call repeatedly against the same store.
    pub async fn with_store(store: Arc<dyn RecordStore>, freshness: Freshness) -> LabsResult<Self> {
        store.ensure_table(P::TABLE).await?;
        Ok(Self {
            store,
            freshness,
            _payload: PhantomData,
        })
    }

    pub fn freshness(&self) -> Freshness {
        self.freshness
    }

    pub fn table(&self) -> &'static str {
        P::TABLE
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Most recent fresh payload for `subject_id`, if any.
    pub async fn find(&self, subject_id: &str) -> LabsResult<Option<P>> {
        self.find_as_of(subject_id, Utc::now()).await
    }

    /// Like [`find`](Self::find), evaluating freshness at `now`.
    pub async fn find_as_of(&self, subject_id: &str, now: Timestamp) -> LabsResult<Option<P>> {
        Ok(self
            .lookup_as_of(subject_id, now)
            .await?
            .map(CacheRead::into_value))
    }

    /// Like [`find`](Self::find), keeping the record's `stored_at`.
    pub async fn lookup(&self, subject_id: &str) -> LabsResult<Option<CacheRead<P>>> {
        self.lookup_as_of(subject_id, Utc::now()).await
    }

    /// Lookup evaluated at `now`.
    ///
    /// A record whose payload fails to decode counts as a miss.
    pub async fn lookup_as_of(
        &self,
        subject_id: &str,
        now: Timestamp,
    ) -> LabsResult<Option<CacheRead<P>>> {
        let not_before = self.freshness.cutoff(now);
        let Some(record) = self.store.latest(P::TABLE, subject_id, not_before).await? else {
            tracing::debug!(table = P::TABLE, subject_id, "Cache miss");
            return Ok(None);
        };

        match P::decode(&record.serialized_payload) {
            Ok(payload) => {
                tracing::debug!(
                    table = P::TABLE,
                    subject_id,
                    row_id = record.row_id,
                    stored_at = %record.stored_at,
                    "Cache hit"
                );
                Ok(Some(CacheRead::from_cache(payload, record.stored_at)))
            }
            Err(e) => {
                tracing::error!(
                    table = P::TABLE,
                    subject_id,
                    row_id = record.row_id,
                    error = %e,
                    "Failed to decode cached payload, treating as miss"
                );
                Ok(None)
            }
        }
    }

    /// Append `payload` to the table, keyed by its subject and `created_at`.
    ///
    /// Returns the new row id once the row is committed.
    pub async fn save(&self, payload: &P) -> LabsResult<i64> {
        let serialized_payload = payload.encode().map_err(|e| StorageError::EncodeFailed {
            table: P::TABLE.to_string(),
            reason: e.to_string(),
        })?;

        let record = NewRecord {
            subject_id: payload.subject_id().to_string(),
            stored_at: payload.created_at(),
            serialized_payload,
        };
        let row_id = self.store.insert(P::TABLE, record).await?;
        tracing::debug!(
            table = P::TABLE,
            subject_id = payload.subject_id(),
            row_id,
            "Saved payload to cache"
        );
        Ok(row_id)
    }

    /// Total number of rows in the table.
    pub async fn row_count(&self) -> LabsResult<u64> {
        self.store.count(P::TABLE, None).await
    }

    /// Number of rows stored for one subject.
    pub async fn row_count_for(&self, subject_id: &str) -> LabsResult<u64> {
        self.store.count(P::TABLE, Some(subject_id)).await
    }
}
