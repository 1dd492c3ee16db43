//! In-memory record store.
//!
//! Mirrors the PostgreSQL ordering and append-only semantics without a
//! database. Used by tests and local development.

use super::record::{CacheRecord, NewRecord, RecordStore};
use async_trait::async_trait;
use labs_core::{LabsResult, StorageError, Timestamp};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use tokio::sync::RwLock;

/// Record store holding every table in process memory.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    tables: RwLock<HashMap<&'static str, Vec<CacheRecord>>>,
    next_row_id: AtomicI64,
    unavailable: AtomicBool,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail as if the backend were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Names of the tables created so far.
    pub async fn tables(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.tables.read().await.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Store a raw record, bypassing payload encoding.
    ///
    /// Lets tests plant rows that do not decode.
    pub async fn insert_raw(&self, table: &'static str, record: NewRecord) -> LabsResult<i64> {
        self.insert(table, record).await
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::ConnectionFailed {
                target: "memory".to_string(),
                reason: "store marked unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn missing_table(table: &str) -> StorageError {
        StorageError::QueryFailed {
            table: table.to_string(),
            reason: "relation does not exist".to_string(),
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn ensure_table(&self, table: &'static str) -> LabsResult<()> {
        self.check_available()?;
        self.tables.write().await.entry(table).or_default();
        Ok(())
    }

    async fn latest(
        &self,
        table: &'static str,
        subject_id: &str,
        not_before: Option<Timestamp>,
    ) -> LabsResult<Option<CacheRecord>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let rows = tables.get(table).ok_or_else(|| Self::missing_table(table))?;

        let latest = rows
            .iter()
            .filter(|record| record.subject_id == subject_id)
            .filter(|record| not_before.map_or(true, |cutoff| record.stored_at >= cutoff))
            .max_by(|a, b| {
                a.stored_at
                    .cmp(&b.stored_at)
                    .then_with(|| a.row_id.cmp(&b.row_id))
            })
            .cloned();

        Ok(latest)
    }

    async fn insert(&self, table: &'static str, record: NewRecord) -> LabsResult<i64> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        let rows = tables.get_mut(table).ok_or_else(|| StorageError::InsertFailed {
            table: table.to_string(),
            reason: "relation does not exist".to_string(),
        })?;

        let row_id = self.next_row_id.fetch_add(1, Ordering::SeqCst) + 1;
        rows.push(CacheRecord {
            row_id,
            subject_id: record.subject_id,
            stored_at: record.stored_at,
            serialized_payload: record.serialized_payload,
        });
        Ok(row_id)
    }

    async fn count(&self, table: &'static str, subject_id: Option<&str>) -> LabsResult<u64> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let rows = tables.get(table).ok_or_else(|| Self::missing_table(table))?;

        let count = match subject_id {
            Some(subject_id) => rows.iter().filter(|r| r.subject_id == subject_id).count(),
            None => rows.len(),
        };
        Ok(count as u64)
    }

    async fn health_check(&self) -> LabsResult<()> {
        self.check_available()?;
        Ok(())
    }
}
