//! Cached-producer wrapper.
//!
//! Composes a [`ResponseCache`] with a [`Producer`]: serve the most recent
//! fresh payload when there is one, otherwise compute a new one and persist
//! it only when it carries a value.
//!
//! There is no in-flight deduplication. Concurrent misses for the same
//! subject each run the producer, and each valued result is appended.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use labs_core::{LabsError, LabsResult};

use super::freshness::CacheRead;
use super::response_cache::ResponseCache;
use super::traits::CacheablePayload;

/// Computes a fresh payload for a subject by calling external services.
///
/// Failures are returned as `Self::Error` and are never persisted. A producer
/// that prefers a degraded answer returns a payload whose
/// [`has_value`](CacheablePayload::has_value) is false instead.
#[async_trait]
pub trait Producer<P: CacheablePayload>: Send + Sync {
    /// Subject the producer is keyed by; its string form is the cache key.
    type Subject: AsRef<str> + Send + Sync + ?Sized;

    /// Error surfaced to the caller. Cache failures convert into it.
    type Error: From<LabsError> + Send;

    async fn produce(&self, subject: &Self::Subject) -> Result<P, Self::Error>;
}

/// Look up `subject` in `cache`, computing and conditionally saving on a miss.
pub async fn get_or_compute<P, R>(
    cache: &ResponseCache<P>,
    subject: &R::Subject,
    producer: &R,
) -> Result<P, R::Error>
where
    P: CacheablePayload,
    R: Producer<P> + ?Sized,
{
    Ok(get_or_compute_read(cache, subject, producer)
        .await?
        .into_value())
}

/// [`get_or_compute`] that also reports where the payload came from.
pub async fn get_or_compute_read<P, R>(
    cache: &ResponseCache<P>,
    subject: &R::Subject,
    producer: &R,
) -> Result<CacheRead<P>, R::Error>
where
    P: CacheablePayload,
    R: Producer<P> + ?Sized,
{
    let subject_id = subject.as_ref();

    if let Some(read) = cache.lookup(subject_id).await? {
        return Ok(read);
    }

    let payload = producer.produce(subject).await?;

    if payload.has_value() {
        cache.save(&payload).await?;
        Ok(CacheRead::from_producer(payload, true))
    } else {
        tracing::debug!(
            table = P::TABLE,
            subject_id,
            "Producer returned no value, not persisting"
        );
        Ok(CacheRead::from_producer(payload, false))
    }
}

// ============================================================================
// CACHED PRODUCER
// ============================================================================

/// A cache paired with its producer, shared across request handlers.
pub struct CachedProducer<P: CacheablePayload, R: Producer<P>> {
    cache: ResponseCache<P>,
    producer: Arc<R>,
}

impl<P: CacheablePayload, R: Producer<P>> Clone for CachedProducer<P, R> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            producer: Arc::clone(&self.producer),
        }
    }
}

impl<P: CacheablePayload, R: Producer<P>> CachedProducer<P, R> {
    pub fn new(cache: ResponseCache<P>, producer: R) -> Self {
        Self {
            cache,
            producer: Arc::new(producer),
        }
    }

    pub fn cache(&self) -> &ResponseCache<P> {
        &self.cache
    }

    pub fn producer(&self) -> &R {
        &self.producer
    }

    /// Cached payload for `subject`, computing it on a miss.
    pub async fn get(&self, subject: &R::Subject) -> Result<P, R::Error> {
        get_or_compute(&self.cache, subject, self.producer.as_ref()).await
    }

    /// Like [`get`](Self::get), with provenance.
    pub async fn read(&self, subject: &R::Subject) -> Result<CacheRead<P>, R::Error> {
        get_or_compute_read(&self.cache, subject, self.producer.as_ref()).await
    }
}

// ============================================================================
// CLOSURE PRODUCERS
// ============================================================================

/// Producer backed by an async closure over the subject id.
pub struct ProducerFn<P, F> {
    f: F,
    _payload: PhantomData<fn() -> P>,
}

/// Wrap an async closure `Fn(String) -> Future<Output = LabsResult<P>>`.
pub fn producer_fn<P, F, Fut>(f: F) -> ProducerFn<P, F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = LabsResult<P>> + Send + 'static,
{
    ProducerFn {
        f,
        _payload: PhantomData,
    }
}

#[async_trait]
impl<P, F, Fut> Producer<P> for ProducerFn<P, F>
where
    P: CacheablePayload,
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = LabsResult<P>> + Send + 'static,
{
    type Subject = str;
    type Error = LabsError;

    async fn produce(&self, subject: &str) -> LabsResult<P> {
        (self.f)(subject.to_string()).await
    }
}
