//! Freshness windows and cache read results.
//!
//! A cache is configured with a [`Freshness`] once, at construction. Reads
//! through the cached-producer wrapper return a [`CacheRead<T>`] that records
//! whether the value came from storage or from a fresh computation.

use chrono::{Duration as ChronoDuration, Utc};
use labs_core::Timestamp;
use std::time::Duration;

/// Maximum age of a record still eligible to be returned by a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Records older than `max_age` at read time are ignored.
    MaxAge(Duration),
    /// Records never expire.
    Unbounded,
}

impl Freshness {
    pub fn max_age(max_age: Duration) -> Self {
        Self::MaxAge(max_age)
    }

    pub fn unbounded() -> Self {
        Self::Unbounded
    }

    /// Freshness window of whole days; `None` means no expiry.
    pub fn from_days(days: Option<u64>) -> Self {
        match days {
            Some(days) => Self::MaxAge(Duration::from_secs(days.saturating_mul(24 * 60 * 60))),
            None => Self::Unbounded,
        }
    }

    /// The configured window, if any.
    pub fn max_staleness(&self) -> Option<Duration> {
        match self {
            Self::MaxAge(max_age) => Some(*max_age),
            Self::Unbounded => None,
        }
    }

    /// Oldest `stored_at` still accepted when reading at `now`.
    ///
    /// Returns `None` when every record qualifies, including windows too
    /// large to represent as a timestamp offset.
    pub fn cutoff(&self, now: Timestamp) -> Option<Timestamp> {
        match self {
            Self::MaxAge(max_age) => ChronoDuration::from_std(*max_age)
                .ok()
                .and_then(|window| now.checked_sub_signed(window)),
            Self::Unbounded => None,
        }
    }

    /// Whether a record stored at `stored_at` is still fresh at `now`.
    pub fn is_fresh(&self, stored_at: Timestamp, now: Timestamp) -> bool {
        self.cutoff(now).map_or(true, |cutoff| stored_at >= cutoff)
    }
}

impl From<Option<Duration>> for Freshness {
    fn from(max_age: Option<Duration>) -> Self {
        max_age.map_or(Self::Unbounded, Self::MaxAge)
    }
}

/// Where the value of a [`CacheRead`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadSource {
    /// Served from a stored record.
    Cache { stored_at: Timestamp },
    /// Computed by the producer; `persisted` tells whether it was saved.
    Producer { persisted: bool },
}

/// Result of a cached read, carrying its provenance.
#[derive(Debug, Clone)]
pub struct CacheRead<T> {
    value: T,
    source: ReadSource,
}

impl<T> CacheRead<T> {
    /// Create a read served from a stored record.
    pub fn from_cache(value: T, stored_at: Timestamp) -> Self {
        Self {
            value,
            source: ReadSource::Cache { stored_at },
        }
    }

    /// Create a read computed by a producer.
    pub fn from_producer(value: T, persisted: bool) -> Self {
        Self {
            value,
            source: ReadSource::Producer { persisted },
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn source(&self) -> ReadSource {
        self.source
    }

    pub fn was_cache_hit(&self) -> bool {
        matches!(self.source, ReadSource::Cache { .. })
    }

    pub fn was_cache_miss(&self) -> bool {
        !self.was_cache_hit()
    }

    /// True when a fresh value was written to the cache by this read.
    pub fn was_persisted(&self) -> bool {
        matches!(self.source, ReadSource::Producer { persisted: true })
    }

    /// Age of the served record, zero for fresh computations.
    pub fn staleness(&self) -> Duration {
        match self.source {
            ReadSource::Cache { stored_at } => Utc::now()
                .signed_duration_since(stored_at)
                .to_std()
                .unwrap_or(Duration::ZERO),
            ReadSource::Producer { .. } => Duration::ZERO,
        }
    }

    pub fn map<U, F>(self, f: F) -> CacheRead<U>
    where
        F: FnOnce(T) -> U,
    {
        CacheRead {
            value: f(self.value),
            source: self.source,
        }
    }
}

impl<T> AsRef<T> for CacheRead<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    #[test]
    fn test_from_days() {
        assert_eq!(Freshness::from_days(Some(3)), Freshness::MaxAge(DAY * 3));
        assert_eq!(Freshness::from_days(None), Freshness::Unbounded);
    }

    #[test]
    fn test_cutoff_subtracts_window() {
        let now = Utc.with_ymd_and_hms(2024, 9, 10, 0, 0, 0).unwrap();
        let cutoff = Freshness::max_age(DAY * 3).cutoff(now).unwrap();
        assert_eq!(cutoff, Utc.with_ymd_and_hms(2024, 9, 7, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_unbounded_has_no_cutoff() {
        assert_eq!(Freshness::unbounded().cutoff(Utc::now()), None);
        assert_eq!(Freshness::unbounded().max_staleness(), None);
    }

    #[test]
    fn test_huge_window_has_no_cutoff() {
        let freshness = Freshness::max_age(Duration::from_secs(u64::MAX));
        assert_eq!(freshness.cutoff(Utc::now()), None);
    }

    #[test]
    fn test_is_fresh_boundary_is_inclusive() {
        let now = Utc.with_ymd_and_hms(2024, 9, 10, 0, 0, 0).unwrap();
        let freshness = Freshness::max_age(DAY);
        let edge = now - ChronoDuration::days(1);

        assert!(freshness.is_fresh(edge, now));
        assert!(!freshness.is_fresh(edge - ChronoDuration::seconds(1), now));
        assert!(Freshness::unbounded().is_fresh(edge - ChronoDuration::days(365), now));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Freshness::from(Some(DAY)), Freshness::MaxAge(DAY));
        assert_eq!(Freshness::from(None), Freshness::Unbounded);
    }

    #[test]
    fn test_cache_read_from_cache() {
        let stored_at = Utc::now() - ChronoDuration::seconds(5);
        let read = CacheRead::from_cache("value", stored_at);

        assert!(read.was_cache_hit());
        assert!(!read.was_persisted());
        assert!(read.staleness() >= Duration::from_secs(4));
        assert_eq!(read.source(), ReadSource::Cache { stored_at });
    }

    #[test]
    fn test_cache_read_from_producer() {
        let read = CacheRead::from_producer(42, true);
        assert!(read.was_cache_miss());
        assert!(read.was_persisted());
        assert_eq!(read.staleness(), Duration::ZERO);

        let mapped = read.map(|v| v.to_string());
        assert!(mapped.was_persisted());
        assert_eq!(mapped.into_value(), "42");
    }
}
