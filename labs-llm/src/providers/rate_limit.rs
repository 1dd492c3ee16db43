//! Client-side request pacing shared by the HTTP providers.

use super::request_failed;
use labs_core::LabsResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;

/// Caps in-flight requests and spaces request starts evenly.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    provider: &'static str,
    permits: Arc<Semaphore>,
    next_slot: Arc<Mutex<Option<Instant>>>,
    min_interval: Duration,
}

impl RateLimiter {
    /// Limiter allowing roughly `requests_per_minute` request starts.
    pub fn per_minute(provider: &'static str, requests_per_minute: u32) -> Self {
        let rpm = requests_per_minute.max(1);
        let min_interval_ms = (60_000 / u64::from(rpm)).max(10);

        Self {
            provider,
            permits: Arc::new(Semaphore::new(rpm as usize)),
            next_slot: Arc::new(Mutex::new(None)),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait for a request slot. Hold the permit for the request's duration.
    pub async fn acquire(&self) -> LabsResult<OwnedSemaphorePermit> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| request_failed(self.provider, 0, format!("Rate limiter error: {}", e)))?;

        let slot = {
            let mut next_slot = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next_slot {
                Some(next) if next > now => next,
                _ => now,
            };
            *next_slot = Some(slot + self.min_interval);
            slot
        };

        tokio::time::sleep_until(slot).await;
        Ok(permit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_interval_from_rpm() {
        assert_eq!(
            RateLimiter::per_minute("openai", 60).min_interval(),
            Duration::from_millis(1000)
        );
        assert_eq!(
            RateLimiter::per_minute("openai", 0).min_interval(),
            Duration::from_millis(60_000)
        );
        assert_eq!(
            RateLimiter::per_minute("openai", 1_000_000).min_interval(),
            Duration::from_millis(10)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_spaces_requests() {
        let limiter = RateLimiter::per_minute("tavily", 600);
        let start = Instant::now();

        let first = limiter.acquire().await.unwrap();
        drop(first);
        let _second = limiter.acquire().await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
