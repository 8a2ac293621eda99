//! Request pacing for Scholar.
//!
//! Scholar blocks clients that fetch too quickly, so every request is spaced
//! from the previous one by at least the configured delay.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Default delay between two Scholar requests.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(10);

/// Enforces a minimum interval between consecutive requests.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<RateLimiterInner>>,
}

#[derive(Debug)]
struct RateLimiterInner {
    /// Minimum spacing between requests.
    delay: Duration,
    /// Time of the last request.
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given delay between requests.
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RateLimiterInner {
                delay,
                last_request: None,
            })),
        }
    }

    /// The configured delay.
    pub async fn delay(&self) -> Duration {
        self.inner.lock().await.delay
    }

    /// Wait until the delay has passed since the previous request, then mark
    /// a request as sent. The first request goes out immediately.
    pub async fn acquire(&self) {
        let mut inner = self.inner.lock().await;

        if let Some(last) = inner.last_request {
            let elapsed = last.elapsed();
            if elapsed < inner.delay {
                let wait = inner.delay - elapsed;
                drop(inner);
                tokio::time::sleep(wait).await;
                inner = self.inner.lock().await;
            }
        }

        inner.last_request = Some(Instant::now());
    }

    /// Sleep the full delay, then mark a request as sent.
    ///
    /// Used for follow-up fetches within one resolution, which always wait
    /// the whole delay regardless of how long parsing took.
    pub async fn pause(&self) {
        let delay = self.delay().await;
        tokio::time::sleep(delay).await;
        self.inner.lock().await.last_request = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rate_limiter_basic() {
        let limiter = RateLimiter::new(Duration::from_millis(10));
        let start = Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;

        // 3 requests 10ms apart should take at least ~20ms
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(15));
    }

    #[tokio::test]
    async fn test_rate_limiter_first_request_immediate() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_pause_waits_full_delay() {
        let limiter = RateLimiter::new(Duration::from_millis(30));
        let start = Instant::now();
        limiter.pause().await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_acquire_spaces_from_pause() {
        let limiter = RateLimiter::new(Duration::from_millis(20));
        limiter.pause().await;
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(10));
    }
}
