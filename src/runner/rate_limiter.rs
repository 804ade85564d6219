//! @ai:module:intent Token-bucket throttle in front of the completion endpoint
//! @ai:module:layer infrastructure
//! @ai:module:public_api RateLimiter, RateLimiterTrait
//! @ai:module:stateless false

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// @ai:intent Trait for request throttling
pub trait RateLimiterTrait: Send + Sync {
    /// @ai:intent Wait until one more request may be sent
    fn wait(&self) -> impl std::future::Future<Output = ()> + Send;
}

/// @ai:intent Request throttle; `None` when the configured limit is zero
pub struct RateLimiter {
    bucket: Option<Mutex<Bucket>>,
}

/// Token bucket holding at most one minute's worth of requests
struct Bucket {
    tokens: f64,
    capacity: f64,
    per_second: f64,
    refilled_at: Instant,
}

impl Bucket {
    fn full(requests_per_minute: u32) -> Self {
        let capacity = f64::from(requests_per_minute);

        Self {
            tokens: capacity,
            capacity,
            per_second: capacity / 60.0,
            refilled_at: Instant::now(),
        }
    }

    /// @ai:intent Take one token, or report how long until one is earned
    /// @ai:effects state:write, time
    fn take(&mut self) -> Result<(), Duration> {
        let now = Instant::now();
        let earned = now.duration_since(self.refilled_at).as_secs_f64() * self.per_second;
        self.tokens = (self.tokens + earned).min(self.capacity);
        self.refilled_at = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            Err(Duration::from_secs_f64((1.0 - self.tokens) / self.per_second))
        }
    }
}

impl RateLimiter {
    /// @ai:intent Create a limiter whose bucket starts full
    /// @ai:effects pure
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            bucket: (requests_per_minute > 0)
                .then(|| Mutex::new(Bucket::full(requests_per_minute))),
        }
    }
}

impl RateLimiterTrait for RateLimiter {
    /// @ai:intent Take a token, sleeping until one is available
    /// @ai:effects state:write, time
    async fn wait(&self) {
        let Some(bucket) = &self.bucket else {
            return;
        };

        loop {
            let taken = bucket.lock().await.take();

            match taken {
                Ok(()) => return,
                Err(pause) => {
                    tracing::debug!("Rate limit reached, pausing {:?}", pause);
                    tokio::time::sleep(pause).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_full_bucket_does_not_block() {
        let limiter = RateLimiter::new(60);

        let start = Instant::now();
        limiter.wait().await;

        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_empty_bucket_throttles() {
        let limiter = RateLimiter::new(60);

        for _ in 0..60 {
            limiter.wait().await;
        }

        let start = Instant::now();
        limiter.wait().await;

        assert!(start.elapsed() >= Duration::from_millis(900));
    }

    #[test]
    fn test_drained_bucket_reports_wait_for_next_token() {
        let mut bucket = Bucket::full(2);

        assert_eq!(bucket.take(), Ok(()));
        assert_eq!(bucket.take(), Ok(()));

        let pause = bucket.take().unwrap_err();
        assert!(pause > Duration::from_secs(25));
        assert!(pause <= Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_zero_limit_is_unthrottled() {
        let limiter = RateLimiter::new(0);

        let start = Instant::now();
        for _ in 0..100 {
            limiter.wait().await;
        }

        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
