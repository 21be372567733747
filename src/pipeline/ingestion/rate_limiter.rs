use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// At most `calls` requests per `period`.
#[derive(Clone, Debug)]
pub struct Limits {
    pub calls: u32,
    pub period: Duration,
}

impl Limits {
    pub fn new(calls: u32, period_secs: f64) -> Self {
        Self {
            calls,
            period: Duration::from_secs_f64(period_secs.max(0.0)),
        }
    }
}

/// Token bucket shared by every request of a client. A limit of zero calls
/// or a zero period disables limiting.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    limits: Limits,
    // tokens available and the time of the last refill
    tokens: Mutex<(f64, Instant)>,
}

impl RateLimiter {
    pub fn new(limits: Limits) -> Self {
        let capacity = limits.calls as f64;
        Self {
            inner: Arc::new(Inner {
                limits,
                tokens: Mutex::new((capacity, Instant::now())),
            }),
        }
    }

    /// Wait until a request may be sent.
    pub async fn acquire(&self) {
        let capacity = self.inner.limits.calls as f64;
        let period_secs = self.inner.limits.period.as_secs_f64();
        if capacity <= 0.0 || period_secs <= 0.0 {
            return;
        }
        let refill_rate = capacity / period_secs; // tokens per second

        loop {
            let mut guard = self.inner.tokens.lock().await;
            let (ref mut tokens, ref mut last) = *guard;
            let now = Instant::now();
            let elapsed = now.duration_since(*last).as_secs_f64();
            *tokens = (*tokens + elapsed * refill_rate).min(capacity);
            *last = now;
            if *tokens >= 1.0 {
                *tokens -= 1.0;
                return;
            }
            let wait = (1.0 - *tokens) / refill_rate;
            drop(guard);
            tokio::time::sleep(Duration::from_secs_f64(wait.max(0.001))).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_burst_up_to_capacity_is_immediate() {
        let limiter = RateLimiter::new(Limits::new(5, 60.0));
        let start = Instant::now();
        for _ in 0..5 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_waits_once_capacity_is_spent() {
        let limiter = RateLimiter::new(Limits::new(2, 0.2));
        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }
        // the third call needs one refill: 0.2s / 2 calls
        assert!(start.elapsed() >= Duration::from_millis(90));
    }

    #[tokio::test]
    async fn test_zero_calls_disables_limiting() {
        let limiter = RateLimiter::new(Limits::new(0, 60.0));
        let start = Instant::now();
        for _ in 0..100 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
