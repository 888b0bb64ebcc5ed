//! Bounded retry with fixed backoff plus random jitter.
//!
//! Used for the metadata fetch only. Generation and persistence are never
//! retried automatically.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use rand::Rng;

/// Default number of attempts (including the first).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default fixed delay between attempts.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1_000);

/// Default upper bound on the random jitter added to each delay.
pub const DEFAULT_JITTER: Duration = Duration::from_millis(250);

/// Retry parameters: attempt bound, fixed delay, and jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Zero is treated as one.
    pub max_attempts: u32,
    /// Fixed delay slept before every retry.
    pub delay: Duration,
    /// Maximum extra delay, drawn uniformly from `0..=jitter`.
    pub jitter: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, delay: Duration, jitter: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            jitter,
        }
    }

    /// A policy that retries immediately. Useful in tests.
    pub const fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO, Duration::ZERO)
    }

    /// Attempt bound with the zero case folded to a single attempt.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay to sleep before the next attempt: `delay + uniform(0..=jitter)`.
    pub fn next_delay(&self) -> Duration {
        let jitter_ms = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        if jitter_ms == 0 {
            return self.delay;
        }
        let extra = rand::rng().random_range(0..=jitter_ms);
        self.delay + Duration::from_millis(extra)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_DELAY, DEFAULT_JITTER)
    }
}

/// Run `op` until it succeeds, returns a non-retryable error, or the
/// policy's attempt bound is reached.
///
/// `op` receives the 1-based attempt number. The last error is returned
/// when attempts are exhausted.
pub async fn retry<T, E, F, Fut, R>(policy: &RetryPolicy, is_retryable: R, mut op: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
    E: Display,
{
    let max_attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts && is_retryable(&e) => {
                let delay = policy.next_delay();
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                if is_retryable(&e) {
                    tracing::error!(attempt, error = %e, "Giving up after final attempt");
                }
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Transient,
        Permanent,
    }

    impl Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{self:?}")
        }
    }

    fn is_transient(e: &TestError) -> bool {
        *e == TestError::Transient
    }

    #[tokio::test]
    async fn succeeds_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, TestError> = retry(&RetryPolicy::immediate(3), is_transient, |n| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(n) }
        })
        .await;
        assert_eq!(result, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn succeeds_within_bound() {
        let calls = AtomicU32::new(0);
        let result = retry(&RetryPolicy::immediate(3), is_transient, |n| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 3 {
                    Err(TestError::Transient)
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stops_at_bound() {
        let calls = AtomicU32::new(0);
        let result: Result<(), TestError> = retry(&RetryPolicy::immediate(3), is_transient, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(TestError::Transient) }
        })
        .await;
        assert_eq!(result, Err(TestError::Transient));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), TestError> = retry(&RetryPolicy::immediate(5), is_transient, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(TestError::Permanent) }
        })
        .await;
        assert_eq!(result, Err(TestError::Permanent));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_attempts_still_runs_once() {
        let calls = AtomicU32::new(0);
        let _: Result<(), TestError> = retry(&RetryPolicy::immediate(0), is_transient, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(TestError::Transient) }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn delay_stays_within_jitter_window() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100), Duration::from_millis(50));
        for _ in 0..100 {
            let d = policy.next_delay();
            assert!(d >= Duration::from_millis(100));
            assert!(d <= Duration::from_millis(150));
        }
    }

    #[test]
    fn zero_jitter_is_exact() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100), Duration::ZERO);
        assert_eq!(policy.next_delay(), Duration::from_millis(100));
    }

    #[test]
    fn default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(1));
    }
}
