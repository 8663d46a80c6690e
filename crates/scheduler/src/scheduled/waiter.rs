use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use thiserror::Error;

/// Longest single backoff sleep.
const MAX_DELAY: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaiterError {
    #[error("waiter exceeded {max_retries} retries")]
    RetriesExceeded { max_retries: u32 },
}

/// Backs off between failed attempts.
#[async_trait]
pub trait Waiter: Send {
    /// Forgets previous failures.
    fn reset(&mut self);

    /// Records a failure and sleeps before the next attempt, or fails once
    /// too many attempts have been made.
    async fn wait(&mut self) -> Result<(), WaiterError>;
}

/// Sleeps for the backoff unit multiplied by the retry count, jittered
/// between half and one and a half times that, and never longer than
/// fifteen minutes.
#[derive(Debug, Clone)]
pub struct BackoffWaiter {
    backoff: Duration,
    max_retries: u32,
    retries: u32,
}

impl BackoffWaiter {
    pub fn new(backoff: Duration, max_retries: u32) -> Self {
        Self {
            backoff,
            max_retries,
            retries: 0,
        }
    }
}

#[async_trait]
impl Waiter for BackoffWaiter {
    fn reset(&mut self) {
        self.retries = 0;
    }

    async fn wait(&mut self) -> Result<(), WaiterError> {
        self.retries += 1;
        if self.retries > self.max_retries {
            return Err(WaiterError::RetriesExceeded {
                max_retries: self.max_retries,
            });
        }

        let jitter: f64 = rand::rng().random_range(0.5..1.5);
        let scaled = self.backoff.as_secs_f64() * f64::from(self.retries) * jitter;
        let delay = Duration::try_from_secs_f64(scaled)
            .unwrap_or(MAX_DELAY)
            .min(MAX_DELAY);
        tracing::debug!(retries = self.retries, delay_ms = delay.as_millis() as u64, "Backing off");

        tokio::time::sleep(delay).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_wait_fails_after_max_retries() {
        let mut waiter = BackoffWaiter::new(Duration::from_millis(100), 2);

        assert!(waiter.wait().await.is_ok());
        assert!(waiter.wait().await.is_ok());
        assert_eq!(
            waiter.wait().await,
            Err(WaiterError::RetriesExceeded { max_retries: 2 })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_restores_waiting() {
        let mut waiter = BackoffWaiter::new(Duration::from_millis(100), 2);
        for _ in 0..3 {
            let _ = waiter.wait().await;
        }
        assert!(waiter.wait().await.is_err());

        waiter.reset();
        assert!(waiter.wait().await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_sleeps_with_growing_jittered_delay() {
        let mut waiter = BackoffWaiter::new(Duration::from_secs(10), 5);

        for retries in 1..=3u32 {
            let start = tokio::time::Instant::now();
            waiter.wait().await.unwrap();
            let slept = start.elapsed();

            let unit = Duration::from_secs(10) * retries;
            assert!(slept >= unit / 2, "slept {slept:?} for retry {retries}");
            assert!(slept <= unit * 3 / 2, "slept {slept:?} for retry {retries}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_fails_immediately() {
        let mut waiter = BackoffWaiter::new(Duration::from_millis(1), 0);
        assert!(waiter.wait().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_backoff_is_capped() {
        let mut waiter = BackoffWaiter::new(Duration::MAX, 2);

        for _ in 0..2 {
            let start = tokio::time::Instant::now();
            waiter.wait().await.unwrap();
            let slept = start.elapsed();
            assert!(slept >= MAX_DELAY, "slept {slept:?}");
            assert!(slept < MAX_DELAY + Duration::from_secs(1), "slept {slept:?}");
        }
    }
}
