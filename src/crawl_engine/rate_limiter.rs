//! Per-job request pacing
//!
//! Every job owns one [`RequestPacer`]. Before each fetch the engine waits
//! until at least `interval` has passed since the previous fetch started.
//! Pacing is wall-clock based and local to the job; jobs never throttle each
//! other.

use std::time::Duration;
use tokio::time::Instant;

/// Pacing decision for the next request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Request may proceed now
    Allow,
    /// Request must wait this long before proceeding
    Deny { retry_after: Duration },
}

/// Blocking fixed-interval pacer (one request per `interval`)
#[derive(Debug)]
pub struct RequestPacer {
    interval: Duration,
    last_request: Option<Instant>,
}

impl RequestPacer {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: None,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Decide whether a request may start at `now`.
    #[must_use]
    pub fn decision_at(&self, now: Instant) -> RateLimitDecision {
        match self.last_request {
            None => RateLimitDecision::Allow,
            Some(last) => {
                let elapsed = now.saturating_duration_since(last);
                if elapsed >= self.interval {
                    RateLimitDecision::Allow
                } else {
                    RateLimitDecision::Deny {
                        retry_after: self.interval - elapsed,
                    }
                }
            }
        }
    }

    /// Sleep until the next request is allowed, then record it as started.
    pub async fn wait(&mut self) {
        if self.interval.is_zero() {
            self.last_request = Some(Instant::now());
            return;
        }

        if let RateLimitDecision::Deny { retry_after } = self.decision_at(Instant::now()) {
            tokio::time::sleep(retry_after).await;
        }
        self.last_request = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_is_allowed() {
        let pacer = RequestPacer::new(Duration::from_secs(1));
        assert_eq!(pacer.decision_at(Instant::now()), RateLimitDecision::Allow);
    }

    #[tokio::test]
    async fn second_request_is_denied_within_interval() {
        let mut pacer = RequestPacer::new(Duration::from_secs(60));
        pacer.wait().await;

        match pacer.decision_at(Instant::now()) {
            RateLimitDecision::Deny { retry_after } => {
                assert!(retry_after <= Duration::from_secs(60));
                assert!(retry_after > Duration::from_secs(59));
            }
            RateLimitDecision::Allow => panic!("expected the pacer to deny"),
        }
    }

    #[tokio::test]
    async fn waits_out_the_interval() {
        let mut pacer = RequestPacer::new(Duration::from_millis(50));
        pacer.wait().await;
        let started = Instant::now();
        pacer.wait().await;
        assert!(started.elapsed() >= Duration::from_millis(45));
    }

    #[tokio::test]
    async fn zero_interval_never_sleeps() {
        let mut pacer = RequestPacer::new(Duration::ZERO);
        pacer.wait().await;
        assert_eq!(pacer.decision_at(Instant::now()), RateLimitDecision::Allow);
    }
}
