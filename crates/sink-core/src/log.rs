//! Rate limiting for per-record error logging.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Suppresses repeated log emissions within a fixed window.
///
/// Per-record format failures can repeat at batch rate; the task logs the
/// first occurrence per window and drops the rest.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    /// True when a message may be emitted now.
    pub fn allow(&self) -> bool {
        let mut last = self.last.lock().unwrap();
        match *last {
            Some(at) if at.elapsed() < self.interval => false,
            _ => {
                *last = Some(Instant::now());
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suppresses_within_window() {
        let limiter = RateLimiter::new(Duration::from_secs(10));
        assert!(limiter.allow());
        assert!(!limiter.allow());
    }

    #[test]
    fn test_allows_after_window() {
        let limiter = RateLimiter::new(Duration::ZERO);
        assert!(limiter.allow());
        assert!(limiter.allow());
    }
}
