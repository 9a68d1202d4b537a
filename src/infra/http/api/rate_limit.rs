use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Sliding window limiter keyed by client address. Entries are pruned
/// on access, so an idle client's bucket shrinks to nothing the next
/// time it shows up.
#[derive(Debug, Clone)]
pub struct ApiRateLimiter {
    window: Duration,
    max_requests: u32,
    enabled: bool,
    buckets: Arc<DashMap<String, Vec<Instant>>>,
}

impl ApiRateLimiter {
    pub fn new(window: Duration, max_requests: u32, enabled: bool) -> Self {
        Self {
            window,
            max_requests,
            enabled,
            buckets: Arc::new(DashMap::new()),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn allow(&self, key: &str) -> bool {
        let now = Instant::now();
        let window = self.window;

        let mut entry = self.buckets.entry(key.to_string()).or_default();
        entry.retain(|instant| now.duration_since(*instant) < window);

        if entry.len() as u32 >= self.max_requests {
            return false;
        }

        entry.push(now);
        true
    }

    pub fn retry_after_secs(&self) -> u64 {
        self.window.as_secs().max(1)
    }

    pub fn limit(&self) -> u32 {
        self.max_requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denies_once_window_is_full() {
        let limiter = ApiRateLimiter::new(Duration::from_secs(60), 2, true);

        assert!(limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
    }

    #[test]
    fn buckets_are_independent_per_key() {
        let limiter = ApiRateLimiter::new(Duration::from_secs(60), 1, true);

        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.2"));
    }

    #[test]
    fn expired_entries_free_the_window() {
        let limiter = ApiRateLimiter::new(Duration::from_millis(20), 1, true);

        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
        std::thread::sleep(Duration::from_millis(30));
        assert!(limiter.allow("10.0.0.1"));
    }
}
