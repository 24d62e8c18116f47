use std::time::Duration;

use super::Resource;
use crate::config::QueryConfig;

/// How a single read is fetched and kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// How long a fetched value is served without refetching.
    pub stale_time: Duration,
    /// Extra attempts after a retryable failure.
    pub retries: u32,
    /// Delay before the first retry, doubled for each further one.
    pub retry_delay: Duration,
}

impl QueryOptions {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            stale_time,
            retries: 0,
            retry_delay: Duration::ZERO,
        }
    }

    /// The resource's stale time with the configured retry policy.
    pub fn for_resource(resource: &Resource, config: &QueryConfig) -> Self {
        Self {
            stale_time: resource.stale_time,
            retries: config.read_retries,
            retry_delay: config.retry_delay,
        }
    }

    pub fn retries(mut self, retries: u32, delay: Duration) -> Self {
        self.retries = retries;
        self.retry_delay = delay;
        self
    }

    pub(crate) fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        let config = QueryConfig::default();
        Self {
            stale_time: config.default_stale_time,
            retries: config.read_retries,
            retry_delay: config.retry_delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::resources;

    #[test]
    fn test_for_resource() {
        let options = QueryOptions::for_resource(&resources::TODAY_LOG, &QueryConfig::default());
        assert_eq!(options.stale_time, Duration::from_secs(60));
        assert_eq!(options.retries, 2);
    }

    #[test]
    fn test_backoff_doubles() {
        let options = QueryOptions::new(Duration::ZERO).retries(2, Duration::from_millis(100));
        assert_eq!(options.backoff(0), Duration::from_millis(100));
        assert_eq!(options.backoff(1), Duration::from_millis(200));
        assert_eq!(options.backoff(2), Duration::from_millis(400));
    }
}
