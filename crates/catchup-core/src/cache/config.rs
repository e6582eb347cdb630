use std::time::Duration;

/// Configuration for the summary cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long an entry stays visible after it is written. Default: 7 days.
    pub ttl: Duration,

    /// How often the background sweep purges expired entries.
    /// Independent of the TTL. Default: 1 hour.
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(7 * 24 * 60 * 60),
            sweep_interval: Duration::from_secs(60 * 60),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}
