use crate::dns::admission::DEFAULT_MAX_CONCURRENT_QUERIES;
use crate::dns::coalescer::DEFAULT_COALESCE_TIMEOUT;
use ferrous_relay_domain::config::DnsConfig;
use std::time::Duration;

/// Tunables for the resolution pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// How long one caller waits on a coalesced resolution
    pub coalesce_timeout: Duration,

    /// Admission ceiling for forwarded queries
    pub max_concurrent_queries: usize,

    /// Initial capacity of the cache store
    pub cache_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            coalesce_timeout: DEFAULT_COALESCE_TIMEOUT,
            max_concurrent_queries: DEFAULT_MAX_CONCURRENT_QUERIES,
            cache_capacity: 4096,
        }
    }
}

impl From<&DnsConfig> for PipelineConfig {
    fn from(dns: &DnsConfig) -> Self {
        Self {
            coalesce_timeout: Duration::from_millis(dns.coalesce_timeout),
            max_concurrent_queries: dns.max_concurrent_queries,
            cache_capacity: dns.cache_capacity,
        }
    }
}
