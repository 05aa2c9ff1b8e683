use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::routing::RouteRule;
use super::upstream::UpstreamPool;

/// DNS resolution configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    /// Per-attempt upstream timeout in milliseconds
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,

    /// How long one caller waits on a coalesced upstream resolution (ms).
    /// The shared resolution itself keeps running past this.
    #[serde(default = "default_coalesce_timeout")]
    pub coalesce_timeout: u64,

    /// Admission ceiling for concurrently forwarded queries. Queries beyond
    /// it are answered with SERVFAIL.
    #[serde(default = "default_max_concurrent_queries")]
    pub max_concurrent_queries: usize,

    /// Maximum `pool:` alias hops followed while forwarding
    #[serde(default = "default_max_forward_depth")]
    pub max_forward_depth: u8,

    /// Initial capacity hint for the cache store
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Per-domain cache TTL overrides in seconds.
    /// `0` disables caching for the domain; other values are still raised to
    /// the 60 second floor.
    #[serde(default)]
    pub fixed_ttl: HashMap<String, u32>,

    /// Pool used when no routing rule matches; `None` makes unmatched
    /// queries a routing error.
    #[serde(default = "default_pool_name")]
    pub default_pool: Option<String>,

    #[serde(default = "default_pools")]
    pub pools: Vec<UpstreamPool>,

    /// Evaluated in order, first match wins
    #[serde(default)]
    pub rules: Vec<RouteRule>,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            query_timeout: default_query_timeout(),
            coalesce_timeout: default_coalesce_timeout(),
            max_concurrent_queries: default_max_concurrent_queries(),
            max_forward_depth: default_max_forward_depth(),
            cache_capacity: default_cache_capacity(),
            fixed_ttl: HashMap::new(),
            default_pool: default_pool_name(),
            pools: default_pools(),
            rules: vec![],
        }
    }
}

fn default_query_timeout() -> u64 {
    2000
}

fn default_coalesce_timeout() -> u64 {
    2000
}

fn default_max_concurrent_queries() -> usize {
    5000
}

fn default_max_forward_depth() -> u8 {
    3
}

fn default_cache_capacity() -> usize {
    4096
}

fn default_pool_name() -> Option<String> {
    Some("default".to_string())
}

fn default_pools() -> Vec<UpstreamPool> {
    vec![UpstreamPool::new(
        "default",
        vec!["8.8.8.8:53".to_string(), "1.1.1.1:53".to_string()],
    )]
}
