pub mod callback;
pub mod entry;
pub mod key;
pub mod metrics;
pub mod storage;
pub mod ttl_policy;

pub use callback::{CacheAccessCallback, NoopCacheCallback};
pub use entry::{CacheEntry, Deadlines};
pub use key::CacheKey;
pub use metrics::CacheMetrics;
pub use storage::{DnsCache, CACHE_SHARD_COUNT};
pub use ttl_policy::{TtlPolicy, MIN_CACHE_TTL_SECS};
