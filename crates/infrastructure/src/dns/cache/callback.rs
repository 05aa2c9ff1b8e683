use super::{CacheEntry, CacheKey};
use ferrous_relay_domain::DomainError;

/// Hook invoked after every successful cache write.
///
/// Runs inside the coalesced upstream execution, so an error here fails the
/// resolution for every caller attached to it. Implementations must not
/// block.
pub trait CacheAccessCallback: Send + Sync {
    fn on_cache_write(&self, key: &CacheKey, entry: &CacheEntry) -> Result<(), DomainError>;
}

/// Callback that accepts every write.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCacheCallback;

impl CacheAccessCallback for NoopCacheCallback {
    fn on_cache_write(&self, _key: &CacheKey, _entry: &CacheEntry) -> Result<(), DomainError> {
        Ok(())
    }
}
