use ferrous_relay_domain::RecordType;
use std::sync::Arc;

/// Emitted after an upstream answer has been written to the cache.
///
/// Cheap to clone: the domain is shared with the cache key.
#[derive(Debug, Clone)]
pub struct CacheWriteEvent {
    pub domain: Arc<str>,

    pub record_type: RecordType,

    /// Number of answer records stored
    pub answers: usize,

    /// Seconds until the entry stops being served from cache
    pub ttl: u32,

    /// `true` when the domain has caching disabled and the entry was written
    /// already expired
    pub expired_on_write: bool,
}

impl CacheWriteEvent {
    pub fn new(
        domain: impl Into<Arc<str>>,
        record_type: RecordType,
        answers: usize,
        ttl: u32,
        expired_on_write: bool,
    ) -> Self {
        Self {
            domain: domain.into(),
            record_type,
            answers,
            ttl,
            expired_on_write,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }
}
