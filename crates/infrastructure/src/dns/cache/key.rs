use ferrous_relay_domain::{normalize_domain, DnsQuery, RecordType};
use std::fmt;
use std::sync::Arc;

/// Cache key: normalized domain plus query type.
///
/// The domain is shared (`Arc<str>`) with the `DnsQuery` it was built from,
/// so deriving a key on the hot path never copies the name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub domain: Arc<str>,
    pub record_type: RecordType,
}

impl CacheKey {
    #[inline]
    pub fn new(domain: &str, record_type: RecordType) -> Self {
        Self {
            domain: Arc::from(normalize_domain(domain).as_str()),
            record_type,
        }
    }
}

impl From<&DnsQuery> for CacheKey {
    #[inline]
    fn from(query: &DnsQuery) -> Self {
        Self {
            domain: Arc::clone(&query.domain),
            record_type: query.record_type,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.domain, self.record_type)
    }
}
