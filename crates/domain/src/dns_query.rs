use super::RecordType;
use std::sync::Arc;

/// DNS query (domain + record type).
/// Uses `Arc<str>` for zero-cost cloning across pipeline → router → coalescer.
///
/// The domain is always stored normalized: lower-case, without the trailing
/// root dot. Two queries for `Example.COM.` and `example.com` are the same
/// question.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DnsQuery {
    pub domain: Arc<str>,
    pub record_type: RecordType,
}

impl DnsQuery {
    pub fn new(domain: &str, record_type: RecordType) -> Self {
        Self {
            domain: Arc::from(normalize_domain(domain).as_str()),
            record_type,
        }
    }
}

/// Lower-cases a domain name and strips the trailing root dot.
pub fn normalize_domain(domain: &str) -> String {
    let trimmed = domain.trim().trim_end_matches('.');
    trimmed.to_ascii_lowercase()
}
