use super::entry::Deadlines;
use ferrous_relay_domain::normalize_domain;
use hickory_proto::rr::Record;
use rustc_hash::FxHashMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Lower bound applied to every effective cache lifetime.
pub const MIN_CACHE_TTL_SECS: u32 = 60;

/// Computes cache deadlines from advertised TTLs and per-domain overrides.
///
/// The override table is built once and never mutated, so lookups need no
/// synchronization.
#[derive(Debug, Default)]
pub struct TtlPolicy {
    fixed_ttl: FxHashMap<Arc<str>, u32>,
}

impl TtlPolicy {
    pub fn new(fixed_ttl: &HashMap<String, u32>) -> Self {
        let fixed_ttl = fixed_ttl
            .iter()
            .map(|(domain, ttl)| (Arc::from(normalize_domain(domain).as_str()), *ttl))
            .collect();
        Self { fixed_ttl }
    }

    /// Override for an already-normalized domain.
    #[inline]
    pub fn fixed_ttl(&self, domain: &str) -> Option<u32> {
        self.fixed_ttl.get(domain).copied()
    }

    /// `true` when the domain carries a `0` override.
    #[inline]
    pub fn caching_disabled(&self, domain: &str) -> bool {
        self.fixed_ttl(domain) == Some(0)
    }

    pub fn compute(&self, domain: &str, advertised_ttl: u32, now: Instant) -> Deadlines {
        let original_deadline = now + secs(advertised_ttl);

        let deadline = match self.fixed_ttl(domain) {
            Some(0) => now.checked_sub(Duration::from_secs(1)).unwrap_or(now),
            Some(fixed) => now + secs(fixed.max(MIN_CACHE_TTL_SECS)),
            None => now + secs(advertised_ttl.max(MIN_CACHE_TTL_SECS)),
        };

        Deadlines {
            deadline,
            original_deadline,
        }
    }

    /// Minimum TTL across the answer records, `0` for an empty answer.
    pub fn advertised_ttl(answers: &[Record]) -> u32 {
        answers.iter().map(|r| r.ttl()).min().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.fixed_ttl.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixed_ttl.is_empty()
    }
}

#[inline]
fn secs(value: u32) -> Duration {
    Duration::from_secs(u64::from(value))
}
