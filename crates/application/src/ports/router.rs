use ferrous_relay_domain::{DnsQuery, DomainError, RouteDecision};

/// Decides where a query goes: forward to an upstream pool, or reject.
///
/// Routing is evaluated after the cache lookup, so it only runs on misses
/// and for domains whose caching is disabled. Implementations must be
/// cheap and non-blocking.
pub trait Router: Send + Sync {
    fn select(&self, query: &DnsQuery) -> Result<RouteDecision, DomainError>;
}
