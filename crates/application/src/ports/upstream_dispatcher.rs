use async_trait::async_trait;
use bytes::Bytes;
use ferrous_relay_domain::{DomainError, UpstreamSelection};

/// Sends a wire-format query to the selected upstream and returns the raw
/// response bytes.
///
/// Implementations own failover, per-attempt timeouts, alias resolution and
/// the response size limit. A successful return means some server produced
/// a response no larger than the limit; it may still carry an error rcode.
#[async_trait]
pub trait UpstreamDispatcher: Send + Sync {
    async fn send(&self, query: &[u8], selection: &UpstreamSelection)
        -> Result<Bytes, DomainError>;
}
