use thiserror::Error;

/// Errors surfaced by the resolution layer.
///
/// `Clone` because a single coalesced upstream execution hands the same
/// outcome to every caller attached to it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid DNS query: {0}")]
    InvalidQuery(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Timeout waiting for {server}")]
    TransportTimeout { server: String },

    #[error("Response of {size} bytes exceeds the {limit} byte datagram limit")]
    ResponseTooLarge { size: usize, limit: usize },

    #[error("Upstream pool '{pool}' answered {rcode}")]
    UpstreamFailure { pool: String, rcode: String },

    #[error("Upstream forwarding depth {depth} exceeds limit of {limit}")]
    ForwardingDepthExceeded { depth: u8, limit: u8 },

    #[error("Unknown upstream pool: {0}")]
    UnknownUpstreamPool(String),

    #[error("Upstream pool '{0}' has no servers")]
    NoUpstreamServers(String),

    #[error("Routing failed: {0}")]
    RoutingFailed(String),

    #[error("Cache access callback failed: {0}")]
    CacheCallbackFailed(String),

    #[error("Coalesced resolution failed: {0}")]
    CoalescedExecutionFailed(String),
}

impl DomainError {
    /// Timeouts are routine under load; everything else is worth a warning.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            DomainError::QueryTimeout | DomainError::TransportTimeout { .. }
        )
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::IoError(err.to_string())
    }
}
