use std::sync::Arc;

/// Which upstream pool a forwarded query goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamSelection {
    pub pool: Arc<str>,
}

impl UpstreamSelection {
    pub fn new(pool: impl Into<Arc<str>>) -> Self {
        Self { pool: pool.into() }
    }
}

/// Outcome of the routing step for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Forward(UpstreamSelection),
    Reject,
}
