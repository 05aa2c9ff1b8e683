use crate::dns::forwarding::ResponseParser;
use crate::dns::transport::{create_transport, Transport};
use async_trait::async_trait;
use bytes::Bytes;
use ferrous_relay_application::ports::UpstreamDispatcher;
use ferrous_relay_domain::config::UpstreamPool;
use ferrous_relay_domain::{DomainError, UpstreamEndpoint, UpstreamSelection};
use futures::future::{BoxFuture, FutureExt};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default limit on `pool:` alias hops, counting the selected pool as 1.
pub const DEFAULT_MAX_FORWARD_DEPTH: u8 = 3;

enum PoolMember {
    Server(Transport),
    Alias(Arc<str>),
}

/// Forwards queries to named upstream pools.
///
/// Members of a pool are tried in order; the first response wins and the
/// last error is returned when every member fails. A response that does
/// not carry the query's ID and question counts as a failure. A member can also be an
/// alias to another pool, which is followed recursively up to
/// `max_depth` pools deep.
pub struct PoolDispatcher {
    pools: FxHashMap<Arc<str>, Vec<PoolMember>>,
    query_timeout: Duration,
    max_depth: u8,
}

impl PoolDispatcher {
    pub fn new(
        pools: &[UpstreamPool],
        query_timeout: Duration,
        max_depth: u8,
    ) -> Result<Self, DomainError> {
        if pools.is_empty() {
            return Err(DomainError::NoUpstreamServers(
                "at least one pool must be configured".into(),
            ));
        }

        let mut built = FxHashMap::default();
        for pool in pools {
            let endpoints = pool.endpoints().map_err(|e| {
                DomainError::InvalidQuery(format!("Invalid pool '{}': {}", pool.name, e))
            })?;

            let members: Vec<PoolMember> = endpoints
                .into_iter()
                .map(|endpoint| match endpoint {
                    UpstreamEndpoint::Server(protocol) => {
                        PoolMember::Server(create_transport(&protocol))
                    }
                    UpstreamEndpoint::Pool(name) => PoolMember::Alias(name),
                })
                .collect();

            info!(
                pool = %pool.name,
                members = members.len(),
                "Upstream pool configured"
            );
            built.insert(Arc::from(pool.name.as_str()), members);
        }

        for members in built.values() {
            for member in members {
                if let PoolMember::Alias(target) = member {
                    if !built.contains_key(target) {
                        return Err(DomainError::UnknownUpstreamPool(target.to_string()));
                    }
                }
            }
        }

        Ok(Self {
            pools: built,
            query_timeout,
            max_depth,
        })
    }

    pub fn has_pool(&self, name: &str) -> bool {
        self.pools.contains_key(name)
    }

    fn dispatch<'a>(
        &'a self,
        query: &'a [u8],
        pool: &'a str,
        depth: u8,
    ) -> BoxFuture<'a, Result<Bytes, DomainError>> {
        async move {
            if depth > self.max_depth {
                return Err(DomainError::ForwardingDepthExceeded {
                    depth,
                    limit: self.max_depth,
                });
            }

            let members = self
                .pools
                .get(pool)
                .ok_or_else(|| DomainError::UnknownUpstreamPool(pool.to_string()))?;

            let mut last_error = None;
            for member in members {
                let result = match member {
                    PoolMember::Server(transport) => self.exchange(transport, query).await,
                    PoolMember::Alias(target) => {
                        debug!(pool = %pool, target = %target, depth = depth, "Following pool alias");
                        self.dispatch(query, target, depth + 1).await
                    }
                };

                match result {
                    Ok(bytes) => return Ok(bytes),
                    Err(e @ DomainError::ForwardingDepthExceeded { .. }) => return Err(e),
                    Err(e) => {
                        warn!(pool = %pool, error = %e, "Upstream attempt failed, trying next");
                        last_error = Some(e);
                    }
                }
            }

            Err(last_error.unwrap_or_else(|| DomainError::NoUpstreamServers(pool.to_string())))
        }
        .boxed()
    }

    async fn exchange(&self, transport: &Transport, query: &[u8]) -> Result<Bytes, DomainError> {
        let response = transport.send(query, self.query_timeout).await?;

        if let Some(limit) = transport.max_response_size() {
            if response.bytes.len() > limit {
                warn!(
                    server = %transport.server_addr(),
                    protocol = transport.protocol_name(),
                    size = response.bytes.len(),
                    limit = limit,
                    "Upstream response exceeds datagram limit"
                );
                return Err(DomainError::ResponseTooLarge {
                    size: response.bytes.len(),
                    limit,
                });
            }
        }

        if let Err(e) = ResponseParser::verify_reply(query, &response.bytes) {
            warn!(
                server = %transport.server_addr(),
                protocol = response.protocol_used,
                error = %e,
                "Upstream response does not answer the query"
            );
            return Err(e);
        }

        debug!(
            server = %transport.server_addr(),
            protocol = response.protocol_used,
            bytes = response.bytes.len(),
            "Upstream exchange complete"
        );
        Ok(response.bytes)
    }
}

#[async_trait]
impl UpstreamDispatcher for PoolDispatcher {
    async fn send(
        &self,
        query: &[u8],
        selection: &UpstreamSelection,
    ) -> Result<Bytes, DomainError> {
        self.dispatch(query, &selection.pool, 1).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(name: &str, servers: &[&str]) -> UpstreamPool {
        UpstreamPool::new(name, servers.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_alias_to_missing_pool_is_rejected() {
        let result = PoolDispatcher::new(
            &[pool("primary", &["pool:ghost"])],
            Duration::from_millis(100),
            DEFAULT_MAX_FORWARD_DEPTH,
        );
        assert!(matches!(result, Err(DomainError::UnknownUpstreamPool(p)) if p == "ghost"));
    }

    #[tokio::test]
    async fn test_alias_cycle_hits_depth_limit() {
        let dispatcher = PoolDispatcher::new(
            &[pool("a", &["pool:b"]), pool("b", &["pool:a"])],
            Duration::from_millis(100),
            DEFAULT_MAX_FORWARD_DEPTH,
        )
        .unwrap();

        let result = dispatcher.send(&[0u8; 12], &UpstreamSelection::new("a")).await;
        assert_eq!(
            result,
            Err(DomainError::ForwardingDepthExceeded { depth: 4, limit: 3 })
        );
    }

    #[tokio::test]
    async fn test_unknown_selection_is_error() {
        let dispatcher = PoolDispatcher::new(
            &[pool("a", &["127.0.0.1:53"])],
            Duration::from_millis(100),
            DEFAULT_MAX_FORWARD_DEPTH,
        )
        .unwrap();

        let result = dispatcher.send(&[0u8; 12], &UpstreamSelection::new("nope")).await;
        assert_eq!(result, Err(DomainError::UnknownUpstreamPool("nope".into())));
        assert!(dispatcher.has_pool("a"));
    }

    #[tokio::test]
    async fn test_empty_pool_reports_no_servers() {
        let dispatcher = PoolDispatcher::new(
            &[pool("empty", &[])],
            Duration::from_millis(100),
            DEFAULT_MAX_FORWARD_DEPTH,
        )
        .unwrap();

        let result = dispatcher.send(&[0u8; 12], &UpstreamSelection::new("empty")).await;
        assert_eq!(result, Err(DomainError::NoUpstreamServers("empty".into())));
    }
}
