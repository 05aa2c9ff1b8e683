#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use ferrous_relay_application::ports::{PacketSender, Router, UpstreamDispatcher};
use ferrous_relay_domain::{DnsQuery, DomainError, RouteDecision, UpstreamSelection};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

// ============================================================================
// Mock Router
// ============================================================================

/// Rejects one suffix, forwards everything else to `default`.
pub struct SuffixRouter {
    rejected_suffix: String,
}

impl SuffixRouter {
    pub fn rejecting(suffix: &str) -> Self {
        Self {
            rejected_suffix: suffix.to_string(),
        }
    }
}

impl Router for SuffixRouter {
    fn select(&self, query: &DnsQuery) -> Result<RouteDecision, DomainError> {
        if query.domain.ends_with(self.rejected_suffix.as_str()) {
            Ok(RouteDecision::Reject)
        } else {
            Ok(RouteDecision::Forward(UpstreamSelection::new("default")))
        }
    }
}

// ============================================================================
// Mock UpstreamDispatcher
// ============================================================================

/// Returns the query bytes unchanged; unknown pools fail.
pub struct EchoDispatcher {
    pool: String,
    calls: Arc<AtomicU64>,
}

impl EchoDispatcher {
    pub fn for_pool(pool: &str) -> Self {
        Self {
            pool: pool.to_string(),
            calls: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl UpstreamDispatcher for EchoDispatcher {
    async fn send(
        &self,
        query: &[u8],
        selection: &UpstreamSelection,
    ) -> Result<Bytes, DomainError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if *selection.pool != *self.pool {
            return Err(DomainError::UnknownUpstreamPool(selection.pool.to_string()));
        }
        Ok(Bytes::copy_from_slice(query))
    }
}

// ============================================================================
// Mock PacketSender
// ============================================================================

#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(Vec<u8>, SocketAddr)>>,
}

impl RecordingSender {
    pub async fn sent(&self) -> Vec<(Vec<u8>, SocketAddr)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl PacketSender for RecordingSender {
    async fn send(&self, packet: &[u8], destination: SocketAddr) -> Result<(), DomainError> {
        self.sent.lock().await.push((packet.to_vec(), destination));
        Ok(())
    }
}
