#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use ferrous_relay_application::ports::{PacketSender, Router, UpstreamDispatcher};
use ferrous_relay_domain::{DnsQuery, DomainError, RouteDecision, UpstreamSelection};
use ferrous_relay_infrastructure::dns::cache::{CacheAccessCallback, CacheEntry, CacheKey};
use ferrous_relay_infrastructure::dns::forwarding::MessageBuilder;
use ferrous_relay_infrastructure::dns::InboundQuery;
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const CLIENT_ADDR: &str = "127.0.0.1:53000";

// ============================================================================
// Client queries and upstream answers
// ============================================================================

pub fn client_query(domain: &str, record_type: RecordType) -> InboundQuery {
    let mut message = Message::new(0x1234, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(Query::query(Name::from_str(domain).unwrap(), record_type));

    InboundQuery {
        message,
        source: CLIENT_ADDR.parse().unwrap(),
        reply: true,
    }
}

/// Wire response to `query` carrying `rcode` and, for NOERROR, one A record
/// 93.184.216.34 with `ttl`.
pub fn answer_for(query: &[u8], rcode: ResponseCode, ttl: u32) -> Result<Bytes, DomainError> {
    let request = Message::from_vec(query)
        .map_err(|e| DomainError::InvalidQuery(e.to_string()))?;

    let mut response = Message::new(request.id(), MessageType::Response, OpCode::Query);
    response.set_recursion_desired(true);
    response.set_recursion_available(true);
    response.set_response_code(rcode);
    response.add_queries(request.queries().to_vec());

    if rcode == ResponseCode::NoError {
        if let Some(question) = request.queries().first() {
            response.add_answer(Record::from_rdata(
                question.name().clone(),
                ttl,
                RData::A(A(Ipv4Addr::new(93, 184, 216, 34))),
            ));
        }
    }

    Ok(Bytes::from(MessageBuilder::serialize_message(&response)?))
}

/// Response with ID 0xdead answering `evil.test. A` with 6.6.6.6.
pub fn unrelated_answer() -> Result<Bytes, DomainError> {
    let name = Name::from_str("evil.test.").unwrap();
    let mut response = Message::new(0xdead, MessageType::Response, OpCode::Query);
    response.set_recursion_available(true);
    response.add_query(Query::query(name.clone(), RecordType::A));
    response.add_answer(Record::from_rdata(
        name,
        3600,
        RData::A(A(Ipv4Addr::new(6, 6, 6, 6))),
    ));

    Ok(Bytes::from(MessageBuilder::serialize_message(&response)?))
}

// ============================================================================
// Mock Router
// ============================================================================

pub struct MockRouter {
    decision: Mutex<RouteDecision>,
    calls: AtomicU64,
}

impl MockRouter {
    pub fn forward(pool: &str) -> Self {
        Self {
            decision: Mutex::new(RouteDecision::Forward(UpstreamSelection::new(pool))),
            calls: AtomicU64::new(0),
        }
    }

    pub fn reject() -> Self {
        Self {
            decision: Mutex::new(RouteDecision::Reject),
            calls: AtomicU64::new(0),
        }
    }

    pub fn set_decision(&self, decision: RouteDecision) {
        *self.decision.lock().unwrap() = decision;
    }

    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Router for MockRouter {
    fn select(&self, _query: &DnsQuery) -> Result<RouteDecision, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.decision.lock().unwrap().clone())
    }
}

// ============================================================================
// Mock UpstreamDispatcher
// ============================================================================

#[derive(Debug, Clone)]
pub enum DispatchScript {
    Answer { ttl: u32 },
    Rcode(ResponseCode),
    /// A well-formed answer for some other question under some other ID
    Unrelated,
    Fail(DomainError),
}

pub struct MockDispatcher {
    script: Mutex<DispatchScript>,
    delay: Duration,
    dials: AtomicU64,
}

impl MockDispatcher {
    pub fn answering(ttl: u32) -> Self {
        Self::with_script(DispatchScript::Answer { ttl })
    }

    pub fn with_script(script: DispatchScript) -> Self {
        Self {
            script: Mutex::new(script),
            delay: Duration::ZERO,
            dials: AtomicU64::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_script(&self, script: DispatchScript) {
        *self.script.lock().unwrap() = script;
    }

    pub fn dial_count(&self) -> u64 {
        self.dials.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpstreamDispatcher for MockDispatcher {
    async fn send(
        &self,
        query: &[u8],
        _selection: &UpstreamSelection,
    ) -> Result<Bytes, DomainError> {
        self.dials.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let script = self.script.lock().unwrap().clone();
        match script {
            DispatchScript::Answer { ttl } => answer_for(query, ResponseCode::NoError, ttl),
            DispatchScript::Rcode(rcode) => answer_for(query, rcode, 0),
            DispatchScript::Unrelated => unrelated_answer(),
            DispatchScript::Fail(error) => Err(error),
        }
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
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Every reply so far, decoded.
    pub fn replies(&self) -> Vec<Message> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(bytes, _)| Message::from_vec(bytes).unwrap())
            .collect()
    }

    pub fn destinations(&self) -> Vec<SocketAddr> {
        self.sent.lock().unwrap().iter().map(|(_, addr)| *addr).collect()
    }
}

#[async_trait]
impl PacketSender for RecordingSender {
    async fn send(&self, packet: &[u8], destination: SocketAddr) -> Result<(), DomainError> {
        self.sent
            .lock()
            .unwrap()
            .push((packet.to_vec(), destination));
        Ok(())
    }
}

// ============================================================================
// Failing cache callback
// ============================================================================

#[derive(Default)]
pub struct FailingCallback {
    calls: AtomicU64,
}

impl FailingCallback {
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CacheAccessCallback for FailingCallback {
    fn on_cache_write(&self, _key: &CacheKey, _entry: &CacheEntry) -> Result<(), DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DomainError::CacheCallbackFailed("event sink unavailable".into()))
    }
}
