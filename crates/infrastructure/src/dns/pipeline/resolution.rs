use crate::dns::admission::AdmissionController;
use crate::dns::cache::{CacheAccessCallback, CacheEntry, CacheKey, DnsCache, TtlPolicy};
use crate::dns::coalescer::RequestCoalescer;
use crate::dns::forwarding::{MessageBuilder, RecordTypeMapper, ResponseBuilder, ResponseParser};
use ferrous_relay_application::ports::{PacketSender, Router, UpstreamDispatcher};
use ferrous_relay_domain::{DnsQuery, DomainError, RouteDecision, UpstreamSelection};
use hickory_proto::op::Message;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// One decoded client query handed to the pipeline.
#[derive(Debug, Clone)]
pub struct InboundQuery {
    pub message: Message,
    pub source: SocketAddr,
    /// Whether a response should be sent back to `source`
    pub reply: bool,
}

/// How a query left the pipeline. Rejections and admission denials are
/// outcomes, not errors: both still answer the client.
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    CacheHit(CacheEntry),
    Resolved(CacheEntry),
    Rejected,
    Overloaded,
}

/// Cache check → routing → admission → coalesced upstream dial and cache
/// writeback → reply.
///
/// A fresh cache hit answers straight away without touching routing,
/// admission or the coalescer. Errors from routing, the upstream or the
/// wire codec are returned to the caller and no response is sent.
pub struct ResolutionPipeline {
    cache: Arc<DnsCache>,
    ttl_policy: Arc<TtlPolicy>,
    router: Arc<dyn Router>,
    admission: Arc<AdmissionController>,
    coalescer: RequestCoalescer<CacheKey, CacheEntry>,
    upstream: UpstreamResolution,
    packet_sender: Arc<dyn PacketSender>,
}

impl ResolutionPipeline {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        cache: Arc<DnsCache>,
        ttl_policy: Arc<TtlPolicy>,
        router: Arc<dyn Router>,
        dispatcher: Arc<dyn UpstreamDispatcher>,
        admission: Arc<AdmissionController>,
        coalescer: RequestCoalescer<CacheKey, CacheEntry>,
        callback: Arc<dyn CacheAccessCallback>,
        packet_sender: Arc<dyn PacketSender>,
    ) -> Self {
        let upstream = UpstreamResolution {
            dispatcher,
            cache: Arc::clone(&cache),
            ttl_policy: Arc::clone(&ttl_policy),
            callback,
        };

        Self {
            cache,
            ttl_policy,
            router,
            admission,
            coalescer,
            upstream,
            packet_sender,
        }
    }

    pub async fn handle(&self, inbound: InboundQuery) -> Result<PipelineOutcome, DomainError> {
        let question = inbound
            .message
            .queries()
            .first()
            .ok_or_else(|| DomainError::InvalidQuery("message carries no question".into()))?;
        let query = DnsQuery::new(
            &question.name().to_ascii(),
            RecordTypeMapper::from_hickory(question.query_type()),
        );
        let key = CacheKey::from(&query);

        if !self.ttl_policy.caching_disabled(&key.domain) {
            let now = Instant::now();
            if let Some(entry) = self.cache.get_fresh(&key, now) {
                debug!(
                    domain = %key.domain,
                    record_type = %key.record_type,
                    "Cache HIT"
                );
                self.reply(&inbound, ResponseBuilder::answer(&inbound.message, &entry, now))
                    .await?;
                return Ok(PipelineOutcome::CacheHit(entry));
            }
        }

        debug!(
            domain = %key.domain,
            record_type = %key.record_type,
            "Cache MISS"
        );

        let selection = match self.router.select(&query)? {
            RouteDecision::Reject => {
                self.cache.remove(&key);
                debug!(domain = %key.domain, "Query rejected by routing");
                self.reply(&inbound, ResponseBuilder::reject(&inbound.message)).await?;
                return Ok(PipelineOutcome::Rejected);
            }
            RouteDecision::Forward(selection) => selection,
        };

        let Some(permit) = self.admission.try_admit() else {
            warn!(
                domain = %key.domain,
                client = %inbound.source,
                "Answering SERVFAIL: admission denied"
            );
            self.reply(&inbound, ResponseBuilder::servfail(&inbound.message)).await?;
            return Ok(PipelineOutcome::Overloaded);
        };

        let upstream = self.upstream.clone();
        let work_key = key.clone();
        let result = self
            .coalescer
            .execute(key, move || upstream.run(work_key, selection))
            .await;
        drop(permit);
        let entry = result?;

        self.reply(
            &inbound,
            ResponseBuilder::answer(&inbound.message, &entry, Instant::now()),
        )
        .await?;
        Ok(PipelineOutcome::Resolved(entry))
    }

    async fn reply(&self, inbound: &InboundQuery, response: Message) -> Result<(), DomainError> {
        if !inbound.reply {
            return Ok(());
        }
        let bytes = MessageBuilder::serialize_message(&response)?;
        self.packet_sender.send(&bytes, inbound.source).await
    }

    pub fn cache(&self) -> &Arc<DnsCache> {
        &self.cache
    }

    pub fn ttl_policy(&self) -> &TtlPolicy {
        &self.ttl_policy
    }

    pub fn admission(&self) -> &AdmissionController {
        &self.admission
    }

    pub fn coalescer(&self) -> &RequestCoalescer<CacheKey, CacheEntry> {
        &self.coalescer
    }
}

/// The work run once per coalesced key: dial, parse, write back.
#[derive(Clone)]
struct UpstreamResolution {
    dispatcher: Arc<dyn UpstreamDispatcher>,
    cache: Arc<DnsCache>,
    ttl_policy: Arc<TtlPolicy>,
    callback: Arc<dyn CacheAccessCallback>,
}

impl UpstreamResolution {
    async fn run(
        self,
        key: CacheKey,
        selection: UpstreamSelection,
    ) -> Result<CacheEntry, DomainError> {
        let request = MessageBuilder::build_query(&key.domain, &key.record_type)?;
        let raw = self.dispatcher.send(&request, &selection).await?;
        let response = ResponseParser::parse_reply(&request, &raw)?;

        if !response.is_cacheable() {
            return Err(DomainError::UpstreamFailure {
                pool: selection.pool.to_string(),
                rcode: ResponseParser::rcode_to_status(response.rcode).to_string(),
            });
        }

        let advertised_ttl = TtlPolicy::advertised_ttl(&response.answers);
        let deadlines = self
            .ttl_policy
            .compute(&key.domain, advertised_ttl, Instant::now());
        let entry = self.cache.upsert(
            key.clone(),
            Arc::from(response.answers),
            response.rcode,
            deadlines,
        );

        debug!(
            domain = %key.domain,
            record_type = %key.record_type,
            pool = %selection.pool,
            advertised_ttl = advertised_ttl,
            "Upstream answer cached"
        );

        self.callback.on_cache_write(&key, &entry)?;
        Ok(entry)
    }
}
