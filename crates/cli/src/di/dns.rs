use ferrous_relay_domain::Config;
use ferrous_relay_infrastructure::dns::cache::TtlPolicy;
use ferrous_relay_infrastructure::dns::events::{CacheEventEmitter, CacheWriteEvent};
use ferrous_relay_infrastructure::dns::pipeline::PipelineConfig;
use ferrous_relay_infrastructure::dns::{
    PipelineBuilder, PoolDispatcher, ResolutionPipeline, RuleRouter, UdpDnsServer,
    UdpPacketSender,
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tracing::{info, trace, Level};

/// Everything the DNS listener and the admin API share.
pub struct DnsServices {
    pub socket: Arc<UdpSocket>,
    pub pipeline: Arc<ResolutionPipeline>,
}

impl DnsServices {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let dns = &config.dns;

        let ip: IpAddr = config.server.bind_address.parse()?;
        let socket = UdpDnsServer::bind(SocketAddr::new(ip, config.server.dns_port)).await?;

        let router = Arc::new(RuleRouter::new(
            dns.rules.clone(),
            dns.default_pool.as_deref(),
        ));
        let dispatcher = Arc::new(PoolDispatcher::new(
            &dns.pools,
            Duration::from_millis(dns.query_timeout),
            dns.max_forward_depth,
        )?);

        let (emitter, events) = cache_event_emitter();
        if let Some(events) = events {
            spawn_cache_event_logger(events);
        }

        let pipeline = PipelineBuilder::new(
            router,
            dispatcher,
            Arc::new(UdpPacketSender::new(Arc::clone(&socket))),
        )
        .with_config(PipelineConfig::from(dns))
        .with_ttl_policy(TtlPolicy::new(&dns.fixed_ttl))
        .with_cache_callback(Arc::new(emitter))
        .build();

        info!(
            pools = dns.pools.len(),
            rules = dns.rules.len(),
            default_pool = ?dns.default_pool,
            "DNS services initialized"
        );

        Ok(Self {
            socket,
            pipeline: Arc::new(pipeline),
        })
    }
}

/// Cache write events only feed a `trace` logger, so the emitter stays
/// disabled unless that level is on for this module.
fn cache_event_emitter() -> (
    CacheEventEmitter,
    Option<mpsc::UnboundedReceiver<CacheWriteEvent>>,
) {
    if tracing::enabled!(Level::TRACE) {
        let (emitter, events) = CacheEventEmitter::new_enabled();
        (emitter, Some(events))
    } else {
        (CacheEventEmitter::new_disabled(), None)
    }
}

fn spawn_cache_event_logger(mut events: mpsc::UnboundedReceiver<CacheWriteEvent>) {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            trace!(
                domain = event.domain(),
                record_type = %event.record_type,
                answers = event.answers,
                ttl = event.ttl,
                expired_on_write = event.expired_on_write,
                "Cache write"
            );
        }
    });
}
