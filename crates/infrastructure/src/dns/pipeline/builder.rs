use super::config::PipelineConfig;
use super::resolution::ResolutionPipeline;
use crate::dns::admission::AdmissionController;
use crate::dns::cache::{CacheAccessCallback, DnsCache, NoopCacheCallback, TtlPolicy};
use crate::dns::coalescer::RequestCoalescer;
use ferrous_relay_application::ports::{PacketSender, Router, UpstreamDispatcher};
use std::sync::Arc;
use tracing::info;

pub struct PipelineBuilder {
    router: Arc<dyn Router>,
    dispatcher: Arc<dyn UpstreamDispatcher>,
    packet_sender: Arc<dyn PacketSender>,
    config: PipelineConfig,
    cache: Option<Arc<DnsCache>>,
    ttl_policy: Option<TtlPolicy>,
    admission: Option<Arc<AdmissionController>>,
    callback: Option<Arc<dyn CacheAccessCallback>>,
}

impl PipelineBuilder {
    pub fn new(
        router: Arc<dyn Router>,
        dispatcher: Arc<dyn UpstreamDispatcher>,
        packet_sender: Arc<dyn PacketSender>,
    ) -> Self {
        Self {
            router,
            dispatcher,
            packet_sender,
            config: PipelineConfig::default(),
            cache: None,
            ttl_policy: None,
            admission: None,
            callback: None,
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_cache(mut self, cache: Arc<DnsCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_ttl_policy(mut self, policy: TtlPolicy) -> Self {
        self.ttl_policy = Some(policy);
        self
    }

    /// Share an admission controller with other pipelines.
    pub fn with_admission(mut self, admission: Arc<AdmissionController>) -> Self {
        self.admission = Some(admission);
        self
    }

    pub fn with_cache_callback(mut self, callback: Arc<dyn CacheAccessCallback>) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn build(self) -> ResolutionPipeline {
        let ttl_policy = self.ttl_policy.unwrap_or_default();

        info!(
            coalesce_timeout_ms = self.config.coalesce_timeout.as_millis() as u64,
            max_concurrent_queries = self.config.max_concurrent_queries,
            fixed_ttl_domains = ttl_policy.len(),
            "Building resolution pipeline"
        );

        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(DnsCache::new(self.config.cache_capacity)));
        let admission = self.admission.unwrap_or_else(|| {
            Arc::new(AdmissionController::new(self.config.max_concurrent_queries))
        });
        let callback: Arc<dyn CacheAccessCallback> = match self.callback {
            Some(callback) => callback,
            None => Arc::new(NoopCacheCallback),
        };

        ResolutionPipeline::new(
            cache,
            Arc::new(ttl_policy),
            self.router,
            self.dispatcher,
            admission,
            RequestCoalescer::new(self.config.coalesce_timeout),
            callback,
            self.packet_sender,
        )
    }
}
