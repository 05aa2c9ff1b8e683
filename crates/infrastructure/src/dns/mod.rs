pub mod admission;
pub mod cache;
pub mod coalescer;
pub mod events;
pub mod forwarding;
pub mod pipeline;
pub mod routing;
pub mod server;
pub mod transport;
pub mod upstream;

pub use admission::{AdmissionController, AdmissionPermit};
pub use cache::{CacheEntry, CacheKey, CacheMetrics, DnsCache, TtlPolicy};
pub use coalescer::RequestCoalescer;
pub use pipeline::{InboundQuery, PipelineBuilder, PipelineOutcome, ResolutionPipeline};
pub use routing::RuleRouter;
pub use server::{UdpDnsServer, UdpPacketSender};
pub use upstream::PoolDispatcher;
