pub mod packet_sender;
pub mod router;
pub mod upstream_dispatcher;

pub use packet_sender::PacketSender;
pub use router::Router;
pub use upstream_dispatcher::UpstreamDispatcher;
