use crate::dns::pipeline::{InboundQuery, PipelineOutcome, ResolutionPipeline};
use async_trait::async_trait;
use ferrous_relay_application::ports::PacketSender;
use ferrous_relay_domain::DomainError;
use hickory_proto::op::{Message, MessageType};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

/// Largest inbound query accepted, matching the EDNS(0) payload size.
const MAX_QUERY_SIZE: usize = 4096;

/// Sends replies from the socket the server listens on.
#[derive(Clone)]
pub struct UdpPacketSender {
    socket: Arc<UdpSocket>,
}

impl UdpPacketSender {
    pub fn new(socket: Arc<UdpSocket>) -> Self {
        Self { socket }
    }
}

#[async_trait]
impl PacketSender for UdpPacketSender {
    async fn send(&self, packet: &[u8], destination: SocketAddr) -> Result<(), DomainError> {
        self.socket.send_to(packet, destination).await?;
        Ok(())
    }
}

/// UDP listener that hands every datagram to the pipeline on its own task.
pub struct UdpDnsServer {
    socket: Arc<UdpSocket>,
    pipeline: Arc<ResolutionPipeline>,
}

impl UdpDnsServer {
    pub async fn bind(addr: SocketAddr) -> Result<Arc<UdpSocket>, DomainError> {
        let socket = UdpSocket::bind(addr).await.map_err(|e| {
            DomainError::IoError(format!("Failed to bind DNS socket {}: {}", addr, e))
        })?;
        Ok(Arc::new(socket))
    }

    pub fn new(socket: Arc<UdpSocket>, pipeline: Arc<ResolutionPipeline>) -> Self {
        Self { socket, pipeline }
    }

    pub fn local_addr(&self) -> Result<SocketAddr, DomainError> {
        Ok(self.socket.local_addr()?)
    }

    /// Receive loop; only returns if the socket address cannot be read.
    pub async fn run(self) -> Result<(), DomainError> {
        let bind_address = self.local_addr()?;
        info!(bind_address = %bind_address, protocol = "UDP", "DNS server listening");

        let mut buf = vec![0u8; MAX_QUERY_SIZE];
        loop {
            let (len, source) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(e) => {
                    warn!(error = %e, "UDP receive failed");
                    continue;
                }
            };

            let message = match Message::from_vec(&buf[..len]) {
                Ok(message) => message,
                Err(e) => {
                    debug!(client = %source, error = %e, "Dropping undecodable packet");
                    continue;
                }
            };

            if message.message_type() != MessageType::Query {
                debug!(client = %source, "Dropping non-query packet");
                continue;
            }

            let pipeline = Arc::clone(&self.pipeline);
            tokio::spawn(async move {
                let inbound = InboundQuery {
                    message,
                    source,
                    reply: true,
                };
                match pipeline.handle(inbound).await {
                    Ok(PipelineOutcome::Overloaded) => {
                        debug!(client = %source, "Query shed by admission control");
                    }
                    Ok(_) => {}
                    Err(e) if e.is_timeout() => {
                        debug!(client = %source, error = %e, "Query timed out");
                    }
                    Err(e) => {
                        warn!(client = %source, error = %e, "Query failed, no reply sent");
                    }
                }
            });
        }
    }
}
