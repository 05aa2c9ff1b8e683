use async_trait::async_trait;
use ferrous_relay_domain::DomainError;
use std::net::SocketAddr;

/// Delivers an encoded reply to the client that asked.
#[async_trait]
pub trait PacketSender: Send + Sync {
    async fn send(&self, packet: &[u8], destination: SocketAddr) -> Result<(), DomainError>;
}
