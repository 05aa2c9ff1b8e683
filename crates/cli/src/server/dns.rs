use ferrous_relay_infrastructure::dns::{ResolutionPipeline, UdpDnsServer};
use std::sync::Arc;
use tokio::net::UdpSocket;

pub async fn start_dns_server(
    socket: Arc<UdpSocket>,
    pipeline: Arc<ResolutionPipeline>,
) -> anyhow::Result<()> {
    UdpDnsServer::new(socket, pipeline).run().await?;
    Ok(())
}
