//! # Ferrous Relay
//!
//! Caching, coalescing DNS forwarder with an admin API.

mod bootstrap;
mod di;
mod server;

use clap::Parser;
use ferrous_relay_api::AppState;
use ferrous_relay_domain::CliOverrides;
use mimalloc::MiMalloc;
use std::net::{IpAddr, SocketAddr};
use tracing::{error, info};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "ferrous-relay")]
#[command(version)]
#[command(about = "Caching DNS forwarder with request coalescing")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Admin API port (0 disables it)
    #[arg(short = 'w', long)]
    web_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        bind_address: cli.bind,
        dns_port: cli.dns_port,
        web_port: cli.web_port,
        log_level: cli.log_level,
    };
    let config = bootstrap::load_config(cli.config.as_deref(), overrides)?;
    bootstrap::init_logging(&config);

    info!(
        config_file = cli.config.as_deref().unwrap_or("default"),
        dns_port = config.server.dns_port,
        web_port = config.server.web_port,
        bind = %config.server.bind_address,
        "Ferrous Relay starting"
    );

    let services = di::DnsServices::new(&config).await?;
    let mut dns_task = tokio::spawn(server::start_dns_server(
        services.socket.clone(),
        services.pipeline.clone(),
    ));

    let web_task = if config.server.web_port != 0 {
        let ip: IpAddr = config.server.bind_address.parse()?;
        let addr = SocketAddr::new(ip, config.server.web_port);
        let state = AppState::new(services.pipeline.clone());
        Some(tokio::spawn(async move {
            if let Err(e) = server::start_web_server(addr, state).await {
                error!(error = %e, "Admin API failed");
            }
        }))
    } else {
        info!("Admin API disabled");
        None
    };

    tokio::select! {
        result = &mut dns_task => {
            match result {
                Ok(Ok(())) => info!("DNS server stopped"),
                Ok(Err(e)) => {
                    error!(error = %e, "DNS server failed");
                    return Err(e);
                }
                Err(e) => return Err(e.into()),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    dns_task.abort();
    if let Some(web_task) = web_task {
        web_task.abort();
    }

    Ok(())
}
