use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

const DEFAULT_DNS_PORT: u16 = 53;

/// Wire protocol and address of one upstream resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DnsProtocol {
    Udp { addr: SocketAddr },
    Tcp { addr: SocketAddr },
}

impl DnsProtocol {
    pub fn socket_addr(&self) -> SocketAddr {
        match self {
            DnsProtocol::Udp { addr } | DnsProtocol::Tcp { addr } => *addr,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            DnsProtocol::Udp { .. } => "UDP",
            DnsProtocol::Tcp { .. } => "TCP",
        }
    }
}

impl fmt::Display for DnsProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnsProtocol::Udp { addr } => write!(f, "udp://{}", addr),
            DnsProtocol::Tcp { addr } => write!(f, "tcp://{}", addr),
        }
    }
}

fn parse_addr(raw: &str) -> Result<SocketAddr, String> {
    if let Ok(addr) = raw.parse::<SocketAddr>() {
        return Ok(addr);
    }
    raw.parse::<std::net::IpAddr>()
        .map(|ip| SocketAddr::new(ip, DEFAULT_DNS_PORT))
        .map_err(|_| format!("Invalid upstream address '{}'", raw))
}

impl FromStr for DnsProtocol {
    type Err = String;

    /// Parses `udp://ip[:port]`, `tcp://ip[:port]` or a bare `ip[:port]`
    /// (UDP). The port defaults to 53.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(rest) = s.strip_prefix("udp://") {
            Ok(DnsProtocol::Udp {
                addr: parse_addr(rest)?,
            })
        } else if let Some(rest) = s.strip_prefix("tcp://") {
            Ok(DnsProtocol::Tcp {
                addr: parse_addr(rest)?,
            })
        } else if s.contains("://") {
            Err(format!("Unsupported upstream scheme in '{}'", s))
        } else {
            Ok(DnsProtocol::Udp {
                addr: parse_addr(s)?,
            })
        }
    }
}

/// One member of an upstream pool: either a concrete server or a reference
/// to another named pool (`pool:<name>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamEndpoint {
    Server(DnsProtocol),
    Pool(Arc<str>),
}

impl FromStr for UpstreamEndpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().strip_prefix("pool:") {
            Some(name) if !name.is_empty() => Ok(UpstreamEndpoint::Pool(Arc::from(name))),
            Some(_) => Err(format!("Empty pool reference in '{}'", s)),
            None => s.parse().map(UpstreamEndpoint::Server),
        }
    }
}
