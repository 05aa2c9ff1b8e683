use crate::dns_protocol::UpstreamEndpoint;
use serde::{Deserialize, Serialize};

/// Named group of upstream resolvers, tried in order.
///
/// Members are server addresses (`udp://1.1.1.1:53`, `tcp://9.9.9.9`,
/// `8.8.8.8:53`) or references to another pool (`pool:fallback`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamPool {
    pub name: String,

    #[serde(default)]
    pub servers: Vec<String>,
}

impl UpstreamPool {
    pub fn new(name: impl Into<String>, servers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            servers,
        }
    }

    pub fn endpoints(&self) -> Result<Vec<UpstreamEndpoint>, String> {
        self.servers.iter().map(|s| s.parse()).collect()
    }
}
