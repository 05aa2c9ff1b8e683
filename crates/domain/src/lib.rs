//! Ferrous Relay Domain Layer
pub mod config;
pub mod dns_protocol;
pub mod dns_query;
pub mod dns_record;
pub mod errors;
pub mod route;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_protocol::{DnsProtocol, UpstreamEndpoint};
pub use dns_query::{normalize_domain, DnsQuery};
pub use dns_record::RecordType;
pub use errors::DomainError;
pub use route::{RouteDecision, UpstreamSelection};
