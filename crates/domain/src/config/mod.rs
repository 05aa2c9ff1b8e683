//! Configuration module for Ferrous Relay
//!
//! - `root`: Main configuration and CLI overrides
//! - `server`: Listener ports and binding
//! - `dns`: Cache, admission and coalescing settings
//! - `upstream`: Upstream server pools
//! - `routing`: Per-domain routing rules
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod dns;
pub mod errors;
pub mod logging;
pub mod root;
pub mod routing;
pub mod server;
pub mod upstream;

pub use dns::DnsConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use routing::{RouteRule, REJECT_ACTION};
pub use server::ServerConfig;
pub use upstream::UpstreamPool;
