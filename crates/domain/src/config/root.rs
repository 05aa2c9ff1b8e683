use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::dns::DnsConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use crate::dns_protocol::UpstreamEndpoint;
use crate::RecordType;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub dns: DnsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind_address: Option<String>,
    pub dns_port: Option<u16>,
    pub web_port: Option<u16>,
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file (or defaults when `path` is
    /// `None`) and apply CLI overrides on top.
    pub fn load(path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };
        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(port) = overrides.web_port {
            self.server.web_port = port;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let dns = &self.dns;

        if dns.max_concurrent_queries == 0 {
            return Err(invalid("dns.max_concurrent_queries must be greater than 0"));
        }
        if dns.query_timeout == 0 || dns.coalesce_timeout == 0 {
            return Err(invalid("dns timeouts must be greater than 0"));
        }
        if dns.max_forward_depth == 0 {
            return Err(invalid("dns.max_forward_depth must be at least 1"));
        }
        if dns.pools.is_empty() {
            return Err(invalid("at least one upstream pool must be configured"));
        }

        let mut names = HashSet::new();
        for pool in &dns.pools {
            if !names.insert(pool.name.as_str()) {
                return Err(invalid(format!("duplicate upstream pool '{}'", pool.name)));
            }
        }

        for pool in &dns.pools {
            if pool.servers.is_empty() {
                return Err(invalid(format!("upstream pool '{}' has no servers", pool.name)));
            }
            let endpoints = pool.endpoints().map_err(invalid)?;
            for endpoint in endpoints {
                if let UpstreamEndpoint::Pool(target) = endpoint {
                    if !names.contains(&*target) {
                        return Err(invalid(format!(
                            "upstream pool '{}' references unknown pool '{}'",
                            pool.name, target
                        )));
                    }
                }
            }
        }

        if let Some(default_pool) = &dns.default_pool {
            if !names.contains(default_pool.as_str()) {
                return Err(invalid(format!("default pool '{}' is not defined", default_pool)));
            }
        }

        for rule in &dns.rules {
            if !rule.is_reject() && !names.contains(rule.action.as_str()) {
                return Err(invalid(format!(
                    "rule for '{}' targets unknown pool '{}'",
                    rule.domain, rule.action
                )));
            }
            if let Some(types) = &rule.record_types {
                for t in types {
                    t.parse::<RecordType>().map_err(invalid)?;
                }
            }
        }

        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Validation(msg.into())
}
