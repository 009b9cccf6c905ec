use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use super::authority::{default_authorities, AuthorityConfig};
use super::cache::CacheConfig;
use super::errors::ConfigError;
use super::hosts::HostsConfig;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use crate::authority::Authority;

const LOCAL_CONFIG_PATH: &str = "dnsproxy.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/dnsproxy/config.toml";

/// Main configuration structure for dnsproxy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Listen address and CHAOS identity
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream resolvers, in preference order
    #[serde(default = "default_authorities")]
    pub authorities: Vec<AuthorityConfig>,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub hosts: HostsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            authorities: default_authorities(),
            cache: CacheConfig::default(),
            hosts: HostsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dnsproxy.toml in current directory
    /// 3. /etc/dnsproxy/config.toml
    /// 4. Default configuration
    ///
    /// CLI overrides are applied before the result is normalized and validated.
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(listen) = overrides.listen_address {
            self.server.listen_address = listen;
        }
        if let Some(hosts) = overrides.hosts_path {
            self.hosts.path = if hosts.is_empty() { None } else { Some(hosts) };
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Replace non-positive cache settings with their defaults
    pub fn normalize(&mut self) {
        self.cache.normalize();
        if let Some(path) = &self.hosts.path {
            if path.trim().is_empty() {
                self.hosts.path = None;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.listen_addr()?;

        if self.authorities.is_empty() {
            return Err(ConfigError::Validation(
                "No authorities configured".to_string(),
            ));
        }

        self.authorities()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.listen_address.parse().map_err(|e| {
            ConfigError::Validation(format!(
                "Invalid listen address '{}': {}",
                self.server.listen_address, e
            ))
        })
    }

    /// Authorities in configuration order
    pub fn authorities(&self) -> Result<Vec<Authority>, ConfigError> {
        self.authorities
            .iter()
            .map(AuthorityConfig::to_authority)
            .collect()
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub listen_address: Option<String>,
    /// An empty string disables the hosts file.
    pub hosts_path: Option<String>,
    pub log_level: Option<String>,
}
