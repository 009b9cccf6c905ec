use crate::authority::Authority;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use super::errors::ConfigError;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthorityConfig {
    /// Upstream resolver as `ip:port`.
    pub address: String,

    /// Domain suffix this authority is restricted to. Empty or absent means default tier.
    #[serde(default)]
    pub domain: Option<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl AuthorityConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            domain: None,
            timeout_ms: default_timeout_ms(),
        }
    }

    pub fn to_authority(&self) -> Result<Authority, ConfigError> {
        let address: SocketAddr = self.address.parse().map_err(|e| {
            ConfigError::Validation(format!(
                "Invalid authority address '{}': {}",
                self.address, e
            ))
        })?;

        if self.timeout_ms == 0 {
            return Err(ConfigError::Validation(format!(
                "Authority '{}' has a zero timeout",
                self.address
            )));
        }

        Ok(Authority::new(
            address,
            self.domain.as_deref(),
            Duration::from_millis(self.timeout_ms),
        ))
    }
}

fn default_timeout_ms() -> u64 {
    2000
}

pub(crate) fn default_authorities() -> Vec<AuthorityConfig> {
    ["223.5.5.5:53", "223.6.6.6:53", "114.114.114.114:53", "8.8.8.8:53"]
        .into_iter()
        .map(AuthorityConfig::new)
        .collect()
}
