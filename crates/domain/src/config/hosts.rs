use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HostsConfig {
    #[serde(default)]
    pub path: Option<String>,

    /// Seconds between change checks. Zero disables polling.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// TTL stamped on records synthesized from the hosts file.
    #[serde(default = "default_ttl")]
    pub ttl: u32,
}

impl HostsConfig {
    pub fn poll_interval(&self) -> Option<Duration> {
        match self.poll_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            path: Some("/etc/hosts".to_string()),
            poll_interval_secs: default_poll_interval_secs(),
            ttl: default_ttl(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_ttl() -> u32 {
    10
}
