use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// Answer for CHAOS `version.bind.` queries.
    #[serde(default)]
    pub version: Option<String>,

    /// Answer for CHAOS `hostname.bind.` queries. Falls back to the machine hostname.
    #[serde(default)]
    pub identity: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            version: None,
            identity: None,
        }
    }
}

fn default_listen_address() -> String {
    "0.0.0.0:53".to_string()
}
