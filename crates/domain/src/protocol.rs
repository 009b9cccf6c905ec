use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport an inbound message arrived on. Upstream exchanges reuse it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NetProtocol {
    Udp,
    Tcp,
}

impl NetProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Udp => "udp",
            Self::Tcp => "tcp",
        }
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Self::Tcp)
    }
}

impl fmt::Display for NetProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
