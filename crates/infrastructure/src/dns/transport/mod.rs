pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use bytes::Bytes;
use dnsproxy_domain::{DomainError, NetProtocol};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Bytes,

    pub protocol_used: &'static str,
}

#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;
}

pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
}

impl Transport {
    pub async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tcp(t) => DnsTransport::send(t, message_bytes, timeout).await,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(t) => t.protocol_name(),
            Self::Tcp(t) => t.protocol_name(),
        }
    }
}

/// Upstream transport matching the protocol the query arrived on.
pub fn create_transport(server_addr: SocketAddr, protocol: NetProtocol) -> Transport {
    match protocol {
        NetProtocol::Udp => Transport::Udp(udp::UdpTransport::new(server_addr)),
        NetProtocol::Tcp => Transport::Tcp(tcp::TcpTransport::new(server_addr)),
    }
}

pub(crate) fn io_error(server_addr: SocketAddr, action: &str, e: io::Error) -> DomainError {
    match e.kind() {
        io::ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused {
            server: server_addr.to_string(),
        },
        _ => DomainError::TransportError {
            server: server_addr.to_string(),
            reason: format!("{}: {}", action, e),
        },
    }
}

pub(crate) fn timeout_error(server_addr: SocketAddr) -> DomainError {
    DomainError::TransportTimeout {
        server: server_addr.to_string(),
    }
}
