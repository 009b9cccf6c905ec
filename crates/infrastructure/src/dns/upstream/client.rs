use crate::dns::transport::{create_transport, Transport};
use async_trait::async_trait;
use dnsproxy_domain::{Authority, DomainError, NetProtocol};
use hickory_proto::op::Message;
use std::time::{Duration, Instant};
use tracing::debug;

/// Single request/response exchange with one authority.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn exchange(
        &self,
        request: &Message,
        authority: &Authority,
        protocol: NetProtocol,
    ) -> Result<Message, DomainError>;
}

/// Wire-level client: encode, send over UDP or TCP, decode, verify the id.
///
/// A truncated UDP response is retried over TCP within the remaining budget.
#[derive(Debug, Default, Clone, Copy)]
pub struct WireClient;

impl WireClient {
    pub fn new() -> Self {
        Self
    }

    async fn send_once(
        transport: &Transport,
        authority: &Authority,
        query_bytes: &[u8],
        request_id: u16,
        timeout: Duration,
    ) -> Result<Message, DomainError> {
        let response = transport.send(query_bytes, timeout).await?;

        let message = Message::from_vec(&response.bytes).map_err(|e| {
            DomainError::InvalidDnsMessage(format!(
                "{} response from {}: {}",
                response.protocol_used, authority.address, e
            ))
        })?;

        if message.id() != request_id {
            return Err(DomainError::UpstreamIdMismatch {
                server: authority.address.to_string(),
            });
        }

        Ok(message)
    }
}

#[async_trait]
impl UpstreamClient for WireClient {
    async fn exchange(
        &self,
        request: &Message,
        authority: &Authority,
        protocol: NetProtocol,
    ) -> Result<Message, DomainError> {
        let start = Instant::now();
        let query_bytes = request
            .to_vec()
            .map_err(|e| DomainError::InvalidDnsMessage(e.to_string()))?;

        let transport = create_transport(authority.address, protocol);
        debug!(
            server = %authority.address,
            transport = transport.protocol_name(),
            id = request.id(),
            "Forwarding query"
        );
        let response = Self::send_once(
            &transport,
            authority,
            &query_bytes,
            request.id(),
            authority.timeout,
        )
        .await?;

        if !response.truncated() || protocol.is_stream() {
            return Ok(response);
        }

        debug!(
            server = %authority.address,
            "Response truncated (TC bit), retrying via TCP"
        );

        let remaining = authority
            .timeout
            .checked_sub(start.elapsed())
            .unwrap_or(Duration::from_millis(500));
        let tcp = create_transport(authority.address, NetProtocol::Tcp);
        Self::send_once(&tcp, authority, &query_bytes, request.id(), remaining).await
    }
}
