use dnsproxy_application::use_cases::dns::reply_to;
use dnsproxy_application::use_cases::HandleDnsQueryUseCase;
use dnsproxy_domain::{DomainError, NetProtocol};
use hickory_proto::op::{Message, OpCode, ResponseCode};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

/// Turns inbound wire messages into wire replies.
///
/// Transport concerns (sockets, framing) stay with the listeners; the
/// protocol the bytes arrived on is passed in.
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }

    /// Reply bytes for `bytes`, or `None` when the message is dropped.
    pub async fn handle_raw(
        &self,
        bytes: &[u8],
        protocol: NetProtocol,
        client: SocketAddr,
    ) -> Option<Vec<u8>> {
        let start = Instant::now();

        let request = match Message::from_vec(bytes) {
            Ok(message) => message,
            Err(e) => {
                warn!(client = %client, error = %e, "Failed to decode DNS message");
                return form_error_for_raw(bytes);
            }
        };

        let reply = self.handle(&request, protocol).await?;

        let encoded = match reply.to_vec() {
            Ok(encoded) => encoded,
            Err(e) => {
                error!(id = request.id(), error = %e, "Failed to encode DNS reply");
                return None;
            }
        };

        debug!(
            id = request.id(),
            client = %client,
            protocol = %protocol,
            code = %reply.response_code(),
            answers = reply.answers().len(),
            response_time_us = start.elapsed().as_micros() as u64,
            "DNS reply sent"
        );

        Some(encoded)
    }

    /// Reply for a decoded message, or `None` when it must be dropped.
    pub async fn handle(&self, request: &Message, protocol: NetProtocol) -> Option<Message> {
        match self.use_case.execute(request, protocol).await {
            Ok(reply) => Some(reply),
            Err(DomainError::NoAuthority(domain)) => {
                warn!(id = request.id(), domain = %domain, "No authority for domain, dropping message");
                None
            }
            Err(DomainError::EmptyQuestion) => {
                debug!(id = request.id(), "Message without question");
                Some(error_reply(request, ResponseCode::FormErr))
            }
            Err(e) => {
                error!(id = request.id(), error = %e, "Query handling failed");
                Some(error_reply(request, ResponseCode::ServFail))
            }
        }
    }
}

fn error_reply(request: &Message, code: ResponseCode) -> Message {
    let mut reply = reply_to(request);
    reply.set_response_code(code);
    reply
}

/// FORMERR for bytes that did not decode, if they at least carry an id.
fn form_error_for_raw(bytes: &[u8]) -> Option<Vec<u8>> {
    let id = match bytes {
        [hi, lo, ..] => u16::from_be_bytes([*hi, *lo]),
        _ => return None,
    };

    debug!(id = id, "Sending FORMERR");
    Message::error_msg(id, OpCode::Query, ResponseCode::FormErr)
        .to_vec()
        .ok()
}
