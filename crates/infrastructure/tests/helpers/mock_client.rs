use async_trait::async_trait;
use dnsproxy_domain::{Authority, DomainError, NetProtocol};
use dnsproxy_infrastructure::dns::UpstreamClient;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Scripted {
    Answer(Ipv4Addr),
    Code(ResponseCode),
    Fail(DomainError),
    /// Never completes; the exchanger's per-attempt timeout fires.
    Hang,
}

/// Upstream client scripted per authority address.
pub struct MockUpstreamClient {
    behaviors: Mutex<HashMap<SocketAddr, Scripted>>,
    attempts: Mutex<Vec<(SocketAddr, NetProtocol)>>,
}

impl MockUpstreamClient {
    pub fn new() -> Self {
        Self {
            behaviors: Mutex::new(HashMap::new()),
            attempts: Mutex::new(Vec::new()),
        }
    }

    pub fn with(self, addr: &str, behavior: Scripted) -> Self {
        self.behaviors
            .lock()
            .unwrap()
            .insert(addr.parse().unwrap(), behavior);
        self
    }

    pub fn attempts(&self) -> Vec<SocketAddr> {
        self.attempts.lock().unwrap().iter().map(|(a, _)| *a).collect()
    }

    pub fn protocols(&self) -> Vec<NetProtocol> {
        self.attempts.lock().unwrap().iter().map(|(_, p)| *p).collect()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }

    fn response_to(request: &Message, code: ResponseCode) -> Message {
        let mut response = Message::new();
        response
            .set_id(request.id())
            .set_message_type(MessageType::Response)
            .set_response_code(code);
        response.add_queries(request.queries().iter().cloned());
        response
    }
}

#[async_trait]
impl UpstreamClient for MockUpstreamClient {
    async fn exchange(
        &self,
        request: &Message,
        authority: &Authority,
        protocol: NetProtocol,
    ) -> Result<Message, DomainError> {
        self.attempts
            .lock()
            .unwrap()
            .push((authority.address, protocol));

        let behavior = self.behaviors.lock().unwrap().get(&authority.address).cloned();
        match behavior {
            Some(Scripted::Answer(ip)) => {
                let mut response = Self::response_to(request, ResponseCode::NoError);
                for query in request.queries() {
                    response.add_answer(Record::from_rdata(
                        query.name().clone(),
                        60,
                        RData::A(A(ip)),
                    ));
                }
                Ok(response)
            }
            Some(Scripted::Code(code)) => Ok(Self::response_to(request, code)),
            Some(Scripted::Fail(e)) => Err(e),
            Some(Scripted::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(DomainError::TransportTimeout {
                    server: authority.address.to_string(),
                })
            }
            None => Err(DomainError::TransportConnectionRefused {
                server: authority.address.to_string(),
            }),
        }
    }
}
